//! `EventNormalizer` — pure mapping from decoded unit to canonical
//! document.

use chrono::Utc;
use shardrelay_core::{
    CanonicalDocument, DecodedUnit, SourceError, StreamProvenance, StreamRecord, StreamSource,
};

/// Builds one `CanonicalDocument` per decoded unit.
///
/// Constructed once per record so the source identity is parsed once,
/// not per unit. Every document is a fresh value — no shared template is
/// ever mutated, so fields cannot leak across documents. Deterministic
/// given its inputs except for the creation timestamp.
pub struct EventNormalizer {
    source_path: String,
    source: StreamSource,
}

impl EventNormalizer {
    pub fn for_record(record: &StreamRecord) -> Result<Self, SourceError> {
        Ok(Self {
            source_path: record.source_id.clone(),
            source: StreamSource::parse(&record.source_id)?,
        })
    }

    pub fn normalize(
        &self,
        unit: &DecodedUnit,
        record: &StreamRecord,
        record_index: usize,
    ) -> CanonicalDocument {
        CanonicalDocument {
            timestamp: Utc::now(),
            message: String::from_utf8_lossy(&unit.content).into_owned(),
            offset: unit.start_offset,
            source_path: self.source_path.clone(),
            stream: StreamProvenance {
                stream_type: self.source.stream_type.clone(),
                stream_name: self.source.stream_name.clone(),
                sequence_number: record.sequence_token.clone(),
            },
            region: self.source.region.clone(),
            account_id: self.source.account_id.clone(),
            record_index,
        }
    }
}
