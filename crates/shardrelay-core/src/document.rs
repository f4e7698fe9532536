//! The canonical document — the normalized, sink-ready form of one
//! decoded unit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stream provenance carried by every document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamProvenance {
    pub stream_type: String,
    pub stream_name: String,
    pub sequence_number: String,
}

/// The normalized output unit.
///
/// Immutable after creation; built fresh per decoded unit by the
/// normalizer (never by mutating a shared template). The timestamp is
/// creation time, not event time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanonicalDocument {
    #[serde(rename = "@timestamp")]
    pub timestamp: DateTime<Utc>,
    /// Decoded event body, UTF-8.
    pub message: String,
    /// Start offset of the unit within the record's decoded content.
    pub offset: u64,
    /// The originating source identifier, verbatim.
    pub source_path: String,
    pub stream: StreamProvenance,
    pub region: String,
    pub account_id: String,
    /// Position of the originating record within its batch.
    pub record_index: usize,
}
