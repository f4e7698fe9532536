//! `RecordStreamConsumer` — drives one batch under a deadline.

use crate::deadline::Deadline;
use crate::normalize::EventNormalizer;
use shardrelay_core::{
    ConsumeError, DocumentSink, OffsetCursor, PayloadDecoder, RecordBatch, StreamRecord,
};
use tracing::{debug, warn};

/// A record whose decoding the deadline cut short, plus the cursor a
/// later invocation resumes from.
#[derive(Debug, Clone)]
pub struct InterruptedRecord {
    pub record_index: usize,
    pub record: StreamRecord,
    /// State as of the last emitted unit of this record; both offsets
    /// absent when the record was interrupted before its first unit.
    pub cursor: OffsetCursor,
}

/// What one consume pass did.
#[derive(Debug, Clone, Default)]
pub struct ConsumeOutcome {
    /// Documents handed to the sink.
    pub emitted: usize,
    /// Records whose unit sequence was exhausted.
    pub completed_records: usize,
    /// Records skipped because of a decode or source error.
    pub failed_records: usize,
    /// Present iff the deadline fired mid-batch.
    pub interrupted: Option<InterruptedRecord>,
}

/// Iterates records of a batch in order, decoding and normalizing each
/// unit, checking the deadline before every emission.
///
/// Processing is single-threaded and strictly sequential: resumption
/// depends on the record/unit order being reproducible across
/// invocations.
pub struct RecordStreamConsumer<'a> {
    decoder: &'a dyn PayloadDecoder,
    deadline: &'a dyn Deadline,
}

impl<'a> RecordStreamConsumer<'a> {
    pub fn new(decoder: &'a dyn PayloadDecoder, deadline: &'a dyn Deadline) -> Self {
        Self { decoder, deadline }
    }

    /// Consume `batch`, shipping documents to `sink` in emission order.
    ///
    /// `resume` is the cursor of a previous invocation's interrupted
    /// record; it applies to the record at `resume.record_index` and is
    /// validated before any record is touched. Decode failures skip the
    /// record and never abort the batch; sink failures do.
    pub fn consume(
        &self,
        batch: &RecordBatch,
        resume: Option<&OffsetCursor>,
        sink: &mut dyn DocumentSink,
    ) -> Result<ConsumeOutcome, ConsumeError> {
        if let Some(cursor) = resume {
            cursor.validate()?;
        }

        let mut outcome = ConsumeOutcome::default();

        for (record_index, record) in batch.records.iter().enumerate() {
            let floor = resume.filter(|c| c.record_index == record_index);
            let range_start = floor.map(OffsetCursor::range_start).unwrap_or(0);

            let normalizer = match EventNormalizer::for_record(record) {
                Ok(n) => n,
                Err(e) => {
                    warn!(record_index, error = %e, "unusable source identifier, skipping record");
                    outcome.failed_records += 1;
                    continue;
                }
            };

            let units = match self.decoder.decode(&record.payload, range_start) {
                Ok(units) => units,
                Err(e) => {
                    warn!(record_index, error = %e, "decode failed, skipping record");
                    outcome.failed_records += 1;
                    continue;
                }
            };

            debug!(record_index, range_start, "consuming record");

            let mut cursor = OffsetCursor {
                record_index,
                sequence_token: record.sequence_token.clone(),
                last_ending_offset: floor.and_then(|c| c.last_ending_offset),
                last_sub_event_index: floor.and_then(|c| c.last_sub_event_index),
            };
            let mut record_failed = false;

            for unit in units {
                let unit = match unit {
                    Ok(unit) => unit,
                    Err(e) => {
                        warn!(record_index, error = %e, "decode failed mid-record, skipping rest");
                        record_failed = true;
                        break;
                    }
                };

                // Units a previous invocation already emitted come back
                // only on the resumed record; drop them.
                if floor.is_some_and(|c| c.covers(&unit)) {
                    continue;
                }

                if self.deadline.expired() {
                    outcome.interrupted = Some(InterruptedRecord {
                        record_index,
                        record: record.clone(),
                        cursor,
                    });
                    return Ok(outcome);
                }

                sink.ship(normalizer.normalize(&unit, record, record_index))?;
                outcome.emitted += 1;
                cursor.advance(&unit);
            }

            if record_failed {
                outcome.failed_records += 1;
            } else {
                outcome.completed_records += 1;
            }
        }

        Ok(outcome)
    }
}
