//! `OffsetCursor` — the resumption point inside a partially-consumed record.
//!
//! A cursor coordinates three offset dimensions: the record's position in
//! its batch, the byte offset of the last decoded unit emitted from the
//! record's content, and the sub-event index disambiguating units that
//! share a byte range through content expansion.

use crate::decode::DecodedUnit;
use crate::error::CursorError;
use serde::{Deserialize, Serialize};

/// Identifies precisely where consumption of a batch stopped.
///
/// A cursor with both offset fields `None` means "resume this record from
/// its start". `last_ending_offset` is exclusive: the next unit to emit
/// ends strictly after it (or shares it with a higher sub-event index).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffsetCursor {
    /// Position of the interrupted record within its batch, 0-based.
    pub record_index: usize,
    /// Stream-native identifier of the record (opaque, provenance only).
    pub sequence_token: String,
    /// Byte offset, exclusive, of the last emitted unit's range.
    /// `None` if no unit of this record was emitted yet.
    pub last_ending_offset: Option<u64>,
    /// Index of the last emitted sub-event sharing that byte range.
    /// `None` when the last unit was not produced by expansion.
    pub last_sub_event_index: Option<u64>,
}

impl OffsetCursor {
    /// A cursor pointing at the start of a record: nothing emitted yet.
    pub fn start(record_index: usize, sequence_token: impl Into<String>) -> Self {
        Self {
            record_index,
            sequence_token: sequence_token.into(),
            last_ending_offset: None,
            last_sub_event_index: None,
        }
    }

    /// Check the cursor invariant: a sub-event index is only meaningful
    /// relative to a byte offset. Violation is a contract error and must
    /// be rejected before any resume happens.
    pub fn validate(&self) -> Result<(), CursorError> {
        if self.last_sub_event_index.is_some() && self.last_ending_offset.is_none() {
            return Err(CursorError::SubEventWithoutOffset {
                record_index: self.record_index,
            });
        }
        Ok(())
    }

    /// The offset the decoder should resume from. Only meaningful after
    /// `validate` has passed.
    pub fn range_start(&self) -> u64 {
        self.last_ending_offset.unwrap_or(0)
    }

    /// `true` if nothing of this record has been emitted yet.
    pub fn at_start(&self) -> bool {
        self.last_ending_offset.is_none()
    }

    /// Advance past an emitted unit.
    pub fn advance(&mut self, unit: &DecodedUnit) {
        self.last_ending_offset = Some(unit.end_offset);
        self.last_sub_event_index = unit.sub_event_index;
    }

    /// `true` if `unit` was already emitted before this cursor was taken,
    /// i.e. a resumed sequence must not re-emit it.
    pub fn covers(&self, unit: &DecodedUnit) -> bool {
        let Some(last_end) = self.last_ending_offset else {
            return false;
        };
        match unit.end_offset.cmp(&last_end) {
            std::cmp::Ordering::Less => true,
            std::cmp::Ordering::Greater => false,
            std::cmp::Ordering::Equal => match (self.last_sub_event_index, unit.sub_event_index) {
                // Only a higher sub-event index in the same byte range is new.
                (Some(last_sub), Some(sub)) => sub <= last_sub,
                // An exhausted range cannot produce anything new.
                _ => true,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(end: u64, sub: Option<u64>) -> DecodedUnit {
        DecodedUnit {
            content: b"x".to_vec(),
            start_offset: end.saturating_sub(1),
            end_offset: end,
            sub_event_index: sub,
        }
    }

    #[test]
    fn start_cursor_covers_nothing() {
        let c = OffsetCursor::start(0, "seq-1");
        assert!(c.at_start());
        assert_eq!(c.range_start(), 0);
        assert!(!c.covers(&unit(0, None)));
    }

    #[test]
    fn sub_event_without_offset_is_rejected() {
        let c = OffsetCursor {
            record_index: 3,
            sequence_token: "seq-3".into(),
            last_ending_offset: None,
            last_sub_event_index: Some(2),
        };
        assert_eq!(
            c.validate(),
            Err(CursorError::SubEventWithoutOffset { record_index: 3 })
        );
    }

    #[test]
    fn offset_zero_is_a_valid_resumption_point() {
        let c = OffsetCursor {
            record_index: 0,
            sequence_token: "seq".into(),
            last_ending_offset: Some(0),
            last_sub_event_index: Some(0),
        };
        assert!(c.validate().is_ok());
        assert!(!c.at_start());
        assert_eq!(c.range_start(), 0);
    }

    #[test]
    fn covers_by_ending_offset() {
        let mut c = OffsetCursor::start(0, "seq");
        c.advance(&unit(10, None));
        assert!(c.covers(&unit(9, None)));
        assert!(c.covers(&unit(10, None)));
        assert!(!c.covers(&unit(11, None)));
    }

    #[test]
    fn covers_resolves_expansion_ties_by_sub_event_index() {
        let mut c = OffsetCursor::start(0, "seq");
        c.advance(&unit(10, Some(1)));
        assert!(c.covers(&unit(10, Some(0))));
        assert!(c.covers(&unit(10, Some(1))));
        assert!(!c.covers(&unit(10, Some(2))));
        assert!(!c.covers(&unit(11, Some(0))));
    }
}
