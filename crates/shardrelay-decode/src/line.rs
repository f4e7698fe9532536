//! Newline framing — one decoded unit per non-empty line.

use shardrelay_core::{DecodeError, DecodedUnit, DecodedUnits, PayloadDecoder};

/// Frames the payload into newline-terminated units.
///
/// A unit's byte range covers the line *including* its terminator, so
/// `end_offset` values are valid `range_start` resumption points. The
/// content excludes the terminator (`\n` or `\r\n`). A final
/// unterminated line is a unit ending at the payload length. Blank
/// lines advance the offset but produce no unit.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineDecoder;

impl LineDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl PayloadDecoder for LineDecoder {
    fn decode<'a>(
        &'a self,
        payload: &'a [u8],
        range_start: u64,
    ) -> Result<DecodedUnits<'a>, DecodeError> {
        Ok(Box::new(LineUnits {
            payload,
            cursor: 0,
            range_start,
        }))
    }
}

struct LineUnits<'a> {
    payload: &'a [u8],
    cursor: usize,
    range_start: u64,
}

impl Iterator for LineUnits<'_> {
    type Item = Result<DecodedUnit, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.cursor < self.payload.len() {
            let start = self.cursor;
            let rest = &self.payload[start..];
            let end = match rest.iter().position(|&b| b == b'\n') {
                Some(nl) => start + nl + 1,
                None => self.payload.len(),
            };
            self.cursor = end;

            let mut content = &self.payload[start..end];
            if content.ends_with(b"\n") {
                content = &content[..content.len() - 1];
            }
            if content.ends_with(b"\r") {
                content = &content[..content.len() - 1];
            }

            // Already covered by a previous invocation, or blank.
            if end as u64 <= self.range_start || content.is_empty() {
                continue;
            }

            return Some(Ok(DecodedUnit {
                content: content.to_vec(),
                start_offset: start as u64,
                end_offset: end as u64,
                sub_event_index: None,
            }));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn units(payload: &[u8], range_start: u64) -> Vec<DecodedUnit> {
        LineDecoder::new()
            .decode(payload, range_start)
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
    }

    #[test]
    fn frames_terminated_lines_with_inclusive_ranges() {
        let got = units(b"alpha\nbeta\n", 0);
        assert_eq!(got.len(), 2);
        assert_eq!(got[0].content, b"alpha");
        assert_eq!((got[0].start_offset, got[0].end_offset), (0, 6));
        assert_eq!(got[1].content, b"beta");
        assert_eq!((got[1].start_offset, got[1].end_offset), (6, 11));
        assert!(got.iter().all(|u| u.sub_event_index.is_none()));
    }

    #[test]
    fn final_unterminated_line_ends_at_payload_length() {
        let got = units(b"alpha\ntail", 0);
        assert_eq!(got[1].content, b"tail");
        assert_eq!(got[1].end_offset, 10);
    }

    #[test]
    fn strips_crlf_but_counts_it_in_the_range() {
        let got = units(b"one\r\ntwo\r\n", 0);
        assert_eq!(got[0].content, b"one");
        assert_eq!(got[0].end_offset, 5);
    }

    #[test]
    fn blank_lines_advance_the_offset_without_units() {
        let got = units(b"a\n\n\nb\n", 0);
        assert_eq!(got.len(), 2);
        assert_eq!(got[1].start_offset, 4);
    }

    #[test]
    fn range_start_skips_already_covered_units() {
        let all = units(b"alpha\nbeta\ngamma\n", 0);
        let resumed = units(b"alpha\nbeta\ngamma\n", all[1].end_offset);
        assert_eq!(resumed, all[2..].to_vec());
    }

    #[test]
    fn empty_payload_yields_nothing() {
        assert!(units(b"", 0).is_empty());
    }
}
