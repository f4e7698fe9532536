//! List-field expansion — one decoded unit per element of a JSON list.

use shardrelay_core::{DecodeError, DecodedUnit, DecodedUnits, PayloadDecoder};

/// Expands a configured list field of newline-framed JSON objects.
///
/// Every element of one object shares the object's byte range, so units
/// carry a `sub_event_index` that resets to 0 per object and increments
/// across elements. On resume, an object whose range ends exactly at
/// `range_start` is re-expanded in full; the consumer drops the
/// sub-events a previous invocation already emitted.
#[derive(Debug, Clone)]
pub struct ExpandingDecoder {
    field: String,
}

impl ExpandingDecoder {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    fn expand(
        &self,
        object: &[u8],
        start_offset: u64,
        end_offset: u64,
    ) -> Result<Vec<DecodedUnit>, DecodeError> {
        let value: serde_json::Value = serde_json::from_slice(object)?;
        let items = value
            .get(&self.field)
            .ok_or_else(|| DecodeError::MissingField {
                field: self.field.clone(),
            })?
            .as_array()
            .ok_or_else(|| DecodeError::InvalidPayload {
                reason: format!("field '{}' is not a list", self.field),
            })?;

        items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                Ok(DecodedUnit {
                    content: serde_json::to_vec(item)?,
                    start_offset,
                    end_offset,
                    sub_event_index: Some(i as u64),
                })
            })
            .collect()
    }
}

impl PayloadDecoder for ExpandingDecoder {
    fn decode<'a>(
        &'a self,
        payload: &'a [u8],
        range_start: u64,
    ) -> Result<DecodedUnits<'a>, DecodeError> {
        Ok(Box::new(ExpandUnits {
            decoder: self,
            payload,
            cursor: 0,
            range_start,
            pending: Vec::new().into_iter(),
            failed: false,
        }))
    }
}

struct ExpandUnits<'a> {
    decoder: &'a ExpandingDecoder,
    payload: &'a [u8],
    cursor: usize,
    range_start: u64,
    pending: std::vec::IntoIter<DecodedUnit>,
    failed: bool,
}

impl Iterator for ExpandUnits<'_> {
    type Item = Result<DecodedUnit, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            if let Some(unit) = self.pending.next() {
                return Some(Ok(unit));
            }
            if self.cursor >= self.payload.len() {
                return None;
            }

            let start = self.cursor;
            let rest = &self.payload[start..];
            let end = match rest.iter().position(|&b| b == b'\n') {
                Some(nl) => start + nl + 1,
                None => self.payload.len(),
            };
            self.cursor = end;

            let mut object = &self.payload[start..end];
            if object.ends_with(b"\n") {
                object = &object[..object.len() - 1];
            }
            if object.ends_with(b"\r") {
                object = &object[..object.len() - 1];
            }

            // Fully covered object ranges are skipped; a range ending
            // exactly at `range_start` may still hold unemitted
            // sub-events, so it is re-expanded.
            if (end as u64) < self.range_start || object.is_empty() {
                continue;
            }

            match self.decoder.expand(object, start as u64, end as u64) {
                Ok(units) => self.pending = units.into_iter(),
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e));
                }
            }
        }
    }
}
