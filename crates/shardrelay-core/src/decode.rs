//! The `PayloadDecoder` trait and decoded-unit types.
//!
//! Every payload decoder (line framing, list expansion, etc.) implements
//! `PayloadDecoder`. The trait is object-safe so decoders can be stored
//! as `Arc<dyn PayloadDecoder>` by the consumer and the CLI.

use crate::error::DecodeError;

/// One event extracted from a record's payload, with the byte range of
/// the decoded content consumed to produce it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedUnit {
    /// Decoded event bytes.
    pub content: Vec<u8>,
    /// Byte offset where this unit's range begins, inclusive.
    pub start_offset: u64,
    /// Byte offset where this unit's range ends, exclusive.
    pub end_offset: u64,
    /// Disambiguates multiple units sharing one byte range due to
    /// content expansion. `Some(0)` for the first unit of a range,
    /// incrementing for successors; `None` for unexpanded units.
    pub sub_event_index: Option<u64>,
}

/// A lazy, finite sequence of decoded units from a single record.
///
/// Decoders must not materialize large payloads eagerly; the consumer
/// pulls units one at a time and may stop at any point.
pub type DecodedUnits<'a> = Box<dyn Iterator<Item = Result<DecodedUnit, DecodeError>> + Send + 'a>;

/// The central trait every payload decoder must implement.
///
/// # Contract
/// - Within one call, `end_offset` is non-decreasing across yielded units.
/// - No unit with `end_offset < range_start` is ever yielded. A unit with
///   `end_offset == range_start` may be yielded only by expanding
///   decoders; the consumer resolves the tie by sub-event index.
/// - Each `decode` call is independent: no state is retained between
///   calls, so any record can be re-decoded from any resumption point.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` so they can be shared across
/// invocations without additional locking.
pub trait PayloadDecoder: Send + Sync {
    /// Decode one record payload, skipping content already covered up to
    /// and including `range_start`.
    fn decode<'a>(
        &'a self,
        payload: &'a [u8],
        range_start: u64,
    ) -> Result<DecodedUnits<'a>, DecodeError>;
}
