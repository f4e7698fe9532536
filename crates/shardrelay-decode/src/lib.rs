//! # shardrelay-decode
//!
//! Reference implementations of the `PayloadDecoder` trait from
//! `shardrelay-core`.
//!
//! - [`LineDecoder`] frames a payload into newline-terminated units.
//! - [`ExpandingDecoder`] expands the elements of a JSON list field into
//!   one unit per element, producing sub-event indexes.
//!
//! Both honor `range_start` so a resumed invocation never re-decodes
//! content a previous invocation already emitted.

pub mod expand;
pub mod line;

pub use expand::ExpandingDecoder;
pub use line::LineDecoder;
