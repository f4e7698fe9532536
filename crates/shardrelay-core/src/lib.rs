//! # shardrelay-core
//!
//! Core traits, types, and primitives shared across all ShardRelay crates.
//! Every payload decoder, the batch consumer, and the continuation
//! publisher are built on top of the interfaces defined here.

pub mod cursor;
pub mod decode;
pub mod document;
pub mod error;
pub mod record;
pub mod sink;
pub mod source;

pub use cursor::OffsetCursor;
pub use decode::{DecodedUnit, DecodedUnits, PayloadDecoder};
pub use document::{CanonicalDocument, StreamProvenance};
pub use error::{
    ChannelError, ConsumeError, ContinuationError, CursorError, DecodeError, SinkError,
    SourceError,
};
pub use record::{RecordBatch, StreamRecord};
pub use sink::{DocumentSink, MemorySink, NdjsonSink};
pub use source::StreamSource;
