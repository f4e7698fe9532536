//! # shardrelay-continuation
//!
//! The wire form of a resumption point and the publisher that hands an
//! interrupted record off to a continuation queue.
//!
//! A `ContinuationMessage` carries the interrupted record's raw payload
//! as its body plus the cursor and provenance as message attributes, so
//! a later invocation can resume without re-fetching the record from the
//! stream. Optional cursor attributes are present only when the cursor
//! field is present — offset `0` and sub-event `0` are valid resumption
//! points and must stay distinguishable from "absent".

pub mod channel;
pub mod message;
pub mod publisher;

pub use channel::{ContinuationChannel, MemoryChannel};
pub use message::{AttributeType, ContinuationMessage, MessageAttribute};
pub use publisher::{ContinuationPublisher, PublishError};
