//! # shardrelay-consumer
//!
//! The deadline-bounded batch consumer.
//!
//! Drives a record batch through a `PayloadDecoder`, normalizes every
//! decoded unit into a `CanonicalDocument`, and forwards documents to a
//! sink in a fixed total order. The only suspension point is a
//! cooperative deadline check before each unit; when it fires, the
//! in-flight record and its cursor are handed to the continuation
//! publisher and nothing after the interrupted record is started.
//!
//! ## Control flow
//! ```text
//! RecordBatch ──▶ RecordStreamConsumer
//!                   │  per record: PayloadDecoder::decode(payload, range_start)
//!                   │  per unit:   deadline check ▶ EventNormalizer ▶ DocumentSink
//!                   ▼
//!            ConsumeOutcome ──▶ run_invocation ──▶ ContinuationPublisher
//!                                  (interrupted record + trailing records)
//! ```

pub mod consumer;
pub mod deadline;
pub mod invocation;
pub mod normalize;

pub use consumer::{ConsumeOutcome, InterruptedRecord, RecordStreamConsumer};
pub use deadline::{Deadline, Never, WallClock};
pub use invocation::{run_invocation, InvocationError, InvocationReport};
pub use normalize::EventNormalizer;
