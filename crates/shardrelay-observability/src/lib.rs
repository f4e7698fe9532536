//! # shardrelay-observability
//!
//! OpenTelemetry-based observability for ShardRelay.
//!
//! ## Built-in metrics
//! - `shardrelay.documents_emitted`        — counter, tagged with stream
//! - `shardrelay.records_failed`           — counter, tagged with stream + reason
//! - `shardrelay.continuations_published`  — counter, tagged with stream
//! - `shardrelay.batch_records`            — histogram
//!
//! ## Structured logging
//! JSON-structured logs compatible with ELK, Loki, CloudWatch.
//! Log levels configurable per component.

pub mod metrics;
pub mod tracing_setup;

pub use metrics::RelayMetrics;
pub use tracing_setup::{init_tracing, LogConfig};
