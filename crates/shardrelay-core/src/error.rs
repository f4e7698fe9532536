//! Error types for the ShardRelay consume/continue pipeline.

use thiserror::Error;

/// Errors that can occur while decoding a record payload.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Invalid payload: {reason}")]
    InvalidPayload { reason: String },

    #[error("Missing expansion field: {field}")]
    MissingField { field: String },

    #[error("Payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unknown error: {0}")]
    Other(String),
}

/// Contract violations in a resumption cursor.
///
/// These are programming errors on the producer side of a continuation,
/// never data errors; the consumer fails fast instead of resuming from a
/// wrong point.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CursorError {
    #[error("Cursor for record {record_index} carries a sub-event index without a byte offset")]
    SubEventWithoutOffset { record_index: usize },
}

/// Errors from parsing a source identifier.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Malformed source identifier '{id}': {reason}")]
    Malformed { id: String, reason: String },
}

/// Errors from a downstream document sink.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Sink serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Sink closed")]
    Closed,

    #[error("{0}")]
    Other(String),
}

/// Errors from the continuation channel transport.
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("Continuation channel closed")]
    Closed,

    #[error("Continuation channel rejected message: {reason}")]
    Rejected { reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors while encoding or decoding a continuation message.
#[derive(Debug, Error)]
pub enum ContinuationError {
    #[error("Missing message attribute: {key}")]
    MissingAttribute { key: String },

    #[error("Attribute {key} is not a valid number: '{value}'")]
    InvalidNumber { key: String, value: String },

    #[error("Record payload is not UTF-8 text: {0}")]
    BodyNotUtf8(#[from] std::string::FromUtf8Error),

    #[error("Continuation cursor is malformed: {0}")]
    MalformedCursor(#[from] CursorError),

    #[error("Source identifier in message is malformed: {0}")]
    Source(#[from] SourceError),
}

/// Fatal errors while consuming a batch.
///
/// Per-record decode failures are *not* represented here — they are
/// counted in the consume outcome and never abort the batch.
#[derive(Debug, Error)]
pub enum ConsumeError {
    #[error("Resume cursor rejected: {0}")]
    Cursor(#[from] CursorError),

    #[error("Document sink failed: {0}")]
    Sink(#[from] SinkError),
}
