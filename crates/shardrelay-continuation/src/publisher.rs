//! `ContinuationPublisher` — hands an interrupted record off to the
//! continuation queue.

use crate::channel::ContinuationChannel;
use crate::message::ContinuationMessage;
use shardrelay_core::{ChannelError, ContinuationError, OffsetCursor, StreamRecord};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Errors from publishing a continuation.
///
/// Not retried here — retry policy belongs to the transport client. The
/// caller decides whether a failed publish fails the whole invocation so
/// stream-level redelivery can re-supply the batch.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("Continuation message could not be built: {0}")]
    Message(#[from] ContinuationError),

    #[error("Continuation channel send failed: {0}")]
    Channel(#[from] ChannelError),
}

/// Publishes exactly one `ContinuationMessage` per not-fully-consumed
/// record.
pub struct ContinuationPublisher {
    channel: Arc<dyn ContinuationChannel>,
}

impl ContinuationPublisher {
    pub fn new(channel: Arc<dyn ContinuationChannel>) -> Self {
        Self { channel }
    }

    /// Build and send the continuation for one record. `cursor` is the
    /// resumption point; a cursor with no offsets means the record was
    /// never started and resumes from scratch.
    pub async fn publish(
        &self,
        record: &StreamRecord,
        cursor: &OffsetCursor,
        config: &str,
    ) -> Result<(), PublishError> {
        let message = ContinuationMessage::build(record, cursor, config)?;
        self.channel.send(&message).await?;

        debug!(
            sequence_number = %record.sequence_token,
            last_ending_offset = ?cursor.last_ending_offset,
            last_sub_event_index = ?cursor.last_sub_event_index,
            "continuing"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::MemoryChannel;
    use async_trait::async_trait;

    struct RejectingChannel;

    #[async_trait]
    impl ContinuationChannel for RejectingChannel {
        async fn send(&self, _message: &ContinuationMessage) -> Result<(), ChannelError> {
            Err(ChannelError::Rejected {
                reason: "queue over quota".into(),
            })
        }
    }

    fn record() -> StreamRecord {
        StreamRecord {
            sequence_token: "seq-1".into(),
            source_id: "arn:aws:kinesis:us-east-1:42:stream/s".into(),
            payload: b"a\nb\n".to_vec(),
        }
    }

    #[tokio::test]
    async fn publishes_exactly_one_message() {
        let channel = Arc::new(MemoryChannel::new());
        let publisher = ContinuationPublisher::new(channel.clone());
        let cursor = OffsetCursor {
            record_index: 0,
            sequence_token: "seq-1".into(),
            last_ending_offset: Some(2),
            last_sub_event_index: None,
        };

        publisher.publish(&record(), &cursor, "cfg").await.unwrap();

        let sent = channel.drain();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].cursor().unwrap(), cursor);
    }

    #[tokio::test]
    async fn channel_errors_surface_unretried() {
        let publisher = ContinuationPublisher::new(Arc::new(RejectingChannel));
        let cursor = OffsetCursor::start(0, "seq-1");

        let err = publisher.publish(&record(), &cursor, "cfg").await;
        assert!(matches!(err, Err(PublishError::Channel(_))));
    }

    #[tokio::test]
    async fn malformed_cursor_fails_before_any_send() {
        let channel = Arc::new(MemoryChannel::new());
        let publisher = ContinuationPublisher::new(channel.clone());
        let cursor = OffsetCursor {
            record_index: 0,
            sequence_token: "seq-1".into(),
            last_ending_offset: None,
            last_sub_event_index: Some(1),
        };

        let err = publisher.publish(&record(), &cursor, "cfg").await;
        assert!(matches!(err, Err(PublishError::Message(_))));
        assert!(channel.is_empty());
    }
}
