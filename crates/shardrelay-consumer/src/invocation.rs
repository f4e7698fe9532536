//! One host invocation: consume, then hand off what the deadline cut.

use crate::consumer::RecordStreamConsumer;
use crate::deadline::Deadline;
use shardrelay_core::{ConsumeError, DocumentSink, OffsetCursor, PayloadDecoder, RecordBatch};
use shardrelay_continuation::{ContinuationPublisher, PublishError};
use thiserror::Error;
use tracing::{info, warn};

/// What the invocation reports back to the host.
#[derive(Debug, Clone, Default)]
pub struct InvocationReport {
    pub emitted: usize,
    pub completed_records: usize,
    pub failed_records: usize,
    /// Continuation messages published: one for the interrupted record,
    /// one fresh message per record after it.
    pub continuations_published: usize,
}

impl InvocationReport {
    /// `true` when the deadline cut the batch short.
    pub fn continued(&self) -> bool {
        self.continuations_published > 0
    }
}

/// Fatal invocation errors. A decode failure on one record is never
/// fatal; a publish failure always is, so the stream's at-least-once
/// redelivery can re-supply the batch.
#[derive(Debug, Error)]
pub enum InvocationError {
    #[error(transparent)]
    Consume(#[from] ConsumeError),

    #[error(transparent)]
    Publish(#[from] PublishError),
}

/// Run one deadline-bounded pass over `batch`.
///
/// When the deadline fires, the interrupted record is published with its
/// cursor, and every record after it — none of which was started — is
/// published as a fresh continuation with no cursor, so a later
/// invocation picks each of them up from the continuation queue.
pub async fn run_invocation(
    batch: &RecordBatch,
    decoder: &dyn PayloadDecoder,
    deadline: &dyn Deadline,
    sink: &mut dyn DocumentSink,
    publisher: &ContinuationPublisher,
    resume: Option<&OffsetCursor>,
    config: &str,
) -> Result<InvocationReport, InvocationError> {
    let consumer = RecordStreamConsumer::new(decoder, deadline);
    let outcome = consumer.consume(batch, resume, sink)?;

    let mut continuations_published = 0;
    if let Some(interrupted) = &outcome.interrupted {
        warn!(
            record_index = interrupted.record_index,
            emitted = outcome.emitted,
            "deadline reached mid-batch, continuing via queue"
        );

        publisher
            .publish(&interrupted.record, &interrupted.cursor, config)
            .await?;
        continuations_published += 1;

        for (record_index, record) in batch
            .records
            .iter()
            .enumerate()
            .skip(interrupted.record_index + 1)
        {
            let fresh = OffsetCursor::start(record_index, &record.sequence_token);
            publisher.publish(record, &fresh, config).await?;
            continuations_published += 1;
        }
    }

    let report = InvocationReport {
        emitted: outcome.emitted,
        completed_records: outcome.completed_records,
        failed_records: outcome.failed_records,
        continuations_published,
    };
    info!(
        emitted = report.emitted,
        completed = report.completed_records,
        failed = report.failed_records,
        continuations = report.continuations_published,
        "invocation finished"
    );
    Ok(report)
}
