//! Checkpoint/resume integration tests.
//!
//! The central property: running a batch to completion across as many
//! resumed invocations as needed yields the same documents, in the same
//! order, as one pass with an unlimited deadline — no duplication, no
//! loss.

use shardrelay_consumer::{run_invocation, Deadline, Never, RecordStreamConsumer};
use shardrelay_core::{
    CanonicalDocument, MemorySink, OffsetCursor, PayloadDecoder, RecordBatch, StreamRecord,
};
use shardrelay_continuation::{ContinuationPublisher, MemoryChannel};
use shardrelay_decode::{ExpandingDecoder, LineDecoder};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

// ─── Helpers ──────────────────────────────────────────────────────────────────

const SOURCE: &str = "arn:aws:kinesis:us-east-1:123456789012:stream/app-logs";

fn record(seq: &str, payload: &[u8]) -> StreamRecord {
    StreamRecord {
        sequence_token: seq.to_string(),
        source_id: SOURCE.to_string(),
        payload: payload.to_vec(),
    }
}

/// Deadline fake: allows exactly `n` units per invocation, then fires.
struct UnitBudget(AtomicUsize);

impl UnitBudget {
    fn new(n: usize) -> Self {
        Self(AtomicUsize::new(n))
    }
}

impl Deadline for UnitBudget {
    fn expired(&self) -> bool {
        self.0
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_err()
    }
}

/// Identity of a document, stable across invocations. `record_index` is
/// left out: a resumed record sits at index 0 of its one-record batch.
fn fingerprint(doc: &CanonicalDocument) -> (String, String, u64) {
    (
        doc.stream.sequence_number.clone(),
        doc.message.clone(),
        doc.offset,
    )
}

/// One unlimited-deadline pass — the reference output.
fn one_pass(batch: &RecordBatch, decoder: &dyn PayloadDecoder) -> Vec<(String, String, u64)> {
    let consumer = RecordStreamConsumer::new(decoder, &Never);
    let mut sink = MemorySink::new();
    consumer.consume(batch, None, &mut sink).unwrap();
    sink.documents.iter().map(fingerprint).collect()
}

/// Drive the batch to completion, `units_per_invocation` at a time,
/// following every published continuation until the queue runs dry.
/// Continuations of one invocation are processed depth-first so the
/// global emission order is preserved.
async fn drain(
    batch: RecordBatch,
    decoder: &dyn PayloadDecoder,
    units_per_invocation: usize,
) -> (Vec<(String, String, u64)>, usize) {
    let mut emitted = Vec::new();
    let mut invocations = 0;
    let mut work: VecDeque<(RecordBatch, Option<OffsetCursor>)> =
        VecDeque::from([(batch, None)]);

    while let Some((batch, cursor)) = work.pop_front() {
        invocations += 1;
        assert!(invocations < 500, "resume loop did not converge");

        let channel = Arc::new(MemoryChannel::new());
        let publisher = ContinuationPublisher::new(channel.clone());
        let deadline = UnitBudget::new(units_per_invocation);
        let mut sink = MemorySink::new();

        run_invocation(
            &batch,
            decoder,
            &deadline,
            &mut sink,
            &publisher,
            cursor.as_ref(),
            "inputs: []",
        )
        .await
        .unwrap();

        emitted.extend(sink.documents.iter().map(fingerprint));

        for message in channel.drain().into_iter().rev() {
            let resumed = message.record().unwrap();
            let cursor = message.cursor().unwrap();
            work.push_front((RecordBatch::new(vec![resumed]), Some(cursor)));
        }
    }

    (emitted, invocations)
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn exactly_once_across_all_line_budgets() {
    let batch = RecordBatch::new(vec![
        record("seq-0", b"a1\na2\na3\n"),
        record("seq-1", b"b1\n"),
        record("seq-2", b""),
        record("seq-3", b"c1\nc2\n\nc3\n"),
    ]);
    let decoder = LineDecoder::new();
    let reference = one_pass(&batch, &decoder);
    assert_eq!(reference.len(), 7);

    for budget in 1..=reference.len() + 2 {
        let (emitted, _) = drain(batch.clone(), &decoder, budget).await;
        assert_eq!(emitted, reference, "budget {budget} broke exactly-once");
    }
}

#[tokio::test]
async fn exactly_once_across_all_expansion_budgets() {
    let batch = RecordBatch::new(vec![
        record(
            "seq-0",
            b"{\"events\":[{\"n\":1},{\"n\":2},{\"n\":3}]}\n{\"events\":[{\"n\":4}]}\n",
        ),
        record("seq-1", b"{\"events\":[{\"n\":5},{\"n\":6}]}\n"),
    ]);
    let decoder = ExpandingDecoder::new("events");
    let reference = one_pass(&batch, &decoder);
    assert_eq!(reference.len(), 6);

    for budget in 1..=reference.len() + 2 {
        let (emitted, _) = drain(batch.clone(), &decoder, budget).await;
        assert_eq!(emitted, reference, "budget {budget} broke exactly-once");
    }
}

#[tokio::test]
async fn interruption_mid_record_publishes_cursor_and_trailing_continuations() {
    // Three records, two units each; the deadline fires on the fourth
    // unit, one short on record 1.
    let batch = RecordBatch::new(vec![
        record("seq-0", b"a1\na2\n"),
        record("seq-1", b"b1\nb2\n"),
        record("seq-2", b"c1\nc2\n"),
    ]);
    let decoder = LineDecoder::new();
    let channel = Arc::new(MemoryChannel::new());
    let publisher = ContinuationPublisher::new(channel.clone());
    let deadline = UnitBudget::new(3);
    let mut sink = MemorySink::new();

    let report = run_invocation(
        &batch, &decoder, &deadline, &mut sink, &publisher, None, "cfg",
    )
    .await
    .unwrap();

    assert_eq!(report.emitted, 3);
    assert_eq!(report.continuations_published, 2);
    assert!(report.continued());

    let messages = channel.drain();
    // The interrupted record carries the cursor of its last emitted unit.
    let interrupted = messages[0].cursor().unwrap();
    assert_eq!(interrupted.sequence_token, "seq-1");
    assert_eq!(interrupted.last_ending_offset, Some(3));
    assert_eq!(interrupted.last_sub_event_index, None);
    // The never-started record gets a fresh continuation, no cursor.
    let fresh = messages[1].cursor().unwrap();
    assert_eq!(fresh.sequence_token, "seq-2");
    assert!(fresh.at_start());

    // A second invocation fed only the interrupted record's payload
    // emits exactly the remaining unit.
    let resumed_batch = RecordBatch::new(vec![messages[0].record().unwrap()]);
    let mut resumed_sink = MemorySink::new();
    let report = run_invocation(
        &resumed_batch,
        &decoder,
        &UnitBudget::new(10),
        &mut resumed_sink,
        &ContinuationPublisher::new(Arc::new(MemoryChannel::new())),
        Some(&interrupted),
        "cfg",
    )
    .await
    .unwrap();

    assert_eq!(report.emitted, 1);
    assert_eq!(report.continuations_published, 0);
    assert_eq!(resumed_sink.documents[0].message, "b2");
}

#[tokio::test]
async fn interruption_before_the_first_unit_resumes_from_scratch() {
    let batch = RecordBatch::new(vec![record("seq-0", b"a1\na2\n")]);
    let decoder = LineDecoder::new();
    let channel = Arc::new(MemoryChannel::new());
    let publisher = ContinuationPublisher::new(channel.clone());
    let mut sink = MemorySink::new();

    let report = run_invocation(
        &batch,
        &decoder,
        &UnitBudget::new(0),
        &mut sink,
        &publisher,
        None,
        "cfg",
    )
    .await
    .unwrap();

    assert_eq!(report.emitted, 0);
    assert_eq!(report.continuations_published, 1);

    let message = channel.drain().remove(0);
    let cursor = message.cursor().unwrap();
    assert!(cursor.at_start());

    // Resuming from an empty cursor is the same as processing fresh.
    let consumer = RecordStreamConsumer::new(&decoder, &Never);
    let mut fresh_sink = MemorySink::new();
    let mut resumed_sink = MemorySink::new();
    consumer
        .consume(&batch, None, &mut fresh_sink)
        .unwrap();
    consumer
        .consume(&batch, Some(&cursor), &mut resumed_sink)
        .unwrap();
    assert_eq!(
        fresh_sink.documents.iter().map(fingerprint).collect::<Vec<_>>(),
        resumed_sink.documents.iter().map(fingerprint).collect::<Vec<_>>(),
    );
}

#[tokio::test]
async fn zero_unit_record_is_never_the_subject_of_a_continuation() {
    // The empty record completes instantly; the deadline then fires on
    // the first unit of the record after it.
    let batch = RecordBatch::new(vec![
        record("seq-0", b"a\n"),
        record("seq-1", b""),
        record("seq-2", b"b\nc\n"),
    ]);
    let decoder = LineDecoder::new();
    let channel = Arc::new(MemoryChannel::new());
    let publisher = ContinuationPublisher::new(channel.clone());
    let mut sink = MemorySink::new();

    let report = run_invocation(
        &batch,
        &decoder,
        &UnitBudget::new(1),
        &mut sink,
        &publisher,
        None,
        "cfg",
    )
    .await
    .unwrap();

    assert_eq!(report.emitted, 1);
    let messages = channel.drain();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].cursor().unwrap().sequence_token, "seq-2");
}

#[tokio::test]
async fn resuming_never_reemits_at_or_below_the_cursor() {
    let payload: &[u8] = b"{\"events\":[{\"n\":1},{\"n\":2},{\"n\":3}]}\n";
    let decoder = ExpandingDecoder::new("events");
    let batch = RecordBatch::new(vec![record("seq-0", payload)]);

    // Stop after the second sub-event of the shared byte range.
    let channel = Arc::new(MemoryChannel::new());
    let publisher = ContinuationPublisher::new(channel.clone());
    let mut sink = MemorySink::new();
    run_invocation(
        &batch,
        &decoder,
        &UnitBudget::new(2),
        &mut sink,
        &publisher,
        None,
        "cfg",
    )
    .await
    .unwrap();

    let cursor = channel.drain().remove(0).cursor().unwrap();
    assert_eq!(cursor.last_sub_event_index, Some(1));

    let consumer = RecordStreamConsumer::new(&decoder, &Never);
    let mut resumed_sink = MemorySink::new();
    let outcome = consumer
        .consume(&batch, Some(&cursor), &mut resumed_sink)
        .unwrap();

    assert_eq!(outcome.emitted, 1);
    assert_eq!(resumed_sink.documents[0].message, "{\"n\":3}");
}
