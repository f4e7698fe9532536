//! `shardrelay run` — consume a batch file under a deadline.

use crate::file_channel::FileChannel;
use anyhow::{Context, Result};
use shardrelay_consumer::{run_invocation, Deadline, InvocationReport, Never, WallClock};
use shardrelay_continuation::ContinuationPublisher;
use shardrelay_core::{DocumentSink, NdjsonSink, PayloadDecoder, RecordBatch, StreamSource};
use shardrelay_decode::{ExpandingDecoder, LineDecoder};
use shardrelay_observability::RelayMetrics;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

pub(crate) fn load_config(path: Option<&Path>) -> Result<String> {
    let Some(path) = path else {
        return Ok(String::new());
    };
    let blob = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    // The blob is forwarded opaquely, but a resume with an unparsable
    // config is unrecoverable — reject it here.
    serde_yaml::from_str::<serde_yaml::Value>(&blob)
        .with_context(|| format!("config {} is not valid YAML", path.display()))?;
    Ok(blob)
}

pub(crate) fn build_decoder(expand_field: Option<String>) -> Box<dyn PayloadDecoder> {
    match expand_field {
        Some(field) => Box::new(ExpandingDecoder::new(field)),
        None => Box::new(LineDecoder::new()),
    }
}

pub(crate) fn build_deadline(deadline_ms: Option<u64>) -> Box<dyn Deadline> {
    match deadline_ms {
        Some(ms) => Box::new(WallClock::with_budget(Duration::from_millis(ms))),
        None => Box::new(Never),
    }
}

pub(crate) fn build_sink(output: Option<&Path>) -> Result<NdjsonSink<Box<dyn Write>>> {
    let writer: Box<dyn Write> = match output {
        Some(path) => Box::new(
            fs::File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?,
        ),
        None => Box::new(std::io::stdout()),
    };
    Ok(NdjsonSink::new(writer))
}

pub(crate) fn print_report(report: &InvocationReport, batch: &RecordBatch) {
    let stream = batch
        .records
        .first()
        .and_then(|r| StreamSource::parse(&r.source_id).ok())
        .map(|s| s.stream_name)
        .unwrap_or_else(|| "unknown".into());

    let metrics = RelayMetrics::new(&opentelemetry::global::meter("shardrelay"));
    metrics.record_batch(batch.len() as u64);
    metrics.record_emitted(&stream, report.emitted as u64);
    metrics.record_continuations(&stream, report.continuations_published as u64);

    eprintln!(
        "emitted {} documents ({} records completed, {} failed, {} continuations)",
        report.emitted,
        report.completed_records,
        report.failed_records,
        report.continuations_published
    );
}

pub async fn run(
    batch_path: &Path,
    deadline_ms: Option<u64>,
    expand_field: Option<String>,
    output: Option<&Path>,
    config_path: Option<&Path>,
    continuation_out: &Path,
) -> Result<()> {
    let raw = fs::read_to_string(batch_path)
        .with_context(|| format!("failed to read batch {}", batch_path.display()))?;
    let batch: RecordBatch = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a valid batch file", batch_path.display()))?;
    let config = load_config(config_path)?;

    let decoder = build_decoder(expand_field);
    let deadline = build_deadline(deadline_ms);
    let mut sink = build_sink(output)?;
    let publisher = ContinuationPublisher::new(Arc::new(FileChannel::new(continuation_out)));

    let report = run_invocation(
        &batch,
        decoder.as_ref(),
        deadline.as_ref(),
        &mut sink as &mut dyn DocumentSink,
        &publisher,
        None,
        &config,
    )
    .await?;

    print_report(&report, &batch);
    if report.continued() {
        eprintln!(
            "deadline reached — resume with: shardrelay resume --continuation {}",
            continuation_out.display()
        );
    }
    Ok(())
}
