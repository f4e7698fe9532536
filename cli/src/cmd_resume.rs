//! `shardrelay resume` — continue from saved continuation messages.

use crate::cmd_run::{build_deadline, build_decoder, build_sink, print_report};
use crate::file_channel::FileChannel;
use anyhow::{Context, Result};
use shardrelay_consumer::run_invocation;
use shardrelay_continuation::{ContinuationMessage, ContinuationPublisher};
use shardrelay_core::{DocumentSink, RecordBatch};
use std::fs;
use std::path::Path;
use std::sync::Arc;

pub(crate) fn load_messages(path: &Path) -> Result<Vec<ContinuationMessage>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read continuation file {}", path.display()))?;
    raw.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            serde_json::from_str(line)
                .with_context(|| format!("{} holds an invalid continuation message", path.display()))
        })
        .collect()
}

pub async fn run(
    continuation_path: &Path,
    deadline_ms: Option<u64>,
    expand_field: Option<String>,
    output: Option<&Path>,
    continuation_out: &Path,
) -> Result<()> {
    let messages = load_messages(continuation_path)?;
    let decoder = build_decoder(expand_field);
    let mut sink = build_sink(output)?;
    let publisher = ContinuationPublisher::new(Arc::new(FileChannel::new(continuation_out)));

    // Messages resume in send order; each is a one-record batch.
    for message in messages {
        let record = message.record()?;
        let cursor = message.cursor()?;
        let config = message.config()?.to_string();
        let batch = RecordBatch::new(vec![record]);

        let deadline = build_deadline(deadline_ms);
        let report = run_invocation(
            &batch,
            decoder.as_ref(),
            deadline.as_ref(),
            &mut sink as &mut dyn DocumentSink,
            &publisher,
            Some(&cursor),
            &config,
        )
        .await?;

        print_report(&report, &batch);
    }
    Ok(())
}
