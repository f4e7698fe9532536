//! A continuation channel backed by a local NDJSON file.

use async_trait::async_trait;
use shardrelay_continuation::{ContinuationChannel, ContinuationMessage};
use shardrelay_core::ChannelError;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

/// Appends one JSON line per continuation message. `resume` replays the
/// file in send order.
pub struct FileChannel {
    path: PathBuf,
}

impl FileChannel {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ContinuationChannel for FileChannel {
    async fn send(&self, message: &ContinuationMessage) -> Result<(), ChannelError> {
        let line = serde_json::to_string(message).map_err(|e| ChannelError::Rejected {
            reason: e.to_string(),
        })?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{line}")?;
        Ok(())
    }
}
