//! ShardRelay CLI — consume record batches under a deadline, resume from
//! continuation messages, inspect saved cursors.
//!
//! # Commands
//! ```
//! shardrelay run     --batch <batch.json> [--deadline-ms N] [--expand-field F]
//! shardrelay resume  --continuation <messages.ndjson>
//! shardrelay inspect --continuation <messages.ndjson>
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use shardrelay_observability::{init_tracing, LogConfig};
use std::path::PathBuf;

mod cmd_inspect;
mod cmd_resume;
mod cmd_run;
mod file_channel;

#[derive(Parser)]
#[command(
    name = "shardrelay",
    about = "Deadline-bounded, resumable record stream consumer — ShardRelay CLI",
    long_about = "
ShardRelay CLI: decode record batches into canonical documents and, when a
deadline cuts a batch short, hand the in-flight record to a continuation
file a later `resume` picks up from exactly the next undelivered unit.
",
    version
)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Export metrics to this OTLP endpoint (e.g. http://localhost:4317)
    #[arg(long, global = true)]
    otlp_endpoint: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Consume a batch file and ship NDJSON documents
    Run {
        /// Path to the batch JSON file
        #[arg(long)]
        batch: PathBuf,
        /// Wall-clock budget in milliseconds (default: unlimited)
        #[arg(long)]
        deadline_ms: Option<u64>,
        /// Expand this JSON list field instead of line framing
        #[arg(long)]
        expand_field: Option<String>,
        /// Write documents here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
        /// Resumption config blob (YAML) forwarded into continuations
        #[arg(long)]
        config: Option<PathBuf>,
        /// Where interrupted-record continuations are appended
        #[arg(long, default_value = "continuations.ndjson")]
        continuation_out: PathBuf,
    },

    /// Continue from previously saved continuation messages
    Resume {
        /// Path to an NDJSON file of continuation messages
        #[arg(long)]
        continuation: PathBuf,
        /// Wall-clock budget in milliseconds (default: unlimited)
        #[arg(long)]
        deadline_ms: Option<u64>,
        /// Expand this JSON list field instead of line framing
        #[arg(long)]
        expand_field: Option<String>,
        /// Write documents here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
        /// Where still-unfinished continuations are appended
        #[arg(long, default_value = "continuations.ndjson")]
        continuation_out: PathBuf,
    },

    /// Print the decoded cursor of saved continuation messages
    Inspect {
        /// Path to an NDJSON file of continuation messages
        #[arg(long)]
        continuation: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    let _ = init_tracing(&LogConfig::with_level(level));
    if let Some(endpoint) = &cli.otlp_endpoint {
        let _ = shardrelay_observability::metrics::init_otlp_metrics(endpoint)?;
    }

    match cli.command {
        Commands::Run {
            batch,
            deadline_ms,
            expand_field,
            output,
            config,
            continuation_out,
        } => {
            cmd_run::run(
                &batch,
                deadline_ms,
                expand_field,
                output.as_deref(),
                config.as_deref(),
                &continuation_out,
            )
            .await
        }
        Commands::Resume {
            continuation,
            deadline_ms,
            expand_field,
            output,
            continuation_out,
        } => {
            cmd_resume::run(
                &continuation,
                deadline_ms,
                expand_field,
                output.as_deref(),
                &continuation_out,
            )
            .await
        }
        Commands::Inspect { continuation } => cmd_inspect::run(&continuation),
    }
}
