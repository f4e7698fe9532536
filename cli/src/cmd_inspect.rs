//! `shardrelay inspect` — print the decoded cursor of saved messages.

use crate::cmd_resume::load_messages;
use anyhow::Result;
use std::path::Path;

pub fn run(continuation_path: &Path) -> Result<()> {
    let messages = load_messages(continuation_path)?;
    if messages.is_empty() {
        println!("no continuation messages");
        return Ok(());
    }

    for (i, message) in messages.iter().enumerate() {
        let cursor = message.cursor()?;
        println!("message {i}:");
        println!("  sequence_token:       {}", cursor.sequence_token);
        println!(
            "  last_ending_offset:   {}",
            cursor
                .last_ending_offset
                .map(|v| v.to_string())
                .unwrap_or_else(|| "absent (resume from start)".into())
        );
        println!(
            "  last_sub_event_index: {}",
            cursor
                .last_sub_event_index
                .map(|v| v.to_string())
                .unwrap_or_else(|| "absent".into())
        );
        println!("  body bytes:           {}", message.body.len());
    }
    Ok(())
}
