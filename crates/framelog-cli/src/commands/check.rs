//! Check command implementation.

use super::open_journal;
use framelog_journal::summary::MAX_OFFSET_KEY;
use framelog_journal::{ScanOptions, ScanOutcome, ScanSummary};
use serde_json::json;

pub fn run(
    journal: String,
    json_output: bool,
    max_size: Option<u64>,
    options: ScanOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut reader = open_journal(&journal, max_size, options)?;
    let summary = ScanSummary::collect(reader.frames());
    let max_offset_ok = summary.check_max_offset(reader.header());

    if json_output {
        let output = json!({
            "file_size": reader.file_size(),
            "header_end": reader.header().end_offset(),
            "summary": summary,
            "max_offset_consistent": max_offset_ok,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{:<16} {}", "file size:", reader.file_size());
        println!("{:<16} {}", "frames:", summary.frames);
        println!("{:<16} {}", "payload bytes:", summary.payload_bytes);
        match summary.highest_offset {
            Some(highest) => println!("{:<16} {}", "highest offset:", highest),
            None => println!("{:<16} -", "highest offset:"),
        }
        match max_offset_ok {
            Some(true) => println!("{:<16} consistent", "max_offset:"),
            Some(false) => println!(
                "{:<16} MISMATCH (declared {}, observed {})",
                "max_offset:",
                reader.header().get(MAX_OFFSET_KEY).unwrap_or_default(),
                summary.highest_offset.unwrap_or_default()
            ),
            None => println!("{:<16} not checked", "max_offset:"),
        }
        match &summary.outcome {
            ScanOutcome::Complete => println!("{:<16} complete", "status:"),
            ScanOutcome::Failed { reason, .. } => {
                println!("{:<16} FAILED: {}", "status:", reason)
            }
        }
    }

    match summary.outcome {
        ScanOutcome::Failed {
            index: Some(index), ..
        } => Err(format!("journal is structurally inconsistent at frame {}", index).into()),
        ScanOutcome::Failed { reason, .. } => Err(format!("scan failed: {}", reason).into()),
        ScanOutcome::Complete if max_offset_ok == Some(false) => {
            Err("declared max_offset does not match frame contents".into())
        }
        ScanOutcome::Complete => Ok(()),
    }
}
