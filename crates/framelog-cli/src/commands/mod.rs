//! Subcommand implementations.

pub mod check;
pub mod dump;
pub mod frames;
pub mod header;

use crate::path;
use framelog_journal::{JournalError, JournalReader, ScanOptions};

/// Validates the journal path, enforces the size limit and opens the journal.
pub fn open_journal(
    journal: &str,
    max_size: Option<u64>,
    options: ScanOptions,
) -> Result<JournalReader, Box<dyn std::error::Error>> {
    let journal_path = path::validate_journal_path(journal)
        .map_err(|e| format!("Invalid journal path: {}", e))?;

    if let Some(max_bytes) = max_size {
        let metadata = std::fs::metadata(&journal_path)?;
        if metadata.len() > max_bytes {
            return Err(format!(
                "Journal size {} exceeds maximum {} bytes",
                metadata.len(),
                max_bytes
            )
            .into());
        }
    }

    JournalReader::open(&journal_path, options).map_err(|e| {
        let sanitized = path::sanitize_path_for_error(&journal_path);
        format!("Failed to open journal file: {}: {}", sanitized, e).into()
    })
}

/// Turns a scan error into the message shown to the user.
pub fn scan_failure(err: JournalError) -> Box<dyn std::error::Error> {
    if !err.is_structural() {
        return format!("scan failed: {}", err).into();
    }
    match err.frame_index() {
        Some(index) => format!(
            "journal is structurally inconsistent at frame {}: {}",
            index, err
        )
        .into(),
        None => format!("journal is structurally inconsistent: {}", err).into(),
    }
}
