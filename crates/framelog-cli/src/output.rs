//! Output formatting utilities.

use framelog_journal::{JournalHeader, ScannedFrame};

/// Prints header fields as a two-column table.
#[allow(clippy::print_literal)]
pub fn print_header_table(header: &JournalHeader) {
    println!("{:<24} {}", "KEY", "VALUE");
    println!("{}", "-".repeat(44));
    for (key, value) in header {
        println!("{:<24} {}", truncate(key, 24), value);
    }
    println!("frames start at byte {}", header.end_offset());
}

/// Prints frame table header.
#[allow(clippy::print_literal)]
pub fn print_frame_table_header() {
    println!("{:>10} {:>20} {:>20}", "INDEX", "OFFSET", "LENGTH");
    println!("{}", "-".repeat(52));
}

/// Formats a frame as a table row.
pub fn format_frame_row(frame: &ScannedFrame) -> String {
    format!("{:>10} {:>20} {:>20}", frame.index, frame.offset, frame.length)
}

/// Formats a frame as a single-line JSON object.
pub fn format_frame_json(frame: &ScannedFrame) -> String {
    serde_json::to_string(frame).unwrap_or_else(|_| "{}".to_string())
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_row_contains_fields() {
        let frame = ScannedFrame {
            index: 2,
            offset: 200,
            length: 0,
            position: 51,
        };
        let row = format_frame_row(&frame);
        let fields: Vec<&str> = row.split_whitespace().collect();
        assert_eq!(fields, vec!["2", "200", "0"]);
    }

    #[test]
    fn frame_json_is_parseable() {
        let frame = ScannedFrame {
            index: 1,
            offset: 100,
            length: 4,
            position: 15,
        };
        let value: serde_json::Value = serde_json::from_str(&format_frame_json(&frame)).unwrap();
        assert_eq!(value["index"], 1);
        assert_eq!(value["offset"], 100);
        assert_eq!(value["length"], 4);
    }

    #[test]
    fn truncate_long_keys() {
        assert_eq!(truncate("short", 24), "short");
        assert_eq!(truncate("abcdefghij", 6), "abc...");
    }
}
