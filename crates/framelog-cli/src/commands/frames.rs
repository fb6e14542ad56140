//! Frames command implementation.

use super::{open_journal, scan_failure};
use crate::output;
use framelog_journal::{FrameScanner, ScanOptions};
use std::io::{Read, Seek};

pub fn run(
    journal: String,
    json: bool,
    max_frames: Option<u64>,
    max_size: Option<u64>,
    options: ScanOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut reader = open_journal(&journal, max_size, options)?;

    if !json {
        output::print_frame_table_header();
    }
    let listed = list_frames(reader.frames(), json, max_frames)?;

    if !json {
        if reader.frames().is_done() {
            println!("done: {} frames", listed);
        } else {
            println!("stopped after {} frames (end of file not verified)", listed);
        }
    }

    Ok(())
}

/// Prints frames until the scan ends or `max_frames` have been listed.
///
/// Returns the number of frames printed; a scan failure is returned as an
/// error after the frames before it have been printed.
pub fn list_frames<R: Read + Seek>(
    scanner: &mut FrameScanner<R>,
    json: bool,
    max_frames: Option<u64>,
) -> Result<u64, Box<dyn std::error::Error>> {
    let mut listed: u64 = 0;
    loop {
        if let Some(max) = max_frames {
            if listed >= max {
                break;
            }
        }

        let frame = match scanner.next_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => break,
            Err(e) => return Err(scan_failure(e)),
        };

        if json {
            println!("{}", output::format_frame_json(&frame));
        } else {
            println!("{}", output::format_frame_row(&frame));
        }
        listed += 1;
    }

    Ok(listed)
}
