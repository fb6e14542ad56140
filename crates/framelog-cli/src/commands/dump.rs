//! Dump command implementation.

use super::frames::list_frames;
use super::open_journal;
use crate::output;
use framelog_journal::ScanOptions;

pub fn run(
    journal: String,
    max_size: Option<u64>,
    options: ScanOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut reader = open_journal(&journal, max_size, options)?;

    output::print_header_table(reader.header());
    println!();
    output::print_frame_table_header();
    let listed = list_frames(reader.frames(), false, None)?;
    println!("done: {} frames", listed);

    Ok(())
}
