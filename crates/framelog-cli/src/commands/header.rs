//! Header command implementation.

use super::open_journal;
use crate::output;
use framelog_journal::ScanOptions;

pub fn run(
    journal: String,
    json: bool,
    options: ScanOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let reader = open_journal(&journal, None, options)?;
    let header = reader.header();

    if json {
        println!("{}", serde_json::to_string_pretty(header)?);
    } else {
        output::print_header_table(header);
    }

    Ok(())
}
