//! Framelog CLI - Command-line interface for journal inspection.

use clap::{Parser, Subcommand};
use framelog_journal::header::DEFAULT_MAX_HEADER_LEN;
use framelog_journal::ScanOptions;
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod output;
mod path;

use commands::{check, dump, frames, header};

#[derive(Parser)]
#[command(name = "framelog")]
#[command(about = "Journal header and frame inspection CLI")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v: debug, -vv: trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Reject headers longer than LEN bytes
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_HEADER_LEN)]
    max_header_len: usize,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the journal header fields
    Header {
        /// Path to journal file
        journal: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List frames in a journal
    Frames {
        /// Path to journal file
        journal: String,
        /// Output as JSON (one object per line)
        #[arg(long)]
        json: bool,
        /// Stop after listing N frames (default: unlimited)
        #[arg(long)]
        max_frames: Option<u64>,
        /// Reject journals larger than SIZE bytes (default: unlimited)
        #[arg(long)]
        max_size: Option<u64>,
    },
    /// Show the header followed by every frame
    Dump {
        /// Path to journal file
        journal: String,
        /// Reject journals larger than SIZE bytes (default: unlimited)
        #[arg(long)]
        max_size: Option<u64>,
    },
    /// Scan a journal and report its structural consistency
    Check {
        /// Path to journal file
        journal: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Reject journals larger than SIZE bytes (default: unlimited)
        #[arg(long)]
        max_size: Option<u64>,
    },
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let options = ScanOptions {
        max_header_len: cli.max_header_len,
    };

    let result = match cli.command {
        Commands::Header { journal, json } => header::run(journal, json, options),
        Commands::Frames {
            journal,
            json,
            max_frames,
            max_size,
        } => frames::run(journal, json, max_frames, max_size, options),
        Commands::Dump { journal, max_size } => dump::run(journal, max_size, options),
        Commands::Check {
            journal,
            json,
            max_size,
        } => check::run(journal, json, max_size, options),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
