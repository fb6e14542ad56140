//! Journal file format and zero-materialization frame scanner.
//!
//! A journal is a NUL-terminated JSON header mapping keys to non-negative
//! integers, followed by frames laid out back to back:
//!
//! ```text
//! [ header-text (UTF-8) ][ 0x00 ][ frame 1 ][ frame 2 ] ... [ frame n ]
//! frame ::= [ offset: u64 ][ length: u64 ][ payload: length bytes ]
//! ```
//!
//! This crate provides:
//! - Header parsing with an open key set
//! - A forward-only frame scanner that skips payloads with relative seeks
//! - Scan summaries for consistency reporting
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use framelog_journal::{JournalReader, ScanOptions, ScanSummary};
//!
//! let mut reader = JournalReader::open("object.journal", ScanOptions::default())?;
//! println!("version: {:?}", reader.header().get("version"));
//!
//! let summary = ScanSummary::collect(reader.frames());
//! println!("{} frames, {} payload bytes", summary.frames, summary.payload_bytes);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Key Types
//!
//! - [`JournalReader`] - Open a journal file and read its header
//! - [`FrameScanner`] - Walk frame descriptors without loading payloads
//! - [`ScanSummary`] - Totals and outcome of one scan
//!
//! The format has no magic number, checksum or frame count. A journal is
//! well-formed when its frames end exactly at the end of the file.

#![deny(missing_docs)]

/// Error types for journal operations.
pub mod errors;
/// Frame descriptor layout.
pub mod frame;
/// Journal header parsing and encoding.
pub mod header;
/// Journal reader implementation.
pub mod reader;
/// Sequential frame scanner.
pub mod scanner;
/// Scan summaries.
pub mod summary;

pub use errors::JournalError;
pub use frame::{FrameDescriptor, ScannedFrame, FRAME_DESCRIPTOR_SIZE};
pub use header::{read_header, read_header_with_limit, JournalHeader};
pub use reader::{JournalReader, ScanOptions};
pub use scanner::{FailureKind, FrameScanner, ScanState};
pub use summary::{ScanOutcome, ScanSummary};
