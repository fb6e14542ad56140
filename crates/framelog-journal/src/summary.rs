//! Aggregate statistics over one scan.

use crate::frame::ScannedFrame;
use crate::header::JournalHeader;
use crate::scanner::FrameScanner;
use serde::Serialize;
use std::io::{Read, Seek};

/// Header key holding the highest logical byte covered by the journal.
pub const MAX_OFFSET_KEY: &str = "max_offset";

/// How a scan ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScanOutcome {
    /// Every byte of the file was accounted for.
    Complete,
    /// The scan stopped on an error.
    Failed {
        /// 1-based index of the failing frame, when the error is tied to one.
        index: Option<u64>,
        /// Error description.
        reason: String,
    },
}

/// Totals gathered from one scan. Holds no per-frame records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    /// Number of frames emitted.
    pub frames: u64,
    /// Sum of emitted payload lengths.
    pub payload_bytes: u64,
    /// Highest `offset + length - 1` over non-empty frames.
    pub highest_offset: Option<u64>,
    /// How the scan ended.
    pub outcome: ScanOutcome,
}

impl ScanSummary {
    /// Runs `scanner` to the end and folds its frames into a summary.
    ///
    /// Scan errors are recorded in [`ScanSummary::outcome`] rather than
    /// returned.
    pub fn collect<R: Read + Seek>(scanner: &mut FrameScanner<R>) -> Self {
        let mut summary = Self {
            frames: 0,
            payload_bytes: 0,
            highest_offset: None,
            outcome: ScanOutcome::Complete,
        };

        for result in scanner {
            match result {
                Ok(frame) => summary.record(&frame),
                Err(err) => {
                    summary.outcome = ScanOutcome::Failed {
                        index: err.frame_index(),
                        reason: err.to_string(),
                    };
                    break;
                }
            }
        }
        summary
    }

    fn record(&mut self, frame: &ScannedFrame) {
        self.frames += 1;
        self.payload_bytes = self.payload_bytes.saturating_add(frame.length);
        if let Some(last) = frame.last_logical_byte() {
            self.highest_offset = Some(self.highest_offset.map_or(last, |h| h.max(last)));
        }
    }

    /// Returns `true` if the scan reached the end of the file cleanly.
    pub fn is_complete(&self) -> bool {
        self.outcome == ScanOutcome::Complete
    }

    /// Compares the header's declared `max_offset` with what the frames cover.
    ///
    /// `None` if the header has no `max_offset` or no frame carries payload.
    pub fn check_max_offset(&self, header: &JournalHeader) -> Option<bool> {
        let declared = header.get(MAX_OFFSET_KEY)?;
        let observed = self.highest_offset?;
        Some(declared == observed)
    }
}
