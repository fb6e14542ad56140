use thiserror::Error;

/// Errors that can occur while reading a journal.
///
/// Every variant is fatal for the scan that produced it: the scanner never
/// tries to resynchronise on a later frame boundary.
#[derive(Error, Debug)]
pub enum JournalError {
    /// I/O error from the underlying file (open, read or seek).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Header text is missing its terminator, is not UTF-8, or is not a
    /// mapping of keys to non-negative integers.
    #[error("malformed journal header: {reason}")]
    MalformedHeader {
        /// Reason the header was rejected.
        reason: String,
    },
    /// Fewer than 16 bytes remain where a frame descriptor should start.
    #[error("truncated frame header at frame {index} (position {position}): only {available} bytes remain")]
    TruncatedFrameHeader {
        /// 1-based index of the frame whose descriptor is cut short.
        index: u64,
        /// Byte position where the descriptor starts.
        position: u64,
        /// Bytes left in the file from `position`.
        available: u64,
    },
    /// A frame's declared length runs past the end of the file.
    #[error("truncated payload at frame {index} (position {position}): length {length} overruns file size {file_size}")]
    TruncatedPayload {
        /// 1-based index of the frame whose payload is cut short.
        index: u64,
        /// Byte position of the frame's descriptor.
        position: u64,
        /// Declared payload length.
        length: u64,
        /// Total size of the journal file.
        file_size: u64,
    },
}

impl JournalError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        JournalError::MalformedHeader {
            reason: reason.into(),
        }
    }

    /// Returns the 1-based frame index for structural frame errors.
    pub fn frame_index(&self) -> Option<u64> {
        match self {
            JournalError::TruncatedFrameHeader { index, .. }
            | JournalError::TruncatedPayload { index, .. } => Some(*index),
            _ => None,
        }
    }

    /// Returns `true` if the error describes the journal's structure rather
    /// than a failure of the storage layer.
    pub fn is_structural(&self) -> bool {
        !matches!(self, JournalError::Io(_))
    }
}
