//! Sequential frame scanner.
//!
//! The scanner walks frame descriptors from the end of the header to the end
//! of the file. Payloads are skipped with relative seeks and never read, so a
//! scan holds one 16-byte descriptor in memory regardless of journal size.

use crate::errors::JournalError;
use crate::frame::{FrameDescriptor, ScannedFrame, FRAME_DESCRIPTOR_SIZE};
use std::io::{self, Read, Seek, SeekFrom};

/// Kind of failure that stopped a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Fewer than 16 bytes remained for a descriptor.
    TruncatedFrameHeader,
    /// A declared payload length ran past the end of the file.
    TruncatedPayload,
    /// The storage layer failed a read or seek.
    Io,
}

/// Scanner state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    /// Cursor sits on the next descriptor (or on the end of the file).
    Positioned {
        /// Current byte position.
        position: u64,
    },
    /// A descriptor was read and returned; its payload is skipped on the next
    /// step.
    Emitted {
        /// The frame that was returned.
        frame: ScannedFrame,
    },
    /// The scan consumed exactly the whole file.
    Done,
    /// The scan stopped on an error. No further frames are produced until
    /// [`FrameScanner::rewind`] is called.
    Failed {
        /// 1-based index of the frame being processed.
        index: u64,
        /// What went wrong.
        kind: FailureKind,
    },
}

/// Lazy, forward-only scanner over a journal's frame sequence.
///
/// The total file size is supplied by the caller; termination relies on it
/// entirely.
///
/// # Example
///
/// ```rust
/// use framelog_journal::{FrameDescriptor, FrameScanner};
/// use std::io::Cursor;
///
/// let mut bytes = FrameDescriptor::new(100, 4).to_bytes().to_vec();
/// bytes.extend_from_slice(b"abcd");
/// let size = bytes.len() as u64;
///
/// let mut scanner = FrameScanner::new(Cursor::new(bytes), 0, size);
/// let frame = scanner.next_frame()?.unwrap();
/// assert_eq!(frame.triple(), (1, 100, 4));
/// assert!(scanner.next_frame()?.is_none());
/// # Ok::<(), framelog_journal::JournalError>(())
/// ```
pub struct FrameScanner<R> {
    reader: R,
    start: u64,
    file_size: u64,
    index: u64,
    state: ScanState,
}

impl<R> FrameScanner<R> {
    /// Returns the current state.
    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Returns `true` once the scan has consumed the whole file.
    pub fn is_done(&self) -> bool {
        self.state == ScanState::Done
    }

    /// Returns `true` if the scan stopped on an error.
    pub fn is_failed(&self) -> bool {
        matches!(self.state, ScanState::Failed { .. })
    }

    /// Byte offset where the frame sequence starts.
    pub fn start_offset(&self) -> u64 {
        self.start
    }

    /// Total file size bounding the scan.
    pub fn file_size(&self) -> u64 {
        self.file_size
    }
}

impl<R: Read + Seek> FrameScanner<R> {
    /// Creates a scanner over `reader`, which must already be positioned at
    /// `start` (the header's end offset).
    pub fn new(reader: R, start: u64, file_size: u64) -> Self {
        Self {
            reader,
            start,
            file_size,
            index: 1,
            state: ScanState::Positioned { position: start },
        }
    }

    /// Returns the next frame, or `Ok(None)` once the scan is over.
    ///
    /// After an error the scanner is in [`ScanState::Failed`] and keeps
    /// returning `Ok(None)`.
    ///
    /// # Errors
    ///
    /// - [`JournalError::TruncatedFrameHeader`] if fewer than 16 bytes remain
    ///   for a descriptor
    /// - [`JournalError::TruncatedPayload`] if the previous frame's payload
    ///   runs past the end of the file
    /// - [`JournalError::Io`] if a read or seek fails
    pub fn next_frame(&mut self) -> Result<Option<ScannedFrame>, JournalError> {
        loop {
            match self.state {
                ScanState::Done | ScanState::Failed { .. } => return Ok(None),
                ScanState::Emitted { frame } => self.skip_payload(frame)?,
                ScanState::Positioned { position } => {
                    if position >= self.file_size {
                        tracing::debug!(frames = self.index - 1, position, "scan complete");
                        self.state = ScanState::Done;
                        return Ok(None);
                    }
                    return self.read_descriptor(position).map(Some);
                }
            }
        }
    }

    /// Seeks back to the start of the frame sequence and resets the index.
    pub fn rewind(&mut self) -> Result<(), JournalError> {
        self.reader.seek(SeekFrom::Start(self.start))?;
        self.index = 1;
        self.state = ScanState::Positioned {
            position: self.start,
        };
        Ok(())
    }

    fn read_descriptor(&mut self, position: u64) -> Result<ScannedFrame, JournalError> {
        let available = self.file_size - position;
        if available < FRAME_DESCRIPTOR_SIZE as u64 {
            return Err(self.fail(JournalError::TruncatedFrameHeader {
                index: self.index,
                position,
                available,
            }));
        }

        let mut bytes = [0u8; FRAME_DESCRIPTOR_SIZE];
        match self.reader.read_exact(&mut bytes) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                return Err(self.fail(JournalError::TruncatedFrameHeader {
                    index: self.index,
                    position,
                    available,
                }));
            }
            Err(e) => return Err(self.fail(e.into())),
        }

        let descriptor = FrameDescriptor::from_bytes(&bytes);
        let frame = ScannedFrame {
            index: self.index,
            offset: descriptor.offset,
            length: descriptor.length,
            position,
        };
        tracing::trace!(
            index = frame.index,
            offset = frame.offset,
            length = frame.length,
            position,
            "frame"
        );
        self.state = ScanState::Emitted { frame };
        Ok(frame)
    }

    fn skip_payload(&mut self, frame: ScannedFrame) -> Result<(), JournalError> {
        let truncated = JournalError::TruncatedPayload {
            index: frame.index,
            position: frame.position,
            length: frame.length,
            file_size: self.file_size,
        };

        let end = FrameDescriptor::new(frame.offset, frame.length)
            .frame_size()
            .and_then(|size| frame.position.checked_add(size));
        let delta = match (end, i64::try_from(frame.length)) {
            (Some(end), Ok(delta)) if end <= self.file_size => delta,
            _ => return Err(self.fail(truncated)),
        };

        let position = match self.reader.seek(SeekFrom::Current(delta)) {
            Ok(position) => position,
            Err(e) => return Err(self.fail(e.into())),
        };

        self.index += 1;
        self.state = ScanState::Positioned { position };
        Ok(())
    }

    fn fail(&mut self, err: JournalError) -> JournalError {
        let kind = match err {
            JournalError::TruncatedFrameHeader { .. } => FailureKind::TruncatedFrameHeader,
            JournalError::TruncatedPayload { .. } => FailureKind::TruncatedPayload,
            _ => FailureKind::Io,
        };
        tracing::warn!(index = self.index, error = %err, "scan failed");
        self.state = ScanState::Failed {
            index: self.index,
            kind,
        };
        err
    }
}

impl<R: Read + Seek> Iterator for FrameScanner<R> {
    type Item = Result<ScannedFrame, JournalError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_frame().transpose()
    }
}
