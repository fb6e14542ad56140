//! Journal reader: the scan context tying a file, its size and its header
//! to a frame scanner.

use crate::errors::JournalError;
use crate::frame::ScannedFrame;
use crate::header::{read_header_with_limit, JournalHeader, DEFAULT_MAX_HEADER_LEN};
use crate::scanner::FrameScanner;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

/// Options for opening a journal.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Longest header text accepted before giving up on finding its
    /// terminator (default: 64 KiB).
    pub max_header_len: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            max_header_len: DEFAULT_MAX_HEADER_LEN,
        }
    }
}

/// Journal reader for inspecting a journal file.
///
/// Owns the file handle for the duration of one inspection; dropping the
/// reader closes it, whether the scan finished, failed or was abandoned.
///
/// # Example
///
/// ```rust,no_run
/// use framelog_journal::{JournalReader, ScanOptions};
///
/// let mut reader = JournalReader::open("object.journal", ScanOptions::default())?;
/// for (key, value) in reader.header() {
///     println!("{key}: {value}");
/// }
/// while let Some(frame) = reader.next_frame()? {
///     println!("{} {} {}", frame.index, frame.offset, frame.length);
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct JournalReader<R = File> {
    header: JournalHeader,
    scanner: FrameScanner<R>,
}

impl JournalReader<File> {
    /// Opens a journal file and reads its header.
    ///
    /// The file size is taken from the file's metadata once, at open time.
    ///
    /// # Errors
    ///
    /// Returns [`JournalError`](crate::JournalError) if:
    /// - File cannot be opened or its metadata queried
    /// - Header is malformed
    pub fn open<P: AsRef<Path>>(path: P, options: ScanOptions) -> Result<Self, JournalError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let file_size = file.metadata()?.len();
        tracing::debug!(path = %path.display(), file_size, "opened journal");
        Self::from_reader(file, file_size, options)
    }
}

impl<R: Read + Seek> JournalReader<R> {
    /// Reads the header from `reader` and prepares a scanner bounded by
    /// `file_size`.
    pub fn from_reader(
        mut reader: R,
        file_size: u64,
        options: ScanOptions,
    ) -> Result<Self, JournalError> {
        reader.seek(SeekFrom::Start(0))?;
        let header = read_header_with_limit(&mut reader, options.max_header_len)?;
        let scanner = FrameScanner::new(reader, header.end_offset(), file_size);
        Ok(Self { header, scanner })
    }

    /// Returns the parsed header.
    pub fn header(&self) -> &JournalHeader {
        &self.header
    }

    /// Total file size bounding the scan.
    pub fn file_size(&self) -> u64 {
        self.scanner.file_size()
    }

    /// Returns the frame scanner.
    pub fn frames(&mut self) -> &mut FrameScanner<R> {
        &mut self.scanner
    }

    /// Returns the next frame. See [`FrameScanner::next_frame`].
    pub fn next_frame(&mut self) -> Result<Option<ScannedFrame>, JournalError> {
        self.scanner.next_frame()
    }

    /// Restarts the scan at the first frame.
    pub fn rewind(&mut self) -> Result<(), JournalError> {
        self.scanner.rewind()
    }
}
