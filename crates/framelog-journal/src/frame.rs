use serde::Serialize;

/// Frame descriptor size in bytes: two `u64`s.
pub const FRAME_DESCRIPTOR_SIZE: usize = 16;

/// Fixed-size descriptor that precedes every frame payload.
///
/// Both fields are stored in native byte order. `offset` is producer metadata
/// (a logical address elsewhere) and says nothing about where the frame sits
/// in the journal; only `length` moves the scanner forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameDescriptor {
    /// Producer-defined logical offset.
    pub offset: u64,
    /// Payload length in bytes.
    pub length: u64,
}

impl FrameDescriptor {
    /// Creates a descriptor.
    pub fn new(offset: u64, length: u64) -> Self {
        Self { offset, length }
    }

    /// Serializes the descriptor to bytes.
    pub fn to_bytes(&self) -> [u8; FRAME_DESCRIPTOR_SIZE] {
        let mut bytes = [0u8; FRAME_DESCRIPTOR_SIZE];
        bytes[0..8].copy_from_slice(&self.offset.to_ne_bytes());
        bytes[8..16].copy_from_slice(&self.length.to_ne_bytes());
        bytes
    }

    /// Deserializes a descriptor from bytes.
    pub fn from_bytes(bytes: &[u8; FRAME_DESCRIPTOR_SIZE]) -> Self {
        let mut offset = [0u8; 8];
        let mut length = [0u8; 8];
        offset.copy_from_slice(&bytes[0..8]);
        length.copy_from_slice(&bytes[8..16]);
        Self {
            offset: u64::from_ne_bytes(offset),
            length: u64::from_ne_bytes(length),
        }
    }

    /// Total on-disk size of the frame: descriptor plus payload.
    ///
    /// Returns `None` on overflow.
    pub fn frame_size(&self) -> Option<u64> {
        self.length.checked_add(FRAME_DESCRIPTOR_SIZE as u64)
    }
}

/// One frame as reported by the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScannedFrame {
    /// 1-based position of the frame in the journal.
    pub index: u64,
    /// Producer-defined logical offset.
    pub offset: u64,
    /// Payload length in bytes.
    pub length: u64,
    /// Byte position of the frame's descriptor within the file.
    pub position: u64,
}

impl ScannedFrame {
    /// Returns the `(index, offset, length)` triple.
    pub fn triple(&self) -> (u64, u64, u64) {
        (self.index, self.offset, self.length)
    }

    /// Highest logical byte covered by the frame (`offset + length - 1`).
    ///
    /// `None` for empty frames; saturates at `u64::MAX`.
    pub fn last_logical_byte(&self) -> Option<u64> {
        if self.length == 0 {
            None
        } else {
            Some(self.offset.saturating_add(self.length - 1))
        }
    }
}
