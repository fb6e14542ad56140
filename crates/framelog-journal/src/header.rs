//! Self-describing journal header.
//!
//! The header is UTF-8 JSON text mapping keys to non-negative integers,
//! terminated by a single `NUL` byte. The key set is open: producers may add
//! keys at will, so the reader keeps every field it finds.

use crate::errors::JournalError;
use serde::Serialize;
use serde_json::Value;
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::io::{self, Read, Seek, SeekFrom};

/// Header terminator byte.
pub const HEADER_TERMINATOR: u8 = 0x00;

/// Default upper bound on header text length: 64 KiB.
pub const DEFAULT_MAX_HEADER_LEN: usize = 64 * 1024;

const READ_CHUNK_SIZE: usize = 128;

/// Parsed journal header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JournalHeader {
    fields: BTreeMap<String, u64>,
    end_offset: u64,
}

impl JournalHeader {
    /// Builds a header from its fields.
    ///
    /// The end offset is the length of the encoded header including its
    /// terminator, i.e. where frames start when the header opens the file.
    pub fn from_fields(fields: BTreeMap<String, u64>) -> Self {
        let mut header = Self {
            fields,
            end_offset: 0,
        };
        header.end_offset = header.to_text().len() as u64 + 1;
        header
    }

    /// Returns the value of `key`, if present.
    pub fn get(&self, key: &str) -> Option<u64> {
        self.fields.get(key).copied()
    }

    /// Returns all header fields, ordered by key.
    pub fn fields(&self) -> &BTreeMap<String, u64> {
        &self.fields
    }

    /// Iterates over `(key, value)` pairs in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, u64> {
        self.fields.iter()
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the header declares no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Byte offset one past the header terminator: the start of the frame
    /// sequence.
    pub fn end_offset(&self) -> u64 {
        self.end_offset
    }

    /// Encodes the fields as JSON text, without the terminator.
    pub fn to_text(&self) -> String {
        let map: serde_json::Map<String, Value> = self
            .fields
            .iter()
            .map(|(key, value)| (key.clone(), Value::from(*value)))
            .collect();
        Value::Object(map).to_string()
    }

    /// Encodes the header as it appears on disk: JSON text followed by `NUL`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = self.to_text().into_bytes();
        bytes.push(HEADER_TERMINATOR);
        bytes
    }

    /// Parses header text (the bytes before the terminator).
    pub fn parse(text: &[u8], end_offset: u64) -> Result<Self, JournalError> {
        let text = std::str::from_utf8(text)
            .map_err(|e| JournalError::malformed(format!("header is not UTF-8: {}", e)))?;
        let value: Value = serde_json::from_str(text)
            .map_err(|e| JournalError::malformed(format!("header is not valid JSON: {}", e)))?;
        let Value::Object(map) = value else {
            return Err(JournalError::malformed("header is not a mapping"));
        };

        let mut fields = BTreeMap::new();
        for (key, value) in map {
            let parsed = parse_field(&key, &value)?;
            fields.insert(key, parsed);
        }

        Ok(Self { fields, end_offset })
    }
}

impl<'a> IntoIterator for &'a JournalHeader {
    type Item = (&'a String, &'a u64);
    type IntoIter = btree_map::Iter<'a, String, u64>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Values are JSON integers, or decimal strings such as `"001"`.
fn parse_field(key: &str, value: &Value) -> Result<u64, JournalError> {
    match value {
        Value::Number(n) => n.as_u64().ok_or_else(|| {
            JournalError::malformed(format!(
                "field {:?} is not a non-negative integer: {}",
                key, n
            ))
        }),
        Value::String(s) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => {
            s.parse::<u64>().map_err(|e| {
                JournalError::malformed(format!("field {:?} is out of range: {}", key, e))
            })
        }
        other => Err(JournalError::malformed(format!(
            "field {:?} is not an integer: {}",
            key, other
        ))),
    }
}

/// Reads the journal header from a stream positioned at offset 0.
///
/// Uses the default header length limit. See [`read_header_with_limit`].
pub fn read_header<R: Read + Seek>(reader: &mut R) -> Result<JournalHeader, JournalError> {
    read_header_with_limit(reader, DEFAULT_MAX_HEADER_LEN)
}

/// Reads the journal header, rejecting headers longer than `max_len` bytes.
///
/// Reads in small chunks and seeks back over whatever followed the
/// terminator, so on success the stream sits on the first frame descriptor.
/// The stream is left wherever it stopped on failure.
///
/// # Errors
///
/// Returns [`JournalError::MalformedHeader`] if end-of-file or the length
/// limit is reached before a terminator, or if the text does not parse.
pub fn read_header_with_limit<R: Read + Seek>(
    reader: &mut R,
    max_len: usize,
) -> Result<JournalHeader, JournalError> {
    let mut text = Vec::new();
    let mut chunk = [0u8; READ_CHUNK_SIZE];

    loop {
        let n = match reader.read(&mut chunk) {
            Ok(0) => {
                return Err(JournalError::malformed(format!(
                    "end of file after {} bytes without header terminator",
                    text.len()
                )))
            }
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };

        if let Some(nul) = chunk[..n].iter().position(|&b| b == HEADER_TERMINATOR) {
            text.extend_from_slice(&chunk[..nul]);
            let over_read = (n - nul - 1) as i64;
            if over_read > 0 {
                reader.seek(SeekFrom::Current(-over_read))?;
            }
            break;
        }

        text.extend_from_slice(&chunk[..n]);
        if text.len() > max_len {
            return Err(JournalError::malformed(format!(
                "no header terminator within {} bytes",
                max_len
            )));
        }
    }

    if text.len() > max_len {
        return Err(JournalError::malformed(format!(
            "header length {} exceeds maximum {}",
            text.len(),
            max_len
        )));
    }

    let end_offset = reader.stream_position()?;
    let header = JournalHeader::parse(&text, end_offset)?;
    tracing::debug!(
        fields = header.len(),
        end_offset,
        "read journal header"
    );
    Ok(header)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Cursor that reports `Interrupted` before its first read, or fails
    /// every read.
    struct StutteringReader {
        inner: Cursor<Vec<u8>>,
        interrupted: bool,
        broken: bool,
    }

    impl Read for StutteringReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.broken {
                return Err(io::Error::other("disk gone"));
            }
            if !self.interrupted {
                self.interrupted = true;
                return Err(io::ErrorKind::Interrupted.into());
            }
            self.inner.read(buf)
        }
    }

    impl Seek for StutteringReader {
        fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
            self.inner.seek(pos)
        }
    }

    fn read(bytes: &[u8]) -> Result<JournalHeader, JournalError> {
        read_header(&mut Cursor::new(bytes.to_vec()))
    }

    #[test]
    fn reads_integer_fields() {
        let header = read(b"{\"version\": 1, \"max_offset\": 39}\0").unwrap();
        assert_eq!(header.get("version"), Some(1));
        assert_eq!(header.get("max_offset"), Some(39));
        assert_eq!(header.len(), 2);
        assert_eq!(header.end_offset(), 33);
    }

    #[test]
    fn reads_zero_padded_string_fields() {
        let header =
            read(b"{ \"version\" : \"001\", \"max_offset\" : \"00000000039\" }\0").unwrap();
        assert_eq!(header.get("version"), Some(1));
        assert_eq!(header.get("max_offset"), Some(39));
    }

    #[test]
    fn keeps_unknown_keys() {
        let header = read(b"{\"version\": 1, \"entries\": 12, \"zz_custom\": 7}\0").unwrap();
        assert_eq!(header.get("entries"), Some(12));
        assert_eq!(header.get("zz_custom"), Some(7));
        let keys: Vec<&String> = header.fields().keys().collect();
        assert_eq!(keys, vec!["entries", "version", "zz_custom"]);
    }

    #[test]
    fn empty_mapping_is_valid() {
        let header = read(b"{}\0").unwrap();
        assert!(header.is_empty());
        assert_eq!(header.end_offset(), 3);
    }

    #[test]
    fn stops_exactly_after_terminator() {
        let mut bytes = b"{\"version\": 1}\0".to_vec();
        bytes.extend_from_slice(&[0xAA; 300]);
        let mut cursor = Cursor::new(bytes);
        let header = read_header(&mut cursor).unwrap();
        assert_eq!(header.end_offset(), 15);
        assert_eq!(cursor.position(), 15);
    }

    #[test]
    fn header_spanning_several_chunks() {
        let mut text = String::from("{");
        for i in 0..40 {
            if i > 0 {
                text.push(',');
            }
            text.push_str(&format!("\"key_{:03}\": {}", i, i * 1000));
        }
        text.push('}');
        let mut bytes = text.clone().into_bytes();
        bytes.push(0);
        bytes.extend_from_slice(&[1, 2, 3]);

        let mut cursor = Cursor::new(bytes);
        let header = read_header(&mut cursor).unwrap();
        assert_eq!(header.len(), 40);
        assert_eq!(header.get("key_039"), Some(39_000));
        assert_eq!(cursor.position(), text.len() as u64 + 1);
    }

    #[test]
    fn rejects_missing_terminator() {
        let err = read(b"{\"version\": 1}").unwrap_err();
        assert!(matches!(err, JournalError::MalformedHeader { .. }));
    }

    #[test]
    fn rejects_empty_file() {
        assert!(matches!(
            read(b"").unwrap_err(),
            JournalError::MalformedHeader { .. }
        ));
    }

    #[test]
    fn rejects_invalid_utf8() {
        let err = read(b"{\"v\xff\": 1}\0").unwrap_err();
        assert!(err.to_string().contains("UTF-8"));
    }

    #[test]
    fn rejects_non_mapping() {
        assert!(read(b"[1, 2]\0").is_err());
        assert!(read(b"42\0").is_err());
        assert!(read(b"not json\0").is_err());
    }

    #[test]
    fn rejects_non_integer_values() {
        assert!(read(b"{\"version\": -1}\0").is_err());
        assert!(read(b"{\"version\": 1.5}\0").is_err());
        assert!(read(b"{\"version\": \"one\"}\0").is_err());
        assert!(read(b"{\"version\": \"\"}\0").is_err());
        assert!(read(b"{\"version\": \"-1\"}\0").is_err());
        assert!(read(b"{\"version\": null}\0").is_err());
        assert!(read(b"{\"version\": {\"major\": 1}}\0").is_err());
        assert!(read(b"{\"version\": \"99999999999999999999999\"}\0").is_err());
    }

    #[test]
    fn rejects_header_over_limit() {
        let mut bytes = vec![b' '; 500];
        bytes.extend_from_slice(b"{}\0");
        let err = read_header_with_limit(&mut Cursor::new(bytes.clone()), 256).unwrap_err();
        assert!(matches!(err, JournalError::MalformedHeader { .. }));

        let header = read_header_with_limit(&mut Cursor::new(bytes), 1024).unwrap();
        assert!(header.is_empty());
    }

    #[test]
    fn encode_then_read_preserves_fields() {
        let mut fields = BTreeMap::new();
        fields.insert("version".to_string(), 1);
        fields.insert("max_offset".to_string(), u64::MAX);
        let header = JournalHeader::from_fields(fields);

        let bytes = header.to_bytes();
        assert_eq!(bytes.last(), Some(&HEADER_TERMINATOR));
        assert_eq!(header.end_offset(), bytes.len() as u64);

        let restored = read(&bytes).unwrap();
        assert_eq!(restored, header);
    }

    #[test]
    fn retries_interrupted_reads() {
        let mut reader = StutteringReader {
            inner: Cursor::new(b"{\"version\": 1}\0rest".to_vec()),
            interrupted: false,
            broken: false,
        };
        let header = read_header(&mut reader).unwrap();
        assert!(reader.interrupted);
        assert_eq!(header.get("version"), Some(1));
        assert_eq!(reader.inner.position(), 15);
    }

    #[test]
    fn read_error_is_io() {
        let mut reader = StutteringReader {
            inner: Cursor::new(b"{}\0".to_vec()),
            interrupted: true,
            broken: true,
        };
        assert!(matches!(
            read_header(&mut reader).unwrap_err(),
            JournalError::Io(_)
        ));
    }
}
