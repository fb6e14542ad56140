use framelog_journal::{
    FailureKind, FrameDescriptor, JournalError, JournalReader, ScanOptions, ScanOutcome,
    ScanState, ScanSummary,
};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::TempDir;

const HEADER: &str = r#"{"version": 1, "max_offset": 299}"#;

fn write_journal(path: &Path, frames: &[(u64, u64)]) {
    let mut file = fs::File::create(path).unwrap();
    file.write_all(HEADER.as_bytes()).unwrap();
    file.write_all(&[0]).unwrap();
    for &(offset, length) in frames {
        file.write_all(&FrameDescriptor::new(offset, length).to_bytes())
            .unwrap();
        file.write_all(&vec![0xAB; length as usize]).unwrap();
    }
}

fn truncate_by(path: &Path, bytes: u64) {
    let len = fs::metadata(path).unwrap().len();
    let file = fs::OpenOptions::new().write(true).open(path).unwrap();
    file.set_len(len - bytes).unwrap();
}

#[test]
fn test_truncated_last_payload() {
    let temp_dir = TempDir::new().unwrap();
    let journal_path = temp_dir.path().join("test.journal");
    write_journal(&journal_path, &[(0, 100), (100, 100), (200, 100)]);
    truncate_by(&journal_path, 1);

    let mut reader = JournalReader::open(&journal_path, ScanOptions::default()).unwrap();
    let mut emitted = Vec::new();
    let err = loop {
        match reader.next_frame() {
            Ok(Some(frame)) => emitted.push(frame.index),
            Ok(None) => panic!("truncated journal scanned to a clean end"),
            Err(e) => break e,
        }
    };

    assert_eq!(emitted, vec![1, 2, 3]);
    match err {
        JournalError::TruncatedPayload {
            index,
            length,
            file_size,
            ..
        } => {
            assert_eq!(index, 3);
            assert_eq!(length, 100);
            assert_eq!(file_size, reader.file_size());
        }
        other => panic!("expected TruncatedPayload, got {:?}", other),
    }
    assert_eq!(
        reader.frames().state(),
        ScanState::Failed {
            index: 3,
            kind: FailureKind::TruncatedPayload
        }
    );
    assert!(reader.next_frame().unwrap().is_none());
}

#[test]
fn test_truncated_descriptor() {
    let temp_dir = TempDir::new().unwrap();
    let journal_path = temp_dir.path().join("test.journal");
    write_journal(&journal_path, &[(0, 10), (10, 10)]);
    // Leave 6 bytes of the second descriptor.
    truncate_by(&journal_path, 10 + 10);

    let mut reader = JournalReader::open(&journal_path, ScanOptions::default()).unwrap();
    assert!(reader.next_frame().unwrap().is_some());
    match reader.next_frame().unwrap_err() {
        JournalError::TruncatedFrameHeader {
            index, available, ..
        } => {
            assert_eq!(index, 2);
            assert_eq!(available, 6);
        }
        other => panic!("expected TruncatedFrameHeader, got {:?}", other),
    }
}

#[test]
fn test_trailing_garbage_is_structural_error() {
    let temp_dir = TempDir::new().unwrap();
    let journal_path = temp_dir.path().join("test.journal");
    write_journal(&journal_path, &[(0, 8)]);
    let mut file = fs::OpenOptions::new()
        .append(true)
        .open(&journal_path)
        .unwrap();
    file.write_all(b"junk").unwrap();
    drop(file);

    let mut reader = JournalReader::open(&journal_path, ScanOptions::default()).unwrap();
    let summary = ScanSummary::collect(reader.frames());
    assert_eq!(summary.frames, 1);
    assert!(matches!(
        summary.outcome,
        ScanOutcome::Failed { index: Some(2), .. }
    ));
}

#[test]
fn test_header_without_terminator() {
    let temp_dir = TempDir::new().unwrap();
    let journal_path = temp_dir.path().join("test.journal");
    fs::write(&journal_path, HEADER.as_bytes()).unwrap();

    let result = JournalReader::open(&journal_path, ScanOptions::default());
    assert!(matches!(result, Err(JournalError::MalformedHeader { .. })));
}

#[test]
fn test_corrupted_header_value() {
    let temp_dir = TempDir::new().unwrap();
    let journal_path = temp_dir.path().join("test.journal");
    write_journal(&journal_path, &[(0, 4)]);

    // Overwrite the `1` of the version with a letter.
    let mut bytes = fs::read(&journal_path).unwrap();
    let pos = HEADER.find('1').unwrap();
    bytes[pos] = b'x';
    fs::write(&journal_path, &bytes).unwrap();

    let result = JournalReader::open(&journal_path, ScanOptions::default());
    assert!(matches!(result, Err(JournalError::MalformedHeader { .. })));
}

#[test]
fn test_inflated_length_detected() {
    let temp_dir = TempDir::new().unwrap();
    let journal_path = temp_dir.path().join("test.journal");
    write_journal(&journal_path, &[(0, 4), (4, 4)]);

    // Rewrite the first frame's length to claim more than the file holds.
    let mut bytes = fs::read(&journal_path).unwrap();
    let length_at = HEADER.len() + 1 + 8;
    bytes[length_at..length_at + 8].copy_from_slice(&1_000_000u64.to_ne_bytes());
    fs::write(&journal_path, &bytes).unwrap();

    let mut reader = JournalReader::open(&journal_path, ScanOptions::default()).unwrap();
    let first = reader.next_frame().unwrap().unwrap();
    assert_eq!(first.length, 1_000_000);
    assert!(matches!(
        reader.next_frame(),
        Err(JournalError::TruncatedPayload { index: 1, .. })
    ));
}
