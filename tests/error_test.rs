//! Tests for error types

use std::path::PathBuf;

use tb_harness::Error;

#[test]
fn test_event_file_not_found_names_both_patterns() {
    let error = Error::EventFileNotFound {
        dir: PathBuf::from("/runs/gpt3"),
    };
    let error_str = format!("{error}");
    assert!(error_str.contains("/runs/gpt3/events*tfevents*"));
    assert!(error_str.contains("/runs/gpt3/results/events*tfevents*"));
}

#[test]
fn test_file_index_out_of_range_error() {
    let error = Error::FileIndexOutOfRange { index: 5, count: 2 };
    let error_str = format!("{error}");
    assert!(error_str.contains("index 5"));
    assert!(error_str.contains("2 file(s)"));
}

#[test]
fn test_checksum_mismatch_error() {
    let error = Error::ChecksumMismatch {
        offset: 16,
        stored: 0xDEAD_BEEF,
        computed: 0x1234_5678,
    };
    let error_str = format!("{error}");
    assert!(error_str.contains("offset 16"));
    assert!(error_str.contains("0xdeadbeef"));
    assert!(error_str.contains("0x12345678"));
}

#[test]
fn test_truncated_record_error() {
    let error = Error::TruncatedRecord { offset: 42 };
    assert!(format!("{error}").contains("offset 42"));
}

#[test]
fn test_config_error() {
    let error = Error::Config("NVTE_ALLOW_NONDETERMINISTIC_ALGO must be an integer".to_string());
    assert!(format!("{error}").contains("configuration error"));
}

#[test]
fn test_io_error_conversion() {
    let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let error: Error = io.into();
    assert!(matches!(error, Error::Io(_)));
    assert!(format!("{error}").contains("IO error"));
}
