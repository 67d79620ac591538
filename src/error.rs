//! Error types for the test harness.
//!
//! Every failure surfaces to the caller (the test runner); nothing here is
//! retried internally.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Harness error types
#[derive(Error, Debug)]
pub enum Error {
    /// No event file matched either search location
    #[error("file not found matching: {dir}/events*tfevents* || {dir}/results/events*tfevents*", dir = .dir.display())]
    EventFileNotFound {
        /// Directory that was searched (together with its `results` subdirectory)
        dir: PathBuf,
    },

    /// Requested event-file index exceeds the number of matches
    #[error("event file index {index} out of range: only {count} file(s) matched")]
    FileIndexOutOfRange {
        /// Index requested by the caller
        index: usize,
        /// Number of files that matched
        count: usize,
    },

    /// Record header or payload ended mid-read
    #[error("truncated record at byte offset {offset}")]
    TruncatedRecord {
        /// File offset where the record started
        offset: u64,
    },

    /// Masked CRC32C did not match the stored checksum
    #[error("checksum mismatch at byte offset {offset}: stored {stored:#010x}, computed {computed:#010x}")]
    ChecksumMismatch {
        /// File offset where the record started
        offset: u64,
        /// Checksum read from the file
        stored: u32,
        /// Checksum computed over the bytes read
        computed: u32,
    },

    /// Event payload was not a decodable protobuf message
    #[error("malformed event: {0}")]
    MalformedEvent(String),

    /// Environment configuration value could not be parsed
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parse error (propagated verbatim, never reinterpreted)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
