use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid Argument: {0}")]
    InvalidArgument(String),

    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    #[error("Scan failed")]
    ScanFailed,

    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(PathBuf),

    #[error("Failed to read file: {0}")]
    FileReadError(#[from] std::io::Error),

    #[error("File is not valid UTF-8: {path} ({source})")]
    Decode {
        path: PathBuf,
        #[source]
        source: std::str::Utf8Error,
    },

    #[error("Unterminated body for `{name}` in {source_id} at byte {offset}")]
    UnterminatedSpan {
        source_id: String,
        name: String,
        offset: usize,
    },

    #[error("Invalid pattern: {0}")]
    PatternError(#[from] regex::Error),

    #[error("Unable to serialize chunk: {0}")]
    PayloadError(#[from] serde_json::Error),

    #[error("Extraction task failed: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),

    #[error("Failed to write output {path}: {source}")]
    StorageError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
