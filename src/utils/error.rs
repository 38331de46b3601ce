//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Errors raised while pulling samples from a sample source
///
/// A decode fault is fatal: ingestion stops at the first one.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Failed to decode sample #{index}: {source}")]
    Decode {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur during gap smoothing
#[derive(Error, Debug, PartialEq, Eq)]
pub enum GapError {
    #[error("Maximum gap length must be non-negative, got {0}")]
    NegativeMaxGapLen(i64),
}

/// Errors that can occur during flamegraph generation
#[derive(Error, Debug)]
pub enum FlamegraphError {
    #[error("Call tree has no samples to render")]
    EmptyTree,
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
