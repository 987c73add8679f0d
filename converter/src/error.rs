//! Error types for the products import pipeline.
//!
//! Errors are split by stage:
//!
//! - [`ReadError`] - source file could not be opened, decoded or read
//! - [`WriteError`] - destination file could not be written
//! - [`PipelineError`] - top-level run errors, wrapping both
//!
//! Rows that fail extraction are not errors; they are dropped and counted.
//! Conversion is automatic via `From`, so `?` works across stages.

use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// Read Errors
// =============================================================================

/// Errors while reading the source spreadsheet export.
#[derive(Debug, Error)]
pub enum ReadError {
    /// The source file could not be opened or read.
    #[error("Cannot read '{}': {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The bytes could not be decoded to text.
    #[error("Failed to decode input: {0}")]
    Decode(String),

    /// Fewer lines than the preamble to skip.
    #[error("Input has {found} lines, expected at least {expected} preamble lines")]
    TooShort { expected: usize, found: usize },

    /// A data row could not be read.
    #[error("Line {line}: {message}")]
    Malformed { line: u64, message: String },
}

// =============================================================================
// Write Errors
// =============================================================================

/// Errors while writing the import CSV.
#[derive(Debug, Error)]
pub enum WriteError {
    /// The destination could not be created or truncated.
    #[error("Cannot create '{}': {source}", path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A record could not be serialized.
    #[error("Failed to write record: {0}")]
    Csv(#[from] csv::Error),

    /// Flushing the destination failed.
    #[error("Failed to flush output: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level errors returned by [`crate::transform::pipeline::run`].
///
/// Both variants are fatal: the run stops at the first one.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Reader stage failed.
    #[error("Read error: {0}")]
    Read(#[from] ReadError),

    /// Writer stage failed.
    #[error("Write error: {0}")]
    Write(#[from] WriteError),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for reader operations.
pub type ReadResult<T> = Result<T, ReadError>;

/// Result type for writer operations.
pub type WriteResult<T> = Result<T, WriteError>;

/// Result type for a whole conversion run.
pub type ConvertResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        // ReadError -> PipelineError
        let read_err = ReadError::TooShort { expected: 30, found: 4 };
        let pipeline_err: PipelineError = read_err.into();
        assert!(pipeline_err.to_string().contains("expected at least 30"));

        // WriteError -> PipelineError
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let write_err = WriteError::Create { path: PathBuf::from("out.csv"), source: io };
        let pipeline_err: PipelineError = write_err.into();
        assert!(pipeline_err.to_string().contains("out.csv"));
    }

    #[test]
    fn test_malformed_format() {
        let err = ReadError::Malformed { line: 42, message: "bad quote".into() };
        let msg = err.to_string();
        assert!(msg.contains("Line 42"));
        assert!(msg.contains("bad quote"));
    }
}
