//! Error types for the ledger extraction pipeline
//!
//! This module defines all error types that can surface during an extraction
//! run. Errors are designed to be descriptive and user-friendly for CLI and
//! log output.
//!
//! # Error Categories
//!
//! - **Configuration Errors**: Missing or empty required settings
//! - **File I/O Errors**: Input file not found, permission denied, etc.
//! - **Parse Errors**: Malformed CSV structure or a malformed required field
//! - **Delivery Errors**: A batch rejected by the store, or the API call failing
//!
//! A malformed *optional* field is deliberately not represented here: the
//! parser skips the field, counts the skip, and continues.

use thiserror::Error;

/// Main error type for the extraction pipeline
///
/// This enum represents all possible errors that can abort a run. Each
/// variant includes relevant context to help diagnose and resolve the issue.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    /// A required configuration value is missing or unusable
    ///
    /// This is a fatal error raised during startup, before any input
    /// is read.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the offending setting
        message: String,
    },

    /// Input file not found at the specified path
    ///
    /// This is a fatal error that prevents extraction from starting.
    #[error("Input file not found: {path}")]
    InputNotFound {
        /// The path that was not found
        path: String,
    },

    /// I/O error occurred while reading the input file
    ///
    /// This is a fatal error (file permissions, disk failure, etc.).
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the I/O error
        message: String,
    },

    /// CSV-level read error occurred
    ///
    /// Raised when the reader itself fails (invalid UTF-8, unreadable
    /// record). This is a fatal error: the file cannot be trusted past
    /// this point.
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },

    /// A required field failed to parse
    ///
    /// Only the entry identifier is required; every other field degrades
    /// to unset when malformed. This is a fatal error: the run aborts and
    /// nothing is delivered.
    #[error("Malformed required field '{field}' at line {line}: '{value}'")]
    MalformedField {
        /// Name of the required field
        field: String,
        /// The raw value that failed to parse
        value: String,
        /// 1-based data line number of the offending row
        line: u64,
    },

    /// The store rejected one batch of records
    ///
    /// The failed batch is rolled back as a unit; batches already
    /// committed stay committed. The run fails once the other delivery
    /// activity has also finished.
    #[error("Store delivery failed for batch {batch}: {message}")]
    StoreSink {
        /// 0-based index of the failed batch
        batch: usize,
        /// Description of the failure
        message: String,
    },

    /// The ingestion API call failed
    ///
    /// Covers transport failures and non-success HTTP statuses alike.
    #[error("API delivery failed: {message}")]
    ApiSink {
        /// Description of the failure
        message: String,
    },

    /// The run was cancelled before it could complete
    ///
    /// Raised when the shutdown signal fires mid-run. Batches already
    /// committed stay committed.
    #[error("Run cancelled before completion")]
    Cancelled,
}

/// Error returned by a delivery sink
///
/// Sinks report failures without knowing where their payload sits in the
/// run; the dispatcher attaches batch context when it promotes a sink
/// failure to a [`PipelineError`].
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct SinkError {
    /// Description of the failure
    pub message: String,
}

impl SinkError {
    /// Create a sink error from any displayable cause
    pub fn new(message: impl Into<String>) -> Self {
        SinkError {
            message: message.into(),
        }
    }
}

// Conversion from io::Error to PipelineError
impl From<std::io::Error> for PipelineError {
    fn from(error: std::io::Error) -> Self {
        PipelineError::IoError {
            message: error.to_string(),
        }
    }
}

// Conversion from csv_async::Error to PipelineError
impl From<csv_async::Error> for PipelineError {
    fn from(error: csv_async::Error) -> Self {
        // Extract line number if available
        let line = error.position().map(|pos| pos.line());

        PipelineError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

// Conversions into SinkError for the concrete sink transports

impl From<libsql::Error> for SinkError {
    fn from(error: libsql::Error) -> Self {
        SinkError::new(error.to_string())
    }
}

impl From<reqwest::Error> for SinkError {
    fn from(error: reqwest::Error) -> Self {
        SinkError::new(error.to_string())
    }
}

// Helper functions for creating common errors

impl PipelineError {
    /// Create a Configuration error
    pub fn configuration(message: &str) -> Self {
        PipelineError::Configuration {
            message: message.to_string(),
        }
    }

    /// Create an InputNotFound error
    pub fn input_not_found(path: &str) -> Self {
        PipelineError::InputNotFound {
            path: path.to_string(),
        }
    }

    /// Create a MalformedField error
    pub fn malformed_field(field: &str, value: &str, line: u64) -> Self {
        PipelineError::MalformedField {
            field: field.to_string(),
            value: value.to_string(),
            line,
        }
    }

    /// Create a StoreSink error from a sink failure
    pub fn store_sink(batch: usize, error: SinkError) -> Self {
        PipelineError::StoreSink {
            batch,
            message: error.message,
        }
    }

    /// Create an ApiSink error from a sink failure
    pub fn api_sink(error: SinkError) -> Self {
        PipelineError::ApiSink {
            message: error.message,
        }
    }
}
