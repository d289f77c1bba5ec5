//! Error types and classification for s3-bucket-cleaner.
//!
//! This crate provides:
//! - [`CleanerError`] - Top-level error enum for startup and pipeline errors
//! - [`ErrorCategory`] for deciding whether the process may continue
//! - Exit code mapping used by the CLI

use thiserror::Error;

/// Top-level error type for s3-bucket-cleaner.
#[derive(Error, Debug)]
pub enum CleanerError {
    /// A required parameter is missing or invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// The storage session could not authenticate
    #[error("Credential error: {0}")]
    Credential(String),

    /// Listing the bucket contents failed
    #[error("List error: {0}")]
    List(String),

    /// The batch delete call itself failed
    #[error("Delete error: {0}")]
    Delete(String),

    /// Generic errors (wrapped anyhow)
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CleanerError {
    /// Build a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Build a listing error.
    pub fn list(message: impl Into<String>) -> Self {
        Self::List(message.into())
    }

    /// Build a delete error.
    pub fn delete(message: impl Into<String>) -> Self {
        Self::Delete(message.into())
    }
}

/// Error classification for process control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Startup error - the pipeline never ran and the process must stop
    ///
    /// Examples: bucket name missing, no AWS credentials
    Fatal,

    /// Pipeline error - listing or deletion failed mid-run
    ///
    /// The process logs the failure and exits with a non-zero status.
    Execution,
}

impl ErrorCategory {
    /// Process exit code for this category.
    pub fn exit_code(self) -> i32 {
        match self {
            Self::Fatal => 2,
            Self::Execution => 1,
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fatal => write!(f, "Fatal"),
            Self::Execution => write!(f, "Execution"),
        }
    }
}

/// Classifies an error to determine how the process should terminate.
pub fn classify_error(error: &CleanerError) -> ErrorCategory {
    match error {
        CleanerError::Config(_) => ErrorCategory::Fatal,
        CleanerError::Credential(_) => ErrorCategory::Fatal,
        CleanerError::List(_) => ErrorCategory::Execution,
        CleanerError::Delete(_) => ErrorCategory::Execution,
        CleanerError::Other(_) => ErrorCategory::Execution,
    }
}

/// Result type alias using CleanerError.
pub type Result<T> = std::result::Result<T, CleanerError>;
