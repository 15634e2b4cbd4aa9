//! Error types for hcstat
//!
//! This module defines the error types used throughout the hcstat crates.
//! All errors are derived from `thiserror` for convenient error handling
//! and automatic `From` implementations.
//!
//! # Example
//!
//! ```
//! use hcstat_core::error::{HcstatError, Result};
//!
//! fn example_function() -> Result<()> {
//!     // This will automatically convert io::Error to HcstatError
//!     let _file = std::fs::read_to_string("nonexistent.txt")?;
//!     Ok(())
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for hcstat operations
///
/// Only [`HcstatError::PathNotFound`] aborts an aggregation run. Every other
/// variant raised while reading a single record is logged and the record is
/// skipped.
#[derive(Error, Debug)]
pub enum HcstatError {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// The directory to scan does not exist
    #[error("Specified path does not exist: {}", .0.display())]
    PathNotFound(PathBuf),

    /// Parse error with file context
    #[error("Parse error in {}: {error}", file.display())]
    Parse {
        /// The file that caused the error
        file: PathBuf,
        /// The error message
        error: String,
    },

    /// Network error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The remote model service answered with a non-success status
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body or error message returned by the service
        message: String,
    },

    /// The model answered, but not with a usable grid solution
    #[error("Invalid challenge answer: {0}")]
    InvalidAnswer(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl HcstatError {
    /// Build a [`HcstatError::Parse`] for `file`
    pub fn parse(file: impl Into<PathBuf>, error: impl ToString) -> Self {
        Self::Parse {
            file: file.into(),
            error: error.to_string(),
        }
    }
}

/// Convenience type alias for Results in hcstat
///
/// # Example
///
/// ```
/// use hcstat_core::Result;
///
/// fn process_data() -> Result<String> {
///     Ok("Processed successfully".to_string())
/// }
/// ```
pub type Result<T> = std::result::Result<T, HcstatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = HcstatError::PathNotFound(PathBuf::from("/tmp/missing"));
        assert_eq!(
            error.to_string(),
            "Specified path does not exist: /tmp/missing"
        );
    }

    #[test]
    fn test_parse_error_display() {
        let error = HcstatError::parse("a/b_model_answer.json", "missing field `usage_metadata`");
        assert_eq!(
            error.to_string(),
            "Parse error in a/b_model_answer.json: missing field `usage_metadata`"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let hcstat_error: HcstatError = io_error.into();
        assert!(matches!(hcstat_error, HcstatError::Io(_)));
    }
}
