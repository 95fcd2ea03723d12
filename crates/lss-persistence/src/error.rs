//! Persistence error types.
//!
//! Errors carry the path and operation involved so hosts can report them
//! with a user-friendly message.

use std::path::PathBuf;
use thiserror::Error;

/// Persistence operation error.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// File I/O error.
    #[error("Failed to {operation} file: {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The options file is not a JSON object.
    #[error("Invalid options file format")]
    InvalidFormat { path: PathBuf, reason: String },

    /// Serialization error.
    #[error("Failed to serialize options")]
    Serialization {
        #[source]
        source: serde_json::Error,
    },

    /// Atomic write failed (temp file couldn't be renamed).
    #[error("Failed to complete save operation")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The sink refused the write.
    #[error("Option store rejected write to '{key}'")]
    Rejected { key: String },
}

impl PersistenceError {
    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Io {
                operation, path, ..
            } => {
                format!("Could not {} the file at {}", operation, path.display())
            }
            Self::InvalidFormat { path, reason } => {
                format!(
                    "The file at {} is not a valid options file: {}",
                    path.display(),
                    reason
                )
            }
            Self::Serialization { .. } => "An error occurred while saving the options.".to_string(),
            Self::AtomicWriteFailed { target_path, .. } => {
                format!(
                    "Could not save the file to {}. Please check disk space and permissions.",
                    target_path.display()
                )
            }
            Self::Rejected { key } => format!("The option '{key}' could not be saved."),
        }
    }
}

/// Result type alias for persistence operations.
pub type Result<T> = std::result::Result<T, PersistenceError>;
