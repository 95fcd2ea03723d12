//! Error types for the label pipeline.

use std::fmt;

use thiserror::Error;

/// Errors raised inside the expansion pipeline.
///
/// They never escape [`crate::run_pipeline`]; they are turned into the
/// status string shown instead of labels.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum TransformError {
    /// The record set is empty (or has not arrived yet).
    #[error("No data. Please add some rows")]
    NoData,

    /// Every column was filtered out as reserved or system-internal.
    #[error(
        "Please select columns to display in the Creator Panel. Click the widget settings and choose which columns to include."
    )]
    NoColumnsSelected,
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, TransformError>;

/// Human-readable status for an error, without a leading generic `Error: ` prefix.
pub fn status_message(error: impl fmt::Display) -> String {
    let message = error.to_string();
    match message.strip_prefix("Error: ") {
        Some(rest) => rest.to_string(),
        None => message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_strips_generic_prefix() {
        assert_eq!(status_message("Error: disk full"), "disk full");
        assert_eq!(status_message("Error: Error: nested"), "Error: nested");
    }

    #[test]
    fn test_no_data_message() {
        assert_eq!(
            status_message(TransformError::NoData),
            "No data. Please add some rows"
        );
    }
}
