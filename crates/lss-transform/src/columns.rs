//! Which record columns become label fields.

use serde::{Deserialize, Serialize};

use lss_model::Record;

use crate::error::{Result, TransformError};

/// Column carrying the per-record repeat count.
pub const LABEL_COUNT_COLUMN: &str = "LabelCount";

/// Host bookkeeping columns that never appear on labels.
pub const RESERVED_COLUMNS: &[&str] = &["id", "manualSort"];

/// Columns whose name starts with this prefix are system-internal.
pub const RESERVED_PREFIX: &str = "_";

/// Rules for selecting label columns out of a record schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRules {
    /// Repeat-count column; excluded from labels.
    pub count_column: String,
    /// Exact column names that are never shown.
    pub reserved: Vec<String>,
    /// Name prefix marking system columns.
    pub reserved_prefix: String,
}

impl Default for ColumnRules {
    fn default() -> Self {
        Self {
            count_column: LABEL_COUNT_COLUMN.to_string(),
            reserved: RESERVED_COLUMNS.iter().map(|s| (*s).to_string()).collect(),
            reserved_prefix: RESERVED_PREFIX.to_string(),
        }
    }
}

impl ColumnRules {
    /// Use a different repeat-count column.
    #[must_use]
    pub fn with_count_column(mut self, column: impl Into<String>) -> Self {
        self.count_column = column.into();
        self
    }

    /// Whether a column may appear on labels.
    pub fn is_label_column(&self, name: &str) -> bool {
        name != self.count_column
            && !self.reserved.iter().any(|r| r == name)
            && !(!self.reserved_prefix.is_empty() && name.starts_with(&self.reserved_prefix))
    }
}

/// Label columns in schema order, taken from the first record.
///
/// # Errors
///
/// [`TransformError::NoData`] for an empty record set,
/// [`TransformError::NoColumnsSelected`] when every column is filtered out.
pub fn label_columns(records: &[Record], rules: &ColumnRules) -> Result<Vec<String>> {
    let first = records.first().ok_or(TransformError::NoData)?;
    let columns: Vec<String> = first
        .column_names()
        .filter(|name| rules.is_label_column(name))
        .map(str::to_string)
        .collect();
    if columns.is_empty() {
        return Err(TransformError::NoColumnsSelected);
    }
    Ok(columns)
}
