//! Record-to-label transformation.
//!
//! Turns a table of records into label instances laid out on sheets.
//!
//! # Overview
//!
//! - **Type inference**: Numeric / Date / Text from raw values
//! - **Formatting**: display strings per inferred type
//! - **Layout reconciliation**: merge saved per-column layout with the current schema
//! - **Expansion**: one label instance per repeat of each record
//! - **Pagination**: fixed-capacity pages with leading blanks
//!
//! # Example
//!
//! ```
//! use lss_model::{Options, Record, RowId};
//! use lss_transform::{ColumnRules, run_pipeline};
//!
//! let records = vec![
//!     Record::new(RowId(1))
//!         .with_cell("Name", "Ann")
//!         .with_cell("LabelCount", 2_i64),
//! ];
//! let options = Options::default();
//! let result = run_pipeline(&records, &options, &ColumnRules::default());
//!
//! assert!(result.is_ok());
//! assert_eq!(result.labels().map(<[_]>::len), Some(2));
//! assert_eq!(result.pages(&options).len(), 1);
//! ```
//!
//! # Design Principles
//!
//! - **Idempotent**: re-running on unchanged input yields the same layout
//! - **Customization-preserving**: saved positions and styles survive schema drift
//! - **Total**: malformed input degrades to defaults or a status message

mod error;

pub mod columns;
pub mod expand;
pub mod format;
pub mod inference;
pub mod normalization;
pub mod paginate;
pub mod pipeline;
pub mod reconcile;
pub mod render;

pub use columns::{ColumnRules, LABEL_COUNT_COLUMN, label_columns};
pub use error::{Result, TransformError, status_message};
pub use expand::{Expansion, expand_records, repeat_count};
pub use format::{format_field, format_value};
pub use inference::infer_field_type;
pub use paginate::paginate;
pub use pipeline::{PipelineResult, TransformOutput, run_pipeline, transform};
pub use reconcile::{default_layout, layout_matches, reconcile_layout};
pub use render::{FieldStyle, LabelStyle, label_text};
