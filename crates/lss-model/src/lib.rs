//! Data model for label sheets.
//!
//! Everything the record-to-label pipeline reads or produces lives here:
//!
//! - [`Template`] - fixed catalog of label sheet layouts
//! - [`Record`] / [`CellValue`] - rows handed in by the data source
//! - [`ColumnLayoutEntry`] - persisted position and style for one column
//! - [`StoredColumnEntry`] - the tolerant on-disk form of a layout entry
//! - [`Options`] - the persisted widget configuration
//! - [`LabelInstance`] / [`Field`] / [`Page`] - derived, never persisted

pub mod label;
pub mod layout;
pub mod options;
pub mod template;
pub mod value;

pub use label::{Field, FieldType, LabelInstance, Page};
pub use layout::{
    ColumnLayoutEntry, FontWeight, Formatting, PartialColumnEntry, Position, StoredColumnEntry,
    TextAlign,
};
pub use options::{Options, keys};
pub use template::{DEFAULT_TEMPLATE_ID, TEMPLATES, Template, default_template, find_template};
pub use value::{CellValue, Record, RowId, number_to_string};
