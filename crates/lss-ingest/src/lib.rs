//! Record loading for label sheets.
//!
//! Turns CSV or JSON files into ordered [`lss_model::Record`]s with stable
//! row ids and typed cells.

mod cell;
mod csv_reader;
mod error;
mod json_reader;
mod source;

pub use cell::parse_cell;
pub use csv_reader::{read_csv_from, read_csv_records};
pub use error::{IngestError, Result};
pub use json_reader::{read_json_from, read_json_records};
pub use source::{ID_COLUMN, MAX_RECORD_FILE_SIZE, RecordFormat, check_file_size, load_records};
