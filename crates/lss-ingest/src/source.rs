//! Record source selection and file checks.

use std::fs::File;
use std::path::Path;

use lss_model::Record;

use crate::csv_reader::read_csv_records;
use crate::error::{IngestError, Result};
use crate::json_reader::read_json_records;

/// Column whose integer value becomes the record's row id.
pub const ID_COLUMN: &str = "id";

/// Maximum file size for record loading (100 MB).
pub const MAX_RECORD_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// Supported record file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFormat {
    Csv,
    Json,
}

impl RecordFormat {
    /// Pick the format from the file extension; anything but `.json` is CSV.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Csv,
        }
    }
}

/// Load records from a CSV or JSON file.
pub fn load_records(path: &Path) -> Result<Vec<Record>> {
    check_file_size(path, MAX_RECORD_FILE_SIZE)?;
    match RecordFormat::from_path(path) {
        RecordFormat::Csv => read_csv_records(path),
        RecordFormat::Json => read_json_records(path),
    }
}

/// Check file size against a limit.
pub fn check_file_size(path: &Path, max_size: u64) -> Result<()> {
    let metadata = std::fs::metadata(path).map_err(|e| not_found_or_read(path, e))?;
    if metadata.len() > max_size {
        return Err(IngestError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size,
        });
    }
    Ok(())
}

pub(crate) fn open_file(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| not_found_or_read(path, e))
}

fn not_found_or_read(path: &Path, e: std::io::Error) -> IngestError {
    if e.kind() == std::io::ErrorKind::NotFound {
        IngestError::FileNotFound {
            path: path.to_path_buf(),
        }
    } else {
        IngestError::FileRead {
            path: path.to_path_buf(),
            source: e,
        }
    }
}
