//! CSV record loading.

use std::io::Read;
use std::path::Path;

use lss_model::{Record, RowId};

use crate::cell::{parse_cell, row_id_of};
use crate::error::{IngestError, Result};
use crate::source::{ID_COLUMN, open_file};

/// Load records from a CSV file with a header row.
///
/// Column order follows the header. An integer `id` column supplies the row
/// ids; otherwise rows are numbered from 1.
pub fn read_csv_records(path: &Path) -> Result<Vec<Record>> {
    let file = open_file(path)?;
    read_csv_from(file, path)
}

/// Load records from any CSV reader. `path` is only used in errors.
pub fn read_csv_from<R: Read>(input: R, path: &Path) -> Result<Vec<Record>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            source: e,
        })?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            let h = if i == 0 { h.trim_start_matches('\u{feff}') } else { h };
            h.trim().to_string()
        })
        .collect();

    if headers.iter().any(String::is_empty) {
        return Err(IngestError::EmptyColumnName {
            path: path.to_path_buf(),
        });
    }

    let mut records = Vec::new();
    for (index, row) in reader.records().enumerate() {
        let row = row.map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut record = Record::new(RowId(index as i64 + 1));
        for (column, raw) in headers.iter().zip(row.iter()) {
            record.insert(column.as_str(), parse_cell(raw));
        }
        if let Some(id) = record.get(ID_COLUMN).and_then(row_id_of) {
            record.id = RowId(id);
        }
        records.push(record);
    }

    tracing::debug!(
        path = %path.display(),
        rows = records.len(),
        columns = headers.len(),
        "loaded CSV records"
    );
    Ok(records)
}
