//! JSON record loading.

use std::io::{BufReader, Read};
use std::path::Path;

use serde_json::Value;

use lss_model::{CellValue, Record, RowId};

use crate::cell::row_id_of;
use crate::error::{IngestError, Result};
use crate::source::{ID_COLUMN, open_file};

/// Load records from a JSON array of objects.
///
/// Keys keep their document order. An integer `id` key supplies the row id;
/// otherwise rows are numbered from 1.
pub fn read_json_records(path: &Path) -> Result<Vec<Record>> {
    let file = open_file(path)?;
    read_json_from(BufReader::new(file), path)
}

/// Load records from any JSON reader. `path` is only used in errors.
pub fn read_json_from<R: Read>(input: R, path: &Path) -> Result<Vec<Record>> {
    let document: Value = serde_json::from_reader(input).map_err(|e| IngestError::JsonParse {
        path: path.to_path_buf(),
        source: e,
    })?;

    let rows = match document {
        Value::Array(rows) => rows,
        other => {
            return Err(IngestError::UnexpectedShape {
                path: path.to_path_buf(),
                found: kind(&other),
            });
        }
    };

    let mut records = Vec::with_capacity(rows.len());
    for (index, row) in rows.into_iter().enumerate() {
        let fields = match row {
            Value::Object(fields) => fields,
            other => {
                return Err(IngestError::UnexpectedShape {
                    path: path.to_path_buf(),
                    found: kind(&other),
                });
            }
        };

        let mut record = Record::new(RowId(index as i64 + 1));
        for (column, value) in fields {
            record.insert(column, CellValue::from(value));
        }
        if let Some(id) = record.get(ID_COLUMN).and_then(row_id_of) {
            record.id = RowId(id);
        }
        records.push(record);
    }

    tracing::debug!(path = %path.display(), rows = records.len(), "loaded JSON records");
    Ok(records)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array of non-objects",
        Value::Object(_) => "an object",
    }
}
