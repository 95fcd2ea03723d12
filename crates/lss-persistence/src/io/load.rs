//! Options file loading.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde_json::{Map, Value};

use crate::error::{PersistenceError, Result};

/// Read the options object stored at `path`.
///
/// A missing file yields `None`; hosts treat that as "use defaults".
pub fn load_options_file(path: &Path) -> Result<Option<Map<String, Value>>> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no options file, using defaults");
            return Ok(None);
        }
        Err(e) => {
            return Err(PersistenceError::Io {
                operation: "read",
                path: path.to_path_buf(),
                source: e,
            });
        }
    };

    if text.trim().is_empty() {
        return Ok(None);
    }

    let value: Value =
        serde_json::from_str(&text).map_err(|e| PersistenceError::InvalidFormat {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    match value {
        Value::Object(map) => {
            tracing::debug!(path = %path.display(), keys = map.len(), "loaded options");
            Ok(Some(map))
        }
        other => Err(PersistenceError::InvalidFormat {
            path: path.to_path_buf(),
            reason: format!("expected a JSON object, found {}", kind(&other)),
        }),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
