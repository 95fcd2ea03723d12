//! Typing of raw text cells.

use lss_model::CellValue;

/// Type a CSV cell: blank is null, `true`/`false` are booleans, finite
/// numbers are numbers, anything else stays text.
pub fn parse_cell(raw: &str) -> CellValue {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return CellValue::Null;
    }
    match trimmed {
        "true" => return CellValue::Bool(true),
        "false" => return CellValue::Bool(false),
        _ => {}
    }
    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() => CellValue::Number(n),
        _ => CellValue::Text(raw.to_string()),
    }
}

/// Integer row id carried by a cell, if any.
pub(crate) fn row_id_of(value: &CellValue) -> Option<i64> {
    match value {
        CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 9.0e15 => Some(*n as i64),
        _ => None,
    }
}
