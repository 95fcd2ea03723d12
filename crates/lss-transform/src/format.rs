//! Display formatting of field values by inferred type.
//!
//! Formatting is total: parse failures degrade to the raw value's string
//! form instead of propagating.

use chrono::{DateTime, NaiveDateTime};
use lss_model::{CellValue, Field, FieldType, number_to_string};

use crate::normalization::{parse_date, parse_float_prefix};

/// Short date format (`M/D/YYYY`) used for Date fields.
pub const SHORT_DATE_FORMAT: &str = "%-m/%-d/%Y";

/// Format a field for display.
pub fn format_field(field: &Field) -> String {
    format_value(&field.value, field.field_type)
}

/// Format a raw value as the given type.
pub fn format_value(value: &CellValue, field_type: FieldType) -> String {
    if value.is_null() {
        return String::new();
    }
    match field_type {
        FieldType::Numeric => format_numeric(value),
        FieldType::Date => format_date(value),
        FieldType::Text => value.display_string(),
    }
}

fn format_numeric(value: &CellValue) -> String {
    let parsed = match value {
        CellValue::Number(n) => Some(*n),
        CellValue::Text(s) => parse_float_prefix(s),
        _ => None,
    };
    match parsed {
        Some(n) if n.is_finite() => format_number(n),
        _ => value.display_string(),
    }
}

/// Whole numbers without a decimal point; fractions with up to two decimals,
/// trailing zeros and a dangling decimal point stripped.
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 {
        return number_to_string(n);
    }
    let fixed = format!("{n:.2}");
    fixed.trim_end_matches('0').trim_end_matches('.').to_string()
}

fn format_date(value: &CellValue) -> String {
    let parsed = match value {
        CellValue::Date(d) => Some(*d),
        CellValue::Text(s) => parse_date(s),
        CellValue::Number(ms) => timestamp_millis(*ms),
        _ => None,
    };
    match parsed {
        Some(date) => date.format(SHORT_DATE_FORMAT).to_string(),
        None => value.display_string(),
    }
}

fn timestamp_millis(ms: f64) -> Option<NaiveDateTime> {
    if !ms.is_finite() {
        return None;
    }
    DateTime::from_timestamp_millis(ms as i64).map(|dt| dt.naive_utc())
}
