//! Field type inference from raw values.
//!
//! Priority order (highest to lowest):
//! 1. Numbers, and strings with a numeric prefix (`"3kg"`, `"12 Main St"`)
//! 2. Dates, and other strings a lenient date parser accepts
//! 3. Default (Text)
//!
//! Numeric is checked first, so a string that starts with a number is never
//! a date: `"2024-01-05"` is Numeric. Date strings must lead with a word
//! (`"Jan 5, 2024"`, `"Fri, 05 Jan 2024 ..."`).

use lss_model::{CellValue, FieldType};

use crate::normalization::{parse_date, parse_float_prefix};

/// Infer the display type of a raw value. Never fails; falls back to Text.
pub fn infer_field_type(value: &CellValue) -> FieldType {
    match value {
        CellValue::Number(_) => FieldType::Numeric,
        CellValue::Date(_) => FieldType::Date,
        CellValue::Text(s) if parse_float_prefix(s).is_some() => FieldType::Numeric,
        CellValue::Text(s) if parse_date(s).is_some() => FieldType::Date,
        CellValue::Null | CellValue::Bool(_) | CellValue::Text(_) => FieldType::Text,
    }
}
