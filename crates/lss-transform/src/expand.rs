//! Expansion of records into label instances.

use std::collections::HashMap;

use lss_model::{
    CellValue, ColumnLayoutEntry, Field, Formatting, LabelInstance, Position, Record,
};

use crate::inference::infer_field_type;
use crate::normalization::parse_float_prefix;

/// Upper bound on labels produced by a single record: 12 500 sheets of the
/// densest template. Larger counts are treated as corrupt input.
pub const MAX_REPEAT_COUNT: usize = 1_000_000;

/// Label instances plus the source record index of each one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Expansion {
    pub labels: Vec<LabelInstance>,
    /// `row_indices[i]` is the index of the record that produced `labels[i]`.
    pub row_indices: Vec<usize>,
}

/// Number of labels a record produces.
///
/// The count cell is parsed generously (numeric prefix of text is accepted).
/// Missing, non-numeric, non-finite and non-positive values count as 1;
/// fractions are truncated, with a floor of 1.
pub fn repeat_count(record: &Record, count_column: &str) -> usize {
    let parsed = match record.get(count_column) {
        Some(CellValue::Number(n)) => Some(*n),
        Some(CellValue::Text(s)) => parse_float_prefix(s),
        _ => None,
    };
    let Some(count) = parsed.filter(|n| n.is_finite() && *n > 0.0) else {
        return 1;
    };
    let count = (count.trunc() as usize).max(1);
    if count > MAX_REPEAT_COUNT {
        tracing::warn!(
            row_id = %record.id,
            requested = count,
            max = MAX_REPEAT_COUNT,
            "repeat count capped"
        );
        return MAX_REPEAT_COUNT;
    }
    count
}

/// Expand records into label instances.
///
/// Each record yields [`repeat_count`] identical instances sharing its row id
/// and index. Field position and style come from the matching layout entry,
/// or from `defaults` when a column has none.
pub fn expand_records(
    records: &[Record],
    columns: &[String],
    layout: &[ColumnLayoutEntry],
    defaults: &Formatting,
    count_column: &str,
) -> Expansion {
    let by_name: HashMap<&str, &ColumnLayoutEntry> =
        layout.iter().map(|e| (e.name.as_str(), e)).collect();
    let mut expansion = Expansion::default();

    for (row_index, record) in records.iter().enumerate() {
        let fields: Vec<Field> = columns
            .iter()
            .enumerate()
            .map(|(index, column)| {
                let value = record.get(column).cloned().unwrap_or_default();
                let (position, formatting) = match by_name.get(column.as_str()) {
                    Some(entry) => (entry.position, entry.formatting.clone()),
                    None => (Position::stacked(index), defaults.clone()),
                };
                Field {
                    name: column.clone(),
                    field_type: infer_field_type(&value),
                    value,
                    column_id: column.clone(),
                    row_id: record.id,
                    position,
                    formatting,
                }
            })
            .collect();

        let count = repeat_count(record, count_column);
        for _ in 0..count {
            expansion.labels.push(LabelInstance {
                fields: fields.clone(),
                row_index,
                row_id: record.id,
            });
            expansion.row_indices.push(row_index);
        }
    }

    tracing::debug!(
        records = records.len(),
        labels = expansion.labels.len(),
        "expanded records into labels"
    );
    expansion
}

#[cfg(test)]
mod tests {
    use super::*;
    use lss_model::{FieldType, FontWeight, RowId, TextAlign};

    fn defaults() -> Formatting {
        Formatting {
            font_size: 11.0,
            color: "#000000".to_string(),
            align: TextAlign::Left,
            font_weight: FontWeight::Normal,
        }
    }

    fn record(id: i64, count: impl Into<CellValue>) -> Record {
        Record::new(RowId(id))
            .with_cell("Name", format!("Item {id}"))
            .with_cell("LabelCount", count)
    }

    #[test]
    fn test_repeat_count_fallbacks() {
        assert_eq!(repeat_count(&record(1, 2_i64), "LabelCount"), 2);
        assert_eq!(repeat_count(&record(1, "bad"), "LabelCount"), 1);
        assert_eq!(repeat_count(&record(1, 0_i64), "LabelCount"), 1);
        assert_eq!(repeat_count(&record(1, -3_i64), "LabelCount"), 1);
        assert_eq!(repeat_count(&record(1, CellValue::Null), "LabelCount"), 1);
        assert_eq!(repeat_count(&record(1, "3 copies"), "LabelCount"), 3);
        assert_eq!(repeat_count(&Record::new(RowId(1)), "LabelCount"), 1);
    }

    #[test]
    fn test_fractional_repeat_count_truncates() {
        assert_eq!(repeat_count(&record(1, 2.9), "LabelCount"), 2);
        assert_eq!(repeat_count(&record(1, 0.5), "LabelCount"), 1);
    }

    #[test]
    fn test_repeat_count_capped() {
        assert_eq!(repeat_count(&record(1, 20_000.0), "LabelCount"), 20_000);
        assert_eq!(repeat_count(&record(1, 1e12), "LabelCount"), MAX_REPEAT_COUNT);
        assert_eq!(repeat_count(&record(1, "Infinity"), "LabelCount"), 1);
    }

    #[test]
    fn test_expansion_shares_row_identity() {
        let records = vec![record(10, 2_i64), record(11, 1_i64)];
        let columns = vec!["Name".to_string()];
        let expansion = expand_records(&records, &columns, &[], &defaults(), "LabelCount");
        assert_eq!(expansion.labels.len(), 3);
        assert_eq!(expansion.row_indices, vec![0, 0, 1]);
        assert_eq!(expansion.labels[0], expansion.labels[1]);
        assert_eq!(expansion.labels[1].row_id, RowId(10));
        assert_eq!(expansion.labels[2].row_index, 1);
    }

    #[test]
    fn test_fields_take_layout_and_type() {
        let records = vec![
            Record::new(RowId(1))
                .with_cell("Name", "Ann")
                .with_cell("Qty", "12.5"),
        ];
        let columns = vec!["Name".to_string(), "Qty".to_string()];
        let mut style = defaults();
        style.font_size = 20.0;
        let layout = vec![ColumnLayoutEntry::new("Qty", Position::new(50.0, 50.0), style.clone())];
        let expansion = expand_records(&records, &columns, &layout, &defaults(), "LabelCount");
        let label = &expansion.labels[0];

        let name = label.field("Name").unwrap();
        assert_eq!(name.field_type, FieldType::Text);
        assert_eq!(name.position, Position::stacked(0));
        assert_eq!(name.formatting, defaults());

        let qty = label.field("Qty").unwrap();
        assert_eq!(qty.field_type, FieldType::Numeric);
        assert_eq!(qty.position, Position::new(50.0, 50.0));
        assert_eq!(qty.formatting, style);
        assert_eq!(qty.row_id, RowId(1));
    }

    #[test]
    fn test_missing_cell_is_null() {
        let records = vec![Record::new(RowId(1)).with_cell("Name", "Ann")];
        let columns = vec!["Name".to_string(), "City".to_string()];
        let expansion = expand_records(&records, &columns, &[], &defaults(), "LabelCount");
        assert_eq!(expansion.labels[0].fields[1].value, CellValue::Null);
    }
}
