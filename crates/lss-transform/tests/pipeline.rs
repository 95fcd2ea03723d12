//! Integration tests for the label pipeline.

use lss_model::{
    CellValue, ColumnLayoutEntry, FieldType, Options, Position, Record, RowId, StoredColumnEntry,
};
use lss_transform::{ColumnRules, TransformError, run_pipeline, transform};
use serde_json::json;

fn records(rows: &[(&str, CellValue)]) -> Vec<Record> {
    rows.iter()
        .enumerate()
        .map(|(i, (name, count))| {
            Record::new(RowId(i as i64 + 1))
                .with_cell("id", i as i64 + 1)
                .with_cell("Name", *name)
                .with_cell("LabelCount", count.clone())
        })
        .collect()
}

fn with_layout(layout: &[ColumnLayoutEntry]) -> Options {
    Options {
        column_config: layout.iter().cloned().map(StoredColumnEntry::from).collect(),
        ..Options::default()
    }
}

#[test]
fn test_repeat_counts_expand_per_record() {
    let input = records(&[
        ("a", CellValue::Number(2.0)),
        ("b", CellValue::text("bad")),
        ("c", CellValue::Number(0.0)),
    ]);
    let output = transform(&input, &Options::default(), &ColumnRules::default()).unwrap();
    assert_eq!(output.row_indices, vec![0, 0, 1, 2]);
    assert_eq!(output.available_columns, vec!["Name"]);
}

#[test]
fn test_empty_records_surface_no_data() {
    let result = run_pipeline(&[], &Options::default(), &ColumnRules::default());
    assert_eq!(result.status, "No data. Please add some rows");
    assert!(result.output.is_none());
    assert!(result.labels().is_none());
}

#[test]
fn test_system_columns_only_surface_no_columns() {
    let input = vec![
        Record::new(RowId(1))
            .with_cell("id", 1_i64)
            .with_cell("manualSort", 1_i64)
            .with_cell("LabelCount", 2_i64),
    ];
    let result = run_pipeline(&input, &Options::default(), &ColumnRules::default());
    assert_eq!(result.status, TransformError::NoColumnsSelected.to_string());
    assert!(result.output.is_none());
}

#[test]
fn test_first_run_reports_layout_change_then_settles() {
    let input = records(&[("a", CellValue::Null)]);
    let first = transform(&input, &Options::default(), &ColumnRules::default()).unwrap();
    assert!(first.layout_changed);

    let second = transform(
        &input,
        &with_layout(&first.column_layout),
        &ColumnRules::default(),
    )
    .unwrap();
    assert!(!second.layout_changed);
    assert_eq!(second.column_layout, first.column_layout);
}

#[test]
fn test_custom_position_survives_new_column() {
    let mut input = records(&[("a", CellValue::Null)]);
    let first = transform(&input, &Options::default(), &ColumnRules::default()).unwrap();
    let mut layout = first.column_layout;
    layout[0].position = Position::new(42.0, 17.0);

    input[0].insert("City", "Oslo");
    let output = transform(&input, &with_layout(&layout), &ColumnRules::default()).unwrap();
    assert_eq!(output.column_layout.len(), 2);
    assert_eq!(output.column_layout[0].position, Position::new(42.0, 17.0));
    assert_eq!(output.column_layout[1].name, "City");
    assert_eq!(output.column_layout[1].position, Position::new(5.0, 32.0));

    let city = output.labels[0].field("City").unwrap();
    assert_eq!(city.position, Position::new(5.0, 32.0));
}

#[test]
fn test_stale_column_dropped_from_saved_options() {
    let stored = json!({
        "columnConfig": [
            "Name",
            {"name": "Zombie", "position": {"x": 1, "y": 1}},
        ]
    });
    let options = Options::from_stored(Some(&stored));
    let input = records(&[("a", CellValue::Null)]);
    let output = transform(&input, &options, &ColumnRules::default()).unwrap();
    let names: Vec<&str> = output.column_layout.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Name"]);
    assert!(output.layout_changed);
}

#[test]
fn test_field_types_inferred_per_value() {
    let input = vec![
        Record::new(RowId(1))
            .with_cell("Qty", "3")
            .with_cell("Weight", "3kg")
            .with_cell("Due", "Feb 1, 2024")
            .with_cell("Note", "fragile"),
    ];
    let output = transform(&input, &Options::default(), &ColumnRules::default()).unwrap();
    let types: Vec<FieldType> = output.labels[0].fields.iter().map(|f| f.field_type).collect();
    assert_eq!(
        types,
        vec![FieldType::Numeric, FieldType::Numeric, FieldType::Date, FieldType::Text]
    );
}

#[test]
fn test_pages_use_template_and_blanks() {
    let input = records(&[("a", CellValue::Number(9.0))]);
    let options = Options {
        template_id: "labels8".to_string(),
        blanks: 3,
        ..Options::default()
    };
    let result = run_pipeline(&input, &options, &ColumnRules::default());
    let pages = result.pages(&options);
    assert_eq!(pages.len(), 2);
    assert!(pages.iter().all(|p| p.len() == 8));
    assert_eq!(pages[0].blank_count(), 3);
    assert_eq!(pages[1].labels().count(), 4);
}

#[test]
fn test_failed_pipeline_still_paginates_one_blank_page() {
    let options = Options::default();
    let result = run_pipeline(&[], &options, &ColumnRules::default());
    let pages = result.pages(&options);
    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0].blank_count(), 30);
}
