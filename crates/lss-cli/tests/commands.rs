//! Integration tests for the CLI commands against files on disk.

use std::fs;
use std::path::{Path, PathBuf};

use lss_cli::cli::{AlignArg, LayoutArgs, OutputArg, RenderArgs, SourceArgs, StyleArgs, WeightArg};
use lss_cli::commands::{run_layout, run_render, run_style};
use lss_cli::output::{render_json, render_text};
use lss_model::{FontWeight, Position, TextAlign};
use serde_json::{Value, json};
use tempfile::TempDir;

const RECORDS: &str = "id,Name,City,LabelCount\n1,Ann,Oslo,2\n2,Bo,Rome,\n";

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn source(records: &Path) -> SourceArgs {
    SourceArgs {
        records: records.to_path_buf(),
        count_column: None,
    }
}

fn render_args(records: &Path) -> RenderArgs {
    RenderArgs {
        source: source(records),
        options: None,
        template: None,
        blanks: None,
        output: OutputArg::Text,
    }
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_render_text_with_overrides() {
    let dir = TempDir::new().unwrap();
    let records = write(&dir, "records.csv", RECORDS);
    let args = RenderArgs {
        template: Some("labels8".to_string()),
        blanks: Some(6),
        ..render_args(&records)
    };

    let outcome = run_render(&args).unwrap();
    assert!(outcome.is_ok());
    assert_eq!(outcome.pages.len(), 2);

    insta::assert_snapshot!(render_text(&outcome.pages, &outcome.options), @r#"
    Page 1 of 2 (8 per sheet (2-1/3" x 3-3/8"))
      1. [blank]
      2. [blank]
      3. [blank]
      4. [blank]
      5. [blank]
      6. [blank]
      7. Ann, Oslo
      8. Ann, Oslo

    Page 2 of 2 (8 per sheet (2-1/3" x 3-3/8"))
      1. Bo, Rome
      2. [blank]
      3. [blank]
      4. [blank]
      5. [blank]
      6. [blank]
      7. [blank]
      8. [blank]
    "#);
}

#[test]
fn test_render_does_not_modify_options_file() {
    let dir = TempDir::new().unwrap();
    let records = write(&dir, "records.csv", RECORDS);
    let options = write(&dir, "options.json", r#"{"separator": " / "}"#);
    let args = RenderArgs {
        options: Some(options.clone()),
        ..render_args(&records)
    };

    let outcome = run_render(&args).unwrap();
    let text = render_text(&outcome.pages, &outcome.options);
    assert!(text.contains("Ann / Oslo"));
    assert_eq!(read_json(&options), json!({"separator": " / "}));
}

#[test]
fn test_render_reports_missing_columns_as_status() {
    let dir = TempDir::new().unwrap();
    let records = write(&dir, "records.csv", "id,LabelCount\n1,2\n");
    let outcome = run_render(&render_args(&records)).unwrap();
    assert!(!outcome.is_ok());
    assert!(outcome.status.starts_with("Please select columns"));
    assert_eq!(outcome.pages.len(), 1);

    let document: Value = serde_json::from_str(
        &render_json(&outcome.pages, &outcome.options, &outcome.status).unwrap(),
    )
    .unwrap();
    assert_eq!(document["status"], json!(outcome.status));
    assert_eq!(document["template"]["perPage"], json!(30));
}

#[test]
fn test_render_rejects_unknown_template() {
    let dir = TempDir::new().unwrap();
    let records = write(&dir, "records.csv", RECORDS);
    let args = RenderArgs {
        template: Some("labels7".to_string()),
        ..render_args(&records)
    };
    let err = run_render(&args).unwrap_err();
    assert!(err.to_string().contains("unknown template 'labels7'"));
}

#[test]
fn test_layout_persists_reconciled_columns() {
    let dir = TempDir::new().unwrap();
    let records = write(&dir, "records.csv", RECORDS);
    let options = dir.path().join("options.json");

    let layout = run_layout(&LayoutArgs {
        source: source(&records),
        options: options.clone(),
    })
    .unwrap();
    let names: Vec<&str> = layout.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Name", "City"]);

    let stored = read_json(&options);
    assert_eq!(stored["columnConfig"][1]["name"], json!("City"));
    assert_eq!(stored["columnConfig"][1]["position"], json!({"x": 5.0, "y": 20.0}));
}

#[test]
fn test_layout_fails_without_rows() {
    let dir = TempDir::new().unwrap();
    let records = write(&dir, "records.csv", "Name\n");
    let err = run_layout(&LayoutArgs {
        source: source(&records),
        options: dir.path().join("options.json"),
    })
    .unwrap_err();
    assert_eq!(err.to_string(), "No data. Please add some rows");
}

#[test]
fn test_style_moves_and_restyles_column() {
    let dir = TempDir::new().unwrap();
    let records = write(&dir, "records.csv", RECORDS);
    let options = write(&dir, "options.json", r#"{"columnConfig": ["Name", "City"]}"#);

    let entry = run_style(&StyleArgs {
        source: source(&records),
        options: options.clone(),
        column: "City".to_string(),
        font_size: Some(14.0),
        color: Some("#336699".to_string()),
        align: Some(AlignArg::Right),
        weight: Some(WeightArg::Bold),
        x: Some(60.0),
        y: Some(140.0),
    })
    .unwrap();

    assert_eq!(entry.position, Position::new(60.0, 100.0));
    assert_eq!(entry.formatting.font_size, 14.0);
    assert_eq!(entry.formatting.align, TextAlign::Right);
    assert_eq!(entry.formatting.font_weight, FontWeight::Bold);

    let stored = read_json(&options);
    assert_eq!(stored["columnConfig"][0]["name"], json!("Name"));
    assert_eq!(stored["columnConfig"][1]["position"], json!({"x": 60.0, "y": 100.0}));
    assert_eq!(stored["columnConfig"][1]["formatting"]["color"], json!("#336699"));
}

#[test]
fn test_style_unknown_column() {
    let dir = TempDir::new().unwrap();
    let records = write(&dir, "records.csv", RECORDS);
    let err = run_style(&StyleArgs {
        source: source(&records),
        options: dir.path().join("options.json"),
        column: "LabelCount".to_string(),
        font_size: None,
        color: None,
        align: None,
        weight: None,
        x: Some(1.0),
        y: None,
    })
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "column 'LabelCount' is not shown on the labels (available: Name, City)"
    );
}
