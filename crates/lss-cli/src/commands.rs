//! Command implementations.

use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use serde_json::{Map, Value};
use tracing::{info, info_span, trace};

use lss_ingest::load_records;
use lss_model::{ColumnLayoutEntry, Options, Page, Record, TEMPLATES, find_template, keys};
use lss_persistence::{JsonOptionStore, MemoryOptionStore, load_options_file};
use lss_session::{BoundingBox, FieldRef, FormattingEdit, LabelSession, Point};
use lss_transform::{ColumnRules, label_text};

use crate::cli::{LayoutArgs, RenderArgs, SourceArgs, StyleArgs};
use crate::logging::redact_value;
use crate::output::{layout_table, templates_table};

/// Label box in percent units, so pointer deltas are percentages.
const PERCENT_BOX: BoundingBox = BoundingBox {
    left: 0.0,
    top: 0.0,
    width: 100.0,
    height: 100.0,
};

/// Rendered sheets plus the status of the pipeline pass.
#[derive(Debug)]
pub struct RenderOutcome {
    /// Empty when the records produced labels.
    pub status: String,
    pub options: Options,
    pub pages: Vec<Page>,
}

impl RenderOutcome {
    pub fn is_ok(&self) -> bool {
        self.status.is_empty()
    }
}

pub fn run_templates() -> Result<()> {
    println!("{}", templates_table(TEMPLATES));
    Ok(())
}

/// Render records with options from a file (read only) and flag overrides.
pub fn run_render(args: &RenderArgs) -> Result<RenderOutcome> {
    let span = info_span!("render", records = %args.source.records.display());
    let _guard = span.enter();

    let records = read_records(&args.source.records)?;
    let mut stored = match &args.options {
        Some(path) => load_options_file(path)
            .with_context(|| format!("load options from {}", path.display()))?
            .unwrap_or_default(),
        None => Map::new(),
    };
    if let Some(id) = &args.template {
        if find_template(id).is_none() {
            let known: Vec<&str> = TEMPLATES.iter().map(|t| t.id).collect();
            bail!("unknown template '{id}' (available: {})", known.join(", "));
        }
        stored.insert(keys::TEMPLATE.to_string(), Value::from(id.as_str()));
    }
    if let Some(blanks) = args.blanks {
        stored.insert(keys::BLANKS.to_string(), Value::from(blanks));
    }

    let session = LabelSession::new(MemoryOptionStore::new(), column_rules(&args.source));
    session.on_options(Some(&Value::Object(stored)));
    session.on_records(records);

    let options = session.options().clone();
    let pages = session.pages();
    for label in pages.iter().flat_map(Page::labels) {
        trace!(
            row_id = %label.row_id,
            text = redact_value(&label_text(Some(label), &options)),
            "rendered label"
        );
    }
    let status = session.status();
    info!(
        pages = pages.len(),
        template = %options.template_id,
        ok = status.is_empty(),
        "rendered label sheets"
    );
    Ok(RenderOutcome {
        status,
        options,
        pages,
    })
}

/// Reconcile the layout for the records and persist it to the options file.
pub fn run_layout(args: &LayoutArgs) -> Result<Vec<ColumnLayoutEntry>> {
    let session = open_persistent_session(&args.source, &args.options)?;
    let layout = session.column_layout();
    info!(columns = layout.len(), "column layout reconciled");
    println!("{}", layout_table(&layout));
    Ok(layout)
}

/// Move or restyle one column and persist the result.
pub fn run_style(args: &StyleArgs) -> Result<ColumnLayoutEntry> {
    let session = open_persistent_session(&args.source, &args.options)?;
    let current = find_entry(&session.column_layout(), &args.column)?;
    let field = FieldRef::new(0, args.column.as_str());

    if args.x.is_some() || args.y.is_some() {
        let start = current.position;
        let target = Point::new(args.x.unwrap_or(start.x), args.y.unwrap_or(start.y));
        session.begin_drag(field.clone(), PERCENT_BOX, Point::new(start.x, start.y))?;
        session.drag_to(target)?;
        let commit = session.end_drag()?;
        info!(column = %commit.column_id, x = commit.position.x, y = commit.position.y, "moved column");
    }

    let edit = FormattingEdit {
        font_size: args.font_size,
        color: args.color.clone(),
        align: args.align.map(Into::into),
        font_weight: args.weight.map(Into::into),
    };
    if !edit.is_empty() {
        session.select_field(field)?;
        session.edit_formatting(&edit)?;
        let column = session.save_formatting()?;
        info!(column = %column, "restyled column");
    }

    let updated = find_entry(&session.column_layout(), &args.column)?;
    println!("{}", layout_table(std::slice::from_ref(&updated)));
    Ok(updated)
}

fn read_records(path: &Path) -> Result<Vec<Record>> {
    let records =
        load_records(path).with_context(|| format!("load records from {}", path.display()))?;
    info!(rows = records.len(), "loaded records");
    Ok(records)
}

fn column_rules(source: &SourceArgs) -> ColumnRules {
    match &source.count_column {
        Some(column) => ColumnRules::default().with_count_column(column.as_str()),
        None => ColumnRules::default(),
    }
}

/// Session writing through to the options file, already run over the records.
fn open_persistent_session(source: &SourceArgs, options_path: &Path) -> Result<LabelSession> {
    let records = read_records(&source.records)?;
    let store = JsonOptionStore::open(options_path)
        .with_context(|| format!("open options file {}", options_path.display()))?;
    let stored = store.load();

    let session = LabelSession::new(store, column_rules(source));
    session.on_options(stored.as_ref());
    session.on_records(records);

    let status = session.status();
    if !status.is_empty() {
        bail!(status);
    }
    Ok(session)
}

fn find_entry(layout: &[ColumnLayoutEntry], column: &str) -> Result<ColumnLayoutEntry> {
    layout
        .iter()
        .find(|entry| entry.name == column)
        .cloned()
        .ok_or_else(|| {
            let known: Vec<&str> = layout.iter().map(|e| e.name.as_str()).collect();
            anyhow!(
                "column '{column}' is not shown on the labels (available: {})",
                known.join(", ")
            )
        })
}
