//! The record-to-label pipeline.
//!
//! `records + options -> (labels, layout, status)`: select label columns,
//! reconcile the saved layout against them, expand records into label
//! instances. Pagination happens on demand from the result.

use serde::Serialize;

use lss_model::{ColumnLayoutEntry, LabelInstance, Options, Page, Record};

use crate::columns::{ColumnRules, label_columns};
use crate::error::{Result, status_message};
use crate::expand::expand_records;
use crate::paginate::paginate;
use crate::reconcile::{layout_matches, reconcile_layout};

/// Output of a successful pipeline pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformOutput {
    pub labels: Vec<LabelInstance>,
    pub row_indices: Vec<usize>,
    pub available_columns: Vec<String>,
    pub column_layout: Vec<ColumnLayoutEntry>,
    /// The reconciled layout differs from the stored one and should be persisted.
    pub layout_changed: bool,
}

/// Run column selection, layout reconciliation and expansion.
///
/// # Errors
///
/// Returns [`crate::TransformError::NoData`] or
/// [`crate::TransformError::NoColumnsSelected`].
pub fn transform(records: &[Record], options: &Options, rules: &ColumnRules) -> Result<TransformOutput> {
    let available_columns = label_columns(records, rules)?;
    let defaults = options.default_formatting();
    let column_layout = reconcile_layout(&available_columns, &options.column_config, &defaults);
    let layout_changed = !layout_matches(&options.column_config, &column_layout);

    let expansion = expand_records(
        records,
        &available_columns,
        &column_layout,
        &defaults,
        &rules.count_column,
    );

    Ok(TransformOutput {
        labels: expansion.labels,
        row_indices: expansion.row_indices,
        available_columns,
        column_layout,
        layout_changed,
    })
}

/// Pipeline result as seen by the rendering layer.
///
/// Errors never escape: on failure `output` is `None` (nothing stale is
/// shown) and `status` carries the message. `status` is empty when healthy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineResult {
    pub output: Option<TransformOutput>,
    pub status: String,
}

impl PipelineResult {
    pub fn labels(&self) -> Option<&[LabelInstance]> {
        self.output.as_ref().map(|o| o.labels.as_slice())
    }

    pub fn is_ok(&self) -> bool {
        self.status.is_empty()
    }

    /// Paginate the labels for the given options' template and blanks.
    pub fn pages(&self, options: &Options) -> Vec<Page<&LabelInstance>> {
        paginate(
            self.labels().unwrap_or_default(),
            options.template().per_page,
            options.blanks,
        )
    }
}

/// Run [`transform`], converting any error into a status message.
pub fn run_pipeline(records: &[Record], options: &Options, rules: &ColumnRules) -> PipelineResult {
    let _span = tracing::debug_span!("pipeline", records = records.len()).entered();
    match transform(records, options, rules) {
        Ok(output) => {
            tracing::debug!(
                labels = output.labels.len(),
                columns = output.available_columns.len(),
                layout_changed = output.layout_changed,
                "pipeline completed"
            );
            PipelineResult {
                output: Some(output),
                status: String::new(),
            }
        }
        Err(error) => {
            tracing::info!(%error, "pipeline produced no labels");
            PipelineResult {
                output: None,
                status: status_message(&error),
            }
        }
    }
}
