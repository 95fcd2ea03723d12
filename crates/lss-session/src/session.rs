//! The per-widget session controller.

use std::cell::{Ref, RefCell};

use serde_json::Value;

use lss_model::{
    ColumnLayoutEntry, Formatting, LabelInstance, Options, Page, Position, Record,
    StoredColumnEntry, keys,
};
use lss_persistence::OptionSink;
use lss_transform::{ColumnRules, PipelineResult, paginate, run_pipeline};

use crate::editor::{
    BoundingBox, DragCommit, EditState, FieldRef, FormattingEdit, Point, PositionEditSession,
};
use crate::error::{EditError, Result};
use crate::guard::ReentrancyGuard;
use crate::scale::PageScale;

/// Outcome of a pipeline trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineRun {
    Completed,
    /// Another pass was in progress; this trigger was dropped.
    Skipped,
    /// A drag is in progress. The change was kept and the pass runs when
    /// the drag ends.
    Deferred,
}

#[derive(Debug, Default)]
struct SessionState {
    records: Vec<Record>,
    options: Options,
    result: Option<PipelineResult>,
    editor: PositionEditSession,
    /// A pass was held back by an active drag.
    refresh_pending: bool,
}

/// Owns everything one label widget needs between host notifications.
///
/// Host callbacks ([`on_records`](Self::on_records),
/// [`on_options`](Self::on_options)) re-run the pipeline. Option writes go
/// through the [`OptionSink`], which may notify this session again while a
/// pass is running; such nested triggers are skipped by the
/// [`ReentrancyGuard`]. Changes arriving during a drag are kept but the
/// pass is deferred until the drag ends, so the dragged layout is not
/// re-expanded under the pointer.
pub struct LabelSession {
    sink: Box<dyn OptionSink>,
    rules: ColumnRules,
    guard: ReentrancyGuard,
    page_scale: PageScale,
    state: RefCell<SessionState>,
}

impl std::fmt::Debug for LabelSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LabelSession")
            .field("rules", &self.rules)
            .field("guard", &self.guard)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl LabelSession {
    pub fn new(sink: impl OptionSink + 'static, rules: ColumnRules) -> Self {
        Self {
            sink: Box::new(sink),
            rules,
            guard: ReentrancyGuard::new(),
            page_scale: PageScale::default(),
            state: RefCell::new(SessionState::default()),
        }
    }

    pub fn rules(&self) -> &ColumnRules {
        &self.rules
    }

    /// The record set changed.
    pub fn on_records(&self, records: Vec<Record>) -> PipelineRun {
        let Some(_latch) = self.guard.try_enter() else {
            tracing::debug!("records changed during pipeline pass, skipped");
            return PipelineRun::Skipped;
        };
        self.state.borrow_mut().records = records;
        self.run_or_defer()
    }

    /// The stored configuration changed. `None` reverts to defaults.
    ///
    /// Formatting edited in the editor but not yet saved is kept on top of
    /// the new configuration.
    pub fn on_options(&self, stored: Option<&Value>) -> PipelineRun {
        let Some(_latch) = self.guard.try_enter() else {
            tracing::debug!("options changed during pipeline pass, skipped");
            return PipelineRun::Skipped;
        };
        {
            let mut state = self.state.borrow_mut();
            let state = &mut *state;
            state.options = Options::from_stored(stored);
            if let Some((column, formatting)) = state.editor.unsaved_formatting() {
                overlay_formatting(&mut state.options.column_config, column, formatting);
            }
        }
        self.run_or_defer()
    }

    /// Run the pipeline over the current records and options.
    ///
    /// When reconciliation changed the layout, `columnConfig` is written
    /// back through the sink before the latch is released.
    pub fn refresh(&self) -> PipelineRun {
        let Some(_latch) = self.guard.try_enter() else {
            tracing::debug!("pipeline already running, skipped");
            return PipelineRun::Skipped;
        };
        self.run_or_defer()
    }

    /// One pipeline pass, or a deferred one while dragging. The latch must
    /// be held.
    fn run_or_defer(&self) -> PipelineRun {
        let write_back = {
            let mut state = self.state.borrow_mut();
            let state = &mut *state;
            if state.editor.is_dragging() {
                tracing::debug!("drag in progress, pipeline pass deferred");
                state.refresh_pending = true;
                return PipelineRun::Deferred;
            }
            state.refresh_pending = false;
            let result = run_pipeline(&state.records, &state.options, &self.rules);

            let write_back = result
                .output
                .as_ref()
                .filter(|output| output.layout_changed)
                .map(|output| stored_layout(&output.column_layout));
            if let Some(layout) = &write_back {
                state.options.column_config.clone_from(layout);
            }

            state
                .editor
                .revalidate(result.labels().unwrap_or_default());
            state.result = Some(result);
            write_back
        };

        if let Some(layout) = write_back {
            tracing::debug!(entries = layout.len(), "persisting reconciled column layout");
            self.persist(keys::COLUMN_CONFIG, layout_value(&layout));
        }
        PipelineRun::Completed
    }

    /// Run a pass that a drag held back, if any.
    fn run_pending(&self) {
        let pending = std::mem::take(&mut self.state.borrow_mut().refresh_pending);
        if pending {
            tracing::debug!("running deferred pipeline pass");
            self.refresh();
        }
    }

    /// Adopt `options`, write every key through the sink, and re-run.
    ///
    /// Sink failures are logged and do not stop the remaining writes.
    pub fn save_options(&self, options: Options) -> PipelineRun {
        let entries = options.entries();
        self.state.borrow_mut().options = options;
        for (key, value) in entries {
            self.persist(key, value);
        }
        self.refresh()
    }

    /// Toggle the visual editor. Leaving it persists the layout and re-runs
    /// the pipeline.
    pub fn set_editor_mode(&self, enabled: bool) -> PipelineRun {
        {
            let mut state = self.state.borrow_mut();
            state.options.visual_editor_mode = enabled;
            if !enabled {
                state.editor.close();
            }
        }
        self.persist(keys::VISUAL_EDITOR_MODE, Value::Bool(enabled));
        if enabled {
            return PipelineRun::Completed;
        }
        self.persist_layout();
        self.refresh()
    }

    /// Status line: empty when healthy.
    pub fn status(&self) -> String {
        self.state
            .borrow()
            .result
            .as_ref()
            .map(|r| r.status.clone())
            .unwrap_or_default()
    }

    pub fn options(&self) -> Ref<'_, Options> {
        Ref::map(self.state.borrow(), |s| &s.options)
    }

    /// The last pipeline result, if the pipeline has run.
    pub fn result(&self) -> Option<Ref<'_, PipelineResult>> {
        Ref::filter_map(self.state.borrow(), |s| s.result.as_ref()).ok()
    }

    /// Current labels; `None` when the last pass failed or none ran.
    pub fn labels(&self) -> Option<Vec<LabelInstance>> {
        self.result()?.labels().map(<[LabelInstance]>::to_vec)
    }

    pub fn row_indices(&self) -> Vec<usize> {
        self.result()
            .and_then(|r| r.output.as_ref().map(|o| o.row_indices.clone()))
            .unwrap_or_default()
    }

    pub fn column_layout(&self) -> Vec<ColumnLayoutEntry> {
        self.result()
            .and_then(|r| r.output.as_ref().map(|o| o.column_layout.clone()))
            .unwrap_or_default()
    }

    /// Current labels paginated with the current template and blanks.
    pub fn pages(&self) -> Vec<Page> {
        let state = self.state.borrow();
        let labels = state
            .result
            .as_ref()
            .and_then(PipelineResult::labels)
            .unwrap_or_default();
        paginate(
            labels.iter().cloned(),
            state.options.template().per_page,
            state.options.blanks,
        )
    }

    /// Scale factor for fitting the page into the viewport.
    pub fn update_page_scale(&self, measured_page_width: f64, viewport_width: f64) -> Option<f64> {
        self.page_scale.update(measured_page_width, viewport_width)
    }

    pub fn edit_state(&self) -> EditState {
        self.state.borrow().editor.state().clone()
    }

    pub fn select_field(&self, field: FieldRef) -> Result<()> {
        let mut state = self.state.borrow_mut();
        let state = &mut *state;
        let labels = state
            .result
            .as_ref()
            .and_then(PipelineResult::labels)
            .ok_or(EditError::NoLabels)?;
        state.editor.select(field, labels)
    }

    pub fn deselect_field(&self) {
        self.state.borrow_mut().editor.deselect();
    }

    pub fn begin_drag(&self, field: FieldRef, bounds: BoundingBox, pointer: Point) -> Result<()> {
        let mut state = self.state.borrow_mut();
        let state = &mut *state;
        let labels = state
            .result
            .as_ref()
            .and_then(PipelineResult::labels)
            .ok_or(EditError::NoLabels)?;
        state.editor.begin_drag(field, bounds, pointer, labels)
    }

    pub fn drag_to(&self, pointer: Point) -> Result<Position> {
        let mut state = self.state.borrow_mut();
        let state = &mut *state;
        let output = state
            .result
            .as_mut()
            .and_then(|r| r.output.as_mut())
            .ok_or(EditError::NoLabels)?;
        state
            .editor
            .drag_to(pointer, &mut output.labels, &mut output.column_layout)
    }

    /// Release the drag, persist the new layout, then run any pass the
    /// drag held back.
    pub fn end_drag(&self) -> Result<DragCommit> {
        let commit = {
            let mut state = self.state.borrow_mut();
            let state = &mut *state;
            let layout = state
                .result
                .as_ref()
                .and_then(|r| r.output.as_ref())
                .map(|o| o.column_layout.as_slice())
                .unwrap_or_default();
            state.editor.end_drag(layout)?
        };
        self.persist_layout();
        self.run_pending();
        Ok(commit)
    }

    pub fn edit_formatting(&self, edit: &FormattingEdit) -> Result<()> {
        if edit.is_empty() {
            return Ok(());
        }
        let mut state = self.state.borrow_mut();
        let state = &mut *state;
        let output = state
            .result
            .as_mut()
            .and_then(|r| r.output.as_mut())
            .ok_or(EditError::NoLabels)?;
        state
            .editor
            .edit_formatting(edit, &mut output.labels, &mut output.column_layout)?;
        // A re-run before the save reconciles from this config.
        if let Some(selected) = state.editor.selection() {
            overlay_formatting(
                &mut state.options.column_config,
                &selected.field.column_id,
                &selected.formatting,
            );
        }
        Ok(())
    }

    /// Finish formatting the selected field and persist the layout.
    pub fn save_formatting(&self) -> Result<String> {
        let column = self.state.borrow_mut().editor.save_formatting()?;
        self.persist_layout();
        Ok(column)
    }

    /// Close the editor. An abandoned drag keeps the stored layout; a pass
    /// it held back runs now.
    pub fn close_editor(&self) {
        {
            let mut state = self.state.borrow_mut();
            if state.editor.is_dragging() {
                state.refresh_pending = true;
            }
            state.editor.close();
        }
        self.run_pending();
    }

    /// Copy the live layout into the options and write `columnConfig`.
    fn persist_layout(&self) {
        let layout = {
            let mut state = self.state.borrow_mut();
            let Some(layout) = state
                .result
                .as_ref()
                .and_then(|r| r.output.as_ref())
                .map(|o| stored_layout(&o.column_layout))
            else {
                return;
            };
            state.options.column_config.clone_from(&layout);
            layout
        };
        self.persist(keys::COLUMN_CONFIG, layout_value(&layout));
    }

    /// Fire-and-forget write. The state must not be borrowed here: the sink
    /// may call back into this session.
    fn persist(&self, key: &str, value: Value) {
        if let Err(error) = self.sink.set_option(key, value) {
            tracing::warn!(key, %error, detail = %error.user_message(), "failed to persist option");
        }
    }
}

fn stored_layout(layout: &[ColumnLayoutEntry]) -> Vec<StoredColumnEntry> {
    layout.iter().cloned().map(StoredColumnEntry::from).collect()
}

fn overlay_formatting(config: &mut [StoredColumnEntry], column: &str, formatting: &Formatting) {
    for entry in config.iter_mut().filter(|e| e.name() == Some(column)) {
        entry.set_formatting(formatting.clone());
    }
}

fn layout_value(layout: &[StoredColumnEntry]) -> Value {
    serde_json::to_value(layout).unwrap_or_else(|error| {
        tracing::warn!(%error, "column layout not serializable, persisting empty list");
        Value::Array(Vec::new())
    })
}
