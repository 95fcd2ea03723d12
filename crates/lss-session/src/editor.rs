//! Interactive position and formatting editing.
//!
//! [`PositionEditSession`] is an explicit state machine:
//!
//! ```text
//!  Idle ──select──▶ Selected ──deselect / save_formatting / close──▶ Idle
//!   │                  │
//!   └──begin_drag──────┴──▶ Dragging ──drag_to──▶ Dragging
//!                              │
//!                              └──end_drag (commit)──▶ Idle
//! ```
//!
//! It holds no labels itself. Every transition that changes layout takes the
//! current labels and reconciled layout by mutable reference and writes
//! through to both, so views stay consistent without a re-expansion pass.

use serde::Serialize;

use lss_model::{ColumnLayoutEntry, FontWeight, Formatting, LabelInstance, Position, TextAlign};

use crate::error::{EditError, Result};

/// Identifies one field on one label instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldRef {
    pub label_index: usize,
    pub column_id: String,
}

impl FieldRef {
    pub fn new(label_index: usize, column_id: impl Into<String>) -> Self {
        Self {
            label_index,
            column_id: column_id.into(),
        }
    }
}

/// Pointer coordinates in the host's screen units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Screen rectangle of the label instance being edited.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    fn is_valid(&self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }
}

/// The field shown in the formatting panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedField {
    pub field: FieldRef,
    pub position: Position,
    pub formatting: Formatting,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DragSession {
    pub field: FieldRef,
    pub bounds: BoundingBox,
    pub start_pointer: Point,
    pub start_position: Position,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum EditState {
    #[default]
    Idle,
    Selected(SelectedField),
    /// A drag keeps any selection that was active when it started.
    Dragging {
        drag: DragSession,
        selection: Option<SelectedField>,
    },
}

/// Result of releasing a drag: the position to persist.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DragCommit {
    pub column_id: String,
    pub position: Position,
}

/// A partial formatting change. `None` fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormattingEdit {
    pub font_size: Option<f64>,
    pub color: Option<String>,
    pub align: Option<TextAlign>,
    pub font_weight: Option<FontWeight>,
}

impl FormattingEdit {
    pub fn is_empty(&self) -> bool {
        self.font_size.is_none()
            && self.color.is_none()
            && self.align.is_none()
            && self.font_weight.is_none()
    }

    pub fn apply(&self, formatting: &mut Formatting) {
        if let Some(size) = self.font_size {
            formatting.font_size = size;
        }
        if let Some(color) = &self.color {
            formatting.color.clone_from(color);
        }
        if let Some(align) = self.align {
            formatting.align = align;
        }
        if let Some(weight) = self.font_weight {
            formatting.font_weight = weight;
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PositionEditSession {
    state: EditState,
    /// The selection's formatting differs from what was last saved.
    formatting_edited: bool,
}

impl PositionEditSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &EditState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, EditState::Dragging { .. })
    }

    pub fn selection(&self) -> Option<&SelectedField> {
        match &self.state {
            EditState::Idle => None,
            EditState::Selected(selected) => Some(selected),
            EditState::Dragging { selection, .. } => selection.as_ref(),
        }
    }

    /// Column and formatting of a selection edited since it was saved.
    pub fn unsaved_formatting(&self) -> Option<(&str, &Formatting)> {
        if !self.formatting_edited {
            return None;
        }
        self.selection()
            .map(|s| (s.field.column_id.as_str(), &s.formatting))
    }

    /// Select a field for formatting. Refused while dragging.
    pub fn select(&mut self, field: FieldRef, labels: &[LabelInstance]) -> Result<()> {
        if self.is_dragging() {
            return Err(EditError::DragInProgress);
        }
        let resolved = resolve(labels, &field)?;
        tracing::debug!(label = field.label_index, column = %field.column_id, "field selected");
        self.formatting_edited = false;
        self.state = EditState::Selected(SelectedField {
            position: resolved.position,
            formatting: resolved.formatting.clone(),
            field,
        });
        Ok(())
    }

    /// Drop the selection. An active drag continues without it.
    pub fn deselect(&mut self) {
        self.formatting_edited = false;
        match &mut self.state {
            EditState::Dragging { selection, .. } => *selection = None,
            state => *state = EditState::Idle,
        }
    }

    /// Start dragging `field` inside `bounds` from `pointer`.
    pub fn begin_drag(
        &mut self,
        field: FieldRef,
        bounds: BoundingBox,
        pointer: Point,
        labels: &[LabelInstance],
    ) -> Result<()> {
        if self.is_dragging() {
            return Err(EditError::DragInProgress);
        }
        if !bounds.is_valid() {
            return Err(EditError::InvalidBounds);
        }
        let start_position = resolve(labels, &field)?.position;

        let selection = match std::mem::take(&mut self.state) {
            EditState::Selected(selected) => Some(selected),
            _ => None,
        };
        tracing::debug!(label = field.label_index, column = %field.column_id, "drag started");
        self.state = EditState::Dragging {
            drag: DragSession {
                field,
                bounds,
                start_pointer: pointer,
                start_position,
            },
            selection,
        };
        Ok(())
    }

    /// Move the dragged field with the pointer.
    ///
    /// The pointer delta is converted to percent of the bounding box and
    /// added to the starting position, clamped to `[0, 100]`. The new
    /// position is written to every label's field of that column, to the
    /// column's layout entry and to a selection of the same column.
    pub fn drag_to(
        &mut self,
        pointer: Point,
        labels: &mut [LabelInstance],
        layout: &mut [ColumnLayoutEntry],
    ) -> Result<Position> {
        let EditState::Dragging { drag, selection } = &mut self.state else {
            return Err(EditError::NotDragging);
        };

        let position = Position::new(
            drag.start_position.x + (pointer.x - drag.start_pointer.x) / drag.bounds.width * 100.0,
            drag.start_position.y + (pointer.y - drag.start_pointer.y) / drag.bounds.height * 100.0,
        )
        .clamped();

        let column = drag.field.column_id.as_str();
        for field in labels.iter_mut().filter_map(|l| l.field_mut(column)) {
            field.position = position;
        }
        if let Some(entry) = layout.iter_mut().find(|e| e.name == column) {
            entry.position = position;
        }
        if let Some(selected) = selection.as_mut().filter(|s| s.field.column_id == column) {
            selected.position = position;
        }
        Ok(position)
    }

    /// Release the drag and return the position to persist.
    pub fn end_drag(&mut self, layout: &[ColumnLayoutEntry]) -> Result<DragCommit> {
        let EditState::Dragging { drag, .. } = std::mem::take(&mut self.state) else {
            return Err(EditError::NotDragging);
        };
        let column_id = drag.field.column_id;
        let position = layout
            .iter()
            .find(|e| e.name == column_id)
            .map_or(drag.start_position, |e| e.position);
        tracing::debug!(column = %column_id, x = position.x, y = position.y, "drag committed");
        Ok(DragCommit {
            column_id,
            position,
        })
    }

    /// Apply a live formatting change to the selected column.
    ///
    /// The change lands on the layout entry and is copied to every label
    /// instance showing that column.
    pub fn edit_formatting(
        &mut self,
        edit: &FormattingEdit,
        labels: &mut [LabelInstance],
        layout: &mut [ColumnLayoutEntry],
    ) -> Result<()> {
        let selected = match &mut self.state {
            EditState::Selected(selected) => selected,
            EditState::Dragging {
                selection: Some(selected),
                ..
            } => selected,
            _ => return Err(EditError::NothingSelected),
        };

        edit.apply(&mut selected.formatting);
        self.formatting_edited = true;
        let column = selected.field.column_id.as_str();
        if let Some(entry) = layout.iter_mut().find(|e| e.name == column) {
            entry.formatting.clone_from(&selected.formatting);
        }
        for field in labels.iter_mut().filter_map(|l| l.field_mut(column)) {
            field.formatting.clone_from(&selected.formatting);
        }
        Ok(())
    }

    /// Finish formatting the selected field and return its column.
    pub fn save_formatting(&mut self) -> Result<String> {
        match std::mem::take(&mut self.state) {
            EditState::Selected(selected) => {
                self.formatting_edited = false;
                Ok(selected.field.column_id)
            }
            other => {
                let error = if matches!(other, EditState::Dragging { .. }) {
                    EditError::DragInProgress
                } else {
                    EditError::NothingSelected
                };
                self.state = other;
                Err(error)
            }
        }
    }

    /// Close the editor, abandoning any selection or unreleased drag.
    pub fn close(&mut self) {
        if self.is_dragging() {
            tracing::debug!("editor closed during drag");
        }
        self.formatting_edited = false;
        self.state = EditState::Idle;
    }

    /// Drop state that no longer refers to an existing field.
    pub(crate) fn revalidate(&mut self, labels: &[LabelInstance]) {
        let stale = match &self.state {
            EditState::Idle => false,
            EditState::Selected(selected) => resolve(labels, &selected.field).is_err(),
            EditState::Dragging { drag, .. } => resolve(labels, &drag.field).is_err(),
        };
        if stale {
            tracing::debug!("edit target disappeared, returning to idle");
            self.formatting_edited = false;
            self.state = EditState::Idle;
        }
    }
}

fn resolve<'a>(labels: &'a [LabelInstance], field: &FieldRef) -> Result<&'a lss_model::Field> {
    labels
        .get(field.label_index)
        .and_then(|label| label.field(&field.column_id))
        .ok_or_else(|| EditError::UnknownField {
            label_index: field.label_index,
            column_id: field.column_id.clone(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lss_model::{CellValue, Field, FieldType, RowId};

    fn formatting() -> Formatting {
        Formatting {
            font_size: 11.0,
            color: "#000000".to_string(),
            align: TextAlign::Left,
            font_weight: FontWeight::Normal,
        }
    }

    fn fixture() -> (Vec<LabelInstance>, Vec<ColumnLayoutEntry>) {
        let columns = ["Name", "City"];
        let layout: Vec<ColumnLayoutEntry> = columns
            .iter()
            .enumerate()
            .map(|(i, c)| ColumnLayoutEntry::new(*c, Position::stacked(i), formatting()))
            .collect();
        let labels = (0..3)
            .map(|row| LabelInstance {
                fields: layout
                    .iter()
                    .map(|entry| Field {
                        name: entry.name.clone(),
                        value: CellValue::text("x"),
                        field_type: FieldType::Text,
                        column_id: entry.name.clone(),
                        row_id: RowId(row),
                        position: entry.position,
                        formatting: entry.formatting.clone(),
                    })
                    .collect(),
                row_index: row as usize,
                row_id: RowId(row),
            })
            .collect();
        (labels, layout)
    }

    fn bounds() -> BoundingBox {
        BoundingBox::new(0.0, 0.0, 200.0, 100.0)
    }

    #[test]
    fn test_select_unknown_field() {
        let (labels, _) = fixture();
        let mut editor = PositionEditSession::new();
        let err = editor.select(FieldRef::new(9, "Name"), &labels).unwrap_err();
        assert!(matches!(err, EditError::UnknownField { label_index: 9, .. }));
        assert_eq!(editor.state(), &EditState::Idle);
    }

    #[test]
    fn test_drag_moves_every_instance_and_layout() {
        let (mut labels, mut layout) = fixture();
        let mut editor = PositionEditSession::new();
        editor
            .begin_drag(FieldRef::new(1, "City"), bounds(), Point::new(10.0, 10.0), &labels)
            .unwrap();

        let position = editor
            .drag_to(Point::new(30.0, 20.0), &mut labels, &mut layout)
            .unwrap();
        assert_eq!(position, Position::new(15.0, 30.0));
        assert!(labels.iter().all(|l| l.field("City").unwrap().position == position));
        assert_eq!(layout[1].position, position);
        assert_eq!(layout[0].position, Position::stacked(0));

        let commit = editor.end_drag(&layout).unwrap();
        assert_eq!(commit.column_id, "City");
        assert_eq!(commit.position, position);
        assert_eq!(editor.state(), &EditState::Idle);
    }

    #[test]
    fn test_drag_clamps_to_label_box() {
        let (mut labels, mut layout) = fixture();
        let mut editor = PositionEditSession::new();
        editor
            .begin_drag(FieldRef::new(0, "Name"), bounds(), Point::new(0.0, 0.0), &labels)
            .unwrap();
        let position = editor
            .drag_to(Point::new(-500.0, 900.0), &mut labels, &mut layout)
            .unwrap();
        assert_eq!(position, Position::new(0.0, 100.0));
    }

    #[test]
    fn test_second_drag_refused() {
        let (labels, _) = fixture();
        let mut editor = PositionEditSession::new();
        editor
            .begin_drag(FieldRef::new(0, "Name"), bounds(), Point::new(0.0, 0.0), &labels)
            .unwrap();
        let err = editor
            .begin_drag(FieldRef::new(1, "City"), bounds(), Point::new(0.0, 0.0), &labels)
            .unwrap_err();
        assert_eq!(err, EditError::DragInProgress);
        assert_eq!(
            editor.select(FieldRef::new(0, "City"), &labels),
            Err(EditError::DragInProgress)
        );
    }

    #[test]
    fn test_degenerate_bounds_refused() {
        let (labels, _) = fixture();
        let mut editor = PositionEditSession::new();
        let err = editor
            .begin_drag(
                FieldRef::new(0, "Name"),
                BoundingBox::new(0.0, 0.0, 0.0, 10.0),
                Point::new(0.0, 0.0),
                &labels,
            )
            .unwrap_err();
        assert_eq!(err, EditError::InvalidBounds);
        assert!(!editor.is_dragging());
    }

    #[test]
    fn test_drag_updates_matching_selection() {
        let (mut labels, mut layout) = fixture();
        let mut editor = PositionEditSession::new();
        editor.select(FieldRef::new(2, "Name"), &labels).unwrap();
        editor
            .begin_drag(FieldRef::new(0, "Name"), bounds(), Point::new(0.0, 0.0), &labels)
            .unwrap();
        editor
            .drag_to(Point::new(20.0, 0.0), &mut labels, &mut layout)
            .unwrap();
        assert_eq!(editor.selection().unwrap().position, Position::new(15.0, 5.0));
    }

    #[test]
    fn test_formatting_propagates_to_column() {
        let (mut labels, mut layout) = fixture();
        let mut editor = PositionEditSession::new();
        editor.select(FieldRef::new(0, "Name"), &labels).unwrap();
        assert!(editor.unsaved_formatting().is_none());

        let edit = FormattingEdit {
            font_size: Some(14.0),
            font_weight: Some(FontWeight::Bold),
            ..FormattingEdit::default()
        };
        editor.edit_formatting(&edit, &mut labels, &mut layout).unwrap();

        assert!(labels.iter().all(|l| {
            let f = &l.field("Name").unwrap().formatting;
            f.font_size == 14.0 && f.font_weight == FontWeight::Bold
        }));
        assert_eq!(layout[0].formatting.font_size, 14.0);
        assert_eq!(layout[1].formatting, formatting());
        let (column, unsaved) = editor.unsaved_formatting().unwrap();
        assert_eq!(column, "Name");
        assert_eq!(unsaved.font_weight, FontWeight::Bold);

        assert_eq!(editor.save_formatting().unwrap(), "Name");
        assert!(editor.unsaved_formatting().is_none());
        assert_eq!(editor.state(), &EditState::Idle);
    }

    #[test]
    fn test_formatting_requires_selection() {
        let (mut labels, mut layout) = fixture();
        let mut editor = PositionEditSession::new();
        let err = editor
            .edit_formatting(&FormattingEdit::default(), &mut labels, &mut layout)
            .unwrap_err();
        assert_eq!(err, EditError::NothingSelected);
        assert_eq!(editor.save_formatting(), Err(EditError::NothingSelected));
    }

    #[test]
    fn test_close_abandons_drag() {
        let (labels, _) = fixture();
        let mut editor = PositionEditSession::new();
        editor
            .begin_drag(FieldRef::new(0, "Name"), bounds(), Point::new(0.0, 0.0), &labels)
            .unwrap();
        editor.close();
        assert_eq!(editor.state(), &EditState::Idle);
    }

    #[test]
    fn test_revalidate_drops_missing_target() {
        let (labels, _) = fixture();
        let mut editor = PositionEditSession::new();
        editor.select(FieldRef::new(2, "City"), &labels).unwrap();
        editor.revalidate(&labels[..1]);
        assert_eq!(editor.state(), &EditState::Idle);
    }
}
