//! Edit session errors.

use thiserror::Error;

/// Rejected position or formatting edit.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum EditError {
    #[error("a drag is already in progress")]
    DragInProgress,

    #[error("no drag is in progress")]
    NotDragging,

    #[error("no field is selected")]
    NothingSelected,

    #[error("label {label_index} has no field '{column_id}'")]
    UnknownField {
        label_index: usize,
        column_id: String,
    },

    #[error("bounding box must have a positive width and height")]
    InvalidBounds,

    #[error("there are no labels to edit")]
    NoLabels,
}

pub type Result<T> = std::result::Result<T, EditError>;
