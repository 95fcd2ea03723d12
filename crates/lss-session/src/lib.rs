//! Label sheet session controller.
//!
//! A [`LabelSession`] is created once per widget and receives the host's
//! change notifications. It owns the state that would otherwise be global:
//!
//! - the [`ReentrancyGuard`] around the pipeline,
//! - the cached page width behind [`PageScale`],
//! - the current records, options and pipeline result,
//! - the [`PositionEditSession`] for drag and formatting edits.

mod editor;
mod error;
mod guard;
mod scale;
mod session;

pub use editor::{
    BoundingBox, DragCommit, DragSession, EditState, FieldRef, FormattingEdit, Point,
    PositionEditSession, SelectedField,
};
pub use error::{EditError, Result};
pub use guard::{GuardLatch, ReentrancyGuard};
pub use scale::PageScale;
pub use session::{LabelSession, PipelineRun};
