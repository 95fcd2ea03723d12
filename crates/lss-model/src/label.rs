//! Derived label data. Recomputed on every pipeline pass, never persisted.

use serde::{Deserialize, Serialize};

use crate::layout::{Formatting, Position};
use crate::value::{CellValue, RowId};

/// Display type inferred from a raw value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FieldType {
    Numeric,
    Date,
    #[default]
    Text,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Numeric => "Numeric",
            Self::Date => "Date",
            Self::Text => "Text",
        }
    }
}

/// One column's value on one label instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub name: String,
    pub value: CellValue,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub column_id: String,
    pub row_id: RowId,
    pub position: Position,
    pub formatting: Formatting,
}

/// One printable label bound to one repeat of one source record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelInstance {
    pub fields: Vec<Field>,
    /// Index of the source record in the input sequence.
    pub row_index: usize,
    pub row_id: RowId,
}

impl LabelInstance {
    pub fn field(&self, column_id: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.column_id == column_id)
    }

    pub fn field_mut(&mut self, column_id: &str) -> Option<&mut Field> {
        self.fields.iter_mut().find(|f| f.column_id == column_id)
    }
}

/// One sheet: a fixed number of slots, `None` marking a blank slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Page<T = LabelInstance> {
    pub slots: Vec<Option<T>>,
}

impl<T> Page<T> {
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Filled slots in order.
    pub fn labels(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().flatten()
    }

    pub fn blank_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_none()).count()
    }
}
