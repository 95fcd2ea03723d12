//! Persisted widget configuration.
//!
//! Options are stored key by key (see [`keys`]). Loading is lenient: a key
//! that is missing, falsy or of the wrong type falls back to its default,
//! and an absent configuration object reverts everything to defaults.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::layout::{FontWeight, Formatting, StoredColumnEntry, TextAlign};
use crate::template::{DEFAULT_TEMPLATE_ID, Template, default_template, find_template};

/// Names under which options are persisted.
pub mod keys {
    pub const TEMPLATE: &str = "template";
    pub const BLANKS: &str = "blanks";
    pub const FONT_SIZE: &str = "fontSize";
    pub const FONT_COLOR: &str = "fontColor";
    pub const TEXT_ALIGN: &str = "textAlign";
    pub const LINE_SPACING: &str = "lineSpacing";
    pub const SEPARATOR: &str = "separator";
    pub const SHOW_FIELD_NAMES: &str = "showFieldNames";
    pub const COLUMN_CONFIG: &str = "columnConfig";
    pub const VISUAL_EDITOR_MODE: &str = "visualEditorMode";
}

const DEFAULT_FONT_SIZE: f64 = 11.0;
const DEFAULT_FONT_COLOR: &str = "#000000";
const DEFAULT_LINE_SPACING: f64 = 1.2;
const DEFAULT_SEPARATOR: &str = ", ";

/// Widget configuration snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Options {
    /// Id of the selected [`Template`].
    #[serde(rename = "template")]
    pub template_id: String,
    /// Number of slots left blank before the first label.
    pub blanks: usize,
    pub font_size: f64,
    pub font_color: String,
    pub text_align: TextAlign,
    pub line_spacing: f64,
    pub separator: String,
    pub show_field_names: bool,
    pub column_config: Vec<StoredColumnEntry>,
    pub visual_editor_mode: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            template_id: DEFAULT_TEMPLATE_ID.to_string(),
            blanks: 0,
            font_size: DEFAULT_FONT_SIZE,
            font_color: DEFAULT_FONT_COLOR.to_string(),
            text_align: TextAlign::Left,
            line_spacing: DEFAULT_LINE_SPACING,
            separator: DEFAULT_SEPARATOR.to_string(),
            show_field_names: false,
            column_config: Vec::new(),
            visual_editor_mode: false,
        }
    }
}

impl Options {
    /// Build options from a stored configuration object.
    ///
    /// `None`, or anything that is not a JSON object, means "revert to defaults".
    pub fn from_stored(stored: Option<&Value>) -> Self {
        let Some(map) = stored.and_then(Value::as_object) else {
            return Self::default();
        };
        let defaults = Self::default();

        let template_id = match string_option(map, keys::TEMPLATE) {
            Some(id) if find_template(&id).is_some() => id,
            Some(id) => {
                tracing::debug!(template = %id, "unknown template id, using default");
                defaults.template_id
            }
            None => defaults.template_id,
        };

        Self {
            template_id,
            blanks: number_option(map, keys::BLANKS)
                .filter(|n| *n > 0.0)
                .map_or(defaults.blanks, |n| n.trunc() as usize),
            font_size: number_option(map, keys::FONT_SIZE).unwrap_or(defaults.font_size),
            font_color: string_option(map, keys::FONT_COLOR).unwrap_or(defaults.font_color),
            text_align: string_option(map, keys::TEXT_ALIGN)
                .and_then(|s| TextAlign::parse(&s))
                .unwrap_or(defaults.text_align),
            line_spacing: number_option(map, keys::LINE_SPACING).unwrap_or(defaults.line_spacing),
            separator: string_option(map, keys::SEPARATOR).unwrap_or(defaults.separator),
            show_field_names: map
                .get(keys::SHOW_FIELD_NAMES)
                .and_then(Value::as_bool)
                .unwrap_or(defaults.show_field_names),
            column_config: column_config_option(map),
            visual_editor_mode: map
                .get(keys::VISUAL_EDITOR_MODE)
                .and_then(Value::as_bool)
                .unwrap_or(defaults.visual_editor_mode),
        }
    }

    /// The selected template, falling back to the default one.
    pub fn template(&self) -> &'static Template {
        find_template(&self.template_id).unwrap_or_else(default_template)
    }

    /// Global formatting inherited by columns without their own style.
    pub fn default_formatting(&self) -> Formatting {
        Formatting {
            font_size: self.font_size,
            color: self.font_color.clone(),
            align: self.text_align,
            font_weight: FontWeight::Normal,
        }
    }

    /// The stored column layout as a JSON value, ready to persist.
    pub fn column_config_value(&self) -> Value {
        serde_json::to_value(&self.column_config).unwrap_or(Value::Array(Vec::new()))
    }

    /// Every persisted option as `(key, value)` pairs, in save order.
    pub fn entries(&self) -> Vec<(&'static str, Value)> {
        vec![
            (keys::TEMPLATE, Value::from(self.template_id.clone())),
            (keys::BLANKS, Value::from(self.blanks)),
            (keys::FONT_SIZE, Value::from(self.font_size)),
            (keys::FONT_COLOR, Value::from(self.font_color.clone())),
            (keys::TEXT_ALIGN, Value::from(self.text_align.as_str())),
            (keys::LINE_SPACING, Value::from(self.line_spacing)),
            (keys::SEPARATOR, Value::from(self.separator.clone())),
            (keys::SHOW_FIELD_NAMES, Value::from(self.show_field_names)),
            (keys::COLUMN_CONFIG, self.column_config_value()),
            (keys::VISUAL_EDITOR_MODE, Value::from(self.visual_editor_mode)),
        ]
    }
}

/// Non-empty string option.
fn string_option(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Non-zero finite numeric option; numeric strings are accepted too.
fn number_option(map: &Map<String, Value>, key: &str) -> Option<f64> {
    let value = match map.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    (value.is_finite() && value != 0.0).then_some(value)
}

fn column_config_option(map: &Map<String, Value>) -> Vec<StoredColumnEntry> {
    match map.get(keys::COLUMN_CONFIG) {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                serde_json::from_value(item.clone())
                    .unwrap_or_else(|_| StoredColumnEntry::Malformed(item.clone()))
            })
            .collect(),
        Some(other) => {
            tracing::warn!(kind = json_kind(other), "ignoring non-list column config");
            Vec::new()
        }
        None => Vec::new(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
