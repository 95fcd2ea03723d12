//! Helpers for the rendering layer: label text and style declarations.

use std::fmt;

use serde::Serialize;

use lss_model::{Field, FontWeight, LabelInstance, Options, TextAlign};

use crate::format::format_field;

/// Plain text of a label.
///
/// With `show_field_names` every field reads `name: value` and fields are
/// separated by newlines; otherwise the configured separator is used (a
/// newline when it is empty). A missing label renders as the empty string.
pub fn label_text(label: Option<&LabelInstance>, options: &Options) -> String {
    let Some(label) = label else {
        return String::new();
    };
    let parts: Vec<String> = label
        .fields
        .iter()
        .map(|field| {
            if options.show_field_names && !field.name.is_empty() {
                format!("{}: {}", field.name, format_field(field))
            } else {
                format_field(field)
            }
        })
        .collect();
    let separator = if options.show_field_names || options.separator.is_empty() {
        "\n"
    } else {
        options.separator.as_str()
    };
    parts.join(separator)
}

/// Sheet-wide text style.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelStyle {
    pub font_size_pt: f64,
    pub color: String,
    pub text_align: TextAlign,
    pub line_height: f64,
}

impl LabelStyle {
    pub fn from_options(options: &Options) -> Self {
        Self {
            font_size_pt: options.font_size,
            color: options.font_color.clone(),
            text_align: options.text_align,
            line_height: options.line_spacing,
        }
    }
}

impl fmt::Display for LabelStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "font-size: {}pt; color: {}; text-align: {}; line-height: {}",
            self.font_size_pt,
            self.color,
            self.text_align.as_str(),
            self.line_height
        )
    }
}

/// Absolute placement and style of one field inside its label box.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldStyle {
    pub left_percent: f64,
    pub top_percent: f64,
    pub font_size_pt: f64,
    pub color: String,
    pub text_align: TextAlign,
    pub font_weight: FontWeight,
}

impl FieldStyle {
    pub fn for_field(field: &Field) -> Self {
        Self {
            left_percent: field.position.x,
            top_percent: field.position.y,
            font_size_pt: field.formatting.font_size,
            color: field.formatting.color.clone(),
            text_align: field.formatting.align,
            font_weight: field.formatting.font_weight,
        }
    }
}

impl fmt::Display for FieldStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "left: {}%; top: {}%; font-size: {}pt; color: {}; text-align: {}; font-weight: {}",
            self.left_percent,
            self.top_percent,
            self.font_size_pt,
            self.color,
            self.text_align.as_str(),
            self.font_weight.as_str()
        )
    }
}
