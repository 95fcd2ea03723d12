//! Label sheet templates.
//!
//! Templates are immutable and come from a fixed catalog. Only the id is
//! persisted; lookups fall back to [`default_template`].

use serde::Serialize;

/// A printable sheet layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    /// Stable identifier persisted in options (e.g. "labels30").
    pub id: &'static str,
    /// Human-readable name including label dimensions.
    pub name: &'static str,
    /// Number of label slots on one sheet.
    pub per_page: usize,
}

/// Id of the template used when none (or an unknown one) is configured.
pub const DEFAULT_TEMPLATE_ID: &str = "labels30";

/// All supported sheet layouts.
pub const TEMPLATES: &[Template] = &[
    Template {
        id: "labels8",
        name: "8 per sheet (2-1/3\" x 3-3/8\")",
        per_page: 8,
    },
    Template {
        id: "labels10",
        name: "10 per sheet (2\" x 4\")",
        per_page: 10,
    },
    Template {
        id: "labels20",
        name: "20 per sheet (1\" x 4\")",
        per_page: 20,
    },
    Template {
        id: "labels30",
        name: "30 per sheet (1\" x 2-5/8\")",
        per_page: 30,
    },
    Template {
        id: "labels60",
        name: "60 per sheet (1/2\" x 1-3/4\")",
        per_page: 60,
    },
    Template {
        id: "labels80",
        name: "80 per sheet (1/2\" x 1-3/4\")",
        per_page: 80,
    },
];

/// Look up a template by id.
pub fn find_template(id: &str) -> Option<&'static Template> {
    TEMPLATES.iter().find(|t| t.id == id)
}

/// The default template (`labels30`).
pub fn default_template() -> &'static Template {
    find_template(DEFAULT_TEMPLATE_ID).unwrap_or(&TEMPLATES[0])
}
