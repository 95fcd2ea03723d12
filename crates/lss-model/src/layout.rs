//! Per-column layout: where a field sits on a label and how it looks.
//!
//! Positions are percentages of the label box. The persisted form
//! ([`StoredColumnEntry`]) is deliberately tolerant: older configurations
//! stored bare column names, and hand-edited or corrupted entries must not
//! poison the rest of the list. [`StoredColumnEntry::normalize`] upgrades a
//! stored entry to the fully structured [`ColumnLayoutEntry`] once, at the
//! boundary.

use serde::{Deserialize, Deserializer, Serialize};

/// Horizontal x and vertical y, both in percent of the label box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    /// Left margin used for synthesized positions.
    pub const DEFAULT_X: f64 = 5.0;
    /// Top margin of the first stacked field.
    pub const DEFAULT_Y: f64 = 5.0;
    /// Vertical distance between stacked fields.
    pub const STACK_STEP: f64 = 15.0;

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Default position of the `index`-th field when stacking top to bottom.
    pub fn stacked(index: usize) -> Self {
        Self::new(Self::DEFAULT_X, Self::DEFAULT_Y + Self::STACK_STEP * index as f64).clamped()
    }

    /// Both coordinates clamped into `[0, 100]`.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self {
            x: clamp_percent(self.x),
            y: clamp_percent(self.y),
        }
    }
}

fn clamp_percent(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 100.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl TextAlign {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }

    /// Parse a persisted alignment name.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "left" => Some(Self::Left),
            "center" => Some(Self::Center),
            "right" => Some(Self::Right),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

impl FontWeight {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Bold => "bold",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "normal" => Some(Self::Normal),
            "bold" => Some(Self::Bold),
            _ => None,
        }
    }
}

/// Text style of a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Formatting {
    /// Font size in points.
    pub font_size: f64,
    pub color: String,
    pub align: TextAlign,
    pub font_weight: FontWeight,
}

/// Persisted position and style for one named column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnLayoutEntry {
    pub name: String,
    pub position: Position,
    pub formatting: Formatting,
}

impl ColumnLayoutEntry {
    pub fn new(name: impl Into<String>, position: Position, formatting: Formatting) -> Self {
        Self {
            name: name.into(),
            position,
            formatting,
        }
    }
}

/// A structured entry as found in storage; nested parts may be missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartialColumnEntry {
    pub name: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient"
    )]
    pub position: Option<Position>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient"
    )]
    pub formatting: Option<Formatting>,
}

/// A column layout entry in its persisted shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredColumnEntry {
    /// Legacy form: just the column name.
    Bare(String),
    Structured(PartialColumnEntry),
    /// Anything else; discarded during reconciliation.
    Malformed(serde_json::Value),
}

impl StoredColumnEntry {
    /// Name of the column this entry governs, if it has one.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Bare(name) => Some(name),
            Self::Structured(entry) => Some(&entry.name),
            Self::Malformed(_) => None,
        }
    }

    /// Upgrade to a fully structured entry.
    ///
    /// Missing parts are filled in place: the position is synthesized from
    /// `index`, the formatting comes from `defaults`. Malformed entries and
    /// entries with an empty name yield `None`.
    pub fn normalize(&self, index: usize, defaults: &Formatting) -> Option<ColumnLayoutEntry> {
        match self {
            Self::Bare(name) if !name.is_empty() => Some(ColumnLayoutEntry::new(
                name.clone(),
                Position::stacked(index),
                defaults.clone(),
            )),
            Self::Structured(entry) if !entry.name.is_empty() => Some(ColumnLayoutEntry::new(
                entry.name.clone(),
                entry.position.unwrap_or_else(|| Position::stacked(index)),
                entry
                    .formatting
                    .clone()
                    .unwrap_or_else(|| defaults.clone()),
            )),
            _ => None,
        }
    }

    /// Replace the stored formatting. A bare name becomes a structured entry
    /// without a position; malformed entries are left alone.
    pub fn set_formatting(&mut self, formatting: Formatting) {
        match self {
            Self::Structured(entry) => entry.formatting = Some(formatting),
            Self::Bare(name) => {
                let name = std::mem::take(name);
                *self = Self::Structured(PartialColumnEntry {
                    name,
                    position: None,
                    formatting: Some(formatting),
                });
            }
            Self::Malformed(_) => {}
        }
    }

    /// The entry exactly as stored, if it is already fully structured.
    pub fn as_complete(&self) -> Option<ColumnLayoutEntry> {
        match self {
            Self::Structured(PartialColumnEntry {
                name,
                position: Some(position),
                formatting: Some(formatting),
            }) => Some(ColumnLayoutEntry::new(
                name.clone(),
                *position,
                formatting.clone(),
            )),
            _ => None,
        }
    }
}

impl From<ColumnLayoutEntry> for StoredColumnEntry {
    fn from(entry: ColumnLayoutEntry) -> Self {
        Self::Structured(PartialColumnEntry {
            name: entry.name,
            position: Some(entry.position),
            formatting: Some(entry.formatting),
        })
    }
}

/// Deserialize an optional nested value, treating anything unparsable as absent.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn defaults() -> Formatting {
        Formatting {
            font_size: 11.0,
            color: "#000000".to_string(),
            align: TextAlign::Left,
            font_weight: FontWeight::Normal,
        }
    }

    #[test]
    fn test_stacked_positions() {
        assert_eq!(Position::stacked(0), Position::new(5.0, 5.0));
        assert_eq!(Position::stacked(2), Position::new(5.0, 35.0));
        assert_eq!(Position::stacked(10).y, 100.0);
    }

    #[test]
    fn test_deserialize_bare_entry() {
        let entry: StoredColumnEntry = serde_json::from_value(json!("Name")).unwrap();
        assert_eq!(entry, StoredColumnEntry::Bare("Name".to_string()));
    }

    #[test]
    fn test_deserialize_full_entry() {
        let entry: StoredColumnEntry = serde_json::from_value(json!({
            "name": "Name",
            "position": {"x": 10, "y": 20},
            "formatting": {"fontSize": 14, "color": "#ff0000", "align": "center", "fontWeight": "bold"}
        }))
        .unwrap();
        let complete = entry.as_complete().unwrap();
        assert_eq!(complete.position, Position::new(10.0, 20.0));
        assert_eq!(complete.formatting.font_weight, FontWeight::Bold);
    }

    #[test]
    fn test_broken_position_is_treated_as_missing() {
        let entry: StoredColumnEntry = serde_json::from_value(json!({
            "name": "City",
            "position": "top-left",
        }))
        .unwrap();
        let normalized = entry.normalize(3, &defaults()).unwrap();
        assert_eq!(normalized.position, Position::stacked(3));
        assert_eq!(normalized.formatting, defaults());
    }

    #[test]
    fn test_malformed_entry_has_no_name() {
        let entry: StoredColumnEntry = serde_json::from_value(json!(42)).unwrap();
        assert!(matches!(entry, StoredColumnEntry::Malformed(_)));
        assert!(entry.normalize(0, &defaults()).is_none());
    }

    #[test]
    fn test_serialized_entry_uses_camel_case() {
        let entry = ColumnLayoutEntry::new("Name", Position::new(5.0, 5.0), defaults());
        let value = serde_json::to_value(StoredColumnEntry::from(entry)).unwrap();
        assert_eq!(value["formatting"]["fontSize"], json!(11.0));
        assert_eq!(value["formatting"]["fontWeight"], json!("normal"));
    }

    #[test]
    fn test_set_formatting_upgrades_bare_entry() {
        let bold = Formatting {
            font_weight: FontWeight::Bold,
            ..defaults()
        };
        let mut entry = StoredColumnEntry::Bare("Name".to_string());
        entry.set_formatting(bold.clone());
        let normalized = entry.normalize(1, &defaults()).unwrap();
        assert_eq!(normalized.position, Position::stacked(1));
        assert_eq!(normalized.formatting, bold);

        let mut malformed = StoredColumnEntry::Malformed(json!(42));
        malformed.set_formatting(bold);
        assert_eq!(malformed, StoredColumnEntry::Malformed(json!(42)));
    }

    proptest::proptest! {
        #[test]
        fn clamped_positions_stay_on_label(x in proptest::num::f64::ANY, y in proptest::num::f64::ANY) {
            let p = Position::new(x, y).clamped();
            proptest::prop_assert!((0.0..=100.0).contains(&p.x));
            proptest::prop_assert!((0.0..=100.0).contains(&p.y));
        }

        #[test]
        fn stacked_positions_stay_on_label(index in 0usize..1000) {
            let p = Position::stacked(index);
            proptest::prop_assert!((0.0..=100.0).contains(&p.y));
        }
    }
}
