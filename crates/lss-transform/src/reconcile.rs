//! Column layout reconciliation.
//!
//! Merges the columns currently available in the record schema with the
//! previously persisted layout list:
//! 1. No usable saved list: one stacked default entry per column.
//! 2. Saved entries are upgraded to the structured form in place.
//! 3. New columns are appended below the lowest existing entry.
//! 4. Entries for columns that no longer exist are dropped.
//! 5. Any column still without an entry gets a default one.
//!
//! Corruption is handled per entry, never by discarding the whole list.

use std::collections::HashSet;

use lss_model::{ColumnLayoutEntry, Formatting, Position, StoredColumnEntry};

/// Reconcile the saved layout with the available columns.
///
/// The result has exactly one entry per available column. Running it again
/// on its own output with the same columns returns the same list.
pub fn reconcile_layout(
    available: &[String],
    previous: &[StoredColumnEntry],
    defaults: &Formatting,
) -> Vec<ColumnLayoutEntry> {
    let mut entries = normalize_entries(previous, defaults);
    if entries.is_empty() {
        return default_layout(available, defaults);
    }

    let known: HashSet<&str> = entries.iter().map(|e| e.name.as_str()).collect();
    let new_columns: Vec<&String> = available
        .iter()
        .filter(|c| !known.contains(c.as_str()))
        .collect();

    if !new_columns.is_empty() {
        let lowest = entries
            .iter()
            .map(|e| e.position.y)
            .fold(f64::NEG_INFINITY, f64::max);
        for (offset, column) in new_columns.iter().enumerate() {
            let y = lowest + Position::STACK_STEP * (offset + 1) as f64;
            entries.push(ColumnLayoutEntry::new(
                (*column).clone(),
                Position::new(Position::DEFAULT_X, y).clamped(),
                defaults.clone(),
            ));
        }
        tracing::debug!(added = new_columns.len(), "appended layout entries for new columns");
    }

    let available_set: HashSet<&str> = available.iter().map(String::as_str).collect();
    let before = entries.len();
    entries.retain(|e| available_set.contains(e.name.as_str()));
    if entries.len() < before {
        tracing::debug!(
            dropped = before - entries.len(),
            "dropped layout entries for removed columns"
        );
    }

    // Recovery for inconsistent saved state.
    for (index, column) in available.iter().enumerate() {
        if !entries.iter().any(|e| &e.name == column) {
            tracing::warn!(column = %column, "column missing from reconciled layout, restoring default");
            entries.push(ColumnLayoutEntry::new(
                column.clone(),
                Position::stacked(index),
                defaults.clone(),
            ));
        }
    }

    entries
}

/// One stacked default entry per column, in column order.
pub fn default_layout(available: &[String], defaults: &Formatting) -> Vec<ColumnLayoutEntry> {
    available
        .iter()
        .enumerate()
        .map(|(index, column)| {
            ColumnLayoutEntry::new(column.clone(), Position::stacked(index), defaults.clone())
        })
        .collect()
}

/// Upgrade saved entries, discarding malformed ones and duplicate names.
fn normalize_entries(
    previous: &[StoredColumnEntry],
    defaults: &Formatting,
) -> Vec<ColumnLayoutEntry> {
    let mut seen = HashSet::new();
    let mut entries = Vec::with_capacity(previous.len());
    let mut discarded = 0usize;

    for (index, stored) in previous.iter().enumerate() {
        match stored.normalize(index, defaults) {
            Some(entry) if seen.insert(entry.name.clone()) => entries.push(entry),
            _ => discarded += 1,
        }
    }
    if discarded > 0 {
        tracing::warn!(discarded, "discarded unusable saved layout entries");
    }
    entries
}

/// Whether the stored list already holds exactly `layout` in structured form.
pub fn layout_matches(stored: &[StoredColumnEntry], layout: &[ColumnLayoutEntry]) -> bool {
    stored.len() == layout.len()
        && stored
            .iter()
            .zip(layout)
            .all(|(s, l)| s.as_complete().as_ref() == Some(l))
}
