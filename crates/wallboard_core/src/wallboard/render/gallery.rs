//! Gallery layout: notes as cards in a fixed-column grid.
//!
//! # Invariants
//! - Every full row holds exactly `table_columns` cells.
//! - The final partial row is emitted as-is, without padding cells.
//! - An empty group emits no table.

use super::{field_value, image_markdown, table_row, title_link, CELL_BREAK};
use crate::model::note::Note;
use crate::model::settings::Settings;
use crate::wallboard::computed::field_label;

/// Renders `notes` as table lines: blank header, separator, then card rows.
pub fn render_gallery(settings: &Settings, notes: &[Note]) -> Vec<String> {
    if notes.is_empty() {
        return Vec::new();
    }

    let columns = settings.table_columns.max(1) as usize;
    let mut lines = Vec::with_capacity(2 + notes.len().div_ceil(columns));
    lines.push(table_row(std::iter::repeat(" ").take(columns)));
    lines.push(table_row(std::iter::repeat("-").take(columns)));

    let mut row: Vec<String> = Vec::with_capacity(columns);
    for note in notes {
        row.push(render_card(note, settings));
        if row.len() == columns {
            lines.push(table_row(row.drain(..)));
        }
    }
    if !row.is_empty() {
        lines.push(table_row(row));
    }
    lines
}

fn render_card(note: &Note, settings: &Settings) -> String {
    let mut parts = Vec::new();
    if let Some(image) = image_markdown(note, settings) {
        parts.push(image);
    }
    parts.push(title_link(note, settings));

    let names: Vec<&str> = match settings.include_fields.as_ref() {
        Some(fields) => fields.iter().map(String::as_str).collect(),
        None => note.inline_fields.keys().map(String::as_str).collect(),
    };
    for name in names {
        if let Some(value) = field_value(note, name, settings) {
            parts.push(format!("**{}**: {}", field_label(name), value));
        }
    }

    parts.join(CELL_BREAK)
}
