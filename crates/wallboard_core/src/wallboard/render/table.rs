//! Table layout: one row per note, one column per field.
//!
//! # Invariants
//! - Every row has the same number of cells as the header.
//! - A note missing a field renders an empty cell, never a shorter row.
//! - Without `include_fields`, columns are the union of all notes' fields in
//!   first-seen order.

use super::{field_value, image_markdown, table_row, title_link};
use crate::model::note::Note;
use crate::model::settings::Settings;
use crate::wallboard::computed::field_label;
use indexmap::IndexSet;

const TITLE_HEADER: &str = "Note";

/// Renders `notes` as header, separator and one line per note.
pub fn render_table(settings: &Settings, notes: &[Note]) -> Vec<String> {
    let fields = table_fields(settings, notes);

    let mut header: Vec<&str> = Vec::with_capacity(fields.len() + 2);
    if settings.show_image {
        header.push(" ");
    }
    header.push(TITLE_HEADER);
    header.extend(fields.iter().map(|name| field_label(name)));

    let mut lines = Vec::with_capacity(notes.len() + 2);
    lines.push(table_row(&header));
    lines.push(table_row(header.iter().map(|_| "-")));

    for note in notes {
        let mut cells = Vec::with_capacity(header.len());
        if settings.show_image {
            cells.push(image_markdown(note, settings).unwrap_or_default());
        }
        cells.push(title_link(note, settings));
        for name in &fields {
            cells.push(field_value(note, name, settings).unwrap_or_default());
        }
        lines.push(table_row(cells));
    }
    lines
}

fn table_fields<'a>(settings: &'a Settings, notes: &'a [Note]) -> Vec<&'a str> {
    if let Some(fields) = settings.include_fields.as_ref() {
        return fields.iter().map(String::as_str).collect();
    }
    let mut seen: IndexSet<&str> = IndexSet::new();
    for note in notes {
        seen.extend(note.inline_fields.keys().map(String::as_str));
    }
    seen.into_iter().collect()
}
