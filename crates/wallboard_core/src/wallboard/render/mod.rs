//! Markdown renderers for wallboard groups.
//!
//! # Responsibility
//! - Dispatch each group to the layout selected by `Settings::display_as`.
//! - Own the cell helpers shared by both layouts (image, link, field value).
//!
//! # Invariants
//! - Groups are emitted in `Groups` order, each headed by `# <groupTag>`.
//! - A layout failure empties its own group and never aborts the run.
//! - Note titles and field values reach a table cell only through
//!   [`escape_cell`], so every row keeps the header's cell count.

pub mod gallery;
pub mod table;

use crate::model::note::{Groups, Note};
use crate::model::settings::{DisplayAs, Settings};
use crate::wallboard::computed::{compute_field, is_computed_field};
use log::error;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Soft line break used between the parts of one gallery cell.
pub const CELL_BREAK: &str = "<br>";

/// Failure to render one group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// The layout is accepted by the settings grammar but has no renderer.
    UnsupportedLayout(DisplayAs),
}

impl Display for RenderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedLayout(layout) => {
                write!(f, "unsupported display layout `{}`", layout.as_str())
            }
        }
    }
}

impl Error for RenderError {}

/// Renders every group and joins the blocks with blank lines.
pub fn render_groups(settings: &Settings, groups: &Groups) -> String {
    let mut blocks = Vec::with_capacity(groups.len());
    for (tag, notes) in groups {
        match render_group(settings, tag, notes) {
            Ok(block) => blocks.push(block),
            Err(err) => {
                error!(
                    "event=render_group module=wallboard status=error error_code=unsupported_layout group={} error={}",
                    tag, err
                );
            }
        }
    }
    blocks.join("\n\n")
}

/// Renders one group with the configured layout.
pub fn render_group(settings: &Settings, tag: &str, notes: &[Note]) -> Result<String, RenderError> {
    let lines = match settings.display_as {
        DisplayAs::Gallery => gallery::render_gallery(settings, notes),
        DisplayAs::Table => table::render_table(settings, notes),
        DisplayAs::List => return Err(RenderError::UnsupportedLayout(DisplayAs::List)),
    };

    let mut block = format!("# {tag}");
    for line in lines {
        block.push('\n');
        block.push_str(&line);
    }
    Ok(block)
}

/// Markdown image sized to `image_width`, when images are shown and present.
pub fn image_markdown(note: &Note, settings: &Settings) -> Option<String> {
    if !settings.show_image {
        return None;
    }
    note.image.as_ref().map(|image| {
        format!(
            "![{}\\|{}]({})",
            image.file_name, settings.image_width, image.url
        )
    })
}

/// Link to the note's canonical URL.
pub fn title_link(note: &Note, settings: &Settings) -> String {
    format!(
        "[{}]({}{})",
        escape_cell(&note.title),
        settings.note_url_base,
        note.uuid
    )
}

/// Display value of one field: computed, inline, or `None` when absent.
pub fn field_value(note: &Note, name: &str, settings: &Settings) -> Option<String> {
    if is_computed_field(name) {
        return Some(compute_field(name, note, settings));
    }
    note.field_value(name).map(|value| escape_cell(value.trim()))
}

/// Escapes every bare `|` as `\|`; already escaped pipes are kept.
pub fn escape_cell(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    let mut after_backslash = false;
    for ch in text.chars() {
        if ch == '|' && !after_backslash {
            escaped.push('\\');
        }
        after_backslash = ch == '\\' && !after_backslash;
        escaped.push(ch);
    }
    escaped
}

/// Number of cells in one rendered table row, ignoring escaped pipes.
#[cfg(test)]
pub(crate) fn cell_count(row: &str) -> usize {
    let mut bare_pipes = 0;
    let mut previous = None;
    for ch in row.chars() {
        if ch == '|' && previous != Some('\\') {
            bare_pipes += 1;
        }
        previous = Some(ch);
    }
    bare_pipes - 1
}

/// Formats one markdown table row from its cells.
pub(crate) fn table_row<I, S>(cells: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut row = String::from("|");
    for cell in cells {
        row.push_str(cell.as_ref());
        row.push('|');
    }
    row
}
