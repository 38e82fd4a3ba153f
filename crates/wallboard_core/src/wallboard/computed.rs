//! Computed (`+`-prefixed) field evaluation.
//!
//! # Responsibility
//! - Resolve synthetic field names against a note's task counters.
//!
//! # Invariants
//! - `+progress` always yields exactly `PROGRESS_BAR_WIDTH` characters.
//! - Unknown computed names are logged and rendered as a visible error token;
//!   they never fail the caller.

use crate::model::note::Note;
use crate::model::settings::Settings;
use log::error;

/// Name of the task-completion indicator field.
pub const PROGRESS_FIELD: &str = "+progress";
pub const COMPUTED_FIELD_PREFIX: char = '+';
pub const PROGRESS_BAR_WIDTH: usize = 10;

/// Whether `name` refers to a computed field rather than an inline field.
pub fn is_computed_field(name: &str) -> bool {
    name.starts_with(COMPUTED_FIELD_PREFIX)
}

/// Label shown for a field name in rendered output.
pub fn field_label(name: &str) -> &str {
    name.strip_prefix(COMPUTED_FIELD_PREFIX).unwrap_or(name)
}

/// Evaluates one computed field for `note`.
pub fn compute_field(name: &str, note: &Note, settings: &Settings) -> String {
    if name.eq_ignore_ascii_case(PROGRESS_FIELD) {
        return progress_bar(
            note.completed_tasks,
            note.total_tasks,
            &settings.progress_completion_char,
            &settings.progress_remaining_char,
        );
    }

    error!(
        "event=computed_field module=wallboard status=error error_code=unknown_computed_field field={} note={}",
        name, note.uuid
    );
    format!("[unknown computed field: {name}]")
}

/// Builds a fixed-width completion bar.
///
/// Filled cells are `floor(completed / total * 10)`; no tasks or no completed
/// tasks yield an all-remaining bar.
pub fn progress_bar(completed: usize, total: usize, done_char: &str, remaining_char: &str) -> String {
    let filled = if total == 0 || completed == 0 {
        0
    } else {
        (completed.min(total) * PROGRESS_BAR_WIDTH) / total
    };
    let mut bar = done_char.repeat(filled);
    bar.push_str(&remaining_char.repeat(PROGRESS_BAR_WIDTH - filled));
    bar
}

#[cfg(test)]
mod tests {
    use super::{compute_field, field_label, progress_bar};
    use crate::config::WallboardDefaults;
    use crate::model::note::Note;
    use crate::model::settings::Settings;
    use uuid::Uuid;

    fn settings() -> Settings {
        Settings::from_defaults(&WallboardDefaults::default())
    }

    #[test]
    fn half_done_fills_half_the_bar() {
        assert_eq!(progress_bar(2, 4, "★", "☆"), "★★★★★☆☆☆☆☆");
    }

    #[test]
    fn no_tasks_yields_all_remaining() {
        assert_eq!(progress_bar(3, 0, "★", "☆"), "☆".repeat(10));
        assert_eq!(progress_bar(0, 7, "★", "☆"), "☆".repeat(10));
    }

    #[test]
    fn partial_progress_rounds_down() {
        assert_eq!(progress_bar(1, 3, "#", "-"), "###-------");
        assert_eq!(progress_bar(5, 5, "#", "-"), "##########");
    }

    #[test]
    fn progress_name_matches_case_insensitively() {
        let mut note = Note::new(Uuid::new_v4(), "Launch");
        note.total_tasks = 10;
        note.completed_tasks = 3;
        assert_eq!(compute_field("+Progress", &note, &settings()), "★★★☆☆☆☆☆☆☆");
    }

    #[test]
    fn unknown_computed_field_renders_error_token() {
        let note = Note::new(Uuid::new_v4(), "Launch");
        let rendered = compute_field("+velocity", &note, &settings());
        assert_eq!(rendered, "[unknown computed field: +velocity]");
    }

    #[test]
    fn label_strips_computed_prefix() {
        assert_eq!(field_label("+progress"), "progress");
        assert_eq!(field_label("owner"), "owner");
    }
}
