//! Wallboard settings model.
//!
//! # Responsibility
//! - Hold the typed configuration parsed from one wallboard document.
//! - Define the closed set of layouts and sort directions.
//!
//! # Invariants
//! - Rendering is never attempted unless `query_tag` and `group_tags` are set.
//! - `image_width` and `table_columns` are always positive.

use crate::config::WallboardDefaults;
use crate::wallboard::computed::PROGRESS_FIELD;
use serde::{Deserialize, Serialize};

/// Layout used to render every group of one wallboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayAs {
    /// Fixed-column grid of note cards.
    #[default]
    Gallery,
    /// One row per note, one column per field.
    Table,
    /// Accepted by the settings grammar but has no renderer.
    List,
}

impl DisplayAs {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gallery => "gallery",
            Self::Table => "table",
            Self::List => "list",
        }
    }

    /// Parses a layout name case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "gallery" => Some(Self::Gallery),
            "table" => Some(Self::Table),
            "list" => Some(Self::List),
            _ => None,
        }
    }
}

/// Direction applied to the sort comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }
}

/// Parsed configuration for one wallboard document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub query_tag: Option<String>,
    pub group_tags: Option<Vec<String>>,
    pub image_width: u32,
    pub table_columns: u32,
    /// `None` means the field set is inferred per group.
    pub include_fields: Option<Vec<String>>,
    /// `None` keeps fetch order.
    pub sort_by: Option<String>,
    pub sort_order: SortOrder,
    pub display_as: DisplayAs,
    pub show_image: bool,
    pub progress_completion_char: String,
    pub progress_remaining_char: String,
    /// Prefix joined with a note uuid to build its link.
    pub note_url_base: String,
}

/// Required directives borrowed from a validated [`Settings`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequiredSettings<'a> {
    pub query_tag: &'a str,
    pub group_tags: &'a [String],
}

impl Settings {
    /// Creates settings holding only process-wide defaults.
    pub fn from_defaults(defaults: &WallboardDefaults) -> Self {
        Self {
            query_tag: None,
            group_tags: None,
            image_width: defaults.image_width,
            table_columns: defaults.table_columns,
            include_fields: None,
            sort_by: None,
            sort_order: SortOrder::default(),
            display_as: DisplayAs::default(),
            show_image: true,
            progress_completion_char: defaults.progress_completion_char.clone(),
            progress_remaining_char: defaults.progress_remaining_char.clone(),
            note_url_base: defaults.note_url_base.clone(),
        }
    }

    /// Returns both required directives, or the label of the first missing one.
    pub fn required(&self) -> Result<RequiredSettings<'_>, &'static str> {
        let query_tag = self
            .query_tag
            .as_deref()
            .filter(|tag| !tag.is_empty())
            .ok_or("Query Tag")?;
        let group_tags = self
            .group_tags
            .as_deref()
            .filter(|tags| !tags.is_empty())
            .ok_or("Group By Tags")?;
        Ok(RequiredSettings {
            query_tag,
            group_tags,
        })
    }

    /// Whether any requested field is the computed progress indicator.
    pub fn requests_progress(&self) -> bool {
        self.include_fields.as_ref().is_some_and(|fields| {
            fields
                .iter()
                .any(|field| field.eq_ignore_ascii_case(PROGRESS_FIELD))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{DisplayAs, Settings, SortOrder};
    use crate::config::WallboardDefaults;

    #[test]
    fn required_reports_first_missing_directive() {
        let mut settings = Settings::from_defaults(&WallboardDefaults::default());
        assert_eq!(settings.required().unwrap_err(), "Query Tag");

        settings.query_tag = Some("project".to_string());
        assert_eq!(settings.required().unwrap_err(), "Group By Tags");

        settings.group_tags = Some(vec!["active".to_string()]);
        let required = settings.required().expect("both directives are set");
        assert_eq!(required.query_tag, "project");
        assert_eq!(required.group_tags, ["active".to_string()]);
    }

    #[test]
    fn progress_request_is_case_insensitive() {
        let settings = Settings {
            include_fields: Some(vec!["status".to_string(), "+Progress".to_string()]),
            ..Settings::from_defaults(&WallboardDefaults::default())
        };
        assert!(settings.requests_progress());
    }

    #[test]
    fn layout_and_order_names_parse_case_insensitively() {
        assert_eq!(DisplayAs::parse("TABLE"), Some(DisplayAs::Table));
        assert_eq!(DisplayAs::parse("grid"), None);
        assert_eq!(SortOrder::parse(" Desc "), Some(SortOrder::Desc));
    }

    #[test]
    fn settings_serialize_with_lowercase_variants() {
        let settings = Settings {
            query_tag: Some("books".to_string()),
            display_as: DisplayAs::Table,
            sort_order: SortOrder::Desc,
            ..Settings::from_defaults(&WallboardDefaults::default())
        };
        let json = serde_json::to_value(&settings).unwrap();
        assert_eq!(json["display_as"], "table");
        assert_eq!(json["sort_order"], "desc");
        assert_eq!(json["group_tags"], serde_json::Value::Null);

        let decoded: Settings = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, settings);
    }
}
