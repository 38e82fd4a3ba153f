//! Settings table parser.
//!
//! # Responsibility
//! - Extract every `|<Label>|<value>|` directive from a document body.
//! - Resolve absent or malformed directives to typed defaults.
//!
//! # Invariants
//! - Each directive is matched independently; directive order is irrelevant.
//! - Parsing never fails; missing required directives surface later through
//!   `Settings::required()`.
//! - Matchers keep no scan position between calls, so repeated parses of the
//!   same text always agree.

use crate::config::WallboardDefaults;
use crate::model::settings::{DisplayAs, Settings, SortOrder};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

pub const QUERY_TAG_LABEL: &str = "Query Tag";
pub const GROUP_BY_TAGS_LABEL: &str = "Group By Tags";
pub const IMAGE_WIDTH_LABEL: &str = "Image Width";
pub const TABLE_COLUMNS_LABEL: &str = "Table Columns";
pub const INCLUDE_FIELDS_LABEL: &str = "Include Fields";
pub const SORT_BY_LABEL: &str = "Sort By";
pub const DISPLAY_AS_LABEL: &str = "Display As";
pub const SHOW_IMAGE_LABEL: &str = "Show Image";
pub const SORT_ORDER_LABEL: &str = "Sort Order";

/// Separates group entries inside `Group By Tags`.
pub const GROUP_SEPARATOR: &str = ",";
/// Separates field names inside `Include Fields`.
pub const FIELD_SEPARATOR: &str = "&";

static QUERY_TAG_RE: Lazy<Regex> = Lazy::new(|| directive_regex(QUERY_TAG_LABEL, r"[a-z0-9_/\-]+"));
static GROUP_BY_TAGS_RE: Lazy<Regex> =
    Lazy::new(|| directive_regex(GROUP_BY_TAGS_LABEL, r"[a-z0-9_/\-,&^ \t]+"));
static IMAGE_WIDTH_RE: Lazy<Regex> = Lazy::new(|| directive_regex(IMAGE_WIDTH_LABEL, r"\d+"));
static TABLE_COLUMNS_RE: Lazy<Regex> = Lazy::new(|| directive_regex(TABLE_COLUMNS_LABEL, r"\d+"));
static INCLUDE_FIELDS_RE: Lazy<Regex> =
    Lazy::new(|| directive_regex(INCLUDE_FIELDS_LABEL, r"[a-z+& \t]+"));
static SORT_BY_RE: Lazy<Regex> = Lazy::new(|| directive_regex(SORT_BY_LABEL, r"[a-z]+"));
static DISPLAY_AS_RE: Lazy<Regex> =
    Lazy::new(|| directive_regex(DISPLAY_AS_LABEL, r"gallery|table|list"));
static SHOW_IMAGE_RE: Lazy<Regex> = Lazy::new(|| directive_regex(SHOW_IMAGE_LABEL, r"true|false"));
static SORT_ORDER_RE: Lazy<Regex> = Lazy::new(|| directive_regex(SORT_ORDER_LABEL, r"asc|desc"));

/// Builds a case-insensitive matcher for one full `|<label>|<value>|` line.
fn directive_regex(label: &str, value_pattern: &str) -> Regex {
    let label_pattern = label
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"[ \t]+");
    Regex::new(&format!(
        r"(?im)^[ \t]*\|[ \t]*{label_pattern}[ \t]*\|[ \t]*({value_pattern})[ \t]*\|[ \t\r]*$"
    ))
    .expect("valid directive regex")
}

/// Parses the settings table embedded in `text`.
///
/// Rules:
/// - `Query Tag` / `Group By Tags` stay `None` when absent.
/// - numeric directives fall back to `defaults` when absent or zero.
/// - `Include Fields` / `Sort By` stay `None` when absent or blank.
pub fn parse_settings(text: &str, defaults: &WallboardDefaults) -> Settings {
    let base = Settings::from_defaults(defaults);

    let settings = Settings {
        query_tag: capture(&QUERY_TAG_RE, text).map(str::to_string),
        group_tags: capture(&GROUP_BY_TAGS_RE, text)
            .map(|value| split_list(value, GROUP_SEPARATOR))
            .filter(|tags| !tags.is_empty()),
        image_width: capture(&IMAGE_WIDTH_RE, text)
            .and_then(parse_positive)
            .unwrap_or(base.image_width),
        table_columns: capture(&TABLE_COLUMNS_RE, text)
            .and_then(parse_positive)
            .unwrap_or(base.table_columns),
        include_fields: capture(&INCLUDE_FIELDS_RE, text)
            .map(|value| split_list(value, FIELD_SEPARATOR))
            .filter(|fields| !fields.is_empty()),
        sort_by: capture(&SORT_BY_RE, text).map(str::to_string),
        sort_order: capture(&SORT_ORDER_RE, text)
            .and_then(SortOrder::parse)
            .unwrap_or(base.sort_order),
        display_as: capture(&DISPLAY_AS_RE, text)
            .and_then(DisplayAs::parse)
            .unwrap_or(base.display_as),
        show_image: capture(&SHOW_IMAGE_RE, text)
            .map(|value| value.eq_ignore_ascii_case("true"))
            .unwrap_or(base.show_image),
        ..base
    };

    debug!(
        "event=settings_parse module=settings status=ok query_tag_set={} group_count={} display_as={} sort_by_set={}",
        settings.query_tag.is_some(),
        settings.group_tags.as_ref().map_or(0, Vec::len),
        settings.display_as.as_str(),
        settings.sort_by.is_some()
    );

    settings
}

fn capture<'t>(re: &Regex, text: &'t str) -> Option<&'t str> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|value| !value.is_empty())
}

fn split_list(value: &str, separator: &str) -> Vec<String> {
    value
        .split(separator)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_positive(value: &str) -> Option<u32> {
    value.parse::<u32>().ok().filter(|parsed| *parsed > 0)
}

#[cfg(test)]
mod tests {
    use super::parse_settings;
    use crate::config::WallboardDefaults;
    use crate::model::settings::{DisplayAs, SortOrder};

    const FULL: &str = "\
# Board

| | |
|-|-|
|Query Tag|projects/active|
|Group By Tags|planning, doing,done|
|Image Width|320|
|Table Columns|4|
|Include Fields|status & owner & +progress|
|Sort By|priority|
|Display As|table|
|Show Image|false|
|Sort Order|desc|
";

    #[test]
    fn parses_every_directive() {
        let settings = parse_settings(FULL, &WallboardDefaults::default());
        assert_eq!(settings.query_tag.as_deref(), Some("projects/active"));
        assert_eq!(
            settings.group_tags,
            Some(vec![
                "planning".to_string(),
                "doing".to_string(),
                "done".to_string()
            ])
        );
        assert_eq!(settings.image_width, 320);
        assert_eq!(settings.table_columns, 4);
        assert_eq!(
            settings.include_fields,
            Some(vec![
                "status".to_string(),
                "owner".to_string(),
                "+progress".to_string()
            ])
        );
        assert_eq!(settings.sort_by.as_deref(), Some("priority"));
        assert_eq!(settings.display_as, DisplayAs::Table);
        assert!(!settings.show_image);
        assert_eq!(settings.sort_order, SortOrder::Desc);
    }

    #[test]
    fn absent_directives_resolve_to_defaults() {
        let defaults = WallboardDefaults::default();
        let settings = parse_settings("just some text\n|Query Tag|a|", &defaults);
        assert_eq!(settings.query_tag.as_deref(), Some("a"));
        assert_eq!(settings.group_tags, None);
        assert_eq!(settings.image_width, defaults.image_width);
        assert_eq!(settings.table_columns, defaults.table_columns);
        assert_eq!(settings.include_fields, None);
        assert_eq!(settings.sort_by, None);
        assert_eq!(settings.sort_order, SortOrder::Asc);
        assert_eq!(settings.display_as, DisplayAs::Gallery);
        assert!(settings.show_image);
    }

    #[test]
    fn labels_match_case_insensitively_with_padding() {
        let text = "| query tag | Books |\n|GROUP BY TAGS|fiction|\n| display as | Gallery |";
        let settings = parse_settings(text, &WallboardDefaults::default());
        assert_eq!(settings.query_tag.as_deref(), Some("Books"));
        assert_eq!(settings.group_tags, Some(vec!["fiction".to_string()]));
        assert_eq!(settings.display_as, DisplayAs::Gallery);
    }

    #[test]
    fn malformed_values_fall_back_to_defaults() {
        let text = "\
|Query Tag|q|
|Group By Tags|g|
|Table Columns|three|
|Image Width|0|
|Display As|carousel|
|Show Image|maybe|
";
        let defaults = WallboardDefaults::default();
        let settings = parse_settings(text, &defaults);
        assert_eq!(settings.table_columns, defaults.table_columns);
        assert_eq!(settings.image_width, defaults.image_width);
        assert_eq!(settings.display_as, DisplayAs::Gallery);
        assert!(settings.show_image);
    }

    #[test]
    fn directive_must_fill_a_whole_line() {
        let text = "see |Query Tag|inline| for details\n";
        let settings = parse_settings(text, &WallboardDefaults::default());
        assert_eq!(settings.query_tag, None);
    }

    #[test]
    fn repeated_parses_agree() {
        let defaults = WallboardDefaults::default();
        let first = parse_settings(FULL, &defaults);
        let second = parse_settings(FULL, &defaults);
        assert_eq!(first, second);
    }
}
