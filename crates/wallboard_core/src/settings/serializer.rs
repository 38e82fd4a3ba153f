//! Settings table serializer.
//!
//! # Responsibility
//! - Write the effective settings back as a two-column markdown table.
//!
//! # Invariants
//! - `Query Tag` and `Group By Tags` rows are always written.
//! - Every other row is written only when it differs from `defaults`.
//! - Row order is fixed, so repeated runs produce byte-identical tables.
//! - `parse_settings(serialize_settings(s, d), d) == s` for parsed settings.

use super::parser::{
    DISPLAY_AS_LABEL, FIELD_SEPARATOR, GROUP_BY_TAGS_LABEL, GROUP_SEPARATOR, IMAGE_WIDTH_LABEL,
    INCLUDE_FIELDS_LABEL, QUERY_TAG_LABEL, SHOW_IMAGE_LABEL, SORT_BY_LABEL, SORT_ORDER_LABEL,
    TABLE_COLUMNS_LABEL,
};
use crate::config::WallboardDefaults;
use crate::model::settings::Settings;

/// Serializes `settings` into a minimal `|<Label>|<value>|` table.
pub fn serialize_settings(settings: &Settings, defaults: &WallboardDefaults) -> String {
    let base = Settings::from_defaults(defaults);
    let mut rows: Vec<(&str, String)> = vec![
        (
            QUERY_TAG_LABEL,
            settings.query_tag.clone().unwrap_or_default(),
        ),
        (
            GROUP_BY_TAGS_LABEL,
            settings
                .group_tags
                .as_ref()
                .map(|tags| tags.join(GROUP_SEPARATOR))
                .unwrap_or_default(),
        ),
    ];

    if let Some(fields) = settings.include_fields.as_ref() {
        rows.push((
            INCLUDE_FIELDS_LABEL,
            fields.join(FIELD_SEPARATOR),
        ));
    }
    if let Some(sort_by) = settings.sort_by.as_ref() {
        rows.push((SORT_BY_LABEL, sort_by.clone()));
    }
    if settings.sort_order != base.sort_order {
        rows.push((SORT_ORDER_LABEL, settings.sort_order.as_str().to_string()));
    }
    if settings.display_as != base.display_as {
        rows.push((DISPLAY_AS_LABEL, settings.display_as.as_str().to_string()));
    }
    if settings.table_columns != base.table_columns {
        rows.push((TABLE_COLUMNS_LABEL, settings.table_columns.to_string()));
    }
    if settings.image_width != base.image_width {
        rows.push((IMAGE_WIDTH_LABEL, settings.image_width.to_string()));
    }
    if settings.show_image != base.show_image {
        rows.push((SHOW_IMAGE_LABEL, settings.show_image.to_string()));
    }

    let mut out = String::from("| | |\n|-|-|\n");
    for (label, value) in rows {
        out.push_str(&format!("|{label}|{value}|\n"));
    }
    out
}
