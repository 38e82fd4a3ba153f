//! Inline field and cover image extraction.
//!
//! # Responsibility
//! - Collect `name:: value` annotations from free-form document text.
//! - Detect the first image URL used as a note's cover.
//!
//! # Invariants
//! - Field names are letters only; values are the untrimmed rest of the line.
//! - A name starts a line (after an optional `-` bullet) or follows
//!   whitespace, and `::` must be followed by whitespace or end of line, so
//!   paths such as `a::b` are never fields.
//! - The last annotation for a name wins.
//! - No-match input yields an empty mapping / `None`, never an error.

use crate::model::note::{Image, InlineField, InlineFields};
use once_cell::sync::Lazy;
use regex::Regex;

static INLINE_FIELD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)(?:^[ \t]*(?:-[ \t]*)?|[ \t])([A-Za-z]+)::(?:[ \t]+|$)(.*)$")
        .expect("valid inline field regex")
});
static IMAGE_URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)https?://[^\s()\[\]<>"'|]+?\.(?:jpg|png|webp)"#).expect("valid image regex")
});

/// Scans every line of `content` for a `name:: value` annotation.
pub fn extract_inline_fields(content: &str) -> InlineFields {
    let mut fields = InlineFields::new();
    for caps in INLINE_FIELD_RE.captures_iter(content) {
        let (Some(name), Some(value)) = (caps.get(1), caps.get(2)) else {
            continue;
        };
        let field = InlineField::new(name.as_str(), value.as_str());
        fields.insert(field.name.clone(), field);
    }
    fields
}

/// Returns the first `http(s)` URL ending in a recognized image extension.
pub fn extract_image(content: &str) -> Option<Image> {
    let url = IMAGE_URL_RE.find(content)?.as_str();
    let file_name = url.rsplit('/').next().unwrap_or(url).to_string();
    Some(Image {
        file_name,
        url: url.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::{extract_image, extract_inline_fields};

    #[test]
    fn list_item_annotation_becomes_field() {
        let fields = extract_inline_fields("Intro\n- priority:: 2\n");
        let field = fields.get("priority").expect("priority should be extracted");
        assert_eq!(field.name, "priority");
        assert_eq!(field.value, "2");
    }

    #[test]
    fn text_without_annotations_yields_empty_mapping() {
        assert!(extract_inline_fields("no fields here\njust: text").is_empty());
    }

    #[test]
    fn last_annotation_wins_and_keeps_first_position() {
        let fields = extract_inline_fields("status:: draft\nowner:: sam\nstatus:: final");
        assert_eq!(fields.len(), 2);
        assert_eq!(fields.get_index(0).map(|(name, _)| name.as_str()), Some("status"));
        assert_eq!(fields["status"].value, "final");
    }

    #[test]
    fn value_keeps_trailing_text_untrimmed() {
        let fields = extract_inline_fields(" due:: August 1st, 2023  ");
        assert_eq!(fields["due"].value, "August 1st, 2023  ");
    }

    #[test]
    fn first_image_url_wins() {
        let image = extract_image(
            "cover https://example.com/pic.png then https://example.com/pic2.jpg",
        )
        .expect("image should be detected");
        assert_eq!(image.url, "https://example.com/pic.png");
        assert_eq!(image.file_name, "pic.png");
    }

    #[test]
    fn markdown_image_url_is_detected_without_parenthesis() {
        let image = extract_image("![cover](https://cdn.example.com/a/b/cover.webp)")
            .expect("image should be detected");
        assert_eq!(image.url, "https://cdn.example.com/a/b/cover.webp");
        assert_eq!(image.file_name, "cover.webp");
    }

    #[test]
    fn non_image_urls_are_ignored() {
        assert_eq!(extract_image("see https://example.com/page.html"), None);
    }

    #[test]
    fn code_paths_are_not_fields() {
        assert!(extract_inline_fields("Use std::collections::HashMap here").is_empty());
        assert!(extract_inline_fields("call Foo::bar() then\nstd::io").is_empty());
    }

    #[test]
    fn trailing_annotation_after_text_is_a_field() {
        let fields = extract_inline_fields("Ship the beta owner:: ana\n-status::   \nrank::2");
        assert_eq!(fields["owner"].value, "ana");
        assert_eq!(fields["status"].value, "");
        assert!(!fields.contains_key("rank"));
    }
}
