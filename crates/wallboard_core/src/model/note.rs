//! Aggregated note model consumed by the sorter and renderers.
//!
//! # Responsibility
//! - Hold one document's identity, inline fields, cover image and task counts.
//! - Provide the ordered group-tag to notes mapping produced by one run.
//!
//! # Invariants
//! - A `Note` is built once per run and never mutated afterwards.
//! - `inline_fields` keeps one entry per name; a later scan hit replaces the
//!   value but the name keeps its first-seen position.
//! - `total_tasks` and `completed_tasks` stay `0` unless progress was requested.

use crate::model::atom::AtomId;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One `name:: value` annotation found in document text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineField {
    pub name: String,
    /// Untrimmed trailing text captured after the `::` marker.
    pub value: String,
}

impl InlineField {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// First image URL found in a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    /// Final path segment of `url`.
    pub file_name: String,
    pub url: String,
}

/// Field bag keyed by name, in first-seen order.
pub type InlineFields = IndexMap<String, InlineField>;

/// One aggregated document ready for sorting and rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub uuid: AtomId,
    pub title: String,
    #[serde(default)]
    pub inline_fields: InlineFields,
    pub image: Option<Image>,
    #[serde(default)]
    pub total_tasks: usize,
    #[serde(default)]
    pub completed_tasks: usize,
}

impl Note {
    /// Creates a note with no fields, image or task counters.
    pub fn new(uuid: AtomId, title: impl Into<String>) -> Self {
        Self {
            uuid,
            title: title.into(),
            inline_fields: InlineFields::new(),
            image: None,
            total_tasks: 0,
            completed_tasks: 0,
        }
    }

    /// Returns the raw value of one inline field.
    pub fn field_value(&self, name: &str) -> Option<&str> {
        self.inline_fields.get(name).map(|field| field.value.as_str())
    }
}

/// Notes per group tag, in the order the group tags were declared.
pub type Groups = IndexMap<String, Vec<Note>>;
