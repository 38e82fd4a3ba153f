//! Stored document model.
//!
//! # Responsibility
//! - Define the canonical record persisted by the SQLite document store.
//! - Keep notes and their checklist tasks in one storage shape.
//!
//! # Invariants
//! - `uuid` is stable and never reused for another atom.
//! - `is_deleted` is the source of truth for tombstone state.
//! - Only `AtomType::Task` atoms carry `task_status` and `note_uuid`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for every stored document and task.
pub type AtomId = Uuid;

/// Storage category for one atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AtomType {
    /// Free-form markdown document that can carry tags.
    Note,
    /// Checklist item owned by a note.
    Task,
}

/// Task lifecycle state for `AtomType::Task`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Created but not started.
    Todo,
    /// Work is in progress.
    InProgress,
    /// Completed successfully.
    Done,
    /// No longer actionable.
    Cancelled,
}

/// Validation failures raised before an atom is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AtomValidationError {
    NilUuid,
    /// A task must point at the note that owns it.
    TaskWithoutNote,
    /// Notes never carry task-only fields.
    NoteWithTaskFields,
}

impl Display for AtomValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilUuid => write!(f, "atom uuid must not be nil"),
            Self::TaskWithoutNote => write!(f, "task atom must reference an owning note"),
            Self::NoteWithTaskFields => {
                write!(f, "note atom must not carry task_status or note_uuid")
            }
        }
    }
}

impl Error for AtomValidationError {}

/// Canonical stored record for notes and tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Atom {
    pub uuid: AtomId,
    /// Serialized as `type` to match external schema naming.
    #[serde(rename = "type")]
    pub kind: AtomType,
    /// Display name shown in rendered links.
    pub title: String,
    /// Markdown body.
    pub content: String,
    /// Meaningful only when `kind == AtomType::Task`.
    pub task_status: Option<TaskStatus>,
    /// Owning note of a task atom.
    pub note_uuid: Option<AtomId>,
    pub is_deleted: bool,
}

impl Atom {
    /// Creates a new note atom with a generated stable ID.
    pub fn note(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            kind: AtomType::Note,
            title: title.into(),
            content: content.into(),
            task_status: None,
            note_uuid: None,
            is_deleted: false,
        }
    }

    /// Creates a new task atom owned by `note_uuid`.
    pub fn task(note_uuid: AtomId, content: impl Into<String>, status: TaskStatus) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            kind: AtomType::Task,
            title: String::new(),
            content: content.into(),
            task_status: Some(status),
            note_uuid: Some(note_uuid),
            is_deleted: false,
        }
    }

    /// Checks cross-field invariants before persistence.
    pub fn validate(&self) -> Result<(), AtomValidationError> {
        if self.uuid.is_nil() {
            return Err(AtomValidationError::NilUuid);
        }
        match self.kind {
            AtomType::Task if self.note_uuid.is_none() => Err(AtomValidationError::TaskWithoutNote),
            AtomType::Note if self.task_status.is_some() || self.note_uuid.is_some() => {
                Err(AtomValidationError::NoteWithTaskFields)
            }
            _ => Ok(()),
        }
    }
}
