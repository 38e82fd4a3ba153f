//! Document store and notifier contracts consumed by the wallboard pipeline.
//!
//! # Responsibility
//! - Define the host operations the aggregator and run service depend on.
//! - Define the semantic store errors every backend reports.
//!
//! # Invariants
//! - `filter_by_tags` returns only documents bearing every required tag and
//!   none of the excluded tags, in a deterministic order.
//! - `replace_content` overwrites the full document text atomically.

use crate::db::DbError;
use crate::model::atom::{AtomId, TaskStatus};
use async_trait::async_trait;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Store failure reported to the wallboard pipeline.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    NotFound(AtomId),
    InvalidData(String),
    /// A previous holder of the connection lock panicked.
    LockPoisoned,
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "document not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted document data: {message}"),
            Self::LockPoisoned => write!(f, "document store lock poisoned"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) | Self::LockPoisoned => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Lightweight handle returned by tag filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentHandle {
    pub id: AtomId,
    /// Display name used as the note title.
    pub name: String,
}

/// One checklist item attached to a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRecord {
    pub id: AtomId,
    pub content: String,
    pub status: TaskStatus,
}

impl TaskRecord {
    /// Whether this task carries the completion marker.
    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Done
    }
}

/// Tag query: every `required` tag, none of the `excluded` tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagFilter {
    pub required: Vec<String>,
    pub excluded: Vec<String>,
}

impl TagFilter {
    /// Builds the filter for one group entry under `query_tag`.
    ///
    /// A group entry may join several tags with `&` and exclude a tag with a
    /// leading `^`, e.g. `work&urgent&^archived`.
    pub fn for_group(query_tag: &str, group_entry: &str) -> Self {
        let mut filter = Self {
            required: vec![query_tag.trim().to_string()],
            excluded: Vec::new(),
        };
        for part in group_entry.split('&').map(str::trim) {
            if let Some(excluded) = part.strip_prefix('^') {
                let excluded = excluded.trim();
                if !excluded.is_empty() {
                    filter.excluded.push(excluded.to_string());
                }
            } else if !part.is_empty() {
                filter.required.push(part.to_string());
            }
        }
        filter
    }
}

/// Document store operations consumed by the wallboard pipeline.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Documents bearing all required tags and none of the excluded ones.
    async fn filter_by_tags(&self, filter: &TagFilter) -> StoreResult<Vec<DocumentHandle>>;
    /// Full raw text of one document.
    async fn fetch_content(&self, id: AtomId) -> StoreResult<String>;
    /// Tasks of one document; completed tasks only when `include_done`.
    async fn fetch_tasks(&self, id: AtomId, include_done: bool) -> StoreResult<Vec<TaskRecord>>;
    /// Atomically overwrites a document's full text.
    async fn replace_content(&self, id: AtomId, content: &str) -> StoreResult<()>;
}

/// User-facing alert channel of the host.
pub trait Notifier: Send + Sync {
    fn notify_user(&self, message: &str);
}
