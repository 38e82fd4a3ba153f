//! SQLite-backed document store.
//!
//! # Responsibility
//! - Serve tag filtering, content, task and replacement calls from `atoms`.
//! - Provide seeding helpers for notes, tags and tasks.
//!
//! # Invariants
//! - All queries ignore soft-deleted rows.
//! - Tag names are stored lowercase and matched case-insensitively.
//! - The connection lock is held only for one synchronous statement group and
//!   never across an `.await`.
//! - `set_note_tags` replaces the whole tag set in a single transaction.

use crate::db::{open_db, open_db_in_memory};
use crate::model::atom::{Atom, AtomId, AtomType, TaskStatus};
use crate::repo::document_store::{
    DocumentHandle, DocumentStore, StoreError, StoreResult, TagFilter, TaskRecord,
};
use async_trait::async_trait;
use log::debug;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, TransactionBehavior};
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

const TAG_EXISTS_SQL: &str = "EXISTS (
    SELECT 1
    FROM atom_tags at
    INNER JOIN tags t ON t.id = at.tag_id
    WHERE at.atom_uuid = atoms.uuid
      AND t.name = ? COLLATE NOCASE
)";

/// SQLite implementation of [`DocumentStore`].
pub struct SqliteDocumentStore {
    conn: Mutex<Connection>,
}

impl SqliteDocumentStore {
    /// Wraps a migrated connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Opens (and migrates) a database file.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Ok(Self::new(open_db(path)?))
    }

    /// Opens a migrated in-memory database.
    pub fn open_in_memory() -> StoreResult<Self> {
        Ok(Self::new(open_db_in_memory()?))
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }

    /// Creates one note and returns its stable id.
    pub fn create_note(
        &self,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> StoreResult<AtomId> {
        let atom = Atom::note(title, content);
        self.insert_atom(&atom)?;
        Ok(atom.uuid)
    }

    /// Creates one task owned by `note_id`.
    pub fn add_task(
        &self,
        note_id: AtomId,
        content: impl Into<String>,
        status: TaskStatus,
    ) -> StoreResult<AtomId> {
        let conn = self.lock()?;
        if !note_exists(&conn, note_id)? {
            return Err(StoreError::NotFound(note_id));
        }
        let atom = Atom::task(note_id, content, status);
        insert_atom(&conn, &atom)?;
        Ok(atom.uuid)
    }

    /// Replaces all tags of one note in a single transaction.
    pub fn set_note_tags(&self, note_id: AtomId, tags: &[String]) -> StoreResult<()> {
        let normalized = normalize_tags(tags);
        let note_text = note_id.to_string();
        let mut conn = self.lock()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        if !note_exists(&tx, note_id)? {
            return Err(StoreError::NotFound(note_id));
        }

        tx.execute(
            "DELETE FROM atom_tags WHERE atom_uuid = ?1;",
            [note_text.as_str()],
        )?;
        for tag in &normalized {
            tx.execute(
                "INSERT OR IGNORE INTO tags (name) VALUES (?1);",
                [tag.as_str()],
            )?;
            tx.execute(
                "INSERT INTO atom_tags (atom_uuid, tag_id)
                 SELECT ?1, id
                 FROM tags
                 WHERE name = ?2 COLLATE NOCASE;",
                params![note_text.as_str(), tag.as_str()],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    /// Soft-deletes one atom.
    pub fn soft_delete(&self, id: AtomId) -> StoreResult<()> {
        let conn = self.lock()?;
        let changed = conn.execute(
            "UPDATE atoms
             SET
                is_deleted = 1,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1;",
            [id.to_string()],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    fn insert_atom(&self, atom: &Atom) -> StoreResult<()> {
        let conn = self.lock()?;
        insert_atom(&conn, atom)
    }
}

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
    async fn filter_by_tags(&self, filter: &TagFilter) -> StoreResult<Vec<DocumentHandle>> {
        let conn = self.lock()?;
        let mut sql = String::from(
            "SELECT uuid, title
             FROM atoms
             WHERE type = 'note'
               AND is_deleted = 0",
        );
        let mut bind_values: Vec<Value> = Vec::new();
        for tag in &filter.required {
            sql.push_str(" AND ");
            sql.push_str(TAG_EXISTS_SQL);
            bind_values.push(Value::Text(tag.trim().to_lowercase()));
        }
        for tag in &filter.excluded {
            sql.push_str(" AND NOT ");
            sql.push_str(TAG_EXISTS_SQL);
            bind_values.push(Value::Text(tag.trim().to_lowercase()));
        }
        sql.push_str(" ORDER BY created_at ASC, rowid ASC;");

        let mut stmt = conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut handles = Vec::new();
        while let Some(row) = rows.next()? {
            let uuid_text: String = row.get("uuid")?;
            handles.push(DocumentHandle {
                id: parse_uuid(&uuid_text)?,
                name: row.get("title")?,
            });
        }

        debug!(
            "event=filter_by_tags module=repo status=ok required={} excluded={} matched={}",
            filter.required.len(),
            filter.excluded.len(),
            handles.len()
        );
        Ok(handles)
    }

    async fn fetch_content(&self, id: AtomId) -> StoreResult<String> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT content
             FROM atoms
             WHERE uuid = ?1
               AND type = 'note'
               AND is_deleted = 0;",
        )?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            let content: String = row.get("content")?;
            return Ok(content);
        }
        Err(StoreError::NotFound(id))
    }

    async fn fetch_tasks(&self, id: AtomId, include_done: bool) -> StoreResult<Vec<TaskRecord>> {
        let conn = self.lock()?;
        if !note_exists(&conn, id)? {
            return Err(StoreError::NotFound(id));
        }

        let mut stmt = conn.prepare(
            "SELECT uuid, content, task_status
             FROM atoms
             WHERE type = 'task'
               AND is_deleted = 0
               AND note_uuid = ?1
               AND (?2 = 1 OR task_status <> 'done')
             ORDER BY created_at ASC, rowid ASC;",
        )?;
        let mut rows = stmt.query(params![id.to_string(), i64::from(include_done)])?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            let uuid_text: String = row.get("uuid")?;
            let status_text: String = row.get("task_status")?;
            let status = parse_task_status(&status_text).ok_or_else(|| {
                StoreError::InvalidData(format!(
                    "invalid task status `{status_text}` in atoms.task_status"
                ))
            })?;
            tasks.push(TaskRecord {
                id: parse_uuid(&uuid_text)?,
                content: row.get("content")?,
                status,
            });
        }
        Ok(tasks)
    }

    async fn replace_content(&self, id: AtomId, content: &str) -> StoreResult<()> {
        let conn = self.lock()?;
        let changed = conn.execute(
            "UPDATE atoms
             SET
                content = ?2,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1
               AND type = 'note'
               AND is_deleted = 0;",
            params![id.to_string(), content],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }
}

/// Normalizes one tag value: trimmed, lowercase, `None` when blank.
pub fn normalize_tag(tag: &str) -> Option<String> {
    let trimmed = tag.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Normalizes and deduplicates tag values.
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut unique = BTreeSet::new();
    for tag in tags {
        if let Some(value) = normalize_tag(tag) {
            unique.insert(value);
        }
    }
    unique.into_iter().collect()
}

fn insert_atom(conn: &Connection, atom: &Atom) -> StoreResult<()> {
    atom.validate()
        .map_err(|err| StoreError::InvalidData(err.to_string()))?;
    conn.execute(
        "INSERT INTO atoms (
            uuid,
            type,
            title,
            content,
            task_status,
            note_uuid,
            is_deleted
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
        params![
            atom.uuid.to_string(),
            atom_type_to_db(atom.kind),
            atom.title.as_str(),
            atom.content.as_str(),
            atom.task_status.map(task_status_to_db),
            atom.note_uuid.map(|id| id.to_string()),
            i64::from(atom.is_deleted),
        ],
    )?;
    Ok(())
}

fn note_exists(conn: &Connection, id: AtomId) -> StoreResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM atoms
            WHERE uuid = ?1
              AND type = 'note'
              AND is_deleted = 0
        );",
        [id.to_string()],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn parse_uuid(value: &str) -> StoreResult<AtomId> {
    Uuid::parse_str(value)
        .map_err(|_| StoreError::InvalidData(format!("invalid uuid value `{value}` in atoms.uuid")))
}

fn atom_type_to_db(kind: AtomType) -> &'static str {
    match kind {
        AtomType::Note => "note",
        AtomType::Task => "task",
    }
}

fn task_status_to_db(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Todo => "todo",
        TaskStatus::InProgress => "in_progress",
        TaskStatus::Done => "done",
        TaskStatus::Cancelled => "cancelled",
    }
}

fn parse_task_status(value: &str) -> Option<TaskStatus> {
    match value {
        "todo" => Some(TaskStatus::Todo),
        "in_progress" => Some(TaskStatus::InProgress),
        "done" => Some(TaskStatus::Done),
        "cancelled" => Some(TaskStatus::Cancelled),
        _ => None,
    }
}
