use rusqlite::Connection;
use wallboard_core::db::migrations::latest_version;
use wallboard_core::db::{open_db, open_db_in_memory, DbError};
use wallboard_core::{DocumentStore, SqliteDocumentStore, StoreError, TagFilter};

#[test]
fn open_db_in_memory_creates_document_schema() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "atoms");
    assert_table_exists(&conn, "tags");
    assert_table_exists(&conn, "atom_tags");
}

#[test]
fn version_two_database_gains_task_owner_column() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("v2.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE atoms (
            uuid TEXT PRIMARY KEY NOT NULL,
            type TEXT NOT NULL CHECK (type IN ('note', 'task')),
            title TEXT NOT NULL DEFAULT '',
            content TEXT NOT NULL DEFAULT '',
            task_status TEXT,
            is_deleted INTEGER NOT NULL DEFAULT 0,
            created_at INTEGER NOT NULL DEFAULT 0,
            updated_at INTEGER NOT NULL DEFAULT 0
        );
        CREATE TABLE tags (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE COLLATE NOCASE
        );
        CREATE TABLE atom_tags (
            atom_uuid TEXT NOT NULL REFERENCES atoms (uuid) ON DELETE CASCADE,
            tag_id INTEGER NOT NULL REFERENCES tags (id) ON DELETE CASCADE,
            PRIMARY KEY (atom_uuid, tag_id)
        );
        INSERT INTO atoms (uuid, type, title, content)
        VALUES ('6f1c2b0e-8a57-4a53-9d5e-2f4f0c1b9a10', 'note', 'Legacy', 'kept:: yes');
        PRAGMA user_version = 2;",
    )
    .unwrap();
    drop(conn);

    let upgraded = open_db(&path).unwrap();
    assert_eq!(schema_version(&upgraded), latest_version());
    let owners: i64 = upgraded
        .query_row(
            "SELECT COUNT(*) FROM atoms WHERE note_uuid IS NULL;",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(owners, 1);
}

#[tokio::test]
async fn reopened_store_keeps_notes_and_tags() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wallboard.sqlite3");

    let note = {
        let store = SqliteDocumentStore::open(&path).unwrap();
        let note = store.create_note("Persisted", "rank:: 1").unwrap();
        store
            .set_note_tags(note, &["q".to_string(), "g".to_string()])
            .unwrap();
        note
    };

    let store = SqliteDocumentStore::open(&path).unwrap();
    let handles = store
        .filter_by_tags(&TagFilter::for_group("q", "g"))
        .await
        .unwrap();
    assert_eq!(handles.len(), 1);
    assert_eq!(handles[0].id, note);
    assert_eq!(store.fetch_content(note).await.unwrap(), "rank:: 1");
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }

    let store_err = SqliteDocumentStore::open(&path).err().unwrap();
    assert!(matches!(
        store_err,
        StoreError::Db(DbError::UnsupportedSchemaVersion { .. })
    ));
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
