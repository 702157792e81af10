//! SQLite-backed note storage
//!
//! One `notes` table keyed by the note id. The primary key is what makes
//! `add` atomic: a second insert of the same id fails with a constraint
//! violation, reported as `RepositoryError::Duplicate`.

use super::{NoteRepository, RepositoryError, RepositoryResult};
use async_trait::async_trait;
use notes_types::Note;
use rusqlite::{Connection, ErrorCode, OptionalExtension, Row, params};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

pub struct SqliteNoteRepository {
    conn: Mutex<Connection>,
}

impl SqliteNoteRepository {
    /// Open (or create) the database file and ensure the notes table exists
    pub fn open(path: &Path) -> RepositoryResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Self::with_connection(Connection::open(path)?)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> RepositoryResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> RepositoryResult<Self> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS notes (
                id INTEGER PRIMARY KEY,
                title TEXT NOT NULL,
                content TEXT NOT NULL
            )",
            [],
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| RepositoryError::Poisoned)
    }
}

fn row_to_note(row: &Row<'_>) -> rusqlite::Result<Note> {
    Ok(Note {
        id: row.get(0)?,
        title: row.get(1)?,
        content: row.get(2)?,
    })
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
    )
}

#[async_trait]
impl NoteRepository for SqliteNoteRepository {
    fn backend(&self) -> &'static str {
        "sqlite"
    }

    async fn list_all(&self) -> RepositoryResult<Vec<Note>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT id, title, content FROM notes ORDER BY id")?;
        let notes = stmt
            .query_map([], row_to_note)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(notes)
    }

    async fn exists(&self, id: i64) -> RepositoryResult<bool> {
        let conn = self.conn()?;
        let found: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM notes WHERE id = ?1)",
            params![id],
            |row| row.get(0),
        )?;
        Ok(found)
    }

    async fn get_by_id(&self, id: i64) -> RepositoryResult<Option<Note>> {
        let conn = self.conn()?;
        let note = conn
            .query_row(
                "SELECT id, title, content FROM notes WHERE id = ?1",
                params![id],
                row_to_note,
            )
            .optional()?;
        Ok(note)
    }

    async fn add(&self, note: Note) -> RepositoryResult<Note> {
        let conn = self.conn()?;
        let inserted = conn.execute(
            "INSERT INTO notes (id, title, content) VALUES (?1, ?2, ?3)",
            params![note.id, note.title, note.content],
        );
        match inserted {
            Ok(_) => Ok(note),
            Err(e) if is_constraint_violation(&e) => Err(RepositoryError::Duplicate(note.id)),
            Err(e) => Err(e.into()),
        }
    }

    async fn update(&self, note: Note) -> RepositoryResult<()> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE notes SET title = ?2, content = ?3 WHERE id = ?1",
            params![note.id, note.title, note.content],
        )?;
        if changed == 0 {
            return Err(RepositoryError::Missing(note.id));
        }
        Ok(())
    }

    async fn remove(&self, id: i64) -> RepositoryResult<bool> {
        let conn = self.conn()?;
        let changed = conn.execute("DELETE FROM notes WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::contract;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_sqlite_add_then_get() {
        contract::add_then_get(&SqliteNoteRepository::open_in_memory().unwrap()).await;
    }

    #[tokio::test]
    async fn test_sqlite_duplicate_add_is_rejected() {
        contract::duplicate_add_is_rejected(&SqliteNoteRepository::open_in_memory().unwrap())
            .await;
    }

    #[tokio::test]
    async fn test_sqlite_list_is_ordered_by_id() {
        contract::list_is_ordered_by_id(&SqliteNoteRepository::open_in_memory().unwrap()).await;
    }

    #[tokio::test]
    async fn test_sqlite_update_replaces_fields() {
        contract::update_replaces_fields(&SqliteNoteRepository::open_in_memory().unwrap()).await;
    }

    #[tokio::test]
    async fn test_sqlite_remove_reports_whether_deleted() {
        contract::remove_reports_whether_deleted(&SqliteNoteRepository::open_in_memory().unwrap())
            .await;
    }

    #[test]
    fn test_sqlite_open_reports_unusable_parent_dir() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();

        let result = SqliteNoteRepository::open(&blocker.join("notes.db"));
        assert!(matches!(result, Err(RepositoryError::Io(_))));
    }

    #[tokio::test]
    async fn test_sqlite_notes_survive_reopen() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("data").join("notes.db");

        {
            let repo = SqliteNoteRepository::open(&db_path).expect("Failed to open store");
            repo.add(contract::note(11, "persisted")).await.unwrap();
        }

        let repo = SqliteNoteRepository::open(&db_path).expect("Failed to reopen store");
        assert_eq!(
            repo.get_by_id(11).await.unwrap(),
            Some(contract::note(11, "persisted"))
        );
    }
}
