//! Note persistence capability and its backends.
//!
//! The HTTP layer only ever talks to `dyn NoteRepository`; which backend sits
//! behind it is decided once at startup from configuration.

mod memory;
mod sqlite;

pub use memory::MemoryNoteRepository;
pub use sqlite::SqliteNoteRepository;

use async_trait::async_trait;
use notes_types::Note;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("note {0} already exists")]
    Duplicate(i64),
    #[error("note {0} does not exist")]
    Missing(i64),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("repository lock poisoned")]
    Poisoned,
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Storage for notes keyed by their integer id.
///
/// Implementations must make `add` atomic with respect to id uniqueness:
/// two concurrent adds of the same id must not both succeed.
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// Short backend name reported by `/status`
    fn backend(&self) -> &'static str;

    /// All notes, ordered by ascending id
    async fn list_all(&self) -> RepositoryResult<Vec<Note>>;

    async fn exists(&self, id: i64) -> RepositoryResult<bool>;

    async fn get_by_id(&self, id: i64) -> RepositoryResult<Option<Note>>;

    /// Insert a new note. Fails with `Duplicate` if the id is taken.
    async fn add(&self, note: Note) -> RepositoryResult<Note>;

    /// Replace an existing note. Fails with `Missing` if the id is absent.
    async fn update(&self, note: Note) -> RepositoryResult<()>;

    /// Returns true if a note was removed
    async fn remove(&self, id: i64) -> RepositoryResult<bool>;
}
