use super::{NoteRepository, RepositoryError, RepositoryResult};
use async_trait::async_trait;
use notes_types::Note;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use tokio::sync::RwLock;

/// Process-local note store. Contents are lost on restart.
#[derive(Default)]
pub struct MemoryNoteRepository {
    notes: RwLock<BTreeMap<i64, Note>>,
}

impl MemoryNoteRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NoteRepository for MemoryNoteRepository {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn list_all(&self) -> RepositoryResult<Vec<Note>> {
        Ok(self.notes.read().await.values().cloned().collect())
    }

    async fn exists(&self, id: i64) -> RepositoryResult<bool> {
        Ok(self.notes.read().await.contains_key(&id))
    }

    async fn get_by_id(&self, id: i64) -> RepositoryResult<Option<Note>> {
        Ok(self.notes.read().await.get(&id).cloned())
    }

    async fn add(&self, note: Note) -> RepositoryResult<Note> {
        match self.notes.write().await.entry(note.id) {
            Entry::Occupied(_) => Err(RepositoryError::Duplicate(note.id)),
            Entry::Vacant(slot) => Ok(slot.insert(note).clone()),
        }
    }

    async fn update(&self, note: Note) -> RepositoryResult<()> {
        let id = note.id;
        match self.notes.write().await.get_mut(&id) {
            Some(existing) => {
                *existing = note;
                Ok(())
            }
            None => Err(RepositoryError::Missing(id)),
        }
    }

    async fn remove(&self, id: i64) -> RepositoryResult<bool> {
        Ok(self.notes.write().await.remove(&id).is_some())
    }
}
