use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use notekeep_core::UserId;
use notekeep_notes::{Note, NoteId};

use super::{NewNote, NoteStore, StoreError};

/// In-memory note store.
///
/// Intended for tests/dev. One lock serializes all mutations, which is what
/// enforces slug uniqueness under concurrent creates.
#[derive(Debug, Default)]
pub struct InMemoryNoteStore {
    inner: RwLock<Inner>,
}

#[derive(Debug)]
struct Inner {
    next_id: i64,
    // BTreeMap keyed by id so iteration yields creation order.
    notes: BTreeMap<NoteId, Note>,
}

impl Default for Inner {
    fn default() -> Self {
        Self {
            next_id: 1,
            notes: BTreeMap::new(),
        }
    }
}

impl InMemoryNoteStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> StoreError {
    StoreError::Backend("lock poisoned".to_string())
}

#[async_trait]
impl NoteStore for InMemoryNoteStore {
    async fn create(&self, note: NewNote) -> Result<Note, StoreError> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;

        if inner
            .notes
            .values()
            .any(|n| n.slug().as_str() == note.slug.as_str())
        {
            return Err(StoreError::DuplicateSlug(note.slug.as_str().to_string()));
        }

        let id = NoteId(inner.next_id);
        inner.next_id += 1;

        let stored = Note::new(id, note.title, note.text, note.slug, note.author, Utc::now());
        inner.notes.insert(id, stored.clone());
        Ok(stored)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Note>, StoreError> {
        let inner = self.inner.read().map_err(|_| poisoned())?;
        Ok(inner
            .notes
            .values()
            .find(|n| n.slug().as_str() == slug)
            .cloned())
    }

    async fn list_by_author(&self, author: UserId) -> Result<Vec<Note>, StoreError> {
        let inner = self.inner.read().map_err(|_| poisoned())?;
        Ok(inner
            .notes
            .values()
            .filter(|n| n.author() == author)
            .cloned()
            .collect())
    }

    async fn update_content(
        &self,
        id: NoteId,
        title: String,
        text: String,
    ) -> Result<Note, StoreError> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;
        let note = inner.notes.get_mut(&id).ok_or(StoreError::NotFound)?;
        note.edit(title, text);
        Ok(note.clone())
    }

    async fn delete(&self, id: NoteId) -> Result<(), StoreError> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;
        inner.notes.remove(&id).map(|_| ()).ok_or(StoreError::NotFound)
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let inner = self.inner.read().map_err(|_| poisoned())?;
        Ok(inner.notes.len() as u64)
    }
}
