//! Note persistence contract.

use async_trait::async_trait;
use thiserror::Error;

use notekeep_core::UserId;
use notekeep_notes::{Note, NoteId, Slug};

pub mod in_memory;
#[cfg(feature = "postgres")]
pub mod postgres;

pub use in_memory::InMemoryNoteStore;

/// Storage-level error.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The slug is already used by some note (any author). The uniqueness
    /// constraint lives in the store so concurrent creates cannot both win;
    /// callers surface this as a form validation error.
    #[error("slug '{0}' is already in use")]
    DuplicateSlug(String),

    /// No note with the given id.
    #[error("note not found")]
    NotFound,

    /// The backend failed (connection lost, lock poisoned, bad row).
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// A validated note bound to its author, ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNote {
    pub title: String,
    pub text: String,
    pub slug: Slug,
    pub author: UserId,
}

/// Relational persistence for notes.
///
/// Implementations must assign strictly increasing ids in creation order and
/// enforce global slug uniqueness.
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Persist a new note. Fails with [`StoreError::DuplicateSlug`] when the
    /// slug is taken.
    async fn create(&self, note: NewNote) -> Result<Note, StoreError>;

    /// Look up a note by its slug.
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Note>, StoreError>;

    /// All notes owned by `author`, ordered by ascending id.
    async fn list_by_author(&self, author: UserId) -> Result<Vec<Note>, StoreError>;

    /// Replace a note's title and text. Slug and author are immutable.
    async fn update_content(
        &self,
        id: NoteId,
        title: String,
        text: String,
    ) -> Result<Note, StoreError>;

    /// Remove a note.
    async fn delete(&self, id: NoteId) -> Result<(), StoreError>;

    /// Total number of stored notes, across all authors.
    async fn count(&self) -> Result<u64, StoreError>;
}
