use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use notekeep_core::{Entity, UserId};

use crate::slug::Slug;

/// Note identifier.
///
/// Surrogate key assigned by the store, strictly increasing in creation
/// order; list views sort by it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(pub i64);

impl core::fmt::Display for NoteId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<i64> for NoteId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// A short text note owned by a single user.
///
/// # Invariants
/// - `id`, `slug`, `author` and `created_at` never change after creation.
/// - Only the author may observe or mutate the note through the edit/delete
///   flows; to everyone else it does not exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    id: NoteId,
    title: String,
    text: String,
    slug: Slug,
    author: UserId,
    created_at: DateTime<Utc>,
}

impl Note {
    pub fn new(
        id: NoteId,
        title: String,
        text: String,
        slug: Slug,
        author: UserId,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title,
            text,
            slug,
            author,
            created_at,
        }
    }

    pub fn id_typed(&self) -> NoteId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn slug(&self) -> &Slug {
        &self.slug
    }

    pub fn author(&self) -> UserId {
        self.author
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Ownership check used by the edit/delete flows.
    pub fn is_authored_by(&self, user: UserId) -> bool {
        self.author == user
    }

    /// Apply an edit. The slug stays as it was; the edit flow never
    /// rewrites it.
    pub fn edit(&mut self, title: String, text: String) {
        self.title = title;
        self.text = text;
    }
}

impl Entity for Note {
    type Id = NoteId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
