//! Note form validation.
//!
//! Mirrors server-rendered form handling: a submitted form either produces a
//! persistable [`NoteDraft`] or a set of field-scoped errors to re-render
//! with. Slug *uniqueness* is not checked here; the store reports conflicts
//! and the caller folds them back in via [`FormErrors::slug_in_use`].

use std::collections::BTreeMap;

use serde::Serialize;

use crate::note::Note;
use crate::slug::Slug;

/// Suffix appended to a duplicate slug value in its field error.
pub const WARNING: &str = " — already in use, choose another";

const REQUIRED: &str = "this field is required";

/// Field-scoped validation errors, keyed by form field name.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// The error reported when a slug is already taken by any note,
    /// regardless of author.
    pub fn slug_in_use(slug: &str) -> Self {
        let mut errors = Self::new();
        errors.add("slug", format!("{slug}{WARNING}"));
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.fields
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field(&self, name: &str) -> &[String] {
        self.fields.get(name).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// A user-submitted note form: `title`, `text`, optional `slug`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteForm {
    pub title: String,
    pub text: String,
    pub slug: Option<String>,
}

impl NoteForm {
    /// Build a form from raw submitted fields. A present-but-blank slug field
    /// counts as absent, as it does when an empty form input is posted.
    pub fn new(title: String, text: String, slug: Option<String>) -> Self {
        let slug = slug.filter(|s| !s.trim().is_empty());
        Self { title, text, slug }
    }

    /// The unbound form shown on the add page.
    pub fn empty() -> Self {
        Self {
            title: String::new(),
            text: String::new(),
            slug: None,
        }
    }

    /// A form bound to an existing note, as shown on the edit page.
    pub fn bound(note: &Note) -> Self {
        Self {
            title: note.title().to_string(),
            text: note.text().to_string(),
            slug: Some(note.slug().as_str().to_string()),
        }
    }

    /// Validate the form into a persistable draft.
    ///
    /// When no slug was submitted, one is derived from the title. All field
    /// problems are collected so the form can report them together.
    pub fn validate(&self) -> Result<NoteDraft, FormErrors> {
        let mut errors = FormErrors::new();

        let title = self.title.trim();
        if title.is_empty() {
            errors.add("title", REQUIRED);
        }

        let text = self.text.trim();
        if text.is_empty() {
            errors.add("text", REQUIRED);
        }

        let slug = match &self.slug {
            Some(raw) => match Slug::parse(raw) {
                Ok(slug) => Some(slug),
                Err(e) => {
                    errors.add("slug", e.to_string());
                    None
                }
            },
            None if !title.is_empty() => match Slug::derive(title) {
                Some(slug) => Some(slug),
                None => {
                    errors.add("slug", "cannot derive a slug from the title, provide one");
                    None
                }
            },
            None => None,
        };

        match (slug, errors.is_empty()) {
            (Some(slug), true) => Ok(NoteDraft {
                title: title.to_string(),
                text: text.to_string(),
                slug,
            }),
            _ => Err(errors),
        }
    }
}

/// A validated note, ready to be bound to an author and persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    pub text: String,
    pub slug: Slug,
}
