//! Notes domain module.
//!
//! This crate contains the business rules for notes, implemented purely as
//! deterministic domain logic (no IO, no HTTP, no storage): the `Note` entity,
//! the `Slug` value type with its derivation rules, and form validation with
//! field-scoped errors.

pub mod form;
pub mod note;
pub mod slug;

pub use form::{FormErrors, NoteDraft, NoteForm, WARNING};
pub use note::{Note, NoteId};
pub use slug::{MAX_SLUG_LEN, Slug};
