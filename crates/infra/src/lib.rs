//! `notekeep-infra` — persistence for the notes domain.
//!
//! The domain crates stay pure; everything that touches storage lives here,
//! behind the [`note_store::NoteStore`] contract.

pub mod note_store;

pub use note_store::{InMemoryNoteStore, NewNote, NoteStore, StoreError};

#[cfg(feature = "postgres")]
pub use note_store::postgres::PostgresNoteStore;
