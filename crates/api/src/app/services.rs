use std::sync::Arc;

use notekeep_infra::{InMemoryNoteStore, NoteStore};

/// Shared application services, injected into handlers as an extension.
#[derive(Clone)]
pub struct AppServices {
    notes: Arc<dyn NoteStore>,
}

impl AppServices {
    pub fn new(notes: Arc<dyn NoteStore>) -> Self {
        Self { notes }
    }

    pub fn notes(&self) -> &dyn NoteStore {
        self.notes.as_ref()
    }
}

/// Wire up the note store.
///
/// In-memory by default; with the `postgres` feature and `DATABASE_URL` set,
/// the persistent store is used instead.
pub async fn build_services() -> AppServices {
    #[cfg(feature = "postgres")]
    if let Ok(url) = std::env::var("DATABASE_URL") {
        let store = notekeep_infra::PostgresNoteStore::connect(&url)
            .await
            .expect("failed to connect to DATABASE_URL");
        store
            .ensure_schema()
            .await
            .expect("failed to ensure notes schema");
        return AppServices::new(Arc::new(store));
    }

    AppServices::new(Arc::new(InMemoryNoteStore::new()))
}
