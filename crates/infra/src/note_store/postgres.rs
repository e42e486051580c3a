use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use notekeep_core::UserId;
use notekeep_notes::{Note, NoteId, Slug};

use super::{NewNote, NoteStore, StoreError};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS notes (
    id         BIGSERIAL PRIMARY KEY,
    title      TEXT NOT NULL,
    text       TEXT NOT NULL,
    slug       TEXT NOT NULL UNIQUE,
    author     UUID NOT NULL,
    created_at TIMESTAMPTZ NOT NULL
)
"#;

const NOTE_COLUMNS: &str = "id, title, text, slug, author, created_at";

/// Postgres-backed note store.
///
/// The `UNIQUE` index on `slug` is the authoritative uniqueness check; a
/// violated insert comes back as [`StoreError::DuplicateSlug`].
pub struct PostgresNoteStore {
    pool: PgPool,
}

impl PostgresNoteStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPool::connect(database_url).await.map_err(backend)?;
        Ok(Self::new(pool))
    }

    /// Create the notes table if it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(SCHEMA).execute(&self.pool).await.map_err(backend)?;
        Ok(())
    }
}

fn backend(e: sqlx::Error) -> StoreError {
    StoreError::Backend(e.to_string())
}

fn row_to_note(row: &PgRow) -> Result<Note, StoreError> {
    let id: i64 = row.try_get("id").map_err(backend)?;
    let title: String = row.try_get("title").map_err(backend)?;
    let text: String = row.try_get("text").map_err(backend)?;
    let slug: String = row.try_get("slug").map_err(backend)?;
    let author: uuid::Uuid = row.try_get("author").map_err(backend)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(backend)?;

    let slug = Slug::parse(&slug)
        .map_err(|e| StoreError::Backend(format!("stored slug is invalid: {e}")))?;

    Ok(Note::new(
        NoteId(id),
        title,
        text,
        slug,
        UserId::from_uuid(author),
        created_at,
    ))
}

#[async_trait]
impl NoteStore for PostgresNoteStore {
    async fn create(&self, note: NewNote) -> Result<Note, StoreError> {
        let sql = format!(
            "INSERT INTO notes (title, text, slug, author, created_at) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {NOTE_COLUMNS}"
        );

        let result = sqlx::query(&sql)
            .bind(&note.title)
            .bind(&note.text)
            .bind(note.slug.as_str())
            .bind(note.author.as_uuid())
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await;

        match result {
            Ok(row) => row_to_note(&row),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(StoreError::DuplicateSlug(note.slug.as_str().to_string()))
            }
            Err(e) => Err(backend(e)),
        }
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Note>, StoreError> {
        let sql = format!("SELECT {NOTE_COLUMNS} FROM notes WHERE slug = $1");
        let row = sqlx::query(&sql)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(backend)?;

        row.as_ref().map(row_to_note).transpose()
    }

    async fn list_by_author(&self, author: UserId) -> Result<Vec<Note>, StoreError> {
        let sql = format!("SELECT {NOTE_COLUMNS} FROM notes WHERE author = $1 ORDER BY id ASC");
        let rows = sqlx::query(&sql)
            .bind(author.as_uuid())
            .fetch_all(&self.pool)
            .await
            .map_err(backend)?;

        rows.iter().map(row_to_note).collect()
    }

    async fn update_content(
        &self,
        id: NoteId,
        title: String,
        text: String,
    ) -> Result<Note, StoreError> {
        let sql = format!(
            "UPDATE notes SET title = $1, text = $2 WHERE id = $3 RETURNING {NOTE_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(&title)
            .bind(&text)
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(backend)?;

        match row {
            Some(row) => row_to_note(&row),
            None => Err(StoreError::NotFound),
        }
    }

    async fn delete(&self, id: NoteId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM notes WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(backend)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM notes")
            .fetch_one(&self.pool)
            .await
            .map_err(backend)?;
        let n: i64 = row.try_get("n").map_err(backend)?;
        Ok(n as u64)
    }
}
