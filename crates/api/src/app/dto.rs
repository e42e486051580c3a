use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Deserialize;
use serde_json::json;

use notekeep_notes::{FormErrors, Note, NoteForm};

// -------------------------
// Request bodies (form-encoded)
// -------------------------

/// The add form: `title`, `text`, optional `slug`. Missing fields behave
/// like blank form inputs rather than failing deserialization.
#[derive(Debug, Deserialize)]
pub struct NoteFormBody {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub slug: Option<String>,
}

/// The edit form: `title` and `text` only; the slug is immutable on edit.
#[derive(Debug, Deserialize)]
pub struct EditNoteBody {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub text: String,
}

// -------------------------
// Response contexts
// -------------------------

pub fn note_to_json(note: &Note) -> serde_json::Value {
    json!({
        "id": note.id_typed().0,
        "title": note.title(),
        "text": note.text(),
        "slug": note.slug().as_str(),
        "author": note.author().to_string(),
        "created_at": note.created_at().to_rfc3339(),
    })
}

/// The add/edit page context: the (possibly bound) form instance.
pub fn form_context(form: &NoteForm) -> axum::response::Response {
    (StatusCode::OK, Json(json!({ "form": form }))).into_response()
}

/// A re-rendered form with field errors. Still a 200: the request reached
/// the form and the form is reporting back, nothing was mutated.
pub fn form_with_errors(form: &NoteForm, errors: &FormErrors) -> axum::response::Response {
    (
        StatusCode::OK,
        Json(json!({ "form": form, "errors": errors })),
    )
        .into_response()
}
