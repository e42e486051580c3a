use std::sync::Arc;

use axum::{
    Form, Json,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use notekeep_infra::{NewNote, StoreError};
use notekeep_notes::{FormErrors, Note, NoteForm};

use crate::app::routes::common::{SUCCESS_URL, redirect_found};
use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::IdentityContext;

/// `GET /notes/` — the requester's notes, ascending id.
pub async fn list(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<IdentityContext>,
) -> axum::response::Response {
    let notes = match services.notes().list_by_author(identity.user_id()).await {
        Ok(notes) => notes,
        Err(e) => return errors::store_error_to_response(e),
    };

    (
        StatusCode::OK,
        Json(json!({
            "object_list": notes.iter().map(dto::note_to_json).collect::<Vec<_>>(),
            "count": notes.len(),
        })),
    )
        .into_response()
}

/// `GET /notes/add/` — the unbound form.
pub async fn add_form() -> axum::response::Response {
    dto::form_context(&NoteForm::empty())
}

/// `POST /notes/add/` — create a note for the requester.
pub async fn add(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<IdentityContext>,
    Form(body): Form<dto::NoteFormBody>,
) -> axum::response::Response {
    let form = NoteForm::new(body.title, body.text, body.slug);

    let draft = match form.validate() {
        Ok(draft) => draft,
        Err(field_errors) => return dto::form_with_errors(&form, &field_errors),
    };

    let new_note = NewNote {
        title: draft.title,
        text: draft.text,
        slug: draft.slug,
        author: identity.user_id(),
    };

    match services.notes().create(new_note).await {
        Ok(note) => {
            tracing::info!(slug = %note.slug(), "note created");
            redirect_found(SUCCESS_URL)
        }
        // The store is the authority on uniqueness; fold the conflict back
        // into a field error on the re-rendered form.
        Err(StoreError::DuplicateSlug(slug)) => {
            dto::form_with_errors(&form, &FormErrors::slug_in_use(&slug))
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

/// `GET /notes/<slug>/edit/` — the form bound to the note.
pub async fn edit_form(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<IdentityContext>,
    Path(slug): Path<String>,
) -> axum::response::Response {
    match fetch_owned(&services, &identity, &slug).await {
        Ok(note) => dto::form_context(&NoteForm::bound(&note)),
        Err(resp) => resp,
    }
}

/// `POST /notes/<slug>/edit/` — update title/text; the slug never changes.
pub async fn edit(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<IdentityContext>,
    Path(slug): Path<String>,
    Form(body): Form<dto::EditNoteBody>,
) -> axum::response::Response {
    let note = match fetch_owned(&services, &identity, &slug).await {
        Ok(note) => note,
        Err(resp) => return resp,
    };

    let form = NoteForm::new(
        body.title,
        body.text,
        Some(note.slug().as_str().to_string()),
    );
    let draft = match form.validate() {
        Ok(draft) => draft,
        Err(field_errors) => return dto::form_with_errors(&form, &field_errors),
    };

    match services
        .notes()
        .update_content(note.id_typed(), draft.title, draft.text)
        .await
    {
        Ok(_) => redirect_found(SUCCESS_URL),
        Err(StoreError::NotFound) => errors::not_found(),
        Err(e) => errors::store_error_to_response(e),
    }
}

/// `POST|DELETE /notes/<slug>/delete/` — remove the note.
pub async fn delete(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<IdentityContext>,
    Path(slug): Path<String>,
) -> axum::response::Response {
    let note = match fetch_owned(&services, &identity, &slug).await {
        Ok(note) => note,
        Err(resp) => return resp,
    };

    match services.notes().delete(note.id_typed()).await {
        Ok(()) => {
            tracing::info!(slug = %note.slug(), "note deleted");
            redirect_found(SUCCESS_URL)
        }
        Err(StoreError::NotFound) => errors::not_found(),
        Err(e) => errors::store_error_to_response(e),
    }
}

/// `GET /notes/success/` — confirmation target after mutations.
pub async fn success() -> axum::response::Response {
    (StatusCode::OK, Json(json!({ "detail": "done" }))).into_response()
}

/// Resolve a slug to a note owned by the requester.
///
/// A note owned by someone else answers exactly like a note that does not
/// exist.
async fn fetch_owned(
    services: &AppServices,
    identity: &IdentityContext,
    slug: &str,
) -> Result<Note, axum::response::Response> {
    match services.notes().find_by_slug(slug).await {
        Ok(Some(note)) if note.is_authored_by(identity.user_id()) => Ok(note),
        Ok(_) => Err(errors::not_found()),
        Err(e) => Err(errors::store_error_to_response(e)),
    }
}
