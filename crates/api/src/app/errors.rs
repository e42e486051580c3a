use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use notekeep_infra::StoreError;

/// Map a store failure that reached the handler unhandled.
///
/// `DuplicateSlug` is normally intercepted and folded into form errors; it
/// only falls through here on paths where no form is in play.
pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    match err {
        StoreError::DuplicateSlug(slug) => json_error(
            StatusCode::BAD_REQUEST,
            "duplicate_slug",
            format!("slug '{slug}' is already in use"),
        ),
        StoreError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "note not found"),
        StoreError::Backend(msg) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", msg)
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// The not-found answer given for mutations on notes the requester does not
/// own. Identical to the missing-note answer, so existence is not leaked.
pub fn not_found() -> axum::response::Response {
    json_error(StatusCode::NOT_FOUND, "not_found", "note not found")
}
