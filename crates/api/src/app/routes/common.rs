use axum::http::{StatusCode, header};
use axum::response::IntoResponse;

/// Redirect target for successful note mutations.
pub const SUCCESS_URL: &str = "/notes/success/";

/// A plain `302 Found` redirect.
///
/// Built by hand because `axum::response::Redirect::to` emits 303, and the
/// surface here answers mutations with 302.
pub fn redirect_found(location: &str) -> axum::response::Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}
