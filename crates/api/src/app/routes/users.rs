use axum::Json;
use axum::extract::Query;
use axum::response::IntoResponse;
use serde::Deserialize;

/// Query parameters for the login entry point.
#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    /// Where to send the client after authentication.
    pub next: Option<String>,
}

/// Entry point of the identity collaborator.
///
/// Actual login mechanics (credentials, sessions, token issuance) live with
/// the external identity provider; this endpoint only anchors the redirect
/// target and echoes the return location.
pub async fn login(Query(query): Query<LoginQuery>) -> impl IntoResponse {
    Json(serde_json::json!({
        "detail": "authentication is handled by the identity provider",
        "next": query.next,
    }))
}
