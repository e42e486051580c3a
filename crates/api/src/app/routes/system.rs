use axum::Json;
use axum::extract::Extension;
use axum::http::StatusCode;
use axum::response::IntoResponse;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn whoami(
    Extension(identity): Extension<crate::context::IdentityContext>,
) -> impl IntoResponse {
    Json(serde_json::json!({
        "user_id": identity.user_id().to_string(),
        "username": identity.username(),
    }))
}
