use std::sync::Arc;

use axum::{
    extract::State,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use notekeep_auth::JwtValidator;

use crate::app::routes::common::redirect_found;
use crate::context::IdentityContext;

#[derive(Clone)]
pub struct AuthState {
    pub jwt: Arc<dyn JwtValidator>,
}

/// Establish the request identity, or bounce to the login collaborator.
///
/// Anonymous (or stale-token) requests get `302 /users/login/?next=<path>`
/// rather than a bare 401, so the client can come back to where it was.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    // Keep the query string so the client comes back to the exact page.
    let path = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| req.uri().path())
        .to_string();

    let Some(token) = extract_bearer(req.headers()) else {
        return login_redirect(&path);
    };

    let claims = match state.jwt.validate(token, Utc::now()) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::debug!("rejected token: {e}");
            return login_redirect(&path);
        }
    };

    req.extensions_mut()
        .insert(IdentityContext::new(claims.sub, claims.username));

    next.run(req).await
}

fn login_redirect(next_path: &str) -> Response {
    redirect_found(&format!("/users/login/?next={next_path}"))
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(axum::http::header::AUTHORIZATION)?;
    let header = header.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token)
}
