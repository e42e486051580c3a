//! HTTP API application wiring (Axum router + service wiring).
//!
//! Folder structure:
//! - `services.rs`: infrastructure wiring (note store selection)
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: request bodies and JSON context mapping
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub async fn build_app(jwt_secret: String) -> Router {
    let jwt: Arc<dyn notekeep_auth::JwtValidator> =
        Arc::new(notekeep_auth::Hs256JwtValidator::new(jwt_secret.into_bytes()));
    let auth_state = middleware::AuthState { jwt };

    let services = Arc::new(services::build_services().await);

    // Protected routes: require an authenticated identity.
    let protected = routes::router()
        .layer(Extension(services))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::auth_middleware,
        ));

    // Navigation targets stay public: login entry point, the post-mutation
    // success page, and health.
    Router::new()
        .route("/health", get(routes::system::health))
        .route("/notes/success/", get(routes::notes::success))
        .route("/users/login/", get(routes::users::login))
        .merge(protected)
}
