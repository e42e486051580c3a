use axum::{
    Router,
    routing::{get, post},
};

pub mod common;
pub mod notes;
pub mod system;
pub mod users;

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .route("/notes/", get(notes::list))
        .route("/notes/add/", get(notes::add_form).post(notes::add))
        .route("/notes/:slug/edit/", get(notes::edit_form).post(notes::edit))
        .route(
            "/notes/:slug/delete/",
            post(notes::delete).delete(notes::delete),
        )
}
