//! HTTP API: routes, handlers and error mapping.

pub mod error;
pub mod handlers;
pub mod index;

use axum::{routing::get, Router};

use crate::store::AppState;

/// All verification routes plus health and the index page.
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(index::index))
        .route("/api/health", get(handlers::health))
        .route(
            "/api/verifications",
            get(handlers::list_verifications).post(handlers::create_verification),
        )
        .route("/api/verifications/:id", get(handlers::get_verification))
        .with_state(state)
}
