pub mod classify;
pub mod detections;
pub mod health;
pub mod profile;
pub mod tracking;
pub mod triggers;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use tower_http::services::{ServeDir, ServeFile};

use crate::constants::DEFAULT_BODY_LIMIT;
use crate::middleware::{rate_limit, request_id};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .nest("/classify", classify::router())
        .nest("/triggers", triggers::router())
        .nest("/detections", detections::router())
        .nest("/tracking", tracking::router())
        .nest("/profile", profile::router())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            rate_limit::rate_limit_middleware,
        ))
        .layer(DefaultBodyLimit::max(DEFAULT_BODY_LIMIT));

    // Browser client (including the classifier wasm bundle) with SPA fallback
    let spa_fallback = ServeDir::new("static").not_found_service(ServeFile::new("static/index.html"));

    Router::new()
        .nest("/api", api_routes)
        .nest("/health", health::router())
        .fallback_service(spa_fallback)
        .layer(axum::middleware::from_fn(request_id::request_id_middleware))
        .with_state(state)
}
