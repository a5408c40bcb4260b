use axum::{middleware, routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::headers::{no_store_middleware, request_id_middleware};

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    // Signed URLs must never be cached by intermediaries, so every /api
    // response carries the no-store header set.
    let api = Router::new()
        .route("/film/:id", get(handlers::get_film_url))
        .route("/film", get(handlers::get_film_url_without_id))
        .layer(middleware::from_fn(no_store_middleware));

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api", api)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
