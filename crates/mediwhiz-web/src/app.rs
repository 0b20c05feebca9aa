use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the HTTP router. Uploads larger than `max_upload_bytes` are rejected.
pub fn router(state: Arc<AppState>, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(handlers::index::index))
        .route("/upload_pdf", post(handlers::upload::upload_pdf))
        .route(
            "/get_summary/{summary_id}",
            get(handlers::summary::get_summary),
        )
        .route("/view_pdf/{pdf_id}", get(handlers::pdf::view_pdf))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
