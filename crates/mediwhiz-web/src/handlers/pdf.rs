use axum::extract::{Path, Request, State};
use axum::response::{IntoResponse, Response};
use std::sync::Arc;
use tower::ServiceExt;
use tower_http::services::ServeFile;

use crate::models::ApiError;
use crate::state::AppState;

/// Stream a stored PDF back as `application/pdf`.
pub async fn view_pdf(
    State(state): State<Arc<AppState>>,
    Path(pdf_id): Path<String>,
    request: Request,
) -> Response {
    let Some(path) = state.pdfs.existing_path(&pdf_id) else {
        return ApiError::not_found("PDF not found").into_response();
    };

    match ServeFile::new(path).oneshot(request).await {
        Ok(response) => response.into_response(),
        Err(never) => match never {},
    }
}
