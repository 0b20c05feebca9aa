use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use std::sync::Arc;

use crate::models::{ApiError, SummaryResponse};
use crate::state::AppState;

pub async fn get_summary(
    State(state): State<Arc<AppState>>,
    Path(summary_id): Path<String>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let bytes = state.summaries.get(&summary_id).map_err(|e| {
        tracing::error!(summary_id = %summary_id, error = %e, "failed to read summary");
        ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Error retrieving summary: {e}"),
        )
    })?;

    let Some(bytes) = bytes else {
        return Err(ApiError::not_found("Summary not found"));
    };

    Ok(Json(SummaryResponse {
        success: true,
        summary: String::from_utf8_lossy(&bytes).into_owned(),
    }))
}
