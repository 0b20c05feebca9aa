use axum::Json;
use axum::extract::{Multipart, State};
use std::sync::Arc;

use mediwhiz_ingest::summarize_document;

use crate::models::{ApiError, UploadResponse};
use crate::state::AppState;
use crate::upload;

pub async fn upload_pdf(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let file = upload::parse_multipart(multipart).await.map_err(|e| {
        tracing::info!(reason = %e, "upload rejected");
        ApiError::from(e)
    })?;

    let pdf_id = state.pdfs.put(&file.data).map_err(|e| {
        tracing::error!(error = %e, "failed to store upload");
        ApiError::processing(e)
    })?;
    tracing::info!(
        pdf_id = %pdf_id,
        filename = %file.filename,
        bytes = file.data.len(),
        "stored upload"
    );

    let path = state
        .pdfs
        .existing_path(&pdf_id)
        .ok_or_else(|| ApiError::processing("stored PDF disappeared"))?;

    // MuPDF and tesseract are blocking
    let worker_state = Arc::clone(&state);
    let result = tokio::task::spawn_blocking(move || {
        summarize_document(
            &worker_state.extractor,
            &worker_state.summarizer,
            &path,
            worker_state.max_sentences,
            worker_state.min_content_chars,
        )
    })
    .await
    .map_err(|e| ApiError::processing(format!("task join error: {e}")))?;

    let document = result.map_err(|e| {
        tracing::warn!(pdf_id = %pdf_id, error = %e, "failed to process PDF");
        ApiError::from(e)
    })?;

    let summary_id = state.summaries.put(document.summary.as_bytes()).map_err(|e| {
        tracing::error!(pdf_id = %pdf_id, error = %e, "failed to store summary");
        ApiError::processing(e)
    })?;

    tracing::info!(
        pdf_id = %pdf_id,
        summary_id = %summary_id,
        method = ?document.extraction.method,
        pages = document.extraction.page_count,
        "PDF processed"
    );

    Ok(Json(UploadResponse {
        success: true,
        message: "PDF uploaded and processed successfully!".to_string(),
        original_filename: file.filename,
        pdf_id,
        summary_id,
    }))
}
