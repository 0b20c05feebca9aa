use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;

use mediwhiz_core::config_file::{
    self, DEFAULT_BIND, DEFAULT_MAX_UPLOAD_MB, DEFAULT_SUMMARY_DIR, DEFAULT_UPLOAD_DIR,
};
use mediwhiz_core::{DEFAULT_MAX_SENTENCES, DEFAULT_MIN_CONTENT_CHARS};
use mediwhiz_summarize::{Summarizer, SummarizerConfigBuilder};

mod app;
mod handlers;
mod logging;
mod models;
mod state;
mod storage;
mod upload;

use state::AppState;
use storage::Store;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    logging::init_tracing();

    let config = config_file::merge(
        config_file::load_config(),
        config_file::env_overlay(|key| std::env::var(key).ok()),
    );
    let server = config.server();
    let summary = config.summary();

    let summarizer = Summarizer::new(SummarizerConfigBuilder::from_file_config(&summary).build())
        .context("failed to load summarizer word lists")?;

    let extractor = mediwhiz_ingest::default_extractor(&config)?;
    if let Some(ocr) = extractor.ocr()
        && !ocr.is_available()
    {
        tracing::warn!(
            engine = ocr.name(),
            "OCR engine not available, scanned PDFs will not be OCRed"
        );
    }

    let upload_dir = server
        .upload_dir
        .unwrap_or_else(|| DEFAULT_UPLOAD_DIR.to_string());
    let summary_dir = server
        .summary_dir
        .unwrap_or_else(|| DEFAULT_SUMMARY_DIR.to_string());
    let pdfs = Store::open(&upload_dir, "pdf")
        .with_context(|| format!("failed to create upload directory {upload_dir}"))?;
    let summaries = Store::open(&summary_dir, "txt")
        .with_context(|| format!("failed to create summary directory {summary_dir}"))?;
    tracing::info!(
        uploads = %pdfs.dir().display(),
        summaries = %summaries.dir().display(),
        "storage ready"
    );

    let state = Arc::new(AppState {
        extractor,
        summarizer: Arc::new(summarizer),
        pdfs,
        summaries,
        max_sentences: summary.max_sentences.unwrap_or(DEFAULT_MAX_SENTENCES),
        min_content_chars: summary.min_content_chars.unwrap_or(DEFAULT_MIN_CONTENT_CHARS),
    });

    let max_upload_bytes = server.max_upload_mb.unwrap_or(DEFAULT_MAX_UPLOAD_MB) * 1024 * 1024;
    let app = app::router(state, max_upload_bytes);

    let bind = server.bind.unwrap_or_else(|| DEFAULT_BIND.to_string());
    let addr: SocketAddr = bind
        .parse()
        .with_context(|| format!("invalid bind address {bind}"))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
