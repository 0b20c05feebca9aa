use std::sync::Arc;

use mediwhiz_ingest::TextExtractor;
use mediwhiz_summarize::Summarizer;

use crate::storage::Store;

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub extractor: TextExtractor,
    pub summarizer: Arc<Summarizer>,
    /// Uploaded PDFs, `<uuid>.pdf`.
    pub pdfs: Store,
    /// Generated summaries, `<uuid>.txt`.
    pub summaries: Store,
    pub max_sentences: usize,
    /// Extracted text must be longer than this (trimmed, in chars).
    pub min_content_chars: usize,
}
