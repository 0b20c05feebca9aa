use std::path::Path;

use thiserror::Error;

use mediwhiz_core::config_file::{ConfigFile, DEFAULT_OCR_LANGUAGE};
use mediwhiz_core::check_min_content;
use mediwhiz_ocr::TesseractOcr;
use mediwhiz_summarize::Summarizer;

pub mod extractor;

pub use extractor::{ExtractionMethod, ExtractionReport, ExtractorConfig, TextExtractor};
// Re-export domain types for convenience
pub use mediwhiz_core::{ExtractionError, InsufficientContentError, SummarizationError};

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("text extraction error: {0}")]
    Extraction(#[from] ExtractionError),
    #[error(transparent)]
    InsufficientContent(#[from] InsufficientContentError),
    #[error("summarization error: {0}")]
    Summarization(#[from] SummarizationError),
    #[cfg(not(feature = "pdf"))]
    #[error("PDF support not compiled in (enable the `pdf` feature of mediwhiz-ingest)")]
    NoPdfSupport,
}

/// A document's extraction report together with its summary.
#[derive(Debug, Clone)]
pub struct DocumentSummary {
    pub extraction: ExtractionReport,
    pub summary: String,
}

/// Extract a document and summarize it.
///
/// Fails with [`IngestError::InsufficientContent`] when the extracted text,
/// trimmed, is not longer than `min_content_chars` characters.
pub fn summarize_document(
    extractor: &TextExtractor,
    summarizer: &Summarizer,
    path: &Path,
    max_sentences: usize,
    min_content_chars: usize,
) -> Result<DocumentSummary, IngestError> {
    let extraction = extractor.extract_detailed(path)?;
    check_min_content(&extraction.text, min_content_chars)?;
    let summary = summarizer.summarize(&extraction.text, max_sentences)?;

    tracing::info!(
        path = %path.display(),
        source_chars = extraction.text.chars().count(),
        summary_chars = summary.chars().count(),
        "document summarized"
    );
    Ok(DocumentSummary {
        extraction,
        summary,
    })
}

/// Tesseract engine as described by the `[extraction]` config section.
pub fn ocr_engine(config: &ConfigFile) -> TesseractOcr {
    let section = config.extraction();
    let mut ocr = TesseractOcr::new().with_language(
        section
            .ocr_language
            .unwrap_or_else(|| DEFAULT_OCR_LANGUAGE.to_string()),
    );
    if let Some(binary) = section.tesseract_path {
        ocr = ocr.with_binary(binary);
    }
    if let Some(psm) = section.ocr_psm {
        ocr = ocr.with_page_segmentation(psm);
    }
    ocr
}

/// Extractor backed by MuPDF and tesseract, configured from `config`.
#[cfg(feature = "pdf")]
pub fn default_extractor(config: &ConfigFile) -> Result<TextExtractor, IngestError> {
    use std::sync::Arc;

    let section = config.extraction();
    let backend = Arc::new(mediwhiz_pdf_mupdf::MupdfBackend::from_config(&section));
    let ocr: Arc<dyn mediwhiz_core::OcrEngine> = Arc::new(ocr_engine(config));
    Ok(TextExtractor::new(backend, Some(ocr)).with_config(ExtractorConfig::from_file_config(&section)))
}

#[cfg(not(feature = "pdf"))]
pub fn default_extractor(_config: &ConfigFile) -> Result<TextExtractor, IngestError> {
    Err(IngestError::NoPdfSupport)
}
