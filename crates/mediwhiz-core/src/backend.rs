use std::path::Path;

use thiserror::Error;

/// The document itself could not be read. This is the only extraction
/// failure that reaches the caller; OCR problems are reported as [`OcrError`]
/// and absorbed by the extractor.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("failed to open PDF: {0}")]
    Open(String),
    #[error("failed to read page {page}: {message}")]
    Page { page: usize, message: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum OcrError {
    #[error("OCR engine unavailable: {0}")]
    Unavailable(String),
    #[error("failed to rasterize page {page}: {message}")]
    Render { page: usize, message: String },
    #[error("OCR engine failed: {0}")]
    Engine(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait for PDF backends.
///
/// A backend only knows how to open a file; everything page-level goes
/// through the returned [`PdfDocument`]. The embedded-text/OCR fallback policy
/// lives in `mediwhiz_ingest::TextExtractor`.
pub trait PdfBackend: Send + Sync {
    fn open(&self, path: &Path) -> Result<Box<dyn PdfDocument>, ExtractionError>;
}

/// An opened document. Dropped as soon as extraction returns.
pub trait PdfDocument {
    fn page_count(&self) -> usize;

    /// Embedded text of the 0-based page `index`. Pages without a text
    /// layer return an empty string, not an error.
    fn page_text(&self, index: usize) -> Result<String, ExtractionError>;

    /// Rasterize the 0-based page `index` at `dpi` and write it as PNG to
    /// `target`. Only called on the OCR fallback path.
    fn render_page(&self, index: usize, dpi: u32, target: &Path) -> Result<(), OcrError>;
}

/// Trait for optical character recognition engines.
pub trait OcrEngine: Send + Sync {
    /// Short engine name for logs.
    fn name(&self) -> &str;

    /// Recognize the text in the image file at `image`.
    fn recognize(&self, image: &Path) -> Result<String, OcrError>;

    /// Cheap check that the engine can run at all, for startup diagnostics.
    fn is_available(&self) -> bool {
        true
    }
}
