use std::path::Path;
use std::sync::Arc;

use mediwhiz_core::config_file::{DEFAULT_OCR_DPI, ExtractionConfig};
use mediwhiz_core::{
    DEFAULT_MIN_EMBEDDED_CHARS, ExtractedText, ExtractionError, OcrEngine, OcrError, PdfBackend,
    PdfDocument,
};

/// Tunables for [`TextExtractor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractorConfig {
    /// Embedded text whose trimmed length is below this many characters is
    /// treated as insufficient and triggers the OCR pass (default: 100).
    pub min_embedded_chars: usize,
    /// Rasterization resolution for OCR (default: 300).
    pub ocr_dpi: u32,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            min_embedded_chars: DEFAULT_MIN_EMBEDDED_CHARS,
            ocr_dpi: DEFAULT_OCR_DPI,
        }
    }
}

impl ExtractorConfig {
    pub fn from_file_config(section: &ExtractionConfig) -> Self {
        let defaults = Self::default();
        Self {
            min_embedded_chars: section
                .min_embedded_chars
                .unwrap_or(defaults.min_embedded_chars),
            ocr_dpi: section.ocr_dpi.unwrap_or(defaults.ocr_dpi),
        }
    }
}

/// Which extraction path produced the returned text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionMethod {
    /// Embedded text layer (also used when OCR ran but produced less).
    Embedded,
    /// OCR of rasterized pages.
    Ocr,
    /// Plain-text input read as-is.
    PlainText,
}

/// Outcome of one extraction, with enough detail to log which path won.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionReport {
    pub text: ExtractedText,
    pub method: ExtractionMethod,
    pub page_count: usize,
    /// Trimmed character count of the embedded text.
    pub embedded_chars: usize,
    /// Character count of the OCR text, `None` when OCR was not attempted.
    pub ocr_chars: Option<usize>,
    /// Pages whose rasterization or recognition failed.
    pub ocr_failures: usize,
}

/// Extracts text from a document, falling back to OCR when the embedded
/// text layer is too thin.
///
/// Pipeline:
/// 1. Read the embedded text of every page and concatenate it in page order
/// 2. If the trimmed result has fewer than `min_embedded_chars` characters,
///    rasterize every page and OCR it, concatenating in page order
/// 3. Keep the OCR text only if it is strictly longer than the embedded text
///
/// OCR problems are logged and never fail the extraction.
#[derive(Clone)]
pub struct TextExtractor {
    backend: Arc<dyn PdfBackend>,
    ocr: Option<Arc<dyn OcrEngine>>,
    config: ExtractorConfig,
}

impl std::fmt::Debug for TextExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextExtractor")
            .field("ocr", &self.ocr.as_ref().map(|o| o.name().to_string()))
            .field("config", &self.config)
            .finish()
    }
}

impl TextExtractor {
    pub fn new(backend: Arc<dyn PdfBackend>, ocr: Option<Arc<dyn OcrEngine>>) -> Self {
        Self {
            backend,
            ocr,
            config: ExtractorConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ExtractorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// The OCR engine used for the fallback pass, if any.
    pub fn ocr(&self) -> Option<&dyn OcrEngine> {
        self.ocr.as_deref()
    }

    /// Extract the text of the document at `path`.
    ///
    /// Fails only when the document cannot be read. An empty string means
    /// nothing could be extracted.
    pub fn extract(&self, path: &Path) -> Result<ExtractedText, ExtractionError> {
        self.extract_detailed(path).map(|report| report.text)
    }

    /// Like [`extract`](Self::extract), but reports which path produced the text.
    ///
    /// `.txt` and `.md` files are read as-is; anything else goes through the
    /// PDF backend.
    pub fn extract_detailed(&self, path: &Path) -> Result<ExtractionReport, ExtractionError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "txt" | "md" => {
                let text = std::fs::read_to_string(path)?;
                Ok(ExtractionReport {
                    embedded_chars: text.trim().chars().count(),
                    text,
                    method: ExtractionMethod::PlainText,
                    page_count: 0,
                    ocr_chars: None,
                    ocr_failures: 0,
                })
            }
            _ => self.extract_pdf(path),
        }
    }

    fn extract_pdf(&self, path: &Path) -> Result<ExtractionReport, ExtractionError> {
        let document = self.backend.open(path)?;
        let page_count = document.page_count();

        let mut embedded = String::new();
        for index in 0..page_count {
            let page_text = document.page_text(index)?;
            if page_text.trim().is_empty() {
                tracing::debug!(page = index + 1, "page has no embedded text");
                continue;
            }
            embedded.push_str(&page_text);
        }

        let embedded_chars = embedded.trim().chars().count();
        let mut report = ExtractionReport {
            text: String::new(),
            method: ExtractionMethod::Embedded,
            page_count,
            embedded_chars,
            ocr_chars: None,
            ocr_failures: 0,
        };

        if embedded_chars >= self.config.min_embedded_chars || page_count == 0 {
            tracing::info!(
                path = %path.display(),
                pages = page_count,
                chars = embedded_chars,
                "extracted embedded text"
            );
            report.text = embedded;
            return Ok(report);
        }

        tracing::info!(
            path = %path.display(),
            pages = page_count,
            chars = embedded_chars,
            threshold = self.config.min_embedded_chars,
            "embedded text insufficient, falling back to OCR"
        );

        let (ocr_text, failures) = self.ocr_pages(document.as_ref(), page_count);
        let ocr_chars = ocr_text.chars().count();
        report.ocr_chars = Some(ocr_chars);
        report.ocr_failures = failures;

        if ocr_chars > embedded.chars().count() {
            report.method = ExtractionMethod::Ocr;
            report.text = ocr_text;
        } else {
            report.text = embedded;
        }

        tracing::info!(
            path = %path.display(),
            method = ?report.method,
            embedded_chars,
            ocr_chars,
            ocr_failures = failures,
            "extraction complete"
        );
        Ok(report)
    }

    /// OCR every page in order. Returns the concatenated text and the
    /// number of pages that failed. Never fails as a whole.
    fn ocr_pages(&self, document: &dyn PdfDocument, page_count: usize) -> (String, usize) {
        let Some(ocr) = self.ocr.as_deref() else {
            tracing::warn!("no OCR engine configured, keeping embedded text");
            return (String::new(), 0);
        };

        let scratch = match tempfile::Builder::new().prefix("mediwhiz-ocr-").tempdir() {
            Ok(dir) => dir,
            Err(e) => {
                tracing::warn!(error = %e, "failed to create OCR scratch directory");
                return (String::new(), 0);
            }
        };

        let mut text = String::new();
        let mut failures = 0;

        for index in 0..page_count {
            let page = index + 1;
            let image = scratch.path().join(format!("page-{page:04}.png"));

            let result = document
                .render_page(index, self.config.ocr_dpi, &image)
                .and_then(|()| ocr.recognize(&image));

            match result {
                Ok(page_text) => {
                    tracing::debug!(
                        page,
                        engine = ocr.name(),
                        preview = %preview(&page_text, 200),
                        "OCR extracted page"
                    );
                    text.push_str(&page_text);
                }
                Err(OcrError::Unavailable(reason)) => {
                    tracing::warn!(engine = ocr.name(), %reason, "OCR engine unavailable");
                    failures += page_count - index;
                    break;
                }
                Err(e) => {
                    tracing::warn!(page, engine = ocr.name(), error = %e, "OCR failed for page");
                    failures += 1;
                }
            }
        }

        (text, failures)
    }
}

/// First `max_chars` characters of `text` on one line, for logs.
fn preview(text: &str, max_chars: usize) -> String {
    text.chars()
        .take(max_chars)
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .collect()
}
