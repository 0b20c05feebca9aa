use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use mediwhiz_core::{ExtractionError, OcrEngine, OcrError, PdfBackend, PdfDocument};
use mediwhiz_ingest::{
    ExtractionMethod, ExtractorConfig, IngestError, TextExtractor, summarize_document,
};
use mediwhiz_summarize::Summarizer;

/// In-memory document: each entry is one page's embedded text.
#[derive(Clone)]
struct FakeBackend {
    pages: Vec<String>,
    renders: Arc<AtomicUsize>,
}

impl FakeBackend {
    fn new(pages: &[&str]) -> Self {
        Self {
            pages: pages.iter().map(|p| p.to_string()).collect(),
            renders: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl PdfBackend for FakeBackend {
    fn open(&self, path: &Path) -> Result<Box<dyn PdfDocument>, ExtractionError> {
        if path.to_string_lossy().contains("corrupt") {
            return Err(ExtractionError::Open("not a PDF".into()));
        }
        Ok(Box::new(self.clone()))
    }
}

impl PdfDocument for FakeBackend {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_text(&self, index: usize) -> Result<String, ExtractionError> {
        Ok(self.pages[index].clone())
    }

    fn render_page(&self, _index: usize, _dpi: u32, target: &Path) -> Result<(), OcrError> {
        self.renders.fetch_add(1, Ordering::SeqCst);
        std::fs::write(target, b"png")?;
        Ok(())
    }
}

/// Returns a fixed string per call, or fails on selected pages.
struct FakeOcr {
    text: String,
    failing_pages: Vec<usize>,
    calls: AtomicUsize,
}

impl FakeOcr {
    fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            failing_pages: Vec::new(),
            calls: AtomicUsize::new(0),
        }
    }
}

impl OcrEngine for FakeOcr {
    fn name(&self) -> &str {
        "fake"
    }

    fn recognize(&self, image: &Path) -> Result<String, OcrError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        assert!(image.exists(), "rendered image should exist before OCR");
        if self.failing_pages.contains(&call) {
            return Err(OcrError::Engine(format!("page {call} unreadable")));
        }
        Ok(self.text.clone())
    }
}

struct UnavailableOcr;

impl OcrEngine for UnavailableOcr {
    fn name(&self) -> &str {
        "missing"
    }

    fn recognize(&self, _image: &Path) -> Result<String, OcrError> {
        Err(OcrError::Unavailable("not installed".into()))
    }
}

fn extractor(backend: &FakeBackend, ocr: Arc<dyn OcrEngine>) -> TextExtractor {
    TextExtractor::new(Arc::new(backend.clone()), Some(ocr))
}

const LONG_PAGE: &str = "Hemoglobin 13.5 g/dL within reference range. White cell count 6.2 normal. \
Platelets 250 normal. Sodium 140 mmol/L normal.\n";

#[test]
fn ocr_not_invoked_when_embedded_text_is_sufficient() {
    let backend = FakeBackend::new(&[LONG_PAGE]);
    let ocr = Arc::new(FakeOcr::new("should never be used"));
    let report = extractor(&backend, ocr.clone())
        .extract_detailed(Path::new("labs.pdf"))
        .unwrap();

    assert_eq!(report.text, LONG_PAGE);
    assert_eq!(report.method, ExtractionMethod::Embedded);
    assert_eq!(report.ocr_chars, None);
    assert_eq!(ocr.calls.load(Ordering::SeqCst), 0);
    assert_eq!(backend.renders.load(Ordering::SeqCst), 0);
}

#[test]
fn pages_concatenate_in_order_without_separator() {
    let backend = FakeBackend::new(&[LONG_PAGE, "", "Second page.\n"]);
    let ocr = Arc::new(FakeOcr::new(""));
    let text = extractor(&backend, ocr)
        .extract(Path::new("labs.pdf"))
        .unwrap();
    assert_eq!(text, format!("{LONG_PAGE}Second page.\n"));
}

#[test]
fn scanned_document_uses_longer_ocr_text() {
    let backend = FakeBackend::new(&["", "  \n", ""]);
    let ocr = Arc::new(FakeOcr::new("Scanned page text. "));
    let report = extractor(&backend, ocr.clone())
        .extract_detailed(Path::new("scan.pdf"))
        .unwrap();

    assert_eq!(report.method, ExtractionMethod::Ocr);
    assert_eq!(report.text, "Scanned page text. ".repeat(3));
    assert_eq!(report.page_count, 3);
    assert_eq!(report.embedded_chars, 0);
    assert_eq!(ocr.calls.load(Ordering::SeqCst), 3);
    assert_eq!(backend.renders.load(Ordering::SeqCst), 3);
}

#[test]
fn embedded_text_kept_when_ocr_is_not_longer() {
    let backend = FakeBackend::new(&["Short embedded note about the visit."]);
    let ocr = Arc::new(FakeOcr::new("noise"));
    let report = extractor(&backend, ocr.clone())
        .extract_detailed(Path::new("note.pdf"))
        .unwrap();

    assert_eq!(report.method, ExtractionMethod::Embedded);
    assert_eq!(report.text, "Short embedded note about the visit.");
    assert_eq!(report.ocr_chars, Some(5));
    assert_eq!(ocr.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn zero_page_document_yields_empty_text_without_ocr() {
    let backend = FakeBackend::new(&[]);
    let ocr = Arc::new(FakeOcr::new("unused"));
    let report = extractor(&backend, ocr.clone())
        .extract_detailed(Path::new("empty.pdf"))
        .unwrap();

    assert_eq!(report.text, "");
    assert_eq!(report.page_count, 0);
    assert_eq!(ocr.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn failed_ocr_pages_are_skipped() {
    let backend = FakeBackend::new(&["", "", ""]);
    let ocr = Arc::new(FakeOcr {
        failing_pages: vec![2],
        ..FakeOcr::new("Readable page. ")
    });
    let report = extractor(&backend, ocr)
        .extract_detailed(Path::new("scan.pdf"))
        .unwrap();

    assert_eq!(report.text, "Readable page. Readable page. ");
    assert_eq!(report.ocr_failures, 1);
}

#[test]
fn unavailable_ocr_engine_keeps_embedded_text() {
    let backend = FakeBackend::new(&["tiny", "", ""]);
    let report = extractor(&backend, Arc::new(UnavailableOcr))
        .extract_detailed(Path::new("scan.pdf"))
        .unwrap();

    assert_eq!(report.text, "tiny");
    assert_eq!(report.method, ExtractionMethod::Embedded);
    assert_eq!(report.ocr_failures, 3);
    // Stops after the first unavailable error
    assert_eq!(backend.renders.load(Ordering::SeqCst), 1);
}

#[test]
fn no_ocr_engine_configured() {
    let backend = FakeBackend::new(&["tiny"]);
    let report = TextExtractor::new(Arc::new(backend.clone()), None)
        .extract_detailed(Path::new("scan.pdf"))
        .unwrap();
    assert_eq!(report.text, "tiny");
    assert_eq!(backend.renders.load(Ordering::SeqCst), 0);
}

#[test]
fn threshold_is_configurable() {
    let backend = FakeBackend::new(&["Twelve chars"]);
    let ocr = Arc::new(FakeOcr::new("much longer OCR output"));
    let report = extractor(&backend, ocr.clone())
        .with_config(ExtractorConfig {
            min_embedded_chars: 12,
            ..ExtractorConfig::default()
        })
        .extract_detailed(Path::new("note.pdf"))
        .unwrap();

    assert_eq!(report.method, ExtractionMethod::Embedded);
    assert_eq!(ocr.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn unreadable_document_is_an_error() {
    let backend = FakeBackend::new(&[LONG_PAGE]);
    let err = extractor(&backend, Arc::new(FakeOcr::new("")))
        .extract(Path::new("corrupt.pdf"))
        .unwrap_err();
    assert!(matches!(err, ExtractionError::Open(_)));
}

#[test]
fn plain_text_files_bypass_the_backend() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("note.TXT");
    std::fs::write(&path, "Typed discharge note.").unwrap();

    let backend = FakeBackend::new(&[]);
    let report = extractor(&backend, Arc::new(FakeOcr::new("")))
        .extract_detailed(&path)
        .unwrap();
    assert_eq!(report.method, ExtractionMethod::PlainText);
    assert_eq!(report.text, "Typed discharge note.");
}

#[test]
fn summarize_document_rejects_thin_text() {
    let backend = FakeBackend::new(&["Too short."]);
    let err = summarize_document(
        &extractor(&backend, Arc::new(FakeOcr::new(""))),
        &Summarizer::default(),
        Path::new("thin.pdf"),
        5,
        50,
    )
    .unwrap_err();

    match err {
        IngestError::InsufficientContent(e) => {
            assert_eq!(e.chars, 10);
            assert_eq!(e.required, 50);
        }
        other => panic!("expected InsufficientContent, got {other:?}"),
    }
}

#[test]
fn summarize_document_returns_summary_and_report() {
    let backend = FakeBackend::new(&[LONG_PAGE]);
    let result = summarize_document(
        &extractor(&backend, Arc::new(FakeOcr::new(""))),
        &Summarizer::default(),
        Path::new("labs.pdf"),
        2,
        50,
    )
    .unwrap();

    assert_eq!(result.extraction.method, ExtractionMethod::Embedded);
    assert!(!result.summary.is_empty());
    assert!(result.summary.chars().count() < LONG_PAGE.chars().count());
}
