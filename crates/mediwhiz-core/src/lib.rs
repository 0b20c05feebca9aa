use std::path::PathBuf;

use thiserror::Error;

pub mod backend;
pub mod config_file;

pub use backend::{ExtractionError, OcrEngine, OcrError, PdfBackend, PdfDocument};

/// Default minimum trimmed length of embedded text before OCR is attempted.
pub const DEFAULT_MIN_EMBEDDED_CHARS: usize = 100;

/// Default minimum trimmed length of extracted text before summarization.
pub const DEFAULT_MIN_CONTENT_CHARS: usize = 50;

/// Default number of sentences kept in a summary.
pub const DEFAULT_MAX_SENTENCES: usize = 5;

/// Text extracted from a whole document, pages concatenated in order.
/// An empty string means nothing could be extracted.
pub type ExtractedText = String;

/// A sentence of the source text with its position and score.
#[derive(Debug, Clone, PartialEq)]
pub struct Sentence {
    /// 0-based position in the source text.
    pub index: usize,
    pub text: String,
    pub score: f64,
}

#[derive(Error, Debug)]
pub enum SummarizationError {
    #[error("max_sentences must be at least 1")]
    InvalidMaxSentences,
    #[error("failed to read word list {path}: {source}")]
    WordList {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("word list {0} is empty")]
    EmptyWordList(PathBuf),
}

/// Extracted text was too short to summarize.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("insufficient text extracted: {chars} characters, need more than {required}")]
pub struct InsufficientContentError {
    pub chars: usize,
    pub required: usize,
}

/// Reject text whose trimmed length is not strictly greater than `required` characters.
pub fn check_min_content(text: &str, required: usize) -> Result<(), InsufficientContentError> {
    let chars = text.trim().chars().count();
    if chars > required {
        Ok(())
    } else {
        Err(InsufficientContentError { chars, required })
    }
}
