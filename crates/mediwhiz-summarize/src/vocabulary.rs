//! Stopword and domain-term word lists.
//!
//! Loaded once when a [`Summarizer`](crate::Summarizer) is built and shared
//! read-only across requests afterwards.

use std::collections::HashSet;
use std::path::Path;

use mediwhiz_core::SummarizationError;

use crate::config::SummarizerConfig;

/// English stopwords (the NLTK `english` list).
pub static ENGLISH_STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn",
    "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn",
    "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan",
    "shan't", "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't",
    "wouldn", "wouldn't",
];

/// Generic medical vocabulary that is common in almost every clinical
/// document and rarely tells sentences apart.
pub static MEDICAL_DOMAIN_TERMS: &[&str] = &[
    "patient", "patients", "test", "tests", "testing", "result", "results", "doctor",
    "physician", "hospital", "clinic", "clinical", "medical", "medicine", "treatment",
    "diagnosis", "report", "blood", "level", "levels", "normal", "history", "examination",
    "exam", "medication", "medications", "dose", "symptoms", "condition", "care", "health",
    "disease", "therapy", "laboratory", "lab", "sample", "specimen", "value", "values", "range",
];

/// The word lists a summarizer scores against.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    stopwords: HashSet<String>,
    domain_terms: Vec<String>,
}

impl Vocabulary {
    pub fn new(
        stopwords: impl IntoIterator<Item = String>,
        domain_terms: impl IntoIterator<Item = String>,
    ) -> Self {
        let stopwords = stopwords.into_iter().map(|w| w.to_lowercase()).collect();
        let mut domain_terms: Vec<String> =
            domain_terms.into_iter().map(|w| w.to_lowercase()).collect();
        domain_terms.sort();
        domain_terms.dedup();
        Self {
            stopwords,
            domain_terms,
        }
    }

    /// Built-in English stopwords and medical domain terms.
    pub fn english_medical() -> Self {
        Self::new(
            ENGLISH_STOPWORDS.iter().map(|s| s.to_string()),
            MEDICAL_DOMAIN_TERMS.iter().map(|s| s.to_string()),
        )
    }

    /// Resolve the word lists described by `config`, reading the stopword
    /// file if one is configured.
    pub fn from_config(config: &SummarizerConfig) -> Result<Self, SummarizationError> {
        let base_stopwords: Vec<String> = match config.stopwords_file() {
            Some(path) => read_word_list(path)?,
            None => ENGLISH_STOPWORDS.iter().map(|s| s.to_string()).collect(),
        };
        let default_terms: Vec<String> =
            MEDICAL_DOMAIN_TERMS.iter().map(|s| s.to_string()).collect();

        Ok(Self::new(
            config.stopwords.resolve(&base_stopwords),
            config.domain_terms.resolve(&default_terms),
        ))
    }

    pub fn stopwords(&self) -> &HashSet<String> {
        &self.stopwords
    }

    pub fn domain_terms(&self) -> &[String] {
        &self.domain_terms
    }
}

/// Read a newline-delimited word list. Blank lines and `#` comments are skipped.
pub fn read_word_list(path: &Path) -> Result<Vec<String>, SummarizationError> {
    let content = std::fs::read_to_string(path).map_err(|source| SummarizationError::WordList {
        path: path.to_path_buf(),
        source,
    })?;

    let words: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(str::to_lowercase)
        .collect();

    if words.is_empty() {
        return Err(SummarizationError::EmptyWordList(path.to_path_buf()));
    }
    Ok(words)
}
