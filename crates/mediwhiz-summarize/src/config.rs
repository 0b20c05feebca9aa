use std::path::{Path, PathBuf};

use mediwhiz_core::DEFAULT_MAX_SENTENCES;
use mediwhiz_core::config_file::{DEFAULT_DOMAIN_RATIO, SummaryConfig};

/// Controls how a list of values is overridden from its defaults.
#[derive(Debug, Clone, Default)]
pub enum ListOverride<T> {
    /// Use the built-in defaults.
    #[default]
    Default,
    /// Completely replace the defaults with these values.
    Replace(Vec<T>),
    /// Append these values to the defaults.
    Extend(Vec<T>),
}

impl<T: Clone> ListOverride<T> {
    /// Resolve this override against the given defaults.
    pub fn resolve(&self, defaults: &[T]) -> Vec<T> {
        match self {
            ListOverride::Default => defaults.to_vec(),
            ListOverride::Replace(v) => v.clone(),
            ListOverride::Extend(v) => {
                let mut result = defaults.to_vec();
                result.extend(v.iter().cloned());
                result
            }
        }
    }

    fn push(&mut self, value: T) {
        match self {
            ListOverride::Extend(v) | ListOverride::Replace(v) => v.push(value),
            ListOverride::Default => *self = ListOverride::Extend(vec![value]),
        }
    }
}

/// How per-word frequencies are combined into a sentence score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScoreAggregation {
    /// Sum of frequencies divided by the sentence's word count.
    #[default]
    Mean,
    /// Plain sum of frequencies. Favors long sentences.
    Sum,
}

impl std::str::FromStr for ScoreAggregation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mean" => Ok(ScoreAggregation::Mean),
            "sum" => Ok(ScoreAggregation::Sum),
            other => Err(format!("unknown score aggregation '{other}' (expected mean or sum)")),
        }
    }
}

/// Configuration for the extractive summarizer.
///
/// Use [`SummarizerConfigBuilder`] to construct anything other than the defaults.
#[derive(Debug, Clone)]
pub struct SummarizerConfig {
    /// Sentences kept in a summary (default: 5).
    pub(crate) max_sentences: usize,
    pub(crate) aggregation: ScoreAggregation,
    /// Suppress over-frequent domain terms before scoring (default: on).
    pub(crate) domain_suppression: bool,
    /// Domain term threshold as a fraction of the sentence count (default: 0.5).
    pub(crate) domain_ratio: f64,
    /// Replaces the built-in English stopwords when set.
    pub(crate) stopwords_file: Option<PathBuf>,
    pub(crate) stopwords: ListOverride<String>,
    pub(crate) domain_terms: ListOverride<String>,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            max_sentences: DEFAULT_MAX_SENTENCES,
            aggregation: ScoreAggregation::Mean,
            domain_suppression: true,
            domain_ratio: DEFAULT_DOMAIN_RATIO,
            stopwords_file: None,
            stopwords: ListOverride::Default,
            domain_terms: ListOverride::Default,
        }
    }
}

impl SummarizerConfig {
    pub fn max_sentences(&self) -> usize {
        self.max_sentences
    }

    pub fn aggregation(&self) -> ScoreAggregation {
        self.aggregation
    }

    pub fn domain_suppression(&self) -> bool {
        self.domain_suppression
    }

    pub fn domain_ratio(&self) -> f64 {
        self.domain_ratio
    }

    pub fn stopwords_file(&self) -> Option<&Path> {
        self.stopwords_file.as_deref()
    }
}

/// Builder for [`SummarizerConfig`].
#[derive(Debug, Clone, Default)]
pub struct SummarizerConfigBuilder {
    max_sentences: Option<usize>,
    aggregation: Option<ScoreAggregation>,
    domain_suppression: Option<bool>,
    domain_ratio: Option<f64>,
    stopwords_file: Option<PathBuf>,
    stopwords: ListOverride<String>,
    domain_terms: ListOverride<String>,
}

impl SummarizerConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from the `[summary]` section of a config file.
    pub fn from_file_config(section: &SummaryConfig) -> Self {
        let mut builder = Self::new();
        builder.max_sentences = section.max_sentences;
        builder.domain_suppression = section.domain_suppression;
        builder.domain_ratio = section.domain_ratio;
        builder.stopwords_file = section.stopwords_file.as_ref().map(PathBuf::from);
        if let Some(name) = &section.aggregation {
            match name.parse() {
                Ok(aggregation) => builder.aggregation = Some(aggregation),
                Err(e) => tracing::warn!(error = %e, "ignoring summary.aggregation"),
            }
        }
        for word in section.extra_stopwords.iter().flatten() {
            builder.stopwords.push(word.clone());
        }
        for term in section.extra_domain_terms.iter().flatten() {
            builder.domain_terms.push(term.clone());
        }
        builder
    }

    pub fn max_sentences(mut self, n: usize) -> Self {
        self.max_sentences = Some(n);
        self
    }

    pub fn aggregation(mut self, aggregation: ScoreAggregation) -> Self {
        self.aggregation = Some(aggregation);
        self
    }

    pub fn domain_suppression(mut self, enabled: bool) -> Self {
        self.domain_suppression = Some(enabled);
        self
    }

    pub fn domain_ratio(mut self, ratio: f64) -> Self {
        self.domain_ratio = Some(ratio);
        self
    }

    pub fn stopwords_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.stopwords_file = Some(path.into());
        self
    }

    // ── Stopwords ──

    pub fn set_stopwords(mut self, words: Vec<String>) -> Self {
        self.stopwords = ListOverride::Replace(words);
        self
    }

    pub fn add_stopword(mut self, word: String) -> Self {
        self.stopwords.push(word);
        self
    }

    // ── Domain terms ──

    pub fn set_domain_terms(mut self, terms: Vec<String>) -> Self {
        self.domain_terms = ListOverride::Replace(terms);
        self
    }

    pub fn add_domain_term(mut self, term: String) -> Self {
        self.domain_terms.push(term);
        self
    }

    pub fn build(self) -> SummarizerConfig {
        let defaults = SummarizerConfig::default();
        SummarizerConfig {
            max_sentences: self.max_sentences.unwrap_or(defaults.max_sentences),
            aggregation: self.aggregation.unwrap_or(defaults.aggregation),
            domain_suppression: self
                .domain_suppression
                .unwrap_or(defaults.domain_suppression),
            domain_ratio: self.domain_ratio.unwrap_or(defaults.domain_ratio),
            stopwords_file: self.stopwords_file,
            stopwords: self.stopwords,
            domain_terms: self.domain_terms,
        }
    }
}
