use once_cell::sync::Lazy;

pub mod config;
pub mod frequency;
pub mod summarizer;
pub mod tokenize;
pub mod vocabulary;

pub use config::{ListOverride, ScoreAggregation, SummarizerConfig, SummarizerConfigBuilder};
pub use frequency::FrequencyTable;
pub use summarizer::Summarizer;
pub use vocabulary::Vocabulary;
// Re-export domain types from core (canonical definitions live there)
pub use mediwhiz_core::{Sentence, SummarizationError};

static DEFAULT_SUMMARIZER: Lazy<Summarizer> = Lazy::new(Summarizer::default);

/// Summarize `text` with the built-in English stopwords and medical domain terms.
///
/// Pipeline:
/// 1. Split the text into sentences; return it unchanged if it has
///    `max_sentences` or fewer
/// 2. Count non-stopword word frequencies over the whole text, first
///    suppressing domain terms that occur in more than half as many places
///    as there are sentences
/// 3. Score each sentence by its mean word frequency
/// 4. Keep the top `max_sentences` sentences in document order
pub fn summarize(text: &str, max_sentences: usize) -> Result<String, SummarizationError> {
    DEFAULT_SUMMARIZER.summarize(text, max_sentences)
}
