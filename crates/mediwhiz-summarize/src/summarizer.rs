use std::sync::Arc;

use mediwhiz_core::{Sentence, SummarizationError};

use crate::config::{ScoreAggregation, SummarizerConfig};
use crate::frequency::{FrequencyTable, build_with_domain_suppression};
use crate::tokenize;
use crate::vocabulary::Vocabulary;

/// Frequency-based extractive summarizer.
///
/// Holds only read-only state (configuration and word lists), so one
/// instance can be shared across threads behind an `Arc`. Frequency tables
/// and sentence scores are rebuilt on every call.
#[derive(Debug, Clone)]
pub struct Summarizer {
    config: SummarizerConfig,
    vocabulary: Arc<Vocabulary>,
}

impl Default for Summarizer {
    fn default() -> Self {
        Self {
            config: SummarizerConfig::default(),
            vocabulary: Arc::new(Vocabulary::english_medical()),
        }
    }
}

impl Summarizer {
    /// Build a summarizer, loading the word lists `config` describes.
    pub fn new(config: SummarizerConfig) -> Result<Self, SummarizationError> {
        let vocabulary = Vocabulary::from_config(&config)?;
        tracing::debug!(
            stopwords = vocabulary.stopwords().len(),
            domain_terms = vocabulary.domain_terms().len(),
            "summarizer vocabulary loaded"
        );
        Ok(Self::with_vocabulary(config, Arc::new(vocabulary)))
    }

    pub fn with_vocabulary(config: SummarizerConfig, vocabulary: Arc<Vocabulary>) -> Self {
        Self { config, vocabulary }
    }

    pub fn config(&self) -> &SummarizerConfig {
        &self.config
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Configured default for `max_sentences`.
    pub fn max_sentences(&self) -> usize {
        self.config.max_sentences
    }

    /// Summarize `text` down to at most `max_sentences` sentences.
    ///
    /// Text that already has `max_sentences` sentences or fewer is returned
    /// unchanged. Otherwise the highest-scoring sentences are returned in
    /// their original order, joined by single spaces. Equal scores prefer
    /// the earlier sentence.
    pub fn summarize(&self, text: &str, max_sentences: usize) -> Result<String, SummarizationError> {
        if max_sentences == 0 {
            return Err(SummarizationError::InvalidMaxSentences);
        }

        let sentences = tokenize::sentences(text);
        if sentences.len() <= max_sentences {
            tracing::debug!(
                sentences = sentences.len(),
                max_sentences,
                "text already short enough, skipping summarization"
            );
            return Ok(text.to_string());
        }

        let selected = pick(self.score_sentences(text, sentences), max_sentences);
        let summary = selected
            .into_iter()
            .map(|s| s.text)
            .collect::<Vec<_>>()
            .join(" ");
        Ok(summary)
    }

    /// The sentences [`summarize`](Self::summarize) keeps, with their scores,
    /// in document order. Unlike `summarize`, short texts are scored too.
    pub fn select(&self, text: &str, max_sentences: usize) -> Result<Vec<Sentence>, SummarizationError> {
        if max_sentences == 0 {
            return Err(SummarizationError::InvalidMaxSentences);
        }
        Ok(pick(self.score(text), max_sentences))
    }

    /// Score every sentence of `text`, in document order.
    pub fn score(&self, text: &str) -> Vec<Sentence> {
        self.score_sentences(text, tokenize::sentences(text))
    }

    /// Build the document's frequency table. Returns the table and the domain
    /// terms that were suppressed for this document.
    pub fn frequency_table(&self, text: &str, sentence_count: usize) -> (FrequencyTable, Vec<String>) {
        let words = tokenize::words(text);
        let stopwords = self.vocabulary.stopwords();

        if !self.config.domain_suppression {
            let table = FrequencyTable::build(words.iter().map(String::as_str), stopwords);
            return (table, Vec::new());
        }

        let (table, suppressed) = build_with_domain_suppression(
            &words,
            stopwords,
            self.vocabulary.domain_terms(),
            sentence_count,
            self.config.domain_ratio,
        );
        if !suppressed.is_empty() {
            tracing::debug!(terms = ?suppressed, "suppressed over-frequent domain terms");
        }
        (table, suppressed)
    }

    fn score_sentences(&self, text: &str, sentences: Vec<String>) -> Vec<Sentence> {
        let (table, _) = self.frequency_table(text, sentences.len());

        sentences
            .into_iter()
            .enumerate()
            .map(|(index, text)| {
                let score = self.score_sentence(&text, &table);
                Sentence { index, text, score }
            })
            .collect()
    }

    fn score_sentence(&self, sentence: &str, table: &FrequencyTable) -> f64 {
        let words = tokenize::words(sentence);
        if words.is_empty() {
            return 0.0;
        }
        let total: usize = words.iter().map(|w| table.get(w)).sum();
        match self.config.aggregation {
            ScoreAggregation::Mean => total as f64 / words.len() as f64,
            ScoreAggregation::Sum => total as f64,
        }
    }
}

/// Top `k` by score (earlier index wins ties), returned in document order.
fn pick(mut scored: Vec<Sentence>, k: usize) -> Vec<Sentence> {
    scored.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.index.cmp(&b.index)));
    scored.truncate(k);
    scored.sort_by_key(|s| s.index);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SummarizerConfigBuilder;

    #[test]
    fn test_zero_max_sentences_rejected() {
        let err = Summarizer::default().summarize("One. Two.", 0).unwrap_err();
        assert!(matches!(err, SummarizationError::InvalidMaxSentences));
    }

    #[test]
    fn test_short_text_returned_unchanged() {
        let text = "  Fever resolved.\nDischarged home.  ";
        let out = Summarizer::default().summarize(text, 5).unwrap();
        assert_eq!(out, text);
    }

    #[test]
    fn test_empty_text_short_circuits() {
        assert_eq!(Summarizer::default().summarize("", 5).unwrap(), "");
    }

    #[test]
    fn test_six_single_letter_sentences() {
        let text = "A. B. C. D. E. F.";
        let summarizer = Summarizer::default();
        let out = summarizer.summarize(text, 5).unwrap();
        // "a" and "d" are both stopwords; of the two zero scores the later one goes
        assert_eq!(out, "A. B. C. E. F.");

        let scored = summarizer.score(text);
        assert_eq!(scored[0].score, 0.0);
        assert_eq!(scored[3].score, 0.0);
        let min = scored.iter().map(|s| s.score).fold(f64::INFINITY, f64::min);
        assert_eq!(scored[3].score, min);
    }

    #[test]
    fn test_ties_prefer_earlier_sentences() {
        let out = Summarizer::default()
            .summarize("Red. Blue. Green. Pink.", 2)
            .unwrap();
        assert_eq!(out, "Red. Blue.");
    }

    #[test]
    fn test_score_mean_vs_sum() {
        let text = "Fever fever rash. Fever. Cough.";
        let mean = Summarizer::default().score(text);
        assert_eq!(mean.len(), 3);
        // fever=3, rash=1, cough=1
        assert!((mean[0].score - 7.0 / 3.0).abs() < 1e-9);
        assert!((mean[1].score - 3.0).abs() < 1e-9);

        let sum = Summarizer::with_vocabulary(
            SummarizerConfigBuilder::new()
                .aggregation(ScoreAggregation::Sum)
                .build(),
            Arc::new(Vocabulary::english_medical()),
        )
        .score(text);
        assert!((sum[0].score - 7.0).abs() < 1e-9);
        assert!((sum[2].score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_sentence_without_words_scores_zero() {
        let scored = Summarizer::default().score("Fever noted. ... Fever again.");
        assert_eq!(scored.len(), 3);
        assert_eq!(scored[1].text, "...");
        assert_eq!(scored[1].score, 0.0);
    }

    #[test]
    fn test_select_matches_summary() {
        let text = "Fever fever rash. Fever. Cough. Rash again.";
        let summarizer = Summarizer::default();
        let selected = summarizer.select(text, 2).unwrap();
        let joined = selected
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        assert_eq!(joined, summarizer.summarize(text, 2).unwrap());
        assert!(selected.windows(2).all(|w| w[0].index < w[1].index));
    }

    #[test]
    fn test_indices_are_document_order() {
        let scored = Summarizer::default().score("One. Two. Three.");
        let indices: Vec<usize> = scored.iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_frequency_table_reports_suppressed_terms() {
        let summarizer = Summarizer::default();
        let text = "Patient stable. Patient eating. Patient walking. Rash gone.";
        let (table, suppressed) = summarizer.frequency_table(text, 4);
        assert_eq!(suppressed, vec!["patient".to_string()]);
        assert_eq!(table.get("patient"), 0);
        assert_eq!(table.get("rash"), 1);
    }

    #[test]
    fn test_domain_suppression_disabled() {
        let summarizer = Summarizer::with_vocabulary(
            SummarizerConfigBuilder::new().domain_suppression(false).build(),
            Arc::new(Vocabulary::english_medical()),
        );
        let text = "Patient stable. Patient eating. Patient walking. Rash gone.";
        let (table, suppressed) = summarizer.frequency_table(text, 4);
        assert!(suppressed.is_empty());
        assert_eq!(table.get("patient"), 3);
    }
}
