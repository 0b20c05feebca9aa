//! Word-frequency model with optional domain-term suppression.

use std::collections::{HashMap, HashSet};

/// Occurrence counts of normalized words within one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: HashMap<String, usize>,
}

impl FrequencyTable {
    /// Count every word that is not in `stopwords`.
    pub fn build<'a, I>(words: I, stopwords: &HashSet<String>) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for word in words {
            if stopwords.contains(word) {
                continue;
            }
            *counts.entry(word.to_string()).or_insert(0) += 1;
        }
        Self { counts }
    }

    /// Count of `word`, zero when absent.
    pub fn get(&self, word: &str) -> usize {
        self.counts.get(word).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// The `n` most frequent words, ties in alphabetical order.
    pub fn most_common(&self, n: usize) -> Vec<(&str, usize)> {
        let mut entries: Vec<(&str, usize)> =
            self.counts.iter().map(|(w, c)| (w.as_str(), *c)).collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries.truncate(n);
        entries
    }
}

/// Domain terms whose provisional count in `words` exceeds
/// `ratio * sentence_count`, in the order of `domain_terms`.
///
/// `words` must not be stopword-filtered: this is the first of the two
/// counting passes.
pub fn over_frequent_domain_terms(
    words: &[String],
    domain_terms: &[String],
    sentence_count: usize,
    ratio: f64,
) -> Vec<String> {
    if domain_terms.is_empty() {
        return Vec::new();
    }
    let provisional = FrequencyTable::build(words.iter().map(String::as_str), &HashSet::new());
    let threshold = ratio * sentence_count as f64;

    domain_terms
        .iter()
        .filter(|term| provisional.get(term) as f64 > threshold)
        .cloned()
        .collect()
}

/// Build the final table with over-frequent domain terms added to the
/// stopword set. Returns the table and the terms that were suppressed.
pub fn build_with_domain_suppression(
    words: &[String],
    stopwords: &HashSet<String>,
    domain_terms: &[String],
    sentence_count: usize,
    ratio: f64,
) -> (FrequencyTable, Vec<String>) {
    let suppressed = over_frequent_domain_terms(words, domain_terms, sentence_count, ratio);
    if suppressed.is_empty() {
        return (
            FrequencyTable::build(words.iter().map(String::as_str), stopwords),
            suppressed,
        );
    }

    let mut augmented = stopwords.clone();
    augmented.extend(suppressed.iter().cloned());
    (
        FrequencyTable::build(words.iter().map(String::as_str), &augmented),
        suppressed,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn stopset(words: &[&str]) -> HashSet<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_build_skips_stopwords() {
        let table = FrequencyTable::build(
            ["the", "scan", "the", "scan", "clear"],
            &stopset(&["the"]),
        );
        assert_eq!(table.get("scan"), 2);
        assert_eq!(table.get("clear"), 1);
        assert_eq!(table.get("the"), 0);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_build_empty() {
        let table = FrequencyTable::build(std::iter::empty(), &HashSet::new());
        assert!(table.is_empty());
        assert_eq!(table.get("anything"), 0);
    }

    #[test]
    fn test_most_common_ties_alphabetical() {
        let table = FrequencyTable::build(["b", "a", "c", "c"], &HashSet::new());
        assert_eq!(table.most_common(2), vec![("c", 2), ("a", 1)]);
    }

    #[test]
    fn test_domain_term_over_threshold() {
        // 4 sentences → threshold 2.0; "patient" appears 3 times, "test" exactly 2
        let words = strings(&["patient", "patient", "patient", "test", "test", "fever"]);
        let domain = strings(&["patient", "test"]);
        let suppressed = over_frequent_domain_terms(&words, &domain, 4, 0.5);
        assert_eq!(suppressed, strings(&["patient"]));
    }

    #[test]
    fn test_domain_term_counts_before_stopword_filtering() {
        // A domain term that is also a stopword still gets a provisional count
        let words = strings(&["care", "care", "care"]);
        let stopwords = stopset(&["care"]);
        let (table, suppressed) =
            build_with_domain_suppression(&words, &stopwords, &strings(&["care"]), 2, 0.5);
        assert_eq!(suppressed, strings(&["care"]));
        assert!(table.is_empty());
    }

    #[test]
    fn test_build_with_domain_suppression() {
        let words = strings(&["patient", "patient", "patient", "fever", "rash", "the"]);
        let (table, suppressed) = build_with_domain_suppression(
            &words,
            &stopset(&["the"]),
            &strings(&["patient", "dose"]),
            4,
            0.5,
        );
        assert_eq!(suppressed, strings(&["patient"]));
        assert_eq!(table.get("patient"), 0);
        assert_eq!(table.get("fever"), 1);
        assert_eq!(table.get("the"), 0);
    }

    #[test]
    fn test_no_domain_terms_is_plain_build() {
        let words = strings(&["fever", "fever"]);
        let (table, suppressed) =
            build_with_domain_suppression(&words, &HashSet::new(), &[], 1, 0.5);
        assert!(suppressed.is_empty());
        assert_eq!(table.get("fever"), 2);
    }
}
