//! Sentence and word tokenization.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

/// Abbreviations whose trailing period does not end a sentence.
static ABBREVIATIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "mr", "mrs", "ms", "dr", "prof", "sr", "jr", "vs", "e.g", "i.e", "cf", "al", "fig",
        "figs", "approx", "dept", "inc", "ltd", "vol", "pp", "ref", "refs", "mt",
    ]
    .into_iter()
    .collect()
});

/// Titles that are followed by a name, so initials after them do not end a sentence.
static TITLES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    ["mr", "mrs", "ms", "dr", "prof"].into_iter().collect()
});

/// A terminator run, optional closing quotes/brackets, then whitespace or end of text.
static BOUNDARY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"[.!?]+["'\u{201D}\u{2019})\]]*(?:\s+|$)"#).unwrap()
});

/// Word-ish runs (keeping internal `-`, `.` and apostrophes) or punctuation runs.
static TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\w+(?:[-.'\u{2019}]\w+)*|[^\w\s]+").unwrap()
});

/// Split `text` into sentences, in order, each a trimmed verbatim slice of `text`.
///
/// Text without any terminator is a single sentence; whitespace-only text has none.
pub fn sentences(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut start = 0;

    for m in BOUNDARY_RE.find_iter(text) {
        let preceding = &text[start..m.start()];
        if ends_with_abbreviation(preceding) || ends_with_titled_initial(preceding) {
            continue;
        }
        let end = m.start() + m.as_str().trim_end().len();
        push_trimmed(&mut out, &text[start..end]);
        start = m.end();
    }
    push_trimmed(&mut out, &text[start..]);

    out
}

fn push_trimmed(out: &mut Vec<String>, piece: &str) {
    let piece = piece.trim();
    if !piece.is_empty() {
        out.push(piece.to_string());
    }
}

/// Whether the last whitespace-separated token before a period is a known abbreviation.
fn ends_with_abbreviation(preceding: &str) -> bool {
    let token = preceding
        .rsplit(char::is_whitespace)
        .next()
        .unwrap_or("")
        .trim_start_matches(['(', '[', '"', '\'', '\u{201C}', '\u{2018}']);
    !token.is_empty() && ABBREVIATIONS.contains(token.to_lowercase().as_str())
}

/// Whether `preceding` ends in a name initial after a title, as in `Dr. A`
/// or `Dr. J. R`. A lone capital anywhere else still ends a sentence.
fn ends_with_titled_initial(preceding: &str) -> bool {
    let mut tokens = preceding.split_whitespace().rev();
    if !tokens.next().is_some_and(is_initial) {
        return false;
    }
    for token in tokens {
        let Some(stem) = token.strip_suffix('.') else {
            return false;
        };
        if is_initial(stem) {
            continue;
        }
        return TITLES.contains(stem.to_lowercase().as_str());
    }
    false
}

fn is_initial(token: &str) -> bool {
    let mut chars = token.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c.is_uppercase())
}

/// Raw tokens in order, with clitics split off the way a Treebank tokenizer
/// does it (`"don't"` → `"do"`, `"n't"`; `"patient's"` → `"patient"`, `"'s"`).
pub fn tokens(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    for m in TOKEN_RE.find_iter(text) {
        split_clitic(m.as_str(), &mut out);
    }
    out
}

fn split_clitic(token: &str, out: &mut Vec<String>) {
    let Some(pos) = token.find(['\'', '\u{2019}']) else {
        out.push(token.to_string());
        return;
    };

    let lower = token.to_lowercase();
    if (lower.ends_with("n't") || lower.ends_with("n\u{2019}t")) && pos >= 1 {
        // The `n` belongs to the clitic: "couldn't" → "could" + "n't"
        let stem_end = token[..pos].char_indices().last().map(|(i, _)| i).unwrap_or(0);
        if stem_end > 0 {
            out.push(token[..stem_end].to_string());
        }
        out.push(token[stem_end..].to_string());
        return;
    }

    if pos > 0 {
        out.push(token[..pos].to_string());
    }
    out.push(token[pos..].to_string());
}

/// Lowercased alphanumeric-only words of `text`. Tokens containing any
/// punctuation or symbol are dropped, not cleaned.
pub fn words(text: &str) -> Vec<String> {
    tokens(&text.to_lowercase())
        .into_iter()
        .filter(|t| is_alphanumeric_word(t))
        .collect()
}

fn is_alphanumeric_word(token: &str) -> bool {
    !token.is_empty() && token.chars().all(char::is_alphanumeric)
}
