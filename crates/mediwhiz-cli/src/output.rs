use std::io::Write;

use mediwhiz_core::Sentence;
use mediwhiz_ingest::{ExtractionMethod, ExtractionReport};
use owo_colors::OwoColorize;

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

fn method_label(method: ExtractionMethod) -> &'static str {
    match method {
        ExtractionMethod::Embedded => "embedded text",
        ExtractionMethod::Ocr => "OCR",
        ExtractionMethod::PlainText => "plain text",
    }
}

/// One-line description of how the text was obtained.
pub fn print_extraction_report(
    w: &mut dyn Write,
    name: &str,
    report: &ExtractionReport,
    color: ColorMode,
) -> std::io::Result<()> {
    let mut line = format!(
        "{}: {} characters via {}",
        name,
        report.text.trim().chars().count(),
        method_label(report.method)
    );
    if report.page_count > 0 {
        line.push_str(&format!(", {} pages", report.page_count));
    }
    if report.ocr_failures > 0 {
        line.push_str(&format!(", {} pages failed OCR", report.ocr_failures));
    }

    if color.enabled() {
        writeln!(w, "{}", line.dimmed())
    } else {
        writeln!(w, "{}", line)
    }
}

pub fn print_summary(w: &mut dyn Write, summary: &str, color: ColorMode) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{}", "Summary".bold())?;
    } else {
        writeln!(w, "Summary")?;
    }
    writeln!(w, "{}", summary)?;
    Ok(())
}

/// Print every sentence with its score, marking the ones kept in the summary.
pub fn print_scores(
    w: &mut dyn Write,
    scored: &[Sentence],
    selected: &[Sentence],
    color: ColorMode,
) -> std::io::Result<()> {
    writeln!(w)?;
    if color.enabled() {
        writeln!(w, "{}", "Sentence scores".bold())?;
    } else {
        writeln!(w, "Sentence scores")?;
    }

    for sentence in scored {
        let kept = selected.iter().any(|s| s.index == sentence.index);
        let marker = if kept { "*" } else { " " };
        let line = format!(
            "{} [{:>3}] {:>7.3}  {}",
            marker,
            sentence.index + 1,
            sentence.score,
            sentence.text
        );
        if !color.enabled() {
            writeln!(w, "{}", line)?;
        } else if kept {
            writeln!(w, "{}", line.green())?;
        } else {
            writeln!(w, "{}", line.dimmed())?;
        }
    }

    Ok(())
}

/// The most frequent scored words, then any domain terms left out of scoring.
pub fn print_terms(
    w: &mut dyn Write,
    top: &[(&str, usize)],
    suppressed: &[String],
) -> std::io::Result<()> {
    writeln!(w)?;
    let listed: Vec<String> = top.iter().map(|(word, n)| format!("{word} ({n})")).collect();
    writeln!(w, "Top terms: {}", listed.join(", "))?;
    if !suppressed.is_empty() {
        writeln!(w, "Suppressed domain terms: {}", suppressed.join(", "))?;
    }
    Ok(())
}
