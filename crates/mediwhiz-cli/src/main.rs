use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use mediwhiz_core::config_file::{self, ConfigFile};
use mediwhiz_core::{DEFAULT_MAX_SENTENCES, DEFAULT_MIN_CONTENT_CHARS, check_min_content};
use mediwhiz_summarize::{Summarizer, SummarizerConfigBuilder};

mod output;

use output::ColorMode;

/// Number of most frequent words listed by `--explain`.
const TOP_TERMS: usize = 10;

/// MediWhiz - Summarize medical PDFs and notes
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Log progress to stderr (repeat for debug output)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract and summarize a PDF or .txt file
    Summarize {
        /// Path to the PDF or plain-text file
        file_path: PathBuf,

        /// Maximum number of sentences in the summary
        #[arg(short = 'n', long)]
        max_sentences: Option<usize>,

        /// Print every sentence's score and the suppressed domain terms
        #[arg(long)]
        explain: bool,

        /// Score all non-stopwords, including very frequent domain terms
        #[arg(long)]
        no_domain_suppression: bool,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,

        /// Write the summary to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the text extracted from a PDF (OCR fallback included)
    Extract {
        /// Path to the PDF
        file_path: PathBuf,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,

        /// Write the text to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the effective configuration
    Config,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // CLI flags > env vars > config files > defaults
    let config = config_file::merge(
        config_file::load_config(),
        config_file::env_overlay(|key| std::env::var(key).ok()),
    );

    match cli.command {
        Command::Summarize {
            file_path,
            max_sentences,
            explain,
            no_domain_suppression,
            no_color,
            output,
        } => summarize(
            &config,
            &file_path,
            max_sentences,
            explain,
            no_domain_suppression,
            no_color,
            output,
        ),
        Command::Extract {
            file_path,
            no_color,
            output,
        } => extract(&config, &file_path, no_color, output),
        Command::Config => show_config(config),
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn open_writer(output: &Option<PathBuf>) -> anyhow::Result<Box<dyn Write>> {
    Ok(if let Some(path) = output {
        Box::new(
            std::fs::File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?,
        )
    } else {
        Box::new(std::io::stdout())
    })
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[allow(clippy::too_many_arguments)]
fn summarize(
    config: &ConfigFile,
    file_path: &Path,
    max_sentences: Option<usize>,
    explain: bool,
    no_domain_suppression: bool,
    no_color: bool,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let section = config.summary();
    let max_sentences = max_sentences
        .or(section.max_sentences)
        .unwrap_or(DEFAULT_MAX_SENTENCES);
    let min_content_chars = section.min_content_chars.unwrap_or(DEFAULT_MIN_CONTENT_CHARS);

    let mut builder = SummarizerConfigBuilder::from_file_config(&section).max_sentences(max_sentences);
    if no_domain_suppression {
        builder = builder.domain_suppression(false);
    }
    let summarizer = Summarizer::new(builder.build()).context("failed to load word lists")?;
    tracing::debug!(
        max_sentences,
        min_content_chars,
        domain_suppression = summarizer.config().domain_suppression(),
        "summarizer ready"
    );

    let extractor = mediwhiz_ingest::default_extractor(config)?;
    let report = extractor
        .extract_detailed(file_path)
        .with_context(|| format!("failed to read {}", file_path.display()))?;

    check_min_content(&report.text, min_content_chars)?;
    let summary = summarizer.summarize(&report.text, max_sentences)?;

    let color = ColorMode(!no_color && output.is_none());
    let mut writer = open_writer(&output)?;

    if output.is_none() {
        output::print_extraction_report(&mut writer, &display_name(file_path), &report, color)?;
        writeln!(writer)?;
        output::print_summary(&mut writer, &summary, color)?;
    } else {
        writeln!(writer, "{}", summary)?;
    }

    if explain {
        let scored = summarizer.score(&report.text);
        let selected = summarizer.select(&report.text, max_sentences)?;
        let (table, suppressed) = summarizer.frequency_table(&report.text, scored.len());
        output::print_scores(&mut writer, &scored, &selected, color)?;
        output::print_terms(&mut writer, &table.most_common(TOP_TERMS), &suppressed)?;
    }

    Ok(())
}

fn extract(
    config: &ConfigFile,
    file_path: &Path,
    no_color: bool,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let extractor = mediwhiz_ingest::default_extractor(config)?;
    let report = extractor
        .extract_detailed(file_path)
        .with_context(|| format!("failed to read {}", file_path.display()))?;

    let color = ColorMode(!no_color && output.is_none());
    let mut writer = open_writer(&output)?;

    // Report goes to stderr so the text itself can be piped
    output::print_extraction_report(
        &mut std::io::stderr(),
        &display_name(file_path),
        &report,
        color,
    )?;
    write!(writer, "{}", report.text)?;
    if !report.text.ends_with('\n') {
        writeln!(writer)?;
    }
    Ok(())
}

fn show_config(config: ConfigFile) -> anyhow::Result<()> {
    match config_file::config_path() {
        Some(path) => println!("# platform config: {}", path.display()),
        None => println!("# platform config: (no config directory)"),
    }
    println!("# local override: .mediwhiz.toml");
    println!();
    let effective = config.with_defaults();
    print!("{}", toml::to_string_pretty(&effective)?);
    Ok(())
}
