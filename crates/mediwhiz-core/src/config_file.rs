use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{DEFAULT_MAX_SENTENCES, DEFAULT_MIN_CONTENT_CHARS, DEFAULT_MIN_EMBEDDED_CHARS};

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub extraction: Option<ExtractionConfig>,
    pub summary: Option<SummaryConfig>,
    pub server: Option<ServerConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Embedded text shorter than this (trimmed, in chars) triggers OCR.
    pub min_embedded_chars: Option<usize>,
    pub ocr_dpi: Option<u32>,
    pub ocr_language: Option<String>,
    /// Tesseract page segmentation mode (`--psm`).
    pub ocr_psm: Option<u8>,
    pub tesseract_path: Option<String>,
    /// Fraction of page height cut from the top of every page (running headers).
    pub header_exclusion: Option<f32>,
    /// Fraction of page height cut from the bottom of every page (page numbers, footers).
    pub footer_exclusion: Option<f32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummaryConfig {
    pub max_sentences: Option<usize>,
    /// Extracted text must be longer than this (trimmed, in chars) to be summarized.
    pub min_content_chars: Option<usize>,
    pub domain_suppression: Option<bool>,
    /// A domain term is suppressed when its count exceeds `domain_ratio * sentence_count`.
    pub domain_ratio: Option<f64>,
    /// `"mean"` or `"sum"`.
    pub aggregation: Option<String>,
    /// Newline-delimited stopword file replacing the built-in English list.
    pub stopwords_file: Option<String>,
    pub extra_stopwords: Option<Vec<String>>,
    pub extra_domain_terms: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind: Option<String>,
    pub upload_dir: Option<String>,
    pub summary_dir: Option<String>,
    pub max_upload_mb: Option<usize>,
}

pub const DEFAULT_OCR_DPI: u32 = 300;
pub const DEFAULT_OCR_LANGUAGE: &str = "eng";
pub const DEFAULT_DOMAIN_RATIO: f64 = 0.5;
pub const DEFAULT_BIND: &str = "127.0.0.1:5000";
pub const DEFAULT_UPLOAD_DIR: &str = "uploads";
pub const DEFAULT_SUMMARY_DIR: &str = "summaries";
pub const DEFAULT_MAX_UPLOAD_MB: usize = 50;

/// Platform config directory path: `<config_dir>/mediwhiz/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("mediwhiz").join("config.toml"))
}

/// Load config by cascading CWD `.mediwhiz.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".mediwhiz.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}

/// Settings taken from environment variables (`MEDIWHIZ_BIND`,
/// `MEDIWHIZ_UPLOAD_DIR`, `MEDIWHIZ_SUMMARY_DIR`, `TESSERACT_PATH`), as an
/// overlay for [`merge`]. Empty values are ignored.
pub fn env_overlay(lookup: impl Fn(&str) -> Option<String>) -> ConfigFile {
    let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    let tesseract_path = var("TESSERACT_PATH");
    let server = ServerConfig {
        bind: var("MEDIWHIZ_BIND"),
        upload_dir: var("MEDIWHIZ_UPLOAD_DIR"),
        summary_dir: var("MEDIWHIZ_SUMMARY_DIR"),
        max_upload_mb: None,
    };

    ConfigFile {
        extraction: tesseract_path.map(|path| ExtractionConfig {
            tesseract_path: Some(path),
            ..Default::default()
        }),
        summary: None,
        server: Some(server),
    }
}

/// First `Some` of `overlay` then `base` after projecting through `field`.
fn pick<S, T>(overlay: Option<&S>, base: Option<&S>, field: impl Fn(&S) -> Option<T>) -> Option<T> {
    overlay.and_then(&field).or_else(|| base.and_then(&field))
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    let (be, oe) = (base.extraction.as_ref(), overlay.extraction.as_ref());
    let (bs, os) = (base.summary.as_ref(), overlay.summary.as_ref());
    let (bv, ov) = (base.server.as_ref(), overlay.server.as_ref());

    ConfigFile {
        extraction: Some(ExtractionConfig {
            min_embedded_chars: pick(oe, be, |e| e.min_embedded_chars),
            ocr_dpi: pick(oe, be, |e| e.ocr_dpi),
            ocr_language: pick(oe, be, |e| e.ocr_language.clone()),
            ocr_psm: pick(oe, be, |e| e.ocr_psm),
            tesseract_path: pick(oe, be, |e| e.tesseract_path.clone()),
            header_exclusion: pick(oe, be, |e| e.header_exclusion),
            footer_exclusion: pick(oe, be, |e| e.footer_exclusion),
        }),
        summary: Some(SummaryConfig {
            max_sentences: pick(os, bs, |s| s.max_sentences),
            min_content_chars: pick(os, bs, |s| s.min_content_chars),
            domain_suppression: pick(os, bs, |s| s.domain_suppression),
            domain_ratio: pick(os, bs, |s| s.domain_ratio),
            aggregation: pick(os, bs, |s| s.aggregation.clone()),
            stopwords_file: pick(os, bs, |s| s.stopwords_file.clone()),
            extra_stopwords: pick(os, bs, |s| s.extra_stopwords.clone()),
            extra_domain_terms: pick(os, bs, |s| s.extra_domain_terms.clone()),
        }),
        server: Some(ServerConfig {
            bind: pick(ov, bv, |v| v.bind.clone()),
            upload_dir: pick(ov, bv, |v| v.upload_dir.clone()),
            summary_dir: pick(ov, bv, |v| v.summary_dir.clone()),
            max_upload_mb: pick(ov, bv, |v| v.max_upload_mb),
        }),
    }
}

impl ConfigFile {
    /// Fill every unset field with its built-in default. Used to show the
    /// effective configuration.
    pub fn with_defaults(self) -> ConfigFile {
        let defaults = ConfigFile {
            extraction: Some(ExtractionConfig {
                min_embedded_chars: Some(DEFAULT_MIN_EMBEDDED_CHARS),
                ocr_dpi: Some(DEFAULT_OCR_DPI),
                ocr_language: Some(DEFAULT_OCR_LANGUAGE.to_string()),
                ocr_psm: None,
                tesseract_path: Some("tesseract".to_string()),
                header_exclusion: Some(0.0),
                footer_exclusion: Some(0.0),
            }),
            summary: Some(SummaryConfig {
                max_sentences: Some(DEFAULT_MAX_SENTENCES),
                min_content_chars: Some(DEFAULT_MIN_CONTENT_CHARS),
                domain_suppression: Some(true),
                domain_ratio: Some(DEFAULT_DOMAIN_RATIO),
                aggregation: Some("mean".to_string()),
                stopwords_file: None,
                extra_stopwords: Some(Vec::new()),
                extra_domain_terms: Some(Vec::new()),
            }),
            server: Some(ServerConfig {
                bind: Some(DEFAULT_BIND.to_string()),
                upload_dir: Some(DEFAULT_UPLOAD_DIR.to_string()),
                summary_dir: Some(DEFAULT_SUMMARY_DIR.to_string()),
                max_upload_mb: Some(DEFAULT_MAX_UPLOAD_MB),
            }),
        };
        merge(defaults, self)
    }

    pub fn extraction(&self) -> ExtractionConfig {
        self.extraction.clone().unwrap_or_default()
    }

    pub fn summary(&self) -> SummaryConfig {
        self.summary.clone().unwrap_or_default()
    }

    pub fn server(&self) -> ServerConfig {
        self.server.clone().unwrap_or_default()
    }
}
