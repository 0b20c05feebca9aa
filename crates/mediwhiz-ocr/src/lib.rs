use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;

use mediwhiz_core::{OcrEngine, OcrError};

/// [`OcrEngine`] backed by the `tesseract` command-line tool.
///
/// Each call spawns one `tesseract <image> stdout -l <lang>` process and
/// reads the recognized text from its stdout. The binary must be installed
/// separately (`tesseract-ocr` on Debian/Ubuntu, `tesseract` on Homebrew).
#[derive(Debug, Clone)]
pub struct TesseractOcr {
    binary: PathBuf,
    language: String,
    /// Page segmentation mode passed as `--psm`. `None` keeps tesseract's default.
    page_segmentation: Option<u8>,
}

impl Default for TesseractOcr {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("tesseract"),
            language: "eng".to_string(),
            page_segmentation: None,
        }
    }
}

impl TesseractOcr {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific tesseract executable instead of the one on `PATH`.
    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Tesseract language code(s), e.g. `eng` or `eng+deu`.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Tesseract page segmentation mode, passed as `--psm`.
    pub fn with_page_segmentation(mut self, psm: u8) -> Self {
        self.page_segmentation = Some(psm);
        self
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn page_segmentation(&self) -> Option<u8> {
        self.page_segmentation
    }
}

impl OcrEngine for TesseractOcr {
    fn name(&self) -> &str {
        "tesseract"
    }

    fn recognize(&self, image: &Path) -> Result<String, OcrError> {
        let mut command = Command::new(&self.binary);
        command
            .arg(image)
            .arg("stdout")
            .arg("-l")
            .arg(&self.language);
        if let Some(psm) = self.page_segmentation {
            command.arg("--psm").arg(psm.to_string());
        }

        let output = command.output().map_err(|e| match e.kind() {
            ErrorKind::NotFound => OcrError::Unavailable(format!(
                "{} not found; install tesseract-ocr",
                self.binary.display()
            )),
            _ => OcrError::Io(e),
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::Engine(format!(
                "tesseract exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        tracing::trace!(image = %image.display(), chars = text.chars().count(), "OCR page done");
        Ok(text)
    }

    /// Runs `tesseract --version`.
    fn is_available(&self) -> bool {
        let available = Command::new(&self.binary)
            .arg("--version")
            .output()
            .is_ok_and(|out| out.status.success());
        if !available {
            tracing::debug!(
                binary = %self.binary.display(),
                "tesseract not found - install tesseract-ocr for OCR support"
            );
        }
        available
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let ocr = TesseractOcr::new();
        assert_eq!(ocr.binary(), Path::new("tesseract"));
        assert_eq!(ocr.language(), "eng");
        assert_eq!(ocr.name(), "tesseract");
    }

    #[test]
    fn test_missing_binary_is_unavailable() {
        let ocr = TesseractOcr::new().with_binary("/nonexistent/bin/tesseract-missing");
        assert!(!ocr.is_available());
        let err = ocr.recognize(Path::new("page-1.png")).unwrap_err();
        assert!(matches!(err, OcrError::Unavailable(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_arguments_passed_through() {
        // `echo` stands in for tesseract and prints the arguments it received
        let ocr = TesseractOcr::new()
            .with_binary("echo")
            .with_language("eng+deu")
            .with_page_segmentation(1);
        let text = ocr.recognize(Path::new("page-1.png")).unwrap();
        assert_eq!(text.trim(), "page-1.png stdout -l eng+deu --psm 1");
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit_is_engine_error() {
        let ocr = TesseractOcr::new().with_binary("false");
        let err = ocr.recognize(Path::new("page-1.png")).unwrap_err();
        assert!(matches!(err, OcrError::Engine(_)));
    }
}
