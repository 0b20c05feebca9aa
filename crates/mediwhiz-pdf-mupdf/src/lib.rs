use std::path::Path;

use mupdf::{Colorspace, Document, ImageFormat, Matrix, TextPageFlags};

use mediwhiz_core::config_file::ExtractionConfig;
use mediwhiz_core::{ExtractionError, OcrError, PdfBackend, PdfDocument};

/// Bands at the top and bottom of a page whose text blocks are dropped.
///
/// Ratios are fractions of the page height; `0.0` disables a band. Typical
/// uses are clinic letterheads and "Page 2 of 5" footers.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PageMargins {
    pub header: f32,
    pub footer: f32,
}

impl PageMargins {
    /// Whether a block spanning `block_top..block_bottom` on a page spanning
    /// `page_top..page_bottom` belongs to the body text.
    ///
    /// A block is cut when it lies entirely inside the header band, or when
    /// its top edge is inside the footer band.
    pub fn keeps(&self, page_top: f32, page_bottom: f32, block_top: f32, block_bottom: f32) -> bool {
        let height = page_bottom - page_top;
        if self.header > 0.0 && block_bottom <= page_top + height * self.header {
            return false;
        }
        if self.footer > 0.0 && block_top >= page_bottom - height * self.footer {
            return false;
        }
        true
    }
}

/// MuPDF-based implementation of [`PdfBackend`].
///
/// This crate is the sole AGPL island: it isolates the mupdf dependency
/// (which is AGPL-3.0) so that the summarizer and the text pipeline do not
/// transitively depend on it.
#[derive(Debug, Clone, Default)]
pub struct MupdfBackend {
    margins: PageMargins,
}

impl MupdfBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend with the header/footer bands from the `[extraction]` section.
    /// Unset or non-positive ratios disable the band.
    pub fn from_config(section: &ExtractionConfig) -> Self {
        let ratio = |r: Option<f32>| r.filter(|r| *r > 0.0).unwrap_or(0.0).min(1.0);
        Self::new().with_margins(PageMargins {
            header: ratio(section.header_exclusion),
            footer: ratio(section.footer_exclusion),
        })
    }

    pub fn with_margins(mut self, margins: PageMargins) -> Self {
        self.margins = margins;
        self
    }

    pub fn margins(&self) -> PageMargins {
        self.margins
    }
}

impl PdfBackend for MupdfBackend {
    fn open(&self, path: &Path) -> Result<Box<dyn PdfDocument>, ExtractionError> {
        let path_str = path
            .to_str()
            .ok_or_else(|| ExtractionError::Open("invalid path encoding".into()))?;

        let document = Document::open(path_str).map_err(|e| ExtractionError::Open(e.to_string()))?;
        let page_count = document
            .page_count()
            .map_err(|e| ExtractionError::Open(e.to_string()))?;

        tracing::debug!(path = %path.display(), pages = page_count, "opened PDF");

        Ok(Box::new(MupdfDocument {
            document,
            page_count: usize::try_from(page_count).unwrap_or(0),
            margins: self.margins,
        }))
    }
}

struct MupdfDocument {
    document: Document,
    page_count: usize,
    margins: PageMargins,
}

impl MupdfDocument {
    fn load_page(&self, index: usize) -> Result<mupdf::Page, String> {
        let page_no = i32::try_from(index).map_err(|e| e.to_string())?;
        self.document.load_page(page_no).map_err(|e| e.to_string())
    }
}

impl PdfDocument for MupdfDocument {
    fn page_count(&self) -> usize {
        self.page_count
    }

    fn page_text(&self, index: usize) -> Result<String, ExtractionError> {
        let page_err = |message: String| ExtractionError::Page {
            page: index + 1,
            message,
        };

        let page = self.load_page(index).map_err(page_err)?;
        let text_page = page
            .to_text_page(TextPageFlags::empty())
            .map_err(|e| page_err(e.to_string()))?;

        let bounds = page.bounds().map_err(|e| page_err(e.to_string()))?;

        let mut page_text = String::new();
        for block in text_page.blocks() {
            let rect = block.bounds();
            if !self.margins.keeps(bounds.y0, bounds.y1, rect.y0, rect.y1) {
                continue;
            }

            for line in block.lines() {
                let line_text: String = line
                    .chars()
                    .map(|c| c.char().unwrap_or('\u{FFFD}'))
                    .collect();
                page_text.push_str(&line_text);
                page_text.push('\n');
            }
        }

        Ok(page_text)
    }

    fn render_page(&self, index: usize, dpi: u32, target: &Path) -> Result<(), OcrError> {
        let render_err = |message: String| OcrError::Render {
            page: index + 1,
            message,
        };

        let target_str = target
            .to_str()
            .ok_or_else(|| render_err("invalid path encoding".into()))?;

        let page = self.load_page(index).map_err(render_err)?;

        // PDF user space is 72 units per inch
        let scale = dpi as f32 / 72.0;
        let pixmap = page
            .to_pixmap(
                &Matrix::new_scale(scale, scale),
                &Colorspace::device_rgb(),
                false,
                true,
            )
            .map_err(|e| render_err(e.to_string()))?;

        pixmap
            .save_as(target_str, ImageFormat::PNG)
            .map_err(|e| render_err(e.to_string()))?;

        tracing::trace!(page = index + 1, dpi, target = %target.display(), "rendered page");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // A 0..800 page, as MuPDF reports it (y grows downward)
    const TOP: f32 = 0.0;
    const BOTTOM: f32 = 800.0;

    #[test]
    fn test_no_margins_keep_everything() {
        let margins = PageMargins::default();
        assert!(margins.keeps(TOP, BOTTOM, 0.0, 10.0));
        assert!(margins.keeps(TOP, BOTTOM, 790.0, 800.0));
    }

    #[test]
    fn test_header_band_drops_blocks_inside_it() {
        let margins = PageMargins {
            header: 0.05,
            footer: 0.0,
        };
        // band ends at y = 40
        assert!(!margins.keeps(TOP, BOTTOM, 5.0, 30.0));
        assert!(margins.keeps(TOP, BOTTOM, 30.0, 60.0));
        assert!(margins.keeps(TOP, BOTTOM, 790.0, 800.0));
    }

    #[test]
    fn test_footer_band_drops_blocks_starting_in_it() {
        let margins = PageMargins {
            header: 0.0,
            footer: 0.1,
        };
        // band starts at y = 720
        assert!(!margins.keeps(TOP, BOTTOM, 730.0, 760.0));
        assert!(margins.keeps(TOP, BOTTOM, 700.0, 760.0));
    }

    #[test]
    fn test_from_config() {
        let section = ExtractionConfig {
            header_exclusion: Some(0.04),
            footer_exclusion: Some(-1.0),
            ..Default::default()
        };
        let margins = MupdfBackend::from_config(&section).margins();
        assert_eq!(margins.header, 0.04);
        assert_eq!(margins.footer, 0.0);
        assert_eq!(
            MupdfBackend::from_config(&ExtractionConfig::default()).margins(),
            PageMargins::default()
        );
    }

    #[test]
    fn test_open_missing_file_is_open_error() {
        let err = MupdfBackend::new()
            .open(Path::new("/nonexistent/definitely-missing.pdf"))
            .err()
            .unwrap();
        assert!(matches!(err, ExtractionError::Open(_)));
    }
}
