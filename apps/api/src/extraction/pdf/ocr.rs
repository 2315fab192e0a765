//! OCR fallback for scanned PDFs.
//!
//! Pages are rasterized at 2× scale and each image is handed to a text
//! recognizer. The production backends shell out to `pdftoppm` (poppler) and
//! `tesseract`; both are optional system binaries, and their absence simply
//! fails this strategy.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tempfile::TempDir;
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

use super::{ExtractionStrategy, StrategyError};
use crate::extraction::text::collapse_whitespace;

/// Render scale relative to the PDF's native 72 DPI.
pub const OCR_SCALE: f32 = 2.0;
const BASE_DPI: f32 = 72.0;

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("Backend not available: {0}")]
    BackendNotAvailable(String),

    #[error("OCR failed: {0}")]
    OcrFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A rendered page, PNG encoded.
#[derive(Debug, Clone)]
pub struct PageImage {
    pub page_number: u32,
    pub png: Vec<u8>,
}

/// Renders every page of a PDF to an image, in page order.
#[async_trait]
pub trait PageRasterizer: Send + Sync {
    async fn rasterize(&self, pdf: &Bytes, scale: f32) -> Result<Vec<PageImage>, OcrError>;
}

/// Recognizes the text in one page image.
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    async fn recognize(&self, image: &PageImage) -> Result<String, OcrError>;
}

/// Rasterizer backed by poppler's `pdftoppm`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdftoppmRasterizer;

#[async_trait]
impl PageRasterizer for PdftoppmRasterizer {
    async fn rasterize(&self, pdf: &Bytes, scale: f32) -> Result<Vec<PageImage>, OcrError> {
        let scratch = TempDir::new()?;
        let input = scratch.path().join("input.pdf");
        tokio::fs::write(&input, pdf).await?;

        let dpi = (BASE_DPI * scale).round() as u32;
        let output = Command::new("pdftoppm")
            .args(["-png", "-r", &dpi.to_string()])
            .arg(&input)
            .arg(scratch.path().join("page"))
            .output()
            .await;

        match output {
            Ok(output) if output.status.success() => {}
            Ok(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                return Err(OcrError::OcrFailed(format!("pdftoppm failed: {stderr}")));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(OcrError::BackendNotAvailable(
                    "pdftoppm not found (install poppler-utils)".to_string(),
                ));
            }
            Err(e) => return Err(OcrError::Io(e)),
        }

        collect_page_images(scratch.path()).await
    }
}

/// pdftoppm names its output `page-1.png`, `page-01.png`, `page-001.png`
/// depending on the page count.
pub(crate) fn page_number(file_name: &str) -> Option<u32> {
    file_name
        .strip_prefix("page-")?
        .strip_suffix(".png")?
        .parse()
        .ok()
}

async fn collect_page_images(dir: &Path) -> Result<Vec<PageImage>, OcrError> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut images = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let file_name = entry.file_name();
        let Some(page) = file_name.to_str().and_then(page_number) else {
            continue;
        };
        images.push(PageImage {
            page_number: page,
            png: tokio::fs::read(entry.path()).await?,
        });
    }
    images.sort_by_key(|image| image.page_number);
    Ok(images)
}

/// Recognizer backed by the `tesseract` CLI.
#[derive(Debug, Clone)]
pub struct TesseractRecognizer {
    language: String,
}

impl TesseractRecognizer {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
        }
    }
}

impl Default for TesseractRecognizer {
    fn default() -> Self {
        Self::new("eng")
    }
}

#[async_trait]
impl TextRecognizer for TesseractRecognizer {
    async fn recognize(&self, image: &PageImage) -> Result<String, OcrError> {
        let file = tempfile::Builder::new().suffix(".png").tempfile()?;
        tokio::fs::write(file.path(), &image.png).await?;

        let output = Command::new("tesseract")
            .arg(file.path())
            .arg("stdout")
            .args(["-l", &self.language])
            .output()
            .await;

        match output {
            Ok(output) if output.status.success() => {
                Ok(String::from_utf8_lossy(&output.stdout).to_string())
            }
            Ok(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                Err(OcrError::OcrFailed(format!("tesseract failed: {stderr}")))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(
                OcrError::BackendNotAvailable("tesseract not found (install tesseract-ocr)".to_string()),
            ),
            Err(e) => Err(OcrError::Io(e)),
        }
    }
}

/// Strategy 3: rasterize each page and OCR it.
pub struct OcrStrategy {
    rasterizer: Arc<dyn PageRasterizer>,
    recognizer: Arc<dyn TextRecognizer>,
}

impl OcrStrategy {
    pub fn new(rasterizer: Arc<dyn PageRasterizer>, recognizer: Arc<dyn TextRecognizer>) -> Self {
        Self {
            rasterizer,
            recognizer,
        }
    }
}

#[async_trait]
impl ExtractionStrategy for OcrStrategy {
    fn name(&self) -> &'static str {
        "pdf_ocr"
    }

    async fn extract(&self, pdf: &Bytes) -> Result<String, StrategyError> {
        let pages = self.rasterizer.rasterize(pdf, OCR_SCALE).await?;
        if pages.is_empty() {
            return Err(OcrError::OcrFailed("no pages rendered".to_string()).into());
        }

        let mut text = String::new();
        for page in &pages {
            let recognized = self.recognizer.recognize(page).await?;
            debug!(
                "OCR page {}: {} chars recognized",
                page.page_number,
                recognized.len()
            );
            text.push_str(&recognized);
            text.push('\n');
        }
        Ok(collapse_whitespace(&text))
    }
}
