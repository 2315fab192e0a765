//! Text extraction from uploaded résumés.
//!
//! Dispatches on the detected format to exactly one handler. PDF extraction
//! never fails outright: an exhausted strategy chain yields a placeholder
//! document, tagged as such.

pub mod artifacts;
pub mod docx;
pub mod handlers;
pub mod pdf;
pub mod text;

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::models::document::{DocumentFormat, UploadedDocument};
use docx::{extract_docx_text, DocumentConverter, DocxRsConverter};
use pdf::{placeholder_text, PdfExtractor, PdftoppmRasterizer, TesseractRecognizer};

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported file format. Please upload a PDF, DOCX, or TXT file.")]
    UnsupportedFormat,

    #[error("Text file appears to be empty or too short")]
    TooShort,

    #[error("{0}")]
    ExtractionFailed(String),
}

/// Whether the text came from the document or was synthesized because no
/// strategy could read it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextKind {
    Real,
    Placeholder,
}

#[derive(Debug, Clone)]
pub struct ExtractedText {
    pub text: String,
    pub kind: TextKind,
    /// Handler or PDF strategy that produced the text.
    pub method: &'static str,
}

impl ExtractedText {
    fn real(text: String, method: &'static str) -> Self {
        Self {
            text,
            kind: TextKind::Real,
            method,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.kind == TextKind::Placeholder
    }
}

/// Format dispatcher holding the DOCX converter and the PDF strategy chain.
#[derive(Clone)]
pub struct TextExtractor {
    docx: Arc<dyn DocumentConverter>,
    pdf: Arc<PdfExtractor>,
}

impl TextExtractor {
    pub fn new(docx: Arc<dyn DocumentConverter>, pdf: PdfExtractor) -> Self {
        Self {
            docx,
            pdf: Arc::new(pdf),
        }
    }

    /// Production wiring: docx-rs, and the PDF chain with poppler + tesseract OCR.
    pub fn standard(ocr_language: &str) -> Self {
        let pdf = PdfExtractor::standard(
            Arc::new(PdftoppmRasterizer),
            Arc::new(TesseractRecognizer::new(ocr_language)),
        );
        Self::new(Arc::new(DocxRsConverter), pdf)
    }

    pub async fn extract(&self, document: &UploadedDocument) -> Result<ExtractedText, ExtractionError> {
        let format = document
            .format()
            .ok_or(ExtractionError::UnsupportedFormat)?;
        debug!(
            "Extracting '{}' as {:?} ({} bytes)",
            document.file_name,
            format,
            document.size()
        );

        match format {
            DocumentFormat::PlainText => {
                text::extract_plain_text(&document.bytes).map(|t| ExtractedText::real(t, "plain_text"))
            }
            DocumentFormat::Docx => {
                let converter = self.docx.clone();
                let bytes = document.bytes.clone();
                let text = tokio::task::spawn_blocking(move || {
                    extract_docx_text(converter.as_ref(), &bytes)
                })
                .await
                .map_err(|e| ExtractionError::ExtractionFailed(format!("DOCX worker failed: {e}")))??;
                Ok(ExtractedText::real(text, "docx"))
            }
            DocumentFormat::Pdf => match self.pdf.extract(&document.bytes).await {
                Some(outcome) => Ok(ExtractedText::real(outcome.text, outcome.strategy)),
                None => {
                    info!("Returning placeholder text for '{}'", document.file_name);
                    Ok(ExtractedText {
                        text: placeholder_text(document),
                        kind: TextKind::Placeholder,
                        method: "placeholder",
                    })
                }
            },
        }
    }
}
