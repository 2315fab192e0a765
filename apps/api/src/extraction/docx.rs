//! DOCX handler: pulls raw run text out of the WordprocessingML container.

use docx_rs::{read_docx, DocumentChild, ParagraphChild, RunChild};

use crate::extraction::text::{char_len, MIN_DOCUMENT_CHARS};
use crate::extraction::ExtractionError;

/// Converts a DOCX buffer into plain text. Swappable so tests and future
/// converters do not need a real document.
pub trait DocumentConverter: Send + Sync {
    fn extract_raw_text(&self, bytes: &[u8]) -> Result<String, ExtractionError>;
}

/// `docx-rs` backed converter: one line per paragraph, run text concatenated.
#[derive(Debug, Default, Clone, Copy)]
pub struct DocxRsConverter;

impl DocumentConverter for DocxRsConverter {
    fn extract_raw_text(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        let docx = read_docx(bytes)
            .map_err(|e| ExtractionError::ExtractionFailed(format!("unreadable DOCX: {e}")))?;

        let mut text = String::new();
        for child in docx.document.children {
            if let DocumentChild::Paragraph(paragraph) = child {
                for paragraph_child in paragraph.children {
                    if let ParagraphChild::Run(run) = paragraph_child {
                        for run_child in run.children {
                            if let RunChild::Text(t) = run_child {
                                text.push_str(&t.text);
                            }
                        }
                    }
                }
                text.push('\n');
            }
        }
        Ok(text)
    }
}

/// Runs the converter and enforces the minimum résumé length.
pub fn extract_docx_text(
    converter: &dyn DocumentConverter,
    bytes: &[u8],
) -> Result<String, ExtractionError> {
    let text = converter.extract_raw_text(bytes)?;
    if char_len(&text) < MIN_DOCUMENT_CHARS {
        return Err(ExtractionError::ExtractionFailed(
            "Unable to extract text from DOCX file".to_string(),
        ));
    }
    Ok(text)
}
