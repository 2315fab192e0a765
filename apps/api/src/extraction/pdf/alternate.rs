//! Alternate parser configurations, tried in order. Text is taken in stream
//! order without any layout sorting.

use std::panic::{catch_unwind, AssertUnwindSafe};

use async_trait::async_trait;
use bytes::Bytes;
use pdf_extract::Document;
use tracing::debug;

use super::{accept_candidate, ExtractionStrategy, StrategyError};
use crate::extraction::text::collapse_whitespace;

/// A parser configuration the alternate strategy can fall back on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlternateBackend {
    /// pdf-extract's whole-document plain text output.
    WholeDocument,
    /// Page-by-page extraction from the parsed object tree; unreadable pages
    /// are skipped instead of failing the document.
    PageByPage,
}

impl AlternateBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlternateBackend::WholeDocument => "whole_document",
            AlternateBackend::PageByPage => "page_by_page",
        }
    }

    fn extract(&self, pdf: &[u8]) -> Result<String, StrategyError> {
        match self {
            AlternateBackend::WholeDocument => pdf_extract::extract_text_from_mem(pdf)
                .map_err(|e| StrategyError::Parse(e.to_string())),
            AlternateBackend::PageByPage => {
                let doc =
                    Document::load_mem(pdf).map_err(|e| StrategyError::Parse(e.to_string()))?;
                let mut text = String::new();
                for page_number in doc.get_pages().keys() {
                    match doc.extract_text(&[*page_number]) {
                        Ok(page_text) => {
                            text.push_str(&page_text);
                            text.push('\n');
                        }
                        Err(e) => debug!("Skipping unreadable page {page_number}: {e}"),
                    }
                }
                Ok(text)
            }
        }
    }
}

/// Strategy 2: the same document handed to each configuration in turn.
#[derive(Debug, Clone)]
pub struct AlternateStrategy {
    configurations: Vec<AlternateBackend>,
}

impl AlternateStrategy {
    pub fn new(configurations: Vec<AlternateBackend>) -> Self {
        Self { configurations }
    }
}

impl Default for AlternateStrategy {
    fn default() -> Self {
        Self::new(vec![
            AlternateBackend::WholeDocument,
            AlternateBackend::PageByPage,
        ])
    }
}

fn try_configurations(
    configurations: &[AlternateBackend],
    pdf: &[u8],
) -> Result<String, StrategyError> {
    for backend in configurations {
        let attempt = catch_unwind(AssertUnwindSafe(|| backend.extract(pdf)))
            .unwrap_or(Err(StrategyError::Panicked));
        match attempt {
            Ok(raw) => {
                let text = collapse_whitespace(&raw);
                if accept_candidate(&text) {
                    return Ok(text);
                }
                debug!(
                    "Alternate configuration '{}' produced unusable text",
                    backend.as_str()
                );
            }
            Err(e) => debug!("Alternate configuration '{}' failed: {e}", backend.as_str()),
        }
    }
    Err(StrategyError::ConfigurationsExhausted(configurations.len()))
}

#[async_trait]
impl ExtractionStrategy for AlternateStrategy {
    fn name(&self) -> &'static str {
        "pdf_alternate"
    }

    async fn extract(&self, pdf: &Bytes) -> Result<String, StrategyError> {
        let pdf = pdf.clone();
        let configurations = self.configurations.clone();
        tokio::task::spawn_blocking(move || try_configurations(&configurations, &pdf)).await?
    }
}
