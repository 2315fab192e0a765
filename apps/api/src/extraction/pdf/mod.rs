//! PDF extraction: an ordered chain of strategies, first acceptable candidate wins.
//!
//! Order: layout-aware → alternate parser configurations → OCR → raw byte scan.
//! A candidate is accepted only if it is longer than 100 characters and does
//! not trip the artifact detector. When every strategy fails the extractor
//! returns a placeholder document (tagged as such) rather than an error.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::extraction::artifacts::looks_like_binary_artifact;
use crate::extraction::text::char_len;
use crate::models::document::UploadedDocument;

pub mod alternate;
pub mod layout;
pub mod ocr;
pub mod raw_scan;

pub use alternate::AlternateStrategy;
pub use layout::LayoutStrategy;
pub use ocr::{OcrStrategy, PageRasterizer, PdftoppmRasterizer, TesseractRecognizer, TextRecognizer};
pub use raw_scan::RawScanStrategy;

/// Candidates must be strictly longer than this to be accepted.
pub const MIN_CANDIDATE_CHARS: usize = 100;

/// Fixed lead-in of the placeholder document. Downstream code that only sees
/// the text (not the tag) recognises placeholders by these phrases.
pub const PLACEHOLDER_LEAD_IN: &str = "This PDF appears to contain scanned content";
pub const PLACEHOLDER_TITLE_PREFIX: &str = "Resume Analysis - ";

#[derive(Debug, Error)]
pub enum StrategyError {
    #[error("PDF could not be parsed: {0}")]
    Parse(String),

    #[error("insufficient text extracted ({0} chars)")]
    InsufficientText(usize),

    #[error("extracted content looks like PDF code, not readable text")]
    Unreadable,

    #[error("all {0} parser configurations failed")]
    ConfigurationsExhausted(usize),

    #[error("OCR failed: {0}")]
    Ocr(#[from] ocr::OcrError),

    #[error("parser panicked")]
    Panicked,

    #[error("worker task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// One way of turning PDF bytes into candidate text.
#[async_trait]
pub trait ExtractionStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    async fn extract(&self, pdf: &Bytes) -> Result<String, StrategyError>;
}

/// Decides whether a strategy's candidate is good enough to stop the chain.
pub type Acceptance = fn(&str) -> bool;

/// Default acceptance: long enough and free of PDF markup.
pub fn accept_candidate(text: &str) -> bool {
    char_len(text) > MIN_CANDIDATE_CHARS && !looks_like_binary_artifact(text)
}

struct ChainStep {
    strategy: Box<dyn ExtractionStrategy>,
    accept: Acceptance,
}

/// An accepted candidate and the strategy that produced it.
#[derive(Debug, Clone)]
pub struct ChainOutcome {
    pub text: String,
    pub strategy: &'static str,
}

/// Ordered `(strategy, acceptance)` pairs evaluated strictly in sequence.
#[derive(Default)]
pub struct StrategyChain {
    steps: Vec<ChainStep>,
}

impl StrategyChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a strategy using the default acceptance predicate.
    pub fn then(self, strategy: impl ExtractionStrategy + 'static) -> Self {
        self.then_with(strategy, accept_candidate)
    }

    pub fn then_with(mut self, strategy: impl ExtractionStrategy + 'static, accept: Acceptance) -> Self {
        self.steps.push(ChainStep {
            strategy: Box::new(strategy),
            accept,
        });
        self
    }

    fn len(&self) -> usize {
        self.steps.len()
    }

    /// Runs each strategy to completion before the next; returns the first
    /// accepted candidate, or `None` if the chain is exhausted.
    pub async fn run(&self, pdf: &Bytes) -> Option<ChainOutcome> {
        for step in &self.steps {
            let name = step.strategy.name();
            debug!("Trying PDF strategy '{name}'");

            match step.strategy.extract(pdf).await {
                Ok(text) if (step.accept)(&text) => {
                    info!("PDF strategy '{name}' accepted ({} chars)", char_len(&text));
                    return Some(ChainOutcome {
                        text,
                        strategy: name,
                    });
                }
                Ok(text) => {
                    warn!(
                        "PDF strategy '{name}' rejected candidate ({} chars)",
                        char_len(&text)
                    );
                }
                Err(e) => {
                    warn!("PDF strategy '{name}' failed: {e}");
                }
            }
        }
        None
    }
}

/// The PDF handler: strategy chain plus the placeholder fallback.
pub struct PdfExtractor {
    chain: StrategyChain,
}

impl PdfExtractor {
    pub fn new(chain: StrategyChain) -> Self {
        Self { chain }
    }

    /// The production chain in its fixed order.
    pub fn standard(
        rasterizer: Arc<dyn PageRasterizer>,
        recognizer: Arc<dyn TextRecognizer>,
    ) -> Self {
        let chain = StrategyChain::new()
            .then(LayoutStrategy)
            .then(AlternateStrategy::default())
            .then(OcrStrategy::new(rasterizer, recognizer))
            .then(RawScanStrategy);
        Self::new(chain)
    }

    /// Returns the accepted candidate, or `None` when the chain is exhausted.
    pub async fn extract(&self, pdf: &Bytes) -> Option<ChainOutcome> {
        let outcome = self.chain.run(pdf).await;
        if outcome.is_none() {
            warn!(
                "All {} PDF strategies failed; falling back to placeholder",
                self.chain.len()
            );
        }
        outcome
    }
}

/// The synthesized document returned when no strategy produced usable text.
pub fn placeholder_text(document: &UploadedDocument) -> String {
    let name = &document.file_name;
    format!(
        "{PLACEHOLDER_TITLE_PREFIX}{name}

{PLACEHOLDER_LEAD_IN} or encoded text that cannot be automatically extracted.

To get accurate ATS analysis, please:
1. Convert this PDF to a Word document (.docx) or text file (.txt)
2. Ensure the document contains selectable text, not just images
3. If this is a scanned document, use OCR software to convert it to text first

File Information:
- Name: {name}
- Size: {size} MB
- Type: PDF (may contain scanned content)

For best results, recreate your resume in a text-based format and upload again.",
        size = document.size_mb(),
    )
}

/// Phrase-based placeholder check for callers that only have the text.
pub fn is_placeholder_text(text: &str) -> bool {
    text.contains(PLACEHOLDER_LEAD_IN) || text.contains(PLACEHOLDER_TITLE_PREFIX.trim_end())
}
