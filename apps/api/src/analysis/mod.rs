//! ATS analysis: gate the extracted text, ask the model, parse the reply.
//!
//! `Analyzer::analyze` and `Analyzer::analyze_document` never return an
//! error. Every failure becomes a fallback result with
//! `is_from_gemini == false` and the reason in `resume_text`.

pub mod fallback;
pub mod handlers;
pub mod parser;
pub mod prompts;

use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, info, warn, Instrument};
use uuid::Uuid;

use crate::extraction::artifacts::looks_like_binary_artifact;
use crate::extraction::pdf::{is_placeholder_text, MIN_CANDIDATE_CHARS};
use crate::extraction::text::char_len;
use crate::extraction::{ExtractionError, TextExtractor, TextKind};
use crate::llm_client::{GenerativeModel, LlmError};
use crate::models::analysis::AnalysisResult;
use crate::models::document::UploadedDocument;
use fallback::build_fallback;
use parser::parse_reply;
use prompts::build_analysis_prompt;

/// Default limit on a single model call.
pub const DEFAULT_ANALYSIS_TIMEOUT: Duration = Duration::from_secs(25);
/// Longest `resume_text` preview attached to a successful result.
pub const PREVIEW_CHARS: usize = 500;
const ELLIPSIS: &str = "...";

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Insufficient text extracted for analysis ({0} chars)")]
    InsufficientText(usize),

    #[error("PDF contains encoded content that cannot be properly extracted. Please ensure the PDF contains selectable text.")]
    ArtifactContaminated,

    #[error("Unable to extract readable text from the uploaded file")]
    PlaceholderText,

    #[error("API configuration error. Please check your environment variables.")]
    Configuration,

    #[error("Request timeout after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("Model request failed: {0}")]
    Model(#[from] LlmError),

    #[error("{0}")]
    Extraction(#[from] ExtractionError),
}

/// Runs the gated model call. `model` is `None` when no credential is
/// configured.
#[derive(Clone)]
pub struct Analyzer {
    model: Option<Arc<dyn GenerativeModel>>,
    timeout: Duration,
}

impl Analyzer {
    pub fn new(model: Option<Arc<dyn GenerativeModel>>, timeout: Duration) -> Self {
        Self { model, timeout }
    }

    /// Analyzes already-extracted text.
    pub async fn analyze(
        &self,
        text: &str,
        job_description: Option<&str>,
        file_name: &str,
    ) -> AnalysisResult {
        let analysis_id = Uuid::new_v4();
        let span = tracing::info_span!("analysis", id = %analysis_id, file = file_name);
        let outcome = self
            .try_analyze(text, job_description, file_name)
            .instrument(span)
            .await;
        settle(outcome, file_name, analysis_id)
    }

    /// Extracts and analyzes an upload. Placeholder text from an exhausted
    /// PDF chain is rejected without reaching the model.
    pub async fn analyze_document(
        &self,
        extractor: &TextExtractor,
        document: &UploadedDocument,
        job_description: Option<&str>,
    ) -> AnalysisResult {
        let file_name = document.file_name.as_str();
        let rejected = match extractor.extract(document).await {
            Ok(extracted) if extracted.kind == TextKind::Real => {
                info!(
                    "Extracted {} chars from '{file_name}' via '{}'",
                    char_len(&extracted.text),
                    extracted.method
                );
                return self.analyze(&extracted.text, job_description, file_name).await;
            }
            Ok(_) => AnalysisError::PlaceholderText,
            Err(e) => e.into(),
        };
        settle(Err(rejected), file_name, Uuid::new_v4())
    }

    async fn try_analyze(
        &self,
        text: &str,
        job_description: Option<&str>,
        file_name: &str,
    ) -> Result<AnalysisResult, AnalysisError> {
        let len = char_len(text);
        if len < MIN_CANDIDATE_CHARS {
            return Err(AnalysisError::InsufficientText(len));
        }
        if looks_like_binary_artifact(text) {
            return Err(AnalysisError::ArtifactContaminated);
        }
        if is_placeholder_text(text) {
            return Err(AnalysisError::PlaceholderText);
        }
        let model = self.model.as_ref().ok_or(AnalysisError::Configuration)?;

        let prompt = build_analysis_prompt(text, job_description);
        debug!("Prompt built ({} chars)", prompt.len());

        let started = Instant::now();
        // Dropping the losing future cancels the in-flight request.
        let reply = tokio::time::timeout(self.timeout, model.generate(&prompt))
            .await
            .map_err(|_| AnalysisError::Timeout(self.timeout))??;
        info!(
            "Model replied in {}ms ({} chars)",
            started.elapsed().as_millis(),
            reply.len()
        );

        let mut result = parse_reply(&reply, file_name);
        result.resume_text = Some(preview(text));
        Ok(result)
    }
}

fn settle(
    outcome: Result<AnalysisResult, AnalysisError>,
    file_name: &str,
    analysis_id: Uuid,
) -> AnalysisResult {
    match outcome {
        Ok(result) => {
            info!(
                %analysis_id,
                "Analysis of '{file_name}' finished: score {} (from model: {})",
                result.overall_score,
                result.is_from_gemini
            );
            result
        }
        Err(e) => {
            warn!(%analysis_id, "Analysis of '{file_name}' fell back: {e}");
            build_fallback(file_name, &e.to_string())
        }
    }
}

/// First 500 characters of the text, ending in "..." when cut.
pub fn preview(text: &str) -> String {
    if char_len(text) <= PREVIEW_CHARS {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(PREVIEW_CHARS - ELLIPSIS.len()).collect();
    cut.push_str(ELLIPSIS);
    cut
}
