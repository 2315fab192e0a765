use chrono::Utc;

use crate::models::analysis::{AnalysisResult, KeywordAnalysis, SectionScore, Sections};

/// Remediation steps shown whenever text could not be analyzed.
pub const FALLBACK_SUGGESTIONS: [&str; 6] = [
    "1. The file appears to contain scanned images or encoded text",
    "2. Try converting to DOCX format (Word document)",
    "3. Copy your resume content to a plain text (.txt) file",
    "4. Ensure the PDF contains selectable text, not just images",
    "5. If scanned, use OCR software to convert to text first",
    "6. Recreate the resume in a text-based format",
];

/// Deterministic zero-score result for any failure before or during the
/// model call. Only `analysis_date` varies between calls.
pub fn build_fallback(file_name: &str, reason: &str) -> AnalysisResult {
    let reason = if reason.trim().is_empty() {
        "Unable to extract readable text from file"
    } else {
        reason
    };

    AnalysisResult {
        overall_score: 0,
        file_name: file_name.to_string(),
        analysis_date: Utc::now(),
        is_from_gemini: false,
        sections: Sections {
            keywords: SectionScore::banded(0),
            formatting: SectionScore::banded(0),
            structure: SectionScore::banded(0),
            length: SectionScore::banded(0),
        },
        keyword_analysis: KeywordAnalysis::default(),
        suggestions: FALLBACK_SUGGESTIONS.iter().map(|s| s.to_string()).collect(),
        resume_text: Some(format!("Analysis failed: {reason}")),
    }
}
