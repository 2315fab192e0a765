use chrono::{DateTime, Utc};
use serde::Serialize;

/// Score band for a single résumé section.
///
/// Bands: poor 0-60, fair 61-75, good 76-85, excellent 86-100.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionStatus {
    #[default]
    Poor,
    Fair,
    Good,
    Excellent,
}

impl SectionStatus {
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=60 => SectionStatus::Poor,
            61..=75 => SectionStatus::Fair,
            76..=85 => SectionStatus::Good,
            _ => SectionStatus::Excellent,
        }
    }

    /// Lenient parse of a model-supplied status label.
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "poor" => Some(SectionStatus::Poor),
            "fair" => Some(SectionStatus::Fair),
            "good" => Some(SectionStatus::Good),
            "excellent" => Some(SectionStatus::Excellent),
            _ => None,
        }
    }
}

/// Score and band for one of the four fixed sections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SectionScore {
    pub score: u8,
    pub status: SectionStatus,
}

impl SectionScore {
    /// Builds a section whose status is derived from the score bands.
    pub fn banded(score: u8) -> Self {
        let score = score.min(100);
        Self {
            score,
            status: SectionStatus::from_score(score),
        }
    }

    /// Section as reported by the model. A known label is kept even when it
    /// disagrees with the score; a missing or unknown one falls back to the
    /// bands.
    pub fn reported(score: u8, label: Option<&str>) -> Self {
        let score = score.min(100);
        let status = label
            .and_then(SectionStatus::parse)
            .unwrap_or_else(|| SectionStatus::from_score(score));
        Self { score, status }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Sections {
    pub keywords: SectionScore,
    pub formatting: SectionScore,
    pub structure: SectionScore,
    pub length: SectionScore,
}

impl Sections {
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &SectionScore)> {
        [
            ("keywords", &self.keywords),
            ("formatting", &self.formatting),
            ("structure", &self.structure),
            ("length", &self.length),
        ]
        .into_iter()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KeywordAnalysis {
    pub matched: Vec<String>,
    pub missing: Vec<String>,
    pub density: f64,
}

/// The output record of one analysis attempt. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub overall_score: u8,
    pub file_name: String,
    pub analysis_date: DateTime<Utc>,
    /// True only when the result came from a decoded model reply.
    pub is_from_gemini: bool,
    pub sections: Sections,
    pub keyword_analysis: KeywordAnalysis,
    pub suggestions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_text: Option<String>,
}

/// Rounds and clamps a raw model score into 0-100.
pub fn clamp_score(raw: f64) -> u8 {
    if raw.is_nan() {
        return 0;
    }
    raw.round().clamp(0.0, 100.0) as u8
}
