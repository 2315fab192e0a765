//! Recovers an `AnalysisResult` from the model's free-text reply.

use std::sync::LazyLock;

use chrono::Utc;
use regex::Regex;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;

use crate::models::analysis::{
    clamp_score, AnalysisResult, KeywordAnalysis, SectionScore, Sections,
};

/// Greedy: from the first `{` to the last `}` in the reply.
static JSON_OBJECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*\}").expect("valid regex"));

pub const MALFORMED_REPLY_SUGGESTION: &str = "Unable to analyze resume. Please try again.";

#[derive(Debug, Error)]
enum MalformedReply {
    #[error("no JSON object in model reply")]
    NoJsonObject,

    #[error("model reply is not a valid JSON object: {0}")]
    Decode(#[from] serde_json::Error),
}

fn decode(reply: &str) -> Result<Map<String, Value>, MalformedReply> {
    let object = JSON_OBJECT
        .find(reply)
        .ok_or(MalformedReply::NoJsonObject)?;
    Ok(serde_json::from_str(object.as_str())?)
}

/// Numbers and numeric strings; anything else reads as absent.
fn number(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

fn score(value: Option<&Value>) -> u8 {
    number(value).map(clamp_score).unwrap_or(0)
}

/// String entries of an array; other entries are skipped.
fn strings(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn section(value: Option<&Value>) -> SectionScore {
    match value.and_then(Value::as_object) {
        Some(fields) => SectionScore::reported(
            score(fields.get("score")),
            fields.get("status").and_then(Value::as_str),
        ),
        None => SectionScore::default(),
    }
}

fn sections(value: Option<&Value>) -> Sections {
    let Some(fields) = value.and_then(Value::as_object) else {
        return Sections::default();
    };
    Sections {
        keywords: section(fields.get("keywords")),
        formatting: section(fields.get("formatting")),
        structure: section(fields.get("structure")),
        length: section(fields.get("length")),
    }
}

fn keyword_analysis(value: Option<&Value>) -> KeywordAnalysis {
    let Some(fields) = value.and_then(Value::as_object) else {
        return KeywordAnalysis::default();
    };
    KeywordAnalysis {
        matched: strings(fields.get("matched")),
        missing: strings(fields.get("missing")),
        density: number(fields.get("density")).unwrap_or(0.0),
    }
}

/// Parses a model reply. Never fails: once an object decodes, every field
/// that is missing, null or of the wrong type takes its default and the
/// result stays attributed to the model. Replies without a decodable object
/// produce a zero-score result with `is_from_gemini == false` and a single
/// generic suggestion.
pub fn parse_reply(reply: &str, file_name: &str) -> AnalysisResult {
    match decode(reply) {
        Ok(fields) => AnalysisResult {
            overall_score: score(fields.get("overallScore")),
            file_name: file_name.to_string(),
            analysis_date: Utc::now(),
            is_from_gemini: true,
            sections: sections(fields.get("sections")),
            keyword_analysis: keyword_analysis(fields.get("keywordAnalysis")),
            suggestions: strings(fields.get("suggestions")),
            resume_text: None,
        },
        Err(e) => {
            warn!("Discarding model reply for '{file_name}': {e}");
            AnalysisResult {
                overall_score: 0,
                file_name: file_name.to_string(),
                analysis_date: Utc::now(),
                is_from_gemini: false,
                sections: Sections::default(),
                keyword_analysis: KeywordAnalysis::default(),
                suggestions: vec![MALFORMED_REPLY_SUGGESTION.to_string()],
                resume_text: None,
            }
        }
    }
}
