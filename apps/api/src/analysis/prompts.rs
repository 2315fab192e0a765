use crate::llm_client::prompts::{JSON_ONLY_INSTRUCTION, STATUS_BANDS};

const OUTPUT_SCHEMA: &str = r#"{
  "overallScore": 85,
  "sections": {
    "keywords": {"score": 85, "status": "good"},
    "formatting": {"score": 78, "status": "fair"},
    "structure": {"score": 88, "status": "excellent"},
    "length": {"score": 75, "status": "fair"}
  },
  "keywordAnalysis": {
    "matched": ["keyword1", "keyword2"],
    "missing": ["keyword3", "keyword4"],
    "density": 2.3
  },
  "suggestions": [
    "Suggestion 1",
    "Suggestion 2",
    "Suggestion 3"
  ]
}"#;

const SCORING_GUIDELINES: &str = "Scoring guidelines:
- Keywords: 0-100 (based on relevant technical skills, industry terms, and job-specific keywords)
- Formatting: 0-100 (based on clean layout, consistent formatting, readability)
- Structure: 0-100 (based on logical organization, clear sections, professional presentation)
- Length: 0-100 (based on appropriate length for experience level, typically 1-2 pages)";

/// Builds the ATS analysis prompt. The full résumé text is embedded; a blank
/// job description is treated as absent.
pub fn build_analysis_prompt(resume_text: &str, job_description: Option<&str>) -> String {
    let focus = match job_description.map(str::trim).filter(|jd| !jd.is_empty()) {
        Some(jd) => format!(
            "JOB DESCRIPTION:\n{jd}\n\nPlease analyze how well the resume matches this specific job description."
        ),
        None => "Please provide a general ATS analysis.".to_string(),
    };

    format!(
        "You are an expert ATS (Applicant Tracking System) analyzer. \
Analyze the following resume and provide a comprehensive ATS score and feedback.

RESUME TEXT:
{resume_text}

{focus}

Provide your analysis in the following JSON format:
{OUTPUT_SCHEMA}

{SCORING_GUIDELINES}

{STATUS_BANDS}

{JSON_ONLY_INSTRUCTION}
"
    )
}
