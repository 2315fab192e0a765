use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;

use crate::errors::AppError;
use crate::extraction::text::char_len;
use crate::extraction::TextKind;
use crate::models::document::DocumentFormat;
use crate::routes::upload::read_upload_form;
use crate::state::AppState;

const SAMPLE_CHARS: usize = 200;

#[derive(Debug, Serialize)]
pub struct ExtractionReport {
    pub file_name: String,
    pub media_type: String,
    pub size_bytes: usize,
    pub size_mb: String,
    pub format: Option<DocumentFormat>,
    pub method: Option<&'static str>,
    pub kind: Option<TextKind>,
    pub is_placeholder: bool,
    pub text_length: usize,
    pub sample: String,
    pub error: Option<String>,
}

/// POST /api/v1/extract
///
/// Diagnostic run of the extractor alone. Does not touch the view state.
pub async fn handle_extract(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ExtractionReport>, AppError> {
    let form = read_upload_form(multipart, state.config.max_upload_bytes).await?;
    let document = form.document;

    let mut report = ExtractionReport {
        file_name: document.file_name.clone(),
        media_type: document.media_type.clone(),
        size_bytes: document.size(),
        size_mb: document.size_mb(),
        format: document.format(),
        method: None,
        kind: None,
        is_placeholder: false,
        text_length: 0,
        sample: String::new(),
        error: None,
    };

    match state.extractor.extract(&document).await {
        Ok(extracted) => {
            report.method = Some(extracted.method);
            report.kind = Some(extracted.kind);
            report.is_placeholder = extracted.is_placeholder();
            report.text_length = char_len(&extracted.text);
            report.sample = extracted.text.chars().take(SAMPLE_CHARS).collect();
        }
        Err(e) => report.error = Some(e.to_string()),
    }

    Ok(Json(report))
}
