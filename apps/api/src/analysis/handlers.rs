use axum::{
    extract::{Multipart, State},
    Json,
};

use crate::errors::AppError;
use crate::models::analysis::AnalysisResult;
use crate::routes::upload::read_upload_form;
use crate::state::AppState;

/// POST /api/v1/analyze
///
/// Only accepted from the upload view. Once accepted, the caller always gets
/// a result: pipeline failures come back as a fallback, and the finished
/// result becomes the held one even if the view moved in the meantime.
pub async fn handle_analyze(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalysisResult>, AppError> {
    state.view.read().await.begin_analysis()?;

    let form = read_upload_form(multipart, state.config.max_upload_bytes).await?;
    let result = state
        .analyzer
        .analyze_document(
            &state.extractor,
            &form.document,
            form.job_description.as_deref(),
        )
        .await;

    // The view lock is only taken once the attempt has fully completed.
    state.view.write().await.complete_analysis(result.clone());
    Ok(Json(result))
}
