use axum::{extract::State, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::state::AppState;
use crate::view::{ViewSnapshot, ViewState};

#[derive(Deserialize)]
pub struct NavigateRequest {
    pub view: ViewState,
}

/// GET /api/v1/view
pub async fn handle_get_view(State(state): State<AppState>) -> Json<ViewSnapshot> {
    Json(state.view.read().await.snapshot())
}

/// POST /api/v1/view/get-started
pub async fn handle_get_started(
    State(state): State<AppState>,
) -> Result<Json<ViewSnapshot>, AppError> {
    let mut view = state.view.write().await;
    view.get_started()?;
    Ok(Json(view.snapshot()))
}

/// POST /api/v1/view/navigate
pub async fn handle_navigate(
    State(state): State<AppState>,
    Json(req): Json<NavigateRequest>,
) -> Result<Json<ViewSnapshot>, AppError> {
    let mut view = state.view.write().await;
    view.navigate(req.view)?;
    Ok(Json(view.snapshot()))
}

/// POST /api/v1/view/analyze-another
pub async fn handle_analyze_another(
    State(state): State<AppState>,
) -> Result<Json<ViewSnapshot>, AppError> {
    let mut view = state.view.write().await;
    view.analyze_another()?;
    Ok(Json(view.snapshot()))
}
