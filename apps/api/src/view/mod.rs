//! The landing → upload → results view machine.
//!
//! Holds at most one `AnalysisResult`. A completed analysis replaces it
//! wholesale; "analyze another" clears it.

pub mod handlers;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::models::analysis::AnalysisResult;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewState {
    #[default]
    Landing,
    Upload,
    Results,
}

impl std::fmt::Display for ViewState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ViewState::Landing => "landing",
            ViewState::Upload => "upload",
            ViewState::Results => "results",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ViewError {
    #[error("Cannot move from '{from}' to '{to}'")]
    InvalidTransition { from: ViewState, to: ViewState },
}

/// What clients see of the controller.
#[derive(Debug, Clone, Serialize)]
pub struct ViewSnapshot {
    pub view: ViewState,
    pub result: Option<AnalysisResult>,
}

#[derive(Debug, Default)]
pub struct ViewController {
    state: ViewState,
    current: Option<AnalysisResult>,
}

impl ViewController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    pub fn current_result(&self) -> Option<&AnalysisResult> {
        self.current.as_ref()
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot {
            view: self.state,
            result: self.current.clone(),
        }
    }

    /// The landing page's call to action.
    pub fn get_started(&mut self) -> Result<ViewState, ViewError> {
        if self.state != ViewState::Landing {
            return Err(self.rejected(ViewState::Upload));
        }
        Ok(self.set(ViewState::Upload))
    }

    /// Navigation-bar move. Results can only be shown while a result is held.
    pub fn navigate(&mut self, to: ViewState) -> Result<ViewState, ViewError> {
        if to == ViewState::Results && self.current_result().is_none() {
            return Err(self.rejected(to));
        }
        Ok(self.set(to))
    }

    /// Whether an upload may start an analysis now.
    pub fn begin_analysis(&self) -> Result<(), ViewError> {
        if self.state != ViewState::Upload {
            return Err(self.rejected(ViewState::Results));
        }
        Ok(())
    }

    /// Stores a finished analysis (real or fallback) and shows it. The
    /// source view was checked when the analysis began; whatever happened
    /// since, the newest result replaces the held one.
    pub fn complete_analysis(&mut self, result: AnalysisResult) -> ViewState {
        self.current = Some(result);
        self.set(ViewState::Results)
    }

    /// Drops the held result and returns to the upload form.
    pub fn analyze_another(&mut self) -> Result<ViewState, ViewError> {
        if self.state != ViewState::Results {
            return Err(self.rejected(ViewState::Upload));
        }
        self.current = None;
        Ok(self.set(ViewState::Upload))
    }

    fn set(&mut self, to: ViewState) -> ViewState {
        debug!("View {} -> {}", self.state, to);
        self.state = to;
        to
    }

    fn rejected(&self, to: ViewState) -> ViewError {
        ViewError::InvalidTransition {
            from: self.state,
            to,
        }
    }
}
