use std::sync::Arc;

use tokio::sync::RwLock;

use crate::analysis::Analyzer;
use crate::config::Config;
use crate::extraction::TextExtractor;
use crate::llm_client::{GeminiClient, GenerativeModel};
use crate::view::ViewController;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub extractor: TextExtractor,
    /// Holds the model client; `None` inside when no API key is configured.
    pub analyzer: Analyzer,
    /// The single current view and result.
    pub view: Arc<RwLock<ViewController>>,
}

impl AppState {
    pub fn new(config: Config, extractor: TextExtractor, analyzer: Analyzer) -> Self {
        Self {
            config,
            extractor,
            analyzer,
            view: Arc::new(RwLock::new(ViewController::new())),
        }
    }

    /// Production wiring from configuration.
    pub fn from_config(config: Config) -> Self {
        let model = config
            .gemini_api_key
            .clone()
            .map(|key| Arc::new(GeminiClient::new(key)) as Arc<dyn GenerativeModel>);
        let analyzer = Analyzer::new(model, config.analysis_timeout);
        let extractor = TextExtractor::standard(&config.ocr_language);
        Self::new(config, extractor, analyzer)
    }
}
