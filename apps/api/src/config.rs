use std::time::Duration;

use anyhow::{Context, Result};

use crate::analysis::DEFAULT_ANALYSIS_TIMEOUT;

/// Application configuration loaded from environment variables.
/// Only malformed values fail startup; a missing model credential is
/// reported per analysis instead.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: Option<String>,
    pub port: u16,
    pub rust_log: String,
    pub analysis_timeout: Duration,
    pub max_upload_bytes: usize,
    pub ocr_language: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Ok(Config {
            gemini_api_key: lookup("GEMINI_API_KEY").filter(|k| !k.trim().is_empty()),
            port: var("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: var("RUST_LOG", "info"),
            analysis_timeout: lookup("ANALYSIS_TIMEOUT_SECS")
                .map(|secs| secs.parse::<u64>().map(Duration::from_secs))
                .transpose()
                .context("ANALYSIS_TIMEOUT_SECS must be a whole number of seconds")?
                .unwrap_or(DEFAULT_ANALYSIS_TIMEOUT),
            max_upload_bytes: var("MAX_UPLOAD_BYTES", "10485760")
                .parse::<usize>()
                .context("MAX_UPLOAD_BYTES must be a byte count")?,
            ocr_language: var("OCR_LANGUAGE", "eng"),
        })
    }
}
