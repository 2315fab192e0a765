//! Last-resort raw byte scan: keep only runs of three or more letters.
//! Numbers and punctuation are lost, so this runs after everything else.

use async_trait::async_trait;
use bytes::Bytes;

use super::{accept_candidate, ExtractionStrategy, StrategyError};
use crate::extraction::text::{char_len, collapse_whitespace, readable_words};

const CHUNK_SIZE: usize = 4096;

pub(crate) fn scan_words(pdf: &[u8]) -> String {
    let mut text = String::new();
    for chunk in pdf.chunks(CHUNK_SIZE) {
        let decoded = String::from_utf8_lossy(chunk);
        for word in readable_words(&decoded) {
            text.push_str(word);
            text.push(' ');
        }
    }
    collapse_whitespace(&text)
}

/// Strategy 4: decode the raw bytes and pattern-match alphabetic runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct RawScanStrategy;

#[async_trait]
impl ExtractionStrategy for RawScanStrategy {
    fn name(&self) -> &'static str {
        "pdf_raw_scan"
    }

    async fn extract(&self, pdf: &Bytes) -> Result<String, StrategyError> {
        let pdf = pdf.clone();
        let text = tokio::task::spawn_blocking(move || scan_words(&pdf)).await?;
        if !accept_candidate(&text) {
            return Err(StrategyError::InsufficientText(char_len(&text)));
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_keeps_only_alphabetic_runs() {
        let raw = b"%PDF-1.4\n(Jane) Tj 12 0 Td (Doe) Tj /F1 9 Tf (Rust developer, 2019)";
        assert_eq!(scan_words(raw), "PDF Jane Doe Rust developer");
    }

    #[test]
    fn test_scan_ignores_binary_noise() {
        let mut raw = vec![0xffu8, 0x00, 0x13, 0x9a];
        raw.extend_from_slice(b"Summary");
        raw.extend_from_slice(&[0xc3, 0x28]);
        assert_eq!(scan_words(&raw), "Summary");
    }

    #[tokio::test]
    async fn test_short_scan_is_rejected() {
        let err = RawScanStrategy
            .extract(&Bytes::from_static(b"%PDF-1.4 obj endobj"))
            .await
            .unwrap_err();
        assert!(matches!(err, StrategyError::InsufficientText(_)));
    }

    #[tokio::test]
    async fn test_wordy_bytes_are_accepted() {
        let body = "Managed cloud infrastructure migrations for retail clients across Europe ".repeat(3);
        let text = RawScanStrategy
            .extract(&Bytes::from(body.into_bytes()))
            .await
            .unwrap();
        assert!(text.starts_with("Managed cloud infrastructure migrations"));
    }

    #[tokio::test]
    async fn test_large_mostly_binary_upload_is_scanned() {
        let mut raw = vec![0u8; 8 * 1024 * 1024];
        raw.extend_from_slice(
            "Platform engineer with deep experience in distributed storage and observability "
                .repeat(2)
                .as_bytes(),
        );
        let text = RawScanStrategy.extract(&Bytes::from(raw)).await.unwrap();
        assert!(text.starts_with("Platform engineer"));
    }
}
