pub mod health;
pub mod upload;

use axum::{
    extract::DefaultBodyLimit,
    http::Uri,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::errors::AppError;
use crate::extraction::handlers as extraction;
use crate::state::AppState;
use crate::view::handlers as view;

/// Room for multipart boundaries and the job description on top of the file.
const MULTIPART_OVERHEAD_BYTES: usize = 256 * 1024;

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {uri}"))
}

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/health", get(health::health_handler))
        // View state
        .route("/api/v1/view", get(view::handle_get_view))
        .route("/api/v1/view/get-started", post(view::handle_get_started))
        .route("/api/v1/view/navigate", post(view::handle_navigate))
        .route(
            "/api/v1/view/analyze-another",
            post(view::handle_analyze_another),
        )
        // Pipeline
        .route("/api/v1/analyze", post(analysis::handle_analyze))
        .route("/api/v1/extract", post(extraction::handle_extract))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        response::Response,
    };
    use async_trait::async_trait;
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::analysis::Analyzer;
    use crate::config::Config;
    use crate::extraction::docx::DocxRsConverter;
    use crate::extraction::pdf::tests::FixedStrategy;
    use crate::extraction::pdf::{PdfExtractor, StrategyChain};
    use crate::extraction::TextExtractor;
    use crate::llm_client::{GenerativeModel, LlmError};

    const BOUNDARY: &str = "X-ATS-BOUNDARY";

    fn test_state(max_upload_bytes: usize) -> AppState {
        state_with_model(max_upload_bytes, None)
    }

    fn state_with_model(
        max_upload_bytes: usize,
        model: Option<Arc<dyn GenerativeModel>>,
    ) -> AppState {
        let config = Config {
            gemini_api_key: None,
            port: 0,
            rust_log: "info".to_string(),
            analysis_timeout: Duration::from_secs(25),
            max_upload_bytes,
            ocr_language: "eng".to_string(),
        };
        let (failing, _) = FixedStrategy::failing("pdf_layout");
        let extractor = TextExtractor::new(
            Arc::new(DocxRsConverter),
            PdfExtractor::new(StrategyChain::new().then(failing)),
        );
        let analyzer = Analyzer::new(model, config.analysis_timeout);
        AppState::new(config, extractor, analyzer)
    }

    /// Answers every prompt with the same score after `delay`.
    struct SlowModel {
        delay: Duration,
    }

    #[async_trait]
    impl GenerativeModel for SlowModel {
        async fn generate(&self, _prompt: &str) -> Result<String, LlmError> {
            tokio::time::sleep(self.delay).await;
            Ok(r#"{"overallScore": 77, "suggestions": ["Add metrics"]}"#.to_string())
        }
    }

    fn multipart_body(file: Option<(&str, &str, &[u8])>, job_description: Option<&str>) -> Vec<u8> {
        let mut body = Vec::new();
        if let Some((name, content_type, bytes)) = file {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{name}\"\r\nContent-Type: {content_type}\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        if let Some(jd) = job_description {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"job_description\"\r\n\r\n{jd}\r\n"
                )
                .as_bytes(),
            );
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn upload_request(uri: &str, body: Vec<u8>) -> Request<Body> {
        Request::post(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn post(uri: &str) -> Request<Body> {
        Request::post(uri).body(Body::empty()).unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn resume_text() -> String {
        "Jane Doe, Senior Backend Engineer. Designed event-driven billing pipelines, \
         mentored four engineers, and cut p99 latency by 40 percent across services."
            .to_string()
    }

    #[tokio::test]
    async fn test_health() {
        let app = build_router(test_state(1024));
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "ats-api");
    }

    #[tokio::test]
    async fn test_unknown_route_is_json_not_found() {
        let app = build_router(test_state(1024));
        let response = app
            .oneshot(Request::get("/api/v1/resumes").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_view_starts_on_landing() {
        let app = build_router(test_state(1024));
        let response = app
            .oneshot(Request::get("/api/v1/view").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(body["view"], "landing");
        assert!(body["result"].is_null());
    }

    #[tokio::test]
    async fn test_analyze_requires_upload_view() {
        let app = build_router(test_state(1024 * 1024));
        let body = multipart_body(Some(("cv.txt", "text/plain", resume_text().as_bytes())), None);
        let response = app
            .oneshot(upload_request("/api/v1/analyze", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "INVALID_TRANSITION");
    }

    #[tokio::test]
    async fn test_full_flow_without_credentials_yields_fallback_result() {
        let state = test_state(1024 * 1024);
        let app = build_router(state.clone());

        let response = app.clone().oneshot(post("/api/v1/view/get-started")).await.unwrap();
        assert_eq!(json_body(response).await["view"], "upload");

        let body = multipart_body(
            Some(("cv.txt", "text/plain", resume_text().as_bytes())),
            Some("Backend engineer"),
        );
        let response = app
            .clone()
            .oneshot(upload_request("/api/v1/analyze", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let result = json_body(response).await;
        assert_eq!(result["fileName"], "cv.txt");
        assert_eq!(result["isFromGemini"], false);
        assert_eq!(result["overallScore"], 0);
        assert_eq!(result["sections"]["keywords"]["status"], "poor");
        assert_eq!(result["suggestions"].as_array().unwrap().len(), 6);
        assert!(result["resumeText"]
            .as_str()
            .unwrap()
            .contains("API configuration error"));

        let response = app.clone().oneshot(Request::get("/api/v1/view").body(Body::empty()).unwrap()).await.unwrap();
        let snapshot = json_body(response).await;
        assert_eq!(snapshot["view"], "results");
        assert_eq!(snapshot["result"]["fileName"], "cv.txt");

        let response = app.oneshot(post("/api/v1/view/analyze-another")).await.unwrap();
        let snapshot = json_body(response).await;
        assert_eq!(snapshot["view"], "upload");
        assert!(snapshot["result"].is_null());
        assert!(state.view.read().await.current_result().is_none());
    }

    #[tokio::test]
    async fn test_navigate_to_results_without_result_conflicts() {
        let app = build_router(test_state(1024));
        let response = app
            .oneshot(
                Request::post("/api/v1/view/navigate")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"view":"results"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_missing_file_field_is_bad_request() {
        let state = test_state(1024 * 1024);
        state.view.write().await.get_started().unwrap();
        let app = build_router(state);
        let response = app
            .oneshot(upload_request("/api/v1/analyze", multipart_body(None, Some("SRE"))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_oversized_file_is_rejected() {
        let state = test_state(64);
        state.view.write().await.get_started().unwrap();
        let app = build_router(state.clone());
        let big = vec![b'a'; 1024];
        let response = app
            .oneshot(upload_request(
                "/api/v1/analyze",
                multipart_body(Some(("cv.txt", "text/plain", big.as_slice())), None),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(state.view.read().await.state(), crate::view::ViewState::Upload);
    }

    #[tokio::test]
    async fn test_extract_reports_placeholder_for_unreadable_pdf() {
        let state = test_state(1024 * 1024);
        let app = build_router(state.clone());
        let response = app
            .oneshot(upload_request(
                "/api/v1/extract",
                multipart_body(Some(("scan.pdf", "application/pdf", b"%PDF-1.4".as_slice())), None),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let report = json_body(response).await;
        assert_eq!(report["format"], "pdf");
        assert_eq!(report["method"], "placeholder");
        assert_eq!(report["is_placeholder"], true);
        assert!(report["sample"].as_str().unwrap().starts_with("Resume Analysis - scan.pdf"));
        assert_eq!(state.view.read().await.state(), crate::view::ViewState::Landing);
    }

    #[tokio::test]
    async fn test_extract_reports_unsupported_format() {
        let app = build_router(test_state(1024 * 1024));
        let response = app
            .oneshot(upload_request(
                "/api/v1/extract",
                multipart_body(Some(("scan.png", "image/png", b"\x89PNG".as_slice())), None),
            ))
            .await
            .unwrap();
        let report = json_body(response).await;
        assert!(report["format"].is_null());
        assert!(report["error"]
            .as_str()
            .unwrap()
            .starts_with("Unsupported file format"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlapping_analyses_both_return_results() {
        let model: Arc<dyn GenerativeModel> = Arc::new(SlowModel {
            delay: Duration::from_secs(2),
        });
        let state = state_with_model(1024 * 1024, Some(model));
        state.view.write().await.get_started().unwrap();
        let app = build_router(state.clone());

        let first = multipart_body(Some(("first.txt", "text/plain", resume_text().as_bytes())), None);
        let second = multipart_body(Some(("second.txt", "text/plain", resume_text().as_bytes())), None);
        let (a, b) = tokio::join!(
            app.clone().oneshot(upload_request("/api/v1/analyze", first)),
            app.clone().oneshot(upload_request("/api/v1/analyze", second)),
        );
        let (a, b) = (a.unwrap(), b.unwrap());
        assert_eq!(a.status(), StatusCode::OK);
        assert_eq!(b.status(), StatusCode::OK);

        let a = json_body(a).await;
        let b = json_body(b).await;
        assert_eq!(a["fileName"], "first.txt");
        assert_eq!(b["fileName"], "second.txt");
        assert_eq!(a["isFromGemini"], true);
        assert_eq!(b["overallScore"], 77);

        let view = state.view.read().await;
        assert_eq!(view.state(), crate::view::ViewState::Results);
        let held = &view.current_result().unwrap().file_name;
        assert!(held == "first.txt" || held == "second.txt");
    }

    #[tokio::test(start_paused = true)]
    async fn test_analysis_finishing_after_navigation_is_still_returned() {
        let model: Arc<dyn GenerativeModel> = Arc::new(SlowModel {
            delay: Duration::from_secs(2),
        });
        let state = state_with_model(1024 * 1024, Some(model));
        state.view.write().await.get_started().unwrap();
        let app = build_router(state.clone());

        let body = multipart_body(Some(("cv.txt", "text/plain", resume_text().as_bytes())), None);
        let navigate = async {
            tokio::time::sleep(Duration::from_millis(500)).await;
            state
                .view
                .write()
                .await
                .navigate(crate::view::ViewState::Landing)
                .unwrap();
        };
        let (response, _) = tokio::join!(
            app.oneshot(upload_request("/api/v1/analyze", body)),
            navigate
        );
        let response = response.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["fileName"], "cv.txt");
        assert_eq!(state.view.read().await.state(), crate::view::ViewState::Results);
    }
}
