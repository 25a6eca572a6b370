pub mod ai;
pub mod health;
pub mod parse;

use axum::{
    extract::{DefaultBodyLimit, FromRequest},
    middleware,
    routing::{get, post},
    Router,
};

use crate::errors::AppError;
use crate::state::AppState;
use crate::stats::track_requests;

/// Headroom above `max_file_size` for multipart boundaries and part headers.
const MULTIPART_SLACK: usize = 64 * 1024;

/// `Json` whose rejections are reported through the response envelope.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_file_size.saturating_add(MULTIPART_SLACK);

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/stats", get(health::stats_handler))
        .route("/api/v1/demo-resumes", get(parse::handle_demo_resumes))
        // Upload-based extraction and parsing
        .route("/api/v1/extract-text", post(parse::handle_extract_text))
        .route("/api/v1/parse", post(parse::handle_parse_upload))
        // Text-based parsing
        .route("/api/v1/parse/text", post(parse::handle_parse_text))
        .route("/api/v1/parse/sections", post(parse::handle_parse_sections))
        // Generator-backed rewriting and scoring
        .route("/api/v1/ai/health", get(ai::handle_ai_health))
        .route("/api/v1/ai/ats-optimize", post(ai::handle_ats_optimize))
        .route("/api/v1/ai/tone-adjust", post(ai::handle_tone_adjust))
        .route("/api/v1/ai/action-verbs", post(ai::handle_action_verbs))
        .route("/api/v1/ai/cover-letter", post(ai::handle_cover_letter))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(middleware::from_fn_with_state(state.clone(), track_requests))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header::CONTENT_TYPE, Request, StatusCode},
        response::Response,
    };
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::generator::{GeminiClient, GenerationOptions, GeneratorError, TextGenerator};

    const BOUNDARY: &str = "resume-api-test-boundary";

    const RESUME: &str = "Jane Doe
jane.doe@example.com | (555) 123-4567 | github.com/janedoe
[EXPERIENCE]
Senior Engineer | 2020-Present
Acme Corp
[SKILLS]
- Rust, Python, Docker";

    /// Replies with a fixed string (or fails when `reply` is `None`) and records prompts.
    struct CannedGenerator {
        reply: Option<String>,
        prompts: Mutex<Vec<String>>,
    }

    impl CannedGenerator {
        fn replying(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Some(reply.to_string()),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                reply: None,
                prompts: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl TextGenerator for CannedGenerator {
        fn is_configured(&self) -> bool {
            true
        }

        async fn generate(
            &self,
            prompt: &str,
            _options: GenerationOptions,
        ) -> Result<String, GeneratorError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.reply.clone().ok_or(GeneratorError::EmptyContent)
        }
    }

    fn test_state() -> AppState {
        state_with(Config::default())
    }

    fn state_with(config: Config) -> AppState {
        AppState::new(config, Arc::new(GeminiClient::new(None).unwrap()))
    }

    fn canned_state(generator: Arc<CannedGenerator>) -> AppState {
        AppState::new(Config::default(), generator)
    }

    fn json_request(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn multipart_request(
        uri: &str,
        field: &str,
        file_name: &str,
        content_type: &str,
        contents: &[u8],
    ) -> Request<Body> {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(contents);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = build_router(test_state())
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["service"], "resume-api");
    }

    #[tokio::test]
    async fn test_parse_text_returns_fields() {
        let response = build_router(test_state())
            .oneshot(json_request("/api/v1/parse/text", json!({ "text": RESUME })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["success"], true);
        let data = &json["data"];
        assert_eq!(data["name"], "Jane Doe");
        assert_eq!(data["email"], "jane.doe@example.com");
        assert_eq!(data["phone"], "(555) 123-4567");
        assert_eq!(data["github"], "github.com/janedoe");
        assert!(data["linkedin"].is_null());
        assert_eq!(data["skills"], json!(["Python", "Rust", "Docker"]));
    }

    #[tokio::test]
    async fn test_parse_text_requires_text() {
        let response = build_router(test_state())
            .oneshot(json_request("/api/v1/parse/text", json!({ "text": "  \n " })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "text is required");
    }

    #[tokio::test]
    async fn test_parse_sections() {
        let response = build_router(test_state())
            .oneshot(json_request("/api/v1/parse/sections", json!({ "text": RESUME })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let data = body_json(response).await["data"].clone();
        assert_eq!(data["name"], "Jane Doe");
        assert_eq!(data["contact"][2], "github.com/janedoe");

        let experience = &data["sections"][0];
        assert_eq!(experience["title"], "EXPERIENCE");
        assert_eq!(experience["entries"][0]["title"], "Senior Engineer");
        assert_eq!(experience["entries"][0]["date"], "2020-Present");
        assert_eq!(experience["entries"][0]["subtitle"], "Acme Corp");

        let skills = &data["sections"][1]["entries"][0];
        assert_eq!(skills["title"], "Details");
        assert_eq!(skills["details"], json!(["Rust, Python, Docker"]));
    }

    #[tokio::test]
    async fn test_extract_text_from_txt_upload() {
        let response = build_router(test_state())
            .oneshot(multipart_request(
                "/api/v1/extract-text",
                "file",
                "resume.txt",
                "text/plain",
                b"  Jane   Doe  \r\n\r\n\r\n\r\nRust engineer ",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let data = body_json(response).await["data"].clone();
        assert_eq!(data["text"], "Jane Doe\n\nRust engineer");
        assert_eq!(data["metadata"]["fileName"], "resume.txt");
        assert_eq!(data["metadata"]["fileType"], "text/plain");
        assert_eq!(data["metadata"]["wordCount"], 4);
    }

    #[tokio::test]
    async fn test_parse_upload_counts_parsed_resume() {
        let state = test_state();
        let response = build_router(state.clone())
            .oneshot(multipart_request(
                "/api/v1/parse",
                "file",
                "resume.txt",
                "text/plain",
                RESUME.as_bytes(),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let data = body_json(response).await["data"].clone();
        assert_eq!(data["fields"]["name"], "Jane Doe");
        assert_eq!(data["fields"]["email"], "jane.doe@example.com");
        assert_eq!(state.stats.snapshot().total_parsed_resumes, 1);
    }

    #[tokio::test]
    async fn test_parse_docx_upload() {
        use std::io::{Cursor, Write};
        use zip::write::SimpleFileOptions;

        let xml = "<w:document><w:body>\
            <w:p><w:r><w:t>Jane Doe</w:t></w:r></w:p>\
            <w:p><w:r><w:t>jane.doe@example.com | Kubernetes, AWS</w:t></w:r></w:p>\
            </w:body></w:document>";
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("word/document.xml", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(xml.as_bytes()).unwrap();
        let docx = writer.finish().unwrap().into_inner();

        let response = build_router(test_state())
            .oneshot(multipart_request(
                "/api/v1/parse",
                "file",
                "resume.docx",
                "application/octet-stream",
                &docx,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let fields = body_json(response).await["data"]["fields"].clone();
        assert_eq!(fields["name"], "Jane Doe");
        assert_eq!(fields["skills"], json!(["Kubernetes", "AWS"]));
    }

    #[tokio::test]
    async fn test_unsupported_file_type() {
        let response = build_router(test_state())
            .oneshot(multipart_request(
                "/api/v1/parse",
                "file",
                "photo.png",
                "image/png",
                b"\x89PNG not a resume at all",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert!(json["error"]
            .as_str()
            .unwrap()
            .contains("Unsupported file type"));
    }

    #[tokio::test]
    async fn test_missing_file_field() {
        let response = build_router(test_state())
            .oneshot(multipart_request(
                "/api/v1/extract-text",
                "resume",
                "resume.txt",
                "text/plain",
                RESUME.as_bytes(),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "No file provided");
    }

    #[tokio::test]
    async fn test_file_too_large() {
        let state = state_with(Config {
            max_file_size: 16,
            ..Config::default()
        });
        let response = build_router(state)
            .oneshot(multipart_request(
                "/api/v1/extract-text",
                "file",
                "resume.txt",
                "text/plain",
                RESUME.as_bytes(),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert!(json["error"].as_str().unwrap().starts_with("File too large"));
    }

    #[tokio::test]
    async fn test_unreadable_upload_is_unprocessable() {
        let response = build_router(test_state())
            .oneshot(multipart_request(
                "/api/v1/extract-text",
                "file",
                "resume.txt",
                "text/plain",
                b"  tiny \n",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body_json(response).await["success"], false);
    }

    #[tokio::test]
    async fn test_stats_track_requests_and_errors() {
        let state = test_state();
        let app = build_router(state.clone());

        app.clone()
            .oneshot(json_request("/api/v1/parse/text", json!({ "text": RESUME })))
            .await
            .unwrap();
        app.clone()
            .oneshot(json_request("/api/v1/parse/text", json!({ "text": "" })))
            .await
            .unwrap();

        let response = app
            .oneshot(Request::get("/api/v1/stats").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let stats = body_json(response).await["data"].clone();

        // The stats request itself is counted before the snapshot is taken.
        assert_eq!(stats["totalRequests"], 3);
        assert_eq!(stats["totalParsedResumes"], 1);
        assert_eq!(stats["errors"], 1);
    }

    #[tokio::test]
    async fn test_oversized_body_reports_file_too_large() {
        let state = state_with(Config {
            max_file_size: 16,
            ..Config::default()
        });
        let contents = vec![b'a'; 200 * 1024];
        let response = build_router(state)
            .oneshot(multipart_request(
                "/api/v1/extract-text",
                "file",
                "resume.txt",
                "text/plain",
                &contents,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert!(json["error"].as_str().unwrap().starts_with("File too large"));
    }

    #[tokio::test]
    async fn test_wrong_json_type_is_enveloped() {
        let response = build_router(test_state())
            .oneshot(json_request("/api/v1/parse/text", json!({ "text": 5 })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert!(json["error"]
            .as_str()
            .unwrap()
            .starts_with("Failed to deserialize the JSON body"));
        assert!(json["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/parse/sections")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from("{\"text\": "))
            .unwrap();
        let response = build_router(test_state()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["success"], false);
    }

    #[tokio::test]
    async fn test_demo_resumes() {
        let response = build_router(test_state())
            .oneshot(Request::get("/api/v1/demo-resumes").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let data = body_json(response).await["data"].clone();
        assert_eq!(data.as_array().map(Vec::len), Some(2));
        assert_eq!(data[0]["name"], "Jane Doe");
        assert_eq!(data[1]["skills"], json!(["Python", "Django", "PostgreSQL"]));
        assert_eq!(data[1]["accuracy"], 88);
    }

    #[tokio::test]
    async fn test_ai_health_unconfigured() {
        let response = build_router(test_state())
            .oneshot(Request::get("/api/v1/ai/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "API key not configured");
        assert_eq!(json["data"]["geminiStatus"], "unavailable");
        assert_eq!(json["data"]["configured"], false);
    }

    #[tokio::test]
    async fn test_ai_health_available() {
        let response = build_router(canned_state(CannedGenerator::replying("OK")))
            .oneshot(Request::get("/api/v1/ai/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["geminiStatus"], "available");
        assert!(json["data"]["responseTime"].is_u64());
    }

    #[tokio::test]
    async fn test_ats_optimize_validation() {
        let app = build_router(test_state());

        let response = app
            .clone()
            .oneshot(json_request("/api/v1/ai/ats-optimize", json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "resumeText is required");

        let response = app
            .oneshot(json_request(
                "/api/v1/ai/ats-optimize",
                json!({ "resumeText": "   too short resume   " }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "resume text is too short");
    }

    #[tokio::test]
    async fn test_ats_optimize_fills_defaults() {
        let generator = CannedGenerator::replying(
            "```json\n{\"score\": 140, \"strengths\": [\"Clear headings\"]}\n```",
        );
        let response = build_router(canned_state(generator.clone()))
            .oneshot(json_request(
                "/api/v1/ai/ats-optimize",
                json!({ "resumeText": RESUME, "jobDescription": "Rust backend engineer" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let data = body_json(response).await["data"].clone();
        assert_eq!(data["score"], 100);
        assert_eq!(data["strengths"], json!(["Clear headings"]));
        assert_eq!(data["missingKeywords"], json!([]));
        assert_eq!(data["issues"], json!([]));

        let prompts = generator.prompts.lock().unwrap();
        assert!(prompts[0].contains("Rust backend engineer"));
    }

    #[tokio::test]
    async fn test_ai_without_key_is_server_error() {
        let response = build_router(test_state())
            .oneshot(json_request(
                "/api/v1/ai/ats-optimize",
                json!({ "resumeText": RESUME }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Gemini API key not configured");
    }

    #[tokio::test]
    async fn test_generator_failure_is_enveloped() {
        let response = build_router(canned_state(CannedGenerator::failing()))
            .oneshot(json_request(
                "/api/v1/ai/action-verbs",
                json!({ "text": "Worked on the billing service" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["error"], "No content in Gemini response");
    }

    #[tokio::test]
    async fn test_tone_adjust_validation_and_defaults() {
        let app = build_router(canned_state(CannedGenerator::replying("{}")));

        let response = app
            .clone()
            .oneshot(json_request(
                "/api/v1/ai/tone-adjust",
                json!({ "text": "I did some stuff", "tone": "snarky" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["error"],
            r#"tone must be "formal" or "casual""#
        );

        let response = app
            .clone()
            .oneshot(json_request(
                "/api/v1/ai/tone-adjust",
                json!({ "text": " hi ", "tone": "formal" }),
            ))
            .await
            .unwrap();
        assert_eq!(body_json(response).await["error"], "text is too short");

        let response = app
            .oneshot(json_request(
                "/api/v1/ai/tone-adjust",
                json!({ "text": "I did some stuff", "tone": "formal" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let data = body_json(response).await["data"].clone();
        assert_eq!(data["adjustedText"], "I did some stuff");
        assert_eq!(data["originalTone"], "unknown");
        assert_eq!(data["targetTone"], "formal");
    }

    #[tokio::test]
    async fn test_action_verbs_needs_ten_chars() {
        let app = build_router(canned_state(CannedGenerator::replying(
            r#"{"enhancedText": "Built the billing service", "changedVerbs": [{"original": "Worked on", "enhanced": "Built"}]}"#,
        )));

        let response = app
            .clone()
            .oneshot(json_request("/api/v1/ai/action-verbs", json!({ "text": "Did stuff" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "text is too short");

        let response = app
            .oneshot(json_request(
                "/api/v1/ai/action-verbs",
                json!({ "text": "Worked on the billing service" }),
            ))
            .await
            .unwrap();
        let data = body_json(response).await["data"].clone();
        assert_eq!(data["enhancedText"], "Built the billing service");
        assert_eq!(data["totalChanges"], 1);
        assert_eq!(data["changedVerbs"][0]["enhanced"], "Built");
    }

    #[tokio::test]
    async fn test_cover_letter_validation_and_word_count() {
        let generator = CannedGenerator::replying(
            r#"{"coverLetter": "Dear Acme,\n\nI build resume parsers in Rust.\n\nJane Doe"}"#,
        );
        let app = build_router(canned_state(generator.clone()));

        let response = app
            .clone()
            .oneshot(json_request(
                "/api/v1/ai/cover-letter",
                json!({ "jobDescription": "Senior Rust engineer" }),
            ))
            .await
            .unwrap();
        assert_eq!(body_json(response).await["error"], "resumeData is required");

        let response = app
            .clone()
            .oneshot(json_request(
                "/api/v1/ai/cover-letter",
                json!({ "resumeData": {"name": "Jane Doe"}, "jobDescription": "" }),
            ))
            .await
            .unwrap();
        assert_eq!(body_json(response).await["error"], "jobDescription is required");

        let response = app
            .clone()
            .oneshot(json_request(
                "/api/v1/ai/cover-letter",
                json!({ "resumeData": {"name": "Jane Doe"}, "jobDescription": "Rust dev" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "job description is too short");

        let response = app
            .oneshot(json_request(
                "/api/v1/ai/cover-letter",
                json!({
                    "resumeData": {"name": "Jane Doe", "skills": ["Rust", "Go"]},
                    "jobDescription": "Senior Rust engineer for parsing services",
                    "companyName": "Acme"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let data = body_json(response).await["data"].clone();
        assert_eq!(data["wordCount"], 10);

        let prompts = generator.prompts.lock().unwrap();
        assert!(prompts[0].contains("Name: Jane Doe\nSkills: Rust, Go"));
        assert!(prompts[0].contains("Company: Acme"));
    }
}
