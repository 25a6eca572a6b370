use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use tracing::{debug, info};

use super::AppJson;
use crate::errors::AppError;
use crate::extraction::{extract_document, DocumentKind, ExtractionMetadata};
use crate::models::demo::{DemoResume, DEMO_RESUMES};
use crate::models::response::ApiResponse;
use crate::models::upload::{ExtractTextResponse, ParseUploadResponse, TextRequest};
use crate::parsing::{extract_fields, parse_resume, ExtractedFields, ParsedResume};
use crate::state::AppState;

const UPLOAD_FIELD: &str = "file";
const FALLBACK_FILE_TYPE: &str = "application/octet-stream";

struct Upload {
    file_name: String,
    content_type: Option<String>,
    bytes: Bytes,
}

fn file_too_large(max_file_size: usize) -> AppError {
    AppError::Validation(format!(
        "File too large. Please upload a file smaller than {max_file_size} bytes"
    ))
}

/// Bodies cut off by the request-body limit surface as 413 multipart errors.
fn multipart_error(err: MultipartError, context: &str, max_file_size: usize) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        file_too_large(max_file_size)
    } else {
        AppError::Validation(format!("{context}: {}", err.body_text()))
    }
}

/// Pulls the `file` field out of a multipart body, enforcing the size cap.
async fn read_upload(mut multipart: Multipart, max_file_size: usize) -> Result<Upload, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, "Invalid multipart body", max_file_size))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| multipart_error(e, "Failed to read upload", max_file_size))?;

        if bytes.len() > max_file_size {
            return Err(file_too_large(max_file_size));
        }

        debug!(file_name = %file_name, size = bytes.len(), "upload received");
        return Ok(Upload {
            file_name,
            content_type,
            bytes,
        });
    }

    Err(AppError::Validation("No file provided".to_string()))
}

async fn extract_upload(
    state: &AppState,
    multipart: Multipart,
) -> Result<(String, ExtractionMetadata), AppError> {
    let upload = read_upload(multipart, state.config.max_file_size).await?;
    let kind = DocumentKind::detect(upload.content_type.as_deref(), &upload.file_name)
        .ok_or_else(|| AppError::UnsupportedFileType(upload.file_name.clone()))?;

    let size = upload.bytes.len();
    let text = extract_document(kind, upload.bytes).await?;
    let metadata = ExtractionMetadata::new(
        &upload.file_name,
        upload.content_type.as_deref().unwrap_or(FALLBACK_FILE_TYPE),
        size,
        &text,
    );
    Ok((text, metadata))
}

fn require_text(req: &TextRequest) -> Result<&str, AppError> {
    if req.text.trim().is_empty() {
        return Err(AppError::Validation("text is required".to_string()));
    }
    Ok(&req.text)
}

/// POST /api/v1/extract-text
pub async fn handle_extract_text(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<ExtractTextResponse>>, AppError> {
    let (text, metadata) = extract_upload(&state, multipart).await?;
    Ok(Json(ApiResponse::ok(ExtractTextResponse { text, metadata })))
}

/// POST /api/v1/parse
pub async fn handle_parse_upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<ParseUploadResponse>>, AppError> {
    let (text, metadata) = extract_upload(&state, multipart).await?;
    let fields = extract_fields(&text);
    state.stats.record_parse();

    info!(
        file_name = %metadata.file_name,
        skills = fields.skills.len(),
        "resume parsed"
    );
    Ok(Json(ApiResponse::ok(ParseUploadResponse { fields, metadata })))
}

/// POST /api/v1/parse/text
pub async fn handle_parse_text(
    State(state): State<AppState>,
    AppJson(req): AppJson<TextRequest>,
) -> Result<Json<ApiResponse<ExtractedFields>>, AppError> {
    let fields = extract_fields(require_text(&req)?);
    state.stats.record_parse();
    Ok(Json(ApiResponse::ok(fields)))
}

/// POST /api/v1/parse/sections
pub async fn handle_parse_sections(
    AppJson(req): AppJson<TextRequest>,
) -> Result<Json<ApiResponse<ParsedResume>>, AppError> {
    let parsed = parse_resume(require_text(&req)?);
    Ok(Json(ApiResponse::ok(parsed)))
}

/// GET /api/v1/demo-resumes
pub async fn handle_demo_resumes() -> Json<ApiResponse<&'static [DemoResume]>> {
    Json(ApiResponse::ok(DEMO_RESUMES))
}
