use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::extraction::ExtractionError;
use crate::generator::GeneratorError;
use crate::models::response::ApiResponse;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("Unprocessable entity: {0}")]
    UnprocessableEntity(String),

    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Generation error: {0}")]
    Generation(#[from] GeneratorError),
}

impl AppError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::UnsupportedFileType(name) => (
                StatusCode::BAD_REQUEST,
                format!("Unsupported file type: {name}. Please upload a PDF, DOCX, or TXT file"),
            ),
            AppError::Extraction(e @ (ExtractionError::Io(_) | ExtractionError::Join(_))) => {
                tracing::error!("Extraction failure: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to extract text from file".to_string(),
                )
            }
            AppError::Extraction(e) => {
                tracing::warn!("Extraction rejected: {e}");
                (StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
            }
            AppError::UnprocessableEntity(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
            AppError::Generation(e @ GeneratorError::Http(_)) => {
                tracing::error!("Generator request failed: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to reach the generative-language API".to_string(),
                )
            }
            AppError::Generation(e) => {
                tracing::error!("Generation failed: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
        }
    }
}

/// Syntax errors are 400; well-formed JSON of the wrong shape is 422.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        let message = rejection.body_text();
        if rejection.status() == StatusCode::UNPROCESSABLE_ENTITY {
            AppError::UnprocessableEntity(message)
        } else {
            AppError::Validation(message)
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        (status, Json(ApiResponse::<()>::error(message))).into_response()
    }
}
