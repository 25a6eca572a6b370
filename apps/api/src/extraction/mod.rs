//! Text extraction: turns uploaded PDF / DOCX / TXT bytes into plain text for the parsers.

pub mod cleanup;
pub mod docx;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::extraction::cleanup::{clean_extracted_text, word_count};
use crate::extraction::docx::DocxExtractor;

const MIME_PLAIN: &str = "text/plain";
const MIME_PDF: &str = "application/pdf";
const MIME_DOCX: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Cleaned text shorter than this (in characters, after trimming) is treated as unreadable.
pub const MIN_TEXT_CHARS: usize = 10;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Failed to parse PDF file: {0}")]
    Pdf(String),

    #[error("Failed to parse DOCX file: {0}")]
    Docx(String),

    #[error("Failed to read DOCX archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Extraction task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("Could not extract readable text from the file")]
    Unreadable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    PlainText,
}

impl DocumentKind {
    /// Detects the document kind from the declared content type or, failing that,
    /// the file extension. Returns `None` for anything unsupported.
    pub fn detect(content_type: Option<&str>, file_name: &str) -> Option<Self> {
        let name = file_name.to_ascii_lowercase();
        let mime = content_type.unwrap_or_default();

        if mime == MIME_PLAIN || name.ends_with(".txt") {
            Some(DocumentKind::PlainText)
        } else if mime == MIME_PDF || name.ends_with(".pdf") {
            Some(DocumentKind::Pdf)
        } else if mime == MIME_DOCX || name.ends_with(".docx") {
            Some(DocumentKind::Docx)
        } else {
            None
        }
    }

    fn extractor(self) -> &'static dyn TextExtractor {
        match self {
            DocumentKind::Pdf => &PdfExtractor,
            DocumentKind::Docx => &DocxExtractor,
            DocumentKind::PlainText => &PlainTextExtractor,
        }
    }
}

/// Converts raw document bytes into text. Implementations are synchronous and CPU-bound.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractionError>;
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }
}

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        // pdf-extract panics on some malformed fonts and xref tables.
        match std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes)) {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(e)) => Err(ExtractionError::Pdf(e.to_string())),
            Err(_) => Err(ExtractionError::Pdf("PDF parser aborted".to_string())),
        }
    }
}

/// Extracts and cleans text from an uploaded document.
/// Runs on the blocking pool; rejects results too short to be a resume.
pub async fn extract_document(kind: DocumentKind, bytes: Bytes) -> Result<String, ExtractionError> {
    let size = bytes.len();
    let raw = tokio::task::spawn_blocking(move || kind.extractor().extract(&bytes)).await??;
    let text = clean_extracted_text(&raw);
    let chars = text.chars().count();

    if chars < MIN_TEXT_CHARS {
        warn!(?kind, size, chars, "extraction produced no readable text");
        return Err(ExtractionError::Unreadable);
    }

    info!(?kind, size, chars, "document text extracted");
    Ok(text)
}

/// Describes an extraction result for API responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionMetadata {
    pub file_name: String,
    pub file_size: usize,
    pub file_type: String,
    pub extracted_at: DateTime<Utc>,
    pub character_count: usize,
    pub word_count: usize,
}

impl ExtractionMetadata {
    pub fn new(file_name: &str, file_type: &str, file_size: usize, text: &str) -> Self {
        Self {
            file_name: file_name.to_string(),
            file_size,
            file_type: file_type.to_string(),
            extracted_at: Utc::now(),
            character_count: text.chars().count(),
            word_count: word_count(text),
        }
    }
}
