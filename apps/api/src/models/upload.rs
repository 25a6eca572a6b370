use serde::{Deserialize, Serialize};

use crate::extraction::ExtractionMetadata;
use crate::parsing::ExtractedFields;

/// JSON body for the text-based parse endpoints.
#[derive(Debug, Deserialize)]
pub struct TextRequest {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct ExtractTextResponse {
    pub text: String,
    pub metadata: ExtractionMetadata,
}

#[derive(Debug, Serialize)]
pub struct ParseUploadResponse {
    pub fields: ExtractedFields,
    pub metadata: ExtractionMetadata,
}
