use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::extraction::cleanup::word_count;

const DEFAULT_COVER_LETTER: &str = "Dear Hiring Manager,";
const UNKNOWN_TONE: &str = "unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Formal,
    Casual,
}

impl Tone {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "formal" => Some(Tone::Formal),
            "casual" => Some(Tone::Casual),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Tone::Formal => "formal",
            Tone::Casual => "casual",
        }
    }
}

// ── Requests ────────────────────────────────────────────────────────────────
// Fields are optional so missing values get endpoint-specific messages.

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtsOptimizeRequest {
    pub resume_text: Option<String>,
    pub job_description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ToneAdjustRequest {
    pub text: Option<String>,
    pub tone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ActionVerbsRequest {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverLetterRequest {
    /// Either free text or a parsed-fields object.
    pub resume_data: Option<Value>,
    pub job_description: Option<String>,
    pub company_name: Option<String>,
}

// ── Generator replies ───────────────────────────────────────────────────────
// Whatever the model leaves out is filled in when converting to the response.

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtsReply {
    pub score: Option<f64>,
    pub missing_keywords: Option<Vec<String>>,
    pub recommendations: Option<Vec<String>>,
    pub issues: Option<Vec<String>>,
    pub strengths: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToneReply {
    pub adjusted_text: Option<String>,
    pub summary: Option<String>,
    pub original_tone: Option<String>,
    pub target_tone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VerbChange {
    pub original: String,
    pub enhanced: String,
    #[serde(default)]
    pub context: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionVerbsReply {
    pub enhanced_text: Option<String>,
    pub changed_verbs: Option<Vec<VerbChange>>,
    pub total_changes: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverLetterReply {
    pub cover_letter: Option<String>,
    pub word_count: Option<u32>,
}

// ── Responses ───────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AtsReport {
    /// Clamped to 0..=100.
    pub score: u8,
    pub missing_keywords: Vec<String>,
    pub recommendations: Vec<String>,
    pub issues: Vec<String>,
    pub strengths: Vec<String>,
}

impl From<AtsReply> for AtsReport {
    fn from(reply: AtsReply) -> Self {
        let score = reply
            .score
            .filter(|s| s.is_finite())
            .map_or(0, |s| s.round().clamp(0.0, 100.0) as u8);

        Self {
            score,
            missing_keywords: reply.missing_keywords.unwrap_or_default(),
            recommendations: reply.recommendations.unwrap_or_default(),
            issues: reply.issues.unwrap_or_default(),
            strengths: reply.strengths.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToneAdjustment {
    pub adjusted_text: String,
    pub summary: String,
    pub original_tone: String,
    pub target_tone: String,
}

impl ToneAdjustment {
    pub fn from_reply(reply: ToneReply, original_text: &str, tone: Tone) -> Self {
        Self {
            adjusted_text: reply
                .adjusted_text
                .unwrap_or_else(|| original_text.to_string()),
            summary: reply.summary.unwrap_or_default(),
            original_tone: reply
                .original_tone
                .unwrap_or_else(|| UNKNOWN_TONE.to_string()),
            target_tone: reply
                .target_tone
                .unwrap_or_else(|| tone.as_str().to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionVerbsResult {
    pub enhanced_text: String,
    pub changed_verbs: Vec<VerbChange>,
    pub total_changes: u32,
}

impl ActionVerbsResult {
    pub fn from_reply(reply: ActionVerbsReply, original_text: &str) -> Self {
        let changed_verbs = reply.changed_verbs.unwrap_or_default();
        let total_changes = reply
            .total_changes
            .unwrap_or_else(|| u32::try_from(changed_verbs.len()).unwrap_or(u32::MAX));

        Self {
            enhanced_text: reply
                .enhanced_text
                .unwrap_or_else(|| original_text.to_string()),
            changed_verbs,
            total_changes,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverLetter {
    pub cover_letter: String,
    pub word_count: u32,
}

impl From<CoverLetterReply> for CoverLetter {
    fn from(reply: CoverLetterReply) -> Self {
        // A reply without a letter reports zero words even though a greeting is filled in.
        let counted = reply
            .cover_letter
            .as_deref()
            .map_or(0, |letter| u32::try_from(word_count(letter)).unwrap_or(u32::MAX));

        Self {
            word_count: reply.word_count.unwrap_or(counted),
            cover_letter: reply
                .cover_letter
                .unwrap_or_else(|| DEFAULT_COVER_LETTER.to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AiHealth {
    pub gemini_status: &'static str,
    pub configured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time: Option<u64>,
}

/// Renders `resumeData` for the cover-letter prompt. Strings pass through;
/// objects are flattened from their parsed-field keys.
pub fn resume_brief(data: &Value) -> String {
    if let Some(text) = data.as_str() {
        return text.to_string();
    }

    let field = |key: &str| data.get(key).and_then(Value::as_str).unwrap_or_default();
    let list = |key: &str, sep: &str| {
        data.get(key)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .collect::<Vec<_>>()
                    .join(sep)
            })
            .unwrap_or_default()
    };

    let name = match field("name") {
        "" => "Candidate",
        name => name,
    };

    format!(
        "Name: {name}\nSkills: {}\nExperience: {}\nEducation: {}\nSummary: {}",
        list("skills", ", "),
        list("experience", "; "),
        list("education", "; "),
        field("summary"),
    )
}
