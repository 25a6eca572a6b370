//! Field extractor: best-effort contact details and skill tags from raw resume text.
//!
//! This is the fallback parser: it never fails. Anything it cannot find is
//! reported as `None` (or an empty list), never as an error.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::parsing::vocabulary::SKILL_VOCABULARY;

/// Name reported when the text has no non-blank line.
pub const UNKNOWN_NAME: &str = "Unknown";

/// Summary length, in UTF-16 code units.
pub const SUMMARY_MAX_UNITS: usize = 500;

/// ASCII word boundaries: a letter like `é` right before the local part does not block a match.
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?-u:\b)[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Z|a-z]{2,}(?-u:\b)").unwrap()
});

static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\+[0-9]{1,3}[-.\s]?)?\(?[0-9]{3}\)?[-.\s]?[0-9]{3}[-.\s]?[0-9]{4}").unwrap()
});

static LINKEDIN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)linkedin\.com/in/[A-Za-z0-9_-]+|linkedin\.com/company/[A-Za-z0-9_-]+")
        .unwrap()
});

static GITHUB_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)github\.com/[A-Za-z0-9_-]+").unwrap());

/// One compiled pattern per vocabulary entry, in vocabulary order.
/// A skill only counts when delimited by start/end of text, whitespace or a comma,
/// so "JavaScript" never registers as "Java".
static SKILL_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    SKILL_VOCABULARY
        .iter()
        .map(|skill| {
            let pattern = format!(r"(?i)(?:^|[\s,]){}(?:$|[\s,])", regex::escape(skill));
            (*skill, Regex::new(&pattern).unwrap())
        })
        .collect()
});

/// Flat record of everything the regex extractor could find.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedFields {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub skills: Vec<String>,
    /// Declared for API compatibility; never populated.
    pub experience: Vec<String>,
    /// Declared for API compatibility; never populated.
    pub education: Vec<String>,
    pub summary: String,
}

/// Extracts contact fields, skills and a summary from raw resume text.
pub fn extract_fields(text: &str) -> ExtractedFields {
    let name = text
        .split('\n')
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or(UNKNOWN_NAME)
        .to_string();

    let fields = ExtractedFields {
        name,
        email: first_match(&EMAIL_RE, text),
        phone: first_match(&PHONE_RE, text),
        linkedin: first_match(&LINKEDIN_RE, text),
        github: first_match(&GITHUB_RE, text),
        skills: detect_skills(text),
        experience: Vec::new(),
        education: Vec::new(),
        summary: truncate_utf16(text, SUMMARY_MAX_UNITS).to_string(),
    };

    debug!(
        skills = fields.skills.len(),
        has_email = fields.email.is_some(),
        has_phone = fields.phone.is_some(),
        "extracted resume fields"
    );
    fields
}

/// Returns the canonical spelling of every vocabulary skill present in `text`.
pub fn detect_skills(text: &str) -> Vec<String> {
    SKILL_PATTERNS
        .iter()
        .filter(|(_, re)| re.is_match(text))
        .map(|(skill, _)| skill.to_string())
        .collect()
}

fn first_match(re: &Regex, text: &str) -> Option<String> {
    re.find(text).map(|m| m.as_str().to_string())
}

/// Longest prefix of `text` that fits in `max_units` UTF-16 code units.
/// A character that would straddle the limit is dropped whole.
fn truncate_utf16(text: &str, max_units: usize) -> &str {
    let mut units = 0;
    for (idx, ch) in text.char_indices() {
        units += ch.len_utf16();
        if units > max_units {
            return &text[..idx];
        }
    }
    text
}
