//! Section parser: turns a `Name / contact line / [SECTION]` resume into a preview tree.
//!
//! Expected layout:
//!
//! ```text
//! Jane Doe
//! jane@x.com | 555-000-0000
//! [EXPERIENCE]
//! Senior Engineer | 2020-Present
//! Acme Corp
//! - Did a thing
//! ```
//!
//! Lines are classified as exactly one of: section header (`[TITLE]`), bullet
//! (`- text`), or entry title (anything else, optionally `title | date`).
//! Content before the first header is dropped.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Name used when the input has no non-blank line.
pub const DEFAULT_NAME: &str = "Your Name";

/// Title given to an entry opened implicitly by a bullet.
pub const DETAILS_TITLE: &str = "Details";

/// Sections whose bare follow-on lines are promoted to subtitles.
const SUBTITLE_SECTIONS: &[&str] = &["EXPERIENCE", "EDUCATION"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeEntry {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    pub details: Vec<String>,
}

impl ResumeEntry {
    fn titled(title: impl Into<String>, date: Option<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: None,
            date,
            details: Vec::new(),
        }
    }

    /// A bare line: no bullets and no date, where an empty date counts as none.
    /// Candidate for subtitle promotion.
    fn is_bare(&self) -> bool {
        self.date.as_deref().map_or(true, str::is_empty) && self.details.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeSection {
    pub title: String,
    pub entries: Vec<ResumeEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedResume {
    pub name: String,
    pub contact: Vec<String>,
    pub sections: Vec<ResumeSection>,
}

impl ParsedResume {
    /// Result for input with no content at all.
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contact: Vec::new(),
            sections: Vec::new(),
        }
    }
}

/// One classified, trimmed, non-blank line.
#[derive(Debug, PartialEq)]
enum Line<'a> {
    Header(&'a str),
    Bullet(&'a str),
    Entry { title: &'a str, date: Option<&'a str> },
}

impl<'a> Line<'a> {
    fn classify(line: &'a str) -> Self {
        if let Some(title) = line.strip_prefix('[').and_then(|rest| rest.strip_suffix(']')) {
            return Line::Header(title.trim());
        }
        if let Some(detail) = line.strip_prefix("- ") {
            return Line::Bullet(detail.trim());
        }
        let mut parts = line.split('|').map(str::trim);
        let title = parts.next().unwrap_or_default();
        let date = parts.next();
        Line::Entry { title, date }
    }
}

/// Accumulator for the single forward pass.
/// The open entry is owned here and moved into its section when flushed.
enum ParseState {
    NoSection,
    InSection {
        section: ResumeSection,
        open_entry: Option<ResumeEntry>,
    },
}

impl ParseState {
    fn feed(self, line: Line<'_>, done: &mut Vec<ResumeSection>) -> Self {
        match (self, line) {
            (state, Line::Header(title)) => {
                if let Some(section) = state.close() {
                    done.push(section);
                }
                ParseState::InSection {
                    section: ResumeSection {
                        title: title.to_string(),
                        entries: Vec::new(),
                    },
                    open_entry: None,
                }
            }
            (ParseState::NoSection, _) => ParseState::NoSection,
            (
                ParseState::InSection {
                    section,
                    open_entry,
                },
                Line::Bullet(detail),
            ) => {
                let mut entry =
                    open_entry.unwrap_or_else(|| ResumeEntry::titled(DETAILS_TITLE, None));
                entry.details.push(detail.to_string());
                ParseState::InSection {
                    section,
                    open_entry: Some(entry),
                }
            }
            (
                ParseState::InSection {
                    mut section,
                    open_entry,
                },
                Line::Entry { title, date },
            ) => {
                section.entries.extend(open_entry);
                ParseState::InSection {
                    section,
                    open_entry: Some(ResumeEntry::titled(title, date.map(str::to_string))),
                }
            }
        }
    }

    /// Flushes the open entry and yields the finished section, if any.
    fn close(self) -> Option<ResumeSection> {
        match self {
            ParseState::NoSection => None,
            ParseState::InSection {
                mut section,
                open_entry,
            } => {
                section.entries.extend(open_entry);
                Some(section)
            }
        }
    }
}

/// Parses resume text, falling back to [`DEFAULT_NAME`] for empty input.
pub fn parse_resume(text: &str) -> ParsedResume {
    parse_resume_with_default(text, DEFAULT_NAME)
}

/// Parses resume text; `default_name` is used only when the input has no non-blank line.
pub fn parse_resume_with_default(text: &str, default_name: &str) -> ParsedResume {
    let mut lines = text.split('\n').map(str::trim).filter(|l| !l.is_empty());

    let Some(name) = lines.next() else {
        return ParsedResume::empty(default_name);
    };
    let contact = lines
        .next()
        .map(|line| line.split('|').map(|t| t.trim().to_string()).collect())
        .unwrap_or_default();

    let mut sections = Vec::new();
    let state = lines
        .map(Line::classify)
        .fold(ParseState::NoSection, |state, line| {
            state.feed(line, &mut sections)
        });
    sections.extend(state.close());

    for section in &mut sections {
        if takes_subtitles(&section.title) {
            promote_subtitles(section);
        }
    }

    debug!(sections = sections.len(), "parsed resume sections");
    ParsedResume {
        name: name.to_string(),
        contact,
        sections,
    }
}

fn takes_subtitles(title: &str) -> bool {
    let upper = title.to_uppercase();
    SUBTITLE_SECTIONS.contains(&upper.as_str())
}

/// Folds each bare entry into the entry before it as that entry's subtitle.
/// Looks one entry ahead only; a consumed entry is never itself an owner.
fn promote_subtitles(section: &mut ResumeSection) {
    let mut promoted = Vec::with_capacity(section.entries.len());
    let mut entries = std::mem::take(&mut section.entries).into_iter().peekable();

    while let Some(mut entry) = entries.next() {
        if let Some(next) = entries.next_if(ResumeEntry::is_bare) {
            entry.subtitle = Some(next.title);
        }
        promoted.push(entry);
    }
    section.entries = promoted;
}
