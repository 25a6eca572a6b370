use once_cell::sync::Lazy;
use regex::Regex;

static EXCESS_NEWLINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());
static HORIZONTAL_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+").unwrap());

/// Normalises text pulled out of a document.
///
/// - `\r\n` and lone `\r` become `\n`
/// - three or more consecutive newlines collapse to two
/// - runs of spaces/tabs collapse to one space
/// - every line, and the whole text, is trimmed
pub fn clean_extracted_text(text: &str) -> String {
    let unified = text.replace("\r\n", "\n").replace('\r', "\n");
    let collapsed = EXCESS_NEWLINES.replace_all(&unified, "\n\n");
    let spaced = HORIZONTAL_RUNS.replace_all(&collapsed, " ");

    spaced
        .split('\n')
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
