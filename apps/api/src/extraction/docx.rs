//! Raw text from Word (OOXML) documents.
//!
//! A `.docx` is a zip archive; the body lives in `word/document.xml`. Only
//! text runs and the structural breaks between them are kept. Styling,
//! tables-as-layout and headers/footers are ignored.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;
use zip::result::ZipError;
use zip::ZipArchive;

use crate::extraction::{ExtractionError, TextExtractor};

const DOCUMENT_PART: &str = "word/document.xml";

pub struct DocxExtractor;

impl TextExtractor for DocxExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))?;
        let mut part = archive.by_name(DOCUMENT_PART).map_err(|e| match e {
            ZipError::FileNotFound => {
                ExtractionError::Docx(format!("archive has no {DOCUMENT_PART}"))
            }
            other => ExtractionError::Zip(other),
        })?;

        let mut xml = String::new();
        part.read_to_string(&mut xml)?;
        document_xml_to_text(&xml)
    }
}

/// Walks the WordprocessingML body and keeps run text plus the breaks between runs.
/// Tabs and breaks only count inside a `<w:r>`; tab-stop definitions under
/// paragraph properties are skipped.
fn document_xml_to_text(xml: &str) -> Result<String, ExtractionError> {
    let mut reader = Reader::from_str(xml);
    let mut out = String::new();

    // Runs nest inside text boxes, so depth rather than a flag.
    let mut run_depth: u32 = 0;
    let mut in_text = false;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| ExtractionError::Docx(format!("malformed {DOCUMENT_PART}: {e}")))?;

        match event {
            Event::Start(ref e) => match e.name().as_ref() {
                b"w:r" => run_depth += 1,
                b"w:t" if run_depth > 0 => in_text = true,
                b"w:tab" if run_depth > 0 => out.push('\t'),
                b"w:br" | b"w:cr" if run_depth > 0 => out.push('\n'),
                _ => {}
            },
            Event::Empty(ref e) => match e.name().as_ref() {
                b"w:tab" if run_depth > 0 => out.push('\t'),
                b"w:br" | b"w:cr" if run_depth > 0 => out.push('\n'),
                b"w:p" => out.push('\n'),
                _ => {}
            },
            Event::End(ref e) => match e.name().as_ref() {
                b"w:r" => run_depth = run_depth.saturating_sub(1),
                b"w:t" => in_text = false,
                b"w:p" => out.push('\n'),
                _ => {}
            },
            Event::Text(ref e) if in_text => {
                let text = e
                    .unescape()
                    .map_err(|e| ExtractionError::Docx(format!("bad text run: {e}")))?;
                out.push_str(&text);
            }
            Event::CData(e) if in_text => {
                out.push_str(&String::from_utf8_lossy(&e.into_inner()));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(out)
}
