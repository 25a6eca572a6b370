// Resume text parsing: flat field extraction and section-structured preview parsing.
// Both parsers are pure and total. They take already-extracted plain text and never fail.

pub mod fields;
pub mod sections;
pub mod vocabulary;

pub use fields::{extract_fields, ExtractedFields};
pub use sections::{parse_resume, ParsedResume};
