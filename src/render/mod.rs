//! Rendering of pages and documents to output formats.

mod json;
mod text;

pub use json::{document_to_json, to_json, BandSnapshot, JsonFormat, PageSnapshot, WordSnapshot};
pub use text::{document_to_text, to_text};
