//! # pagetext
//!
//! Glyph-to-text aggregation for document viewers.
//!
//! A content-stream interpreter feeds painted glyphs in paint order; the
//! library groups them into words and lines, reconstructs the reading order
//! of the page and serves selection, search, highlighting and redaction on
//! top of it.
//!
//! ## Quick Start
//!
//! ```
//! use pagetext::{Glyph, PageText, Rect};
//!
//! let mut page = PageText::new();
//! page.add_glyph(Glyph::simple(Rect::new(0.0, 0.0, 10.0, 10.0), "A"), None);
//! page.add_glyph(Glyph::simple(Rect::new(40.0, 0.0, 10.0, 10.0), "B"), None);
//!
//! // The 30pt gap becomes synthesized spaces
//! assert_eq!(page.lines()[0].words().len(), 3);
//!
//! page.select_all();
//! assert!(page.selected_text().starts_with('A'));
//! ```
//!
//! ## Features
//!
//! - **Word segmentation**: whitespace, punctuation and gap-based word breaks
//! - **Reading order**: band clustering tolerant of paint-order quirks
//! - **Visibility layers**: hidden layers drop out of text and selection
//! - **Stable word keys**: locate a word again after the page is rebuilt
//! - **Search**: regex over reading-order text with NFKC normalization
//! - **Parallel processing**: Uses Rayon for multi-page documents

pub mod error;
pub mod geometry;
pub mod model;
pub mod parser;
pub mod render;
pub mod search;

// Re-export commonly used types
pub use error::{Error, Result};
pub use geometry::{Point, Rect, Transform};
pub use model::{
    Glyph, LayerId, Line, PageRotation, PageText, SharedPage, TextDocument, Word, WordKey,
    WordKind,
};
pub use parser::{
    replay, GlyphEvent, GlyphSink, LayoutOptions, PageRecording, ReadingOrder, Recording, WordLoc,
};
pub use render::JsonFormat;
pub use search::{SearchHit, SearchOptions};

use std::path::Path;

/// Load a JSON event recording from a file.
///
/// # Example
///
/// ```no_run
/// use pagetext::load_recording;
///
/// let doc = load_recording("page-events.json").unwrap();
/// println!("Pages: {}", doc.page_count());
/// ```
pub fn load_recording<P: AsRef<Path>>(path: P) -> Result<TextDocument> {
    load_recording_with_options(path, LayoutOptions::default())
}

/// Load a JSON event recording with custom layout options.
///
/// # Example
///
/// ```no_run
/// use pagetext::{load_recording_with_options, LayoutOptions};
///
/// let options = LayoutOptions::new()
///     .with_space_fraction(4.0)
///     .top_to_bottom();
/// let doc = load_recording_with_options("page-events.json", options).unwrap();
/// ```
pub fn load_recording_with_options<P: AsRef<Path>>(
    path: P,
    options: LayoutOptions,
) -> Result<TextDocument> {
    let recording = Recording::load(path)?;
    TextDocument::from_recording(&recording, options)
}

/// Parse a JSON event recording held in memory.
///
/// # Example
///
/// ```
/// use pagetext::parse_recording;
///
/// let json = r#"{"pages":[{"number":1,"events":[
///     {"type":"glyph","bounds":{"x":0,"y":0,"width":10,"height":10},"text":"h"},
///     {"type":"glyph","bounds":{"x":10,"y":0,"width":10,"height":10},"text":"i"}
/// ]}]}"#;
/// let mut doc = parse_recording(json).unwrap();
/// assert_eq!(doc.plain_text(), "hi");
/// ```
pub fn parse_recording(json: &str) -> Result<TextDocument> {
    let recording = Recording::from_json(json)?;
    TextDocument::from_recording(&recording, LayoutOptions::default())
}

/// Extract reading-order text from a recording file.
///
/// # Example
///
/// ```no_run
/// use pagetext::extract_text;
///
/// let text = extract_text("page-events.json").unwrap();
/// println!("{}", text);
/// ```
pub fn extract_text<P: AsRef<Path>>(path: P) -> Result<String> {
    let mut doc = load_recording(path)?;
    Ok(render::document_to_text(&mut doc))
}

/// Convert a recording file to a JSON reading-order snapshot.
pub fn to_json<P: AsRef<Path>>(path: P, format: JsonFormat) -> Result<String> {
    let mut doc = load_recording(path)?;
    render::document_to_json(&mut doc, format)
}
