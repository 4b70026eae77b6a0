//! JSON rendering of the reading order.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::geometry::Rect;
use crate::model::{PageText, TextDocument, WordKey, WordKind};

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// A word as it appears in a snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct WordSnapshot {
    pub key: WordKey,
    pub text: String,
    pub kind: WordKind,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub synthetic: bool,
    pub bounds: Rect,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub selected: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub highlighted: bool,
}

/// One band of a snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct BandSnapshot {
    pub bounds: Rect,
    pub words: Vec<WordSnapshot>,
}

/// The reading order of one page, detached from the page tree.
#[derive(Debug, Clone, Serialize)]
pub struct PageSnapshot {
    pub number: u32,
    pub bands: Vec<BandSnapshot>,
}

impl PageSnapshot {
    /// Capture the reading order of `page`, sorting it first if needed.
    pub fn capture(page: &mut PageText, number: u32) -> Self {
        page.sort_and_format_text();
        let bands = match page.reading_order() {
            Some(order) => order
                .bands()
                .iter()
                .map(|band| BandSnapshot {
                    bounds: band.bounds(),
                    words: band
                        .words()
                        .iter()
                        .filter_map(|entry| page.word(entry.loc))
                        .map(|word| WordSnapshot {
                            key: word.key(),
                            text: word.text().to_string(),
                            kind: word.kind(),
                            synthetic: word.is_synthetic(),
                            bounds: word.bounds(),
                            selected: word.has_selected(),
                            highlighted: word.has_highlighted(),
                        })
                        .collect(),
                })
                .collect(),
            None => Vec::new(),
        };
        Self { number, bands }
    }
}

fn serialize<T: Serialize>(value: &T, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(value),
        JsonFormat::Compact => serde_json::to_string(value),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

/// Convert a page to a JSON snapshot.
pub fn to_json(page: &mut PageText, format: JsonFormat) -> Result<String> {
    serialize(&PageSnapshot::capture(page, 1), format)
}

/// Convert every page of a document to a JSON array of snapshots.
pub fn document_to_json(doc: &mut TextDocument, format: JsonFormat) -> Result<String> {
    doc.sort_all();
    let count = doc.page_count();
    let mut snapshots = Vec::with_capacity(count as usize);
    for number in 1..=count {
        snapshots.push(PageSnapshot::capture(doc.page_mut(number)?, number));
    }
    serialize(&snapshots, format)
}
