//! Text search over the reading order.
//!
//! Each band is searched as one string built from its words in X order. Word
//! text is NFKC-normalized first so ligature glyphs ("ﬁ") match their
//! expansion ("fi"). Matches are reported with the keys and rectangles of the
//! words they touch, and can highlight those words.

use std::ops::Range;

use regex::{Regex, RegexBuilder};
use serde::Serialize;
use unicode_normalization::UnicodeNormalization;

use crate::error::Result;
use crate::geometry::{union_all, Rect};
use crate::model::{PageText, WordKey};

/// Options for text search.
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    /// Case insensitive search
    pub case_insensitive: bool,
    /// Treat the pattern as literal text
    pub literal: bool,
    /// Match whole words only
    pub whole_word: bool,
    /// Maximum number of hits (0 = unlimited)
    pub max_results: usize,
    /// Highlight the words of every hit
    pub highlight: bool,
}

impl SearchOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Match case insensitively.
    pub fn with_case_insensitive(mut self, value: bool) -> Self {
        self.case_insensitive = value;
        self
    }

    /// Treat the pattern as literal text.
    pub fn with_literal(mut self, value: bool) -> Self {
        self.literal = value;
        self
    }

    /// Only match whole words.
    pub fn with_whole_word(mut self, value: bool) -> Self {
        self.whole_word = value;
        self
    }

    /// Stop after `max` hits (0 = unlimited).
    pub fn with_max_results(mut self, max: usize) -> Self {
        self.max_results = max;
        self
    }

    /// Highlight the words of every hit.
    pub fn with_highlight(mut self, value: bool) -> Self {
        self.highlight = value;
        self
    }

    fn limit_reached(&self, count: usize) -> bool {
        self.max_results > 0 && count >= self.max_results
    }
}

/// One match.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    /// Page number (1-indexed)
    pub page: u32,
    /// Band index in reading order
    pub band: usize,
    /// Matched (normalized) text
    pub text: String,
    /// Words the match touches
    pub words: Vec<WordKey>,
    /// Bounds of those words
    pub rects: Vec<Rect>,
}

impl SearchHit {
    /// Union of the word rectangles.
    pub fn bounds(&self) -> Rect {
        union_all(&self.rects).unwrap_or_default()
    }
}

/// A compiled search, reusable across pages.
#[derive(Debug, Clone)]
pub struct Searcher {
    regex: Regex,
    options: SearchOptions,
}

impl Searcher {
    /// Compile `pattern` with `options`.
    pub fn new(pattern: &str, options: SearchOptions) -> Result<Self> {
        let mut source = if options.literal {
            regex::escape(pattern)
        } else {
            pattern.to_string()
        };
        if options.whole_word {
            source = format!(r"\b(?:{})\b", source);
        }
        let regex = RegexBuilder::new(&source)
            .case_insensitive(options.case_insensitive)
            .build()?;
        Ok(Self { regex, options })
    }

    /// Get the search options.
    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// Search one page, sorting it first if needed.
    pub fn search_page(&self, page: &mut PageText, number: u32) -> Vec<SearchHit> {
        self.search_page_limited(page, number, self.options.max_results)
    }

    pub(crate) fn search_page_limited(
        &self,
        page: &mut PageText,
        number: u32,
        limit: usize,
    ) -> Vec<SearchHit> {
        let order = page.sort_and_format_text().clone();
        let mut hits = Vec::new();

        'bands: for (band_idx, band) in order.bands().iter().enumerate() {
            let mut text = String::new();
            let mut spans: Vec<(Range<usize>, WordKey, Rect)> = Vec::new();
            for entry in band.words() {
                let Some(word) = page.word(entry.loc) else {
                    continue;
                };
                let start = text.len();
                text.extend(word.text().nfkc());
                spans.push((start..text.len(), entry.key, entry.bounds));
            }

            for found in self.regex.find_iter(&text) {
                if found.start() == found.end() {
                    continue;
                }
                let touched: Vec<&(Range<usize>, WordKey, Rect)> = spans
                    .iter()
                    .filter(|(range, _, _)| range.start < found.end() && found.start() < range.end)
                    .collect();
                hits.push(SearchHit {
                    page: number,
                    band: band_idx,
                    text: found.as_str().to_string(),
                    words: touched.iter().map(|(_, key, _)| *key).collect(),
                    rects: touched.iter().map(|(_, _, rect)| *rect).collect(),
                });
                if limit > 0 && hits.len() >= limit {
                    break 'bands;
                }
            }
        }

        if self.options.highlight {
            for hit in &hits {
                for key in &hit.words {
                    page.highlight_word(*key);
                }
            }
        }

        log::debug!(
            "search /{}/ on page {}: {} hits",
            self.regex.as_str(),
            number,
            hits.len()
        );
        hits
    }

    pub(crate) fn limit_reached(&self, count: usize) -> bool {
        self.options.limit_reached(count)
    }
}

/// Compile `pattern` and search a single page.
pub fn search_page(
    page: &mut PageText,
    pattern: &str,
    options: &SearchOptions,
) -> Result<Vec<SearchHit>> {
    let searcher = Searcher::new(pattern, options.clone())?;
    Ok(searcher.search_page(page, 1))
}
