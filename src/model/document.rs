//! Document-level types.

use rayon::prelude::*;

use super::PageText;
use crate::error::{Error, Result};
use crate::parser::{LayoutOptions, Recording};
use crate::search::{SearchHit, SearchOptions, Searcher};

/// The text of a whole document, one [`PageText`] per page.
#[derive(Debug, Clone, Default)]
pub struct TextDocument {
    /// Pages in document order
    pages: Vec<PageText>,

    /// Options every page is built with
    options: LayoutOptions,
}

impl TextDocument {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty document whose pages use `options`.
    pub fn with_options(options: LayoutOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            pages: Vec::new(),
            options,
        })
    }

    /// Build every page of a recording.
    pub fn from_recording(recording: &Recording, options: LayoutOptions) -> Result<Self> {
        let mut doc = Self::with_options(options)?;
        for recorded in &recording.pages {
            let page = recorded.build(&doc.options)?;
            doc.add_page(page);
        }
        log::debug!("built {} pages from recording", doc.page_count());
        Ok(doc)
    }

    /// Options every page is built with.
    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    /// An empty page using the document options.
    pub fn new_page(&self) -> Result<PageText> {
        PageText::with_options(self.options.clone())
    }

    /// Add a page to the document.
    pub fn add_page(&mut self, page: PageText) {
        self.pages.push(page);
    }

    /// Get the number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Check if the document has any pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// All pages in document order.
    pub fn pages(&self) -> &[PageText] {
        &self.pages
    }

    /// Get a page by number (1-indexed).
    pub fn page(&self, number: u32) -> Result<&PageText> {
        let count = self.page_count();
        number
            .checked_sub(1)
            .and_then(|i| self.pages.get(i as usize))
            .ok_or(Error::PageOutOfRange(number, count))
    }

    /// Get a mutable page by number (1-indexed).
    pub fn page_mut(&mut self, number: u32) -> Result<&mut PageText> {
        let count = self.page_count();
        number
            .checked_sub(1)
            .and_then(|i| self.pages.get_mut(i as usize))
            .ok_or(Error::PageOutOfRange(number, count))
    }

    /// Build the reading order of every page, in parallel unless disabled.
    pub fn sort_all(&mut self) {
        if self.options.parallel {
            self.pages.par_iter_mut().for_each(|page| {
                page.sort_and_format_text();
            });
        } else {
            for page in &mut self.pages {
                page.sort_and_format_text();
            }
        }
    }

    /// Get plain text content of the entire document.
    pub fn plain_text(&mut self) -> String {
        self.sort_all();
        self.pages
            .iter_mut()
            .map(PageText::text)
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Selected text of every page with a selection.
    pub fn selected_text(&mut self) -> String {
        self.sort_all();
        self.pages
            .iter_mut()
            .map(PageText::selected_text)
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Clear selection on every page.
    pub fn clear_selected(&mut self) {
        for page in &mut self.pages {
            page.clear_selected();
        }
    }

    /// Search all pages in order.
    pub fn search(&mut self, pattern: &str, options: &SearchOptions) -> Result<Vec<SearchHit>> {
        let searcher = Searcher::new(pattern, options.clone())?;
        self.sort_all();

        let mut hits = Vec::new();
        for (i, page) in self.pages.iter_mut().enumerate() {
            let remaining = if options.max_results > 0 {
                options.max_results - hits.len()
            } else {
                0
            };
            hits.extend(searcher.search_page_limited(page, i as u32 + 1, remaining));
            if searcher.limit_reached(hits.len()) {
                break;
            }
        }
        Ok(hits)
    }
}
