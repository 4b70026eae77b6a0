//! Line-level types.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Glyph, Word, WordKey, WordKind};
use crate::geometry::{Rect, Transform};
use crate::parser::segmenter::{self, Transition};
use crate::parser::LayoutOptions;

/// Opaque identifier of a visibility layer (optional content group),
/// supplied by the interpreter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerId(pub String);

impl LayerId {
    /// Create a layer id.
    pub fn new(id: impl Into<String>) -> Self {
        LayerId(id.into())
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LayerId {
    fn from(id: &str) -> Self {
        LayerId(id.to_string())
    }
}

/// Hands out word keys in page-wide paint order.
#[derive(Debug, Clone, Default)]
pub(crate) struct KeyGen {
    next: u64,
}

impl KeyGen {
    pub(crate) fn next_key(&mut self, first: &Glyph) -> WordKey {
        let key = WordKey::derive(self.next, first);
        self.next += 1;
        key
    }
}

/// An ordered run of words in paint order, optionally tagged with a layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    words: Vec<Word>,
    layer: Option<LayerId>,
    bounds: Rect,
    /// Index of the word still accepting glyphs
    #[serde(skip)]
    open_word: Option<usize>,
    has_selected: bool,
    has_highlighted: bool,
}

impl Line {
    /// Create an empty line.
    pub fn new(layer: Option<LayerId>) -> Self {
        Self {
            words: Vec::new(),
            layer,
            bounds: Rect::default(),
            open_word: None,
            has_selected: false,
            has_highlighted: false,
        }
    }

    /// Feed one glyph through the segmentation automaton.
    pub(crate) fn add_glyph(
        &mut self,
        glyph: Glyph,
        options: &LayoutOptions,
        keys: &mut KeyGen,
    ) -> Transition {
        let step = segmenter::transition(self.open_word(), &glyph, options);
        match step {
            Transition::SpaceThenStart => {
                let space = self.open_word().and_then(Word::last_glyph).map(|prev| {
                    let key = keys.next_key(prev);
                    segmenter::build_space_word(key, prev, &glyph, options)
                });
                if let Some(space) = space {
                    self.push_word(space);
                }
                self.open_word = None;
                // No open word now, so the digit guard no longer applies
                let restart = segmenter::transition(None, &glyph, options);
                self.place(restart, glyph, keys);
            }
            Transition::Append => {
                let bounds = glyph.bounds();
                if let Some(i) = self.open_word.filter(|&i| i < self.words.len()) {
                    self.words[i].add_glyph(glyph);
                    self.bounds = self.bounds.union(&bounds);
                } else {
                    self.start_word(glyph, keys);
                }
            }
            other => self.place(other, glyph, keys),
        }
        step
    }

    /// Place a glyph that cannot join an open word.
    fn place(&mut self, step: Transition, glyph: Glyph, keys: &mut KeyGen) {
        match step {
            Transition::Whitespace => {
                let key = keys.next_key(&glyph);
                self.push_word(Word::with_kind(key, glyph, WordKind::Whitespace));
                self.open_word = None;
            }
            Transition::Punctuation => {
                let key = keys.next_key(&glyph);
                self.push_word(Word::with_kind(key, glyph, WordKind::Punctuation));
                self.open_word = None;
            }
            _ => self.start_word(glyph, keys),
        }
    }

    fn open_word(&self) -> Option<&Word> {
        self.open_word.and_then(|i| self.words.get(i))
    }

    fn start_word(&mut self, glyph: Glyph, keys: &mut KeyGen) {
        let key = keys.next_key(&glyph);
        self.push_word(Word::new(key, glyph));
        self.open_word = Some(self.words.len() - 1);
    }

    fn push_word(&mut self, word: Word) {
        self.bounds = if self.words.is_empty() {
            word.bounds()
        } else {
            self.bounds.union(&word.bounds())
        };
        self.words.push(word);
    }

    /// Words in paint order.
    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub(crate) fn words_mut(&mut self) -> &mut [Word] {
        &mut self.words
    }

    /// Layer the line belongs to, `None` for main content.
    pub fn layer(&self) -> Option<&LayerId> {
        self.layer.as_ref()
    }

    /// Union of word bounds.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Check if the line has no words.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Number of glyphs over all words.
    pub fn glyph_count(&self) -> usize {
        self.words.iter().map(|w| w.glyphs().len()).sum()
    }

    /// Concatenated word text in paint order.
    pub fn text(&self) -> String {
        self.words.iter().map(Word::text).collect()
    }

    /// Re-project every glyph and rebuild word and line bounds.
    pub(crate) fn normalize(&mut self, transform: &Transform, previous: Option<&Transform>) {
        for word in &mut self.words {
            word.normalize(transform, previous);
        }
        if let Some(bounds) = self
            .words
            .iter()
            .map(Word::bounds)
            .reduce(|acc, b| acc.union(&b))
        {
            self.bounds = bounds;
        }
    }

    /// Check if any word is selected.
    pub fn has_selected(&self) -> bool {
        self.has_selected
    }

    /// Check if any word is highlighted.
    pub fn has_highlighted(&self) -> bool {
        self.has_highlighted
    }

    /// Cascade the selection flag to every word and glyph.
    pub fn set_selected(&mut self, selected: bool) {
        for word in &mut self.words {
            word.set_selected(selected);
        }
        self.has_selected = selected && !self.words.is_empty();
    }

    /// Select every word.
    pub fn select_all(&mut self) {
        self.set_selected(true);
    }

    /// Clear the selection of every word.
    pub fn clear_selected(&mut self) {
        self.set_selected(false);
    }

    /// Cascade the highlight flag to every word and glyph.
    pub fn set_highlighted(&mut self, highlighted: bool) {
        for word in &mut self.words {
            word.set_highlighted(highlighted);
        }
        self.has_highlighted = highlighted && !self.words.is_empty();
    }

    /// Clear the highlight of every word.
    pub fn clear_highlighted(&mut self) {
        self.set_highlighted(false);
    }

    /// Recompute word and line hints after individual glyph flag changes.
    pub(crate) fn refresh_hints(&mut self) {
        for word in &mut self.words {
            word.refresh_hints();
        }
        self.has_selected = self.words.iter().any(Word::has_selected);
        self.has_highlighted = self.words.iter().any(Word::has_highlighted);
    }

    /// Text of selected glyphs in paint order.
    pub fn selected_text(&self) -> String {
        if !self.has_selected {
            return String::new();
        }
        self.words.iter().map(Word::selected_text).collect()
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for word in &self.words {
            f.write_str(word.text())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glyph(x: f32, text: &str) -> Glyph {
        Glyph::simple(Rect::new(x, 0.0, 10.0, 10.0), text)
    }

    fn line_of(glyphs: Vec<Glyph>, options: &LayoutOptions) -> Line {
        let mut keys = KeyGen::default();
        let mut line = Line::new(None);
        for g in glyphs {
            line.add_glyph(g, options, &mut keys);
        }
        line
    }

    #[test]
    fn test_whitespace_glyph_starts_new_word() {
        let opts = LayoutOptions::default();
        let line = line_of(
            vec![glyph(0.0, "a"), glyph(10.0, "b"), glyph(20.0, " "), glyph(30.0, "c")],
            &opts,
        );
        let texts: Vec<&str> = line.words().iter().map(Word::text).collect();
        assert_eq!(texts, vec!["ab", " ", "c"]);
        assert!(line.words()[1].is_whitespace());
        assert!(!line.words()[1].is_synthetic());
    }

    #[test]
    fn test_decimal_number_is_one_word() {
        let opts = LayoutOptions::default();
        let line = line_of(
            vec![glyph(0.0, "3"), glyph(10.0, "."), glyph(20.0, "1"), glyph(30.0, "4")],
            &opts,
        );
        assert_eq!(line.words().len(), 1);
        assert_eq!(line.words()[0].text(), "3.14");
    }

    #[test]
    fn test_punctuation_is_standalone() {
        let opts = LayoutOptions::default();
        let line = line_of(
            vec![glyph(0.0, "a"), glyph(10.0, ","), glyph(20.0, "b")],
            &opts,
        );
        let texts: Vec<&str> = line.words().iter().map(Word::text).collect();
        assert_eq!(texts, vec!["a", ",", "b"]);
        assert!(line.words()[1].is_punctuation());
    }

    #[test]
    fn test_gap_inserts_synthetic_space() {
        let opts = LayoutOptions::default();
        let line = line_of(vec![glyph(0.0, "A"), glyph(40.0, "B")], &opts);
        assert_eq!(line.words().len(), 3);
        assert_eq!(line.words()[0].text(), "A");
        assert!(line.words()[1].is_whitespace());
        assert!(line.words()[1].is_synthetic());
        assert_eq!(line.words()[2].text(), "B");
        assert_eq!(line.bounds(), Rect::new(0.0, 0.0, 50.0, 10.0));
    }

    #[test]
    fn test_keys_are_unique() {
        let opts = LayoutOptions::default();
        let line = line_of(
            vec![glyph(0.0, "a"), glyph(10.0, " "), glyph(20.0, "a")],
            &opts,
        );
        let mut keys: Vec<WordKey> = line.words().iter().map(Word::key).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), 3);
    }

    #[test]
    fn test_selection_cascade() {
        let opts = LayoutOptions::default();
        let mut line = line_of(vec![glyph(0.0, "a"), glyph(10.0, "b")], &opts);
        line.select_all();
        assert!(line.has_selected());
        assert_eq!(line.selected_text(), "ab");
        line.clear_selected();
        assert!(!line.has_selected());
        assert!(line.words().iter().all(|w| !w.has_selected()));
    }

    #[test]
    fn test_display_is_paint_order_text() {
        let opts = LayoutOptions::default();
        let line = line_of(vec![glyph(0.0, "h"), glyph(10.0, "i")], &opts);
        assert_eq!(line.to_string(), "hi");
        assert_eq!(line.text(), "hi");
        assert_eq!(line.glyph_count(), 2);
    }
}
