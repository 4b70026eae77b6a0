//! Word-level types.

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use super::Glyph;
use crate::geometry::{Rect, Transform};

/// Stable identity of a word, assigned when the word is created.
///
/// Derived from the paint ordinal of the word and the code and origin of its
/// first glyph, so rebuilding a page from the same content in the same process
/// yields the same keys and a key taken from an older tree still locates the
/// live word. The hash is `DefaultHasher`, whose algorithm may change between
/// Rust releases: keys written to disk are only comparable within one build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WordKey(pub u64);

impl WordKey {
    pub(crate) fn derive(ordinal: u64, first: &Glyph) -> Self {
        let mut hasher = DefaultHasher::new();
        ordinal.hash(&mut hasher);
        first.code.hash(&mut hasher);
        first.origin.x.to_bits().hash(&mut hasher);
        first.origin.y.to_bits().hash(&mut hasher);
        WordKey(hasher.finish())
    }
}

impl fmt::Display for WordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// What a word stands for in the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WordKind {
    /// Regular text run
    #[default]
    Text,
    /// Painted or synthesized whitespace
    Whitespace,
    /// Standalone punctuation token
    Punctuation,
}

/// An ordered run of glyphs in paint order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    key: WordKey,
    glyphs: Vec<Glyph>,
    text: String,
    kind: WordKind,
    synthetic: bool,
    bounds: Rect,
    has_selected: bool,
    has_highlighted: bool,
}

impl Word {
    /// Start a text word with its first glyph.
    pub fn new(key: WordKey, glyph: Glyph) -> Self {
        Self::with_kind(key, glyph, WordKind::Text)
    }

    /// A word holding exactly one glyph of the given kind.
    pub fn with_kind(key: WordKey, glyph: Glyph, kind: WordKind) -> Self {
        let bounds = glyph.bounds();
        Self {
            key,
            text: glyph.text().to_string(),
            glyphs: vec![glyph],
            kind,
            synthetic: false,
            bounds,
            has_selected: false,
            has_highlighted: false,
        }
    }

    /// A whitespace word made of synthesized space glyphs.
    pub(crate) fn synthetic_space(key: WordKey, glyphs: Vec<Glyph>) -> Self {
        let mut word = Self {
            key,
            text: String::new(),
            glyphs: Vec::with_capacity(glyphs.len()),
            kind: WordKind::Whitespace,
            synthetic: true,
            bounds: Rect::default(),
            has_selected: false,
            has_highlighted: false,
        };
        for (i, glyph) in glyphs.into_iter().enumerate() {
            if i == 0 {
                word.bounds = glyph.bounds();
                word.text.push_str(glyph.text());
                word.glyphs.push(glyph);
            } else {
                word.add_glyph(glyph);
            }
        }
        word
    }

    /// Append a glyph.
    ///
    /// The bounds grow to the union; a positive horizontal gap to the previous
    /// glyph is closed on the previous glyph's selection bounds so pointer
    /// selection stays continuous across kerned runs.
    pub fn add_glyph(&mut self, glyph: Glyph) {
        let bounds = glyph.bounds();
        if let Some(prev) = self.glyphs.last_mut() {
            if bounds.left() > prev.selection_bounds().right() {
                prev.widen_selection_to(bounds.left());
            }
        }
        self.bounds = if self.glyphs.is_empty() {
            bounds
        } else {
            self.bounds.union(&bounds)
        };
        self.text.push_str(glyph.text());
        self.glyphs.push(glyph);
    }

    /// Stable identity of the word.
    pub fn key(&self) -> WordKey {
        self.key
    }

    /// Glyphs in paint order.
    pub fn glyphs(&self) -> &[Glyph] {
        &self.glyphs
    }

    pub(crate) fn glyphs_mut(&mut self) -> &mut [Glyph] {
        &mut self.glyphs
    }

    /// Most recently appended glyph.
    pub fn last_glyph(&self) -> Option<&Glyph> {
        self.glyphs.last()
    }

    /// Concatenated decoded text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Get the word kind.
    pub fn kind(&self) -> WordKind {
        self.kind
    }

    /// Check if the word is whitespace (painted or synthesized).
    pub fn is_whitespace(&self) -> bool {
        self.kind == WordKind::Whitespace
    }

    /// Check if the word is a standalone punctuation token.
    pub fn is_punctuation(&self) -> bool {
        self.kind == WordKind::Punctuation
    }

    /// Whether the word was synthesized from a geometric gap.
    pub fn is_synthetic(&self) -> bool {
        self.synthetic
    }

    /// Union of glyph bounds.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Re-project all glyphs and rebuild the bounds from them.
    pub(crate) fn normalize(&mut self, transform: &Transform, previous: Option<&Transform>) {
        for glyph in &mut self.glyphs {
            glyph.normalize_to_user_space(transform, previous);
        }
        self.refresh_bounds();
    }

    fn refresh_bounds(&mut self) {
        if let Some(bounds) = crate::geometry::union_all(self.glyphs.iter().map(|g| g.bounds_ref()))
        {
            self.bounds = bounds;
        }
    }

    /// Whether any glyph of the word is selected.
    pub fn has_selected(&self) -> bool {
        self.has_selected
    }

    /// Whether any glyph of the word is highlighted.
    pub fn has_highlighted(&self) -> bool {
        self.has_highlighted
    }

    /// Select every glyph.
    pub fn select_all(&mut self) {
        self.set_selected(true);
    }

    /// Clear the selection of every glyph.
    pub fn clear_selected(&mut self) {
        self.set_selected(false);
    }

    /// Cascade the selection flag to every glyph.
    pub fn set_selected(&mut self, selected: bool) {
        for glyph in &mut self.glyphs {
            glyph.set_selected(selected);
        }
        self.has_selected = selected;
    }

    /// Cascade the highlight flag to every glyph.
    pub fn set_highlighted(&mut self, highlighted: bool) {
        for glyph in &mut self.glyphs {
            glyph.set_highlighted(highlighted);
        }
        self.has_highlighted = highlighted;
    }

    /// Clear the highlight of every glyph.
    pub fn clear_highlighted(&mut self) {
        self.set_highlighted(false);
    }

    /// Recompute the hint flags after glyph flags changed individually.
    pub(crate) fn refresh_hints(&mut self) {
        self.has_selected = self.glyphs.iter().any(Glyph::is_selected);
        self.has_highlighted = self.glyphs.iter().any(Glyph::is_highlighted);
    }

    /// Text of the selected glyphs only.
    pub fn selected_text(&self) -> String {
        if !self.has_selected {
            return String::new();
        }
        self.glyphs
            .iter()
            .filter(|g| g.is_selected())
            .map(Glyph::text)
            .collect()
    }

    /// Mark every selected glyph for redaction, returning how many were marked.
    pub fn redact_selected(&mut self) -> usize {
        let mut count = 0;
        for glyph in self.glyphs.iter_mut().filter(|g| g.is_selected()) {
            glyph.redact();
            count += 1;
        }
        count
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
