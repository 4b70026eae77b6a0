//! Page-level text model.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::{Arc, RwLock};

use super::line::KeyGen;
use super::{Glyph, LayerId, Line, Word, WordKey};
use crate::error::Result;
use crate::geometry::{Point, Rect, Transform};
use crate::parser::reading_order::{self, ReadingOrder, WordLoc};
use crate::parser::LayoutOptions;

/// A finished page shared between the parse thread and readers.
///
/// One lock per page guards both selection mutations and cache rebuilds.
pub type SharedPage = Arc<RwLock<PageText>>;

/// The text of one page: lines in paint order plus a cached reading order.
///
/// Built by a single interpreter pass through [`PageText::add_glyph`] and
/// [`PageText::new_line`]. Every mutation that can change the reading order
/// marks the cached view dirty; [`PageText::sort_and_format_text`] is the
/// single place it is rebuilt.
#[derive(Debug, Clone, Default)]
pub struct PageText {
    options: LayoutOptions,
    lines: Vec<Line>,
    /// Open line per layer (`None` = main content)
    open_lines: HashMap<Option<LayerId>, usize>,
    /// Visibility of every layer seen so far
    layers: BTreeMap<LayerId, bool>,
    keys: KeyGen,
    /// XObject placement currently baked into the glyph bounds
    xobject_transform: Option<Transform>,
    /// Cached reading order, `None` while dirty
    reading_order: Option<ReadingOrder>,
}

impl PageText {
    /// Create an empty page with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty page with custom options.
    pub fn with_options(options: LayoutOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            options,
            ..Self::default()
        })
    }

    /// Get the layout options.
    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    /// Add a painted glyph to the open line of `layer`.
    pub fn add_glyph(&mut self, glyph: Glyph, layer: Option<LayerId>) {
        if let Some(id) = &layer {
            self.layers.entry(id.clone()).or_insert(true);
        }
        let idx = match self.open_lines.get(&layer) {
            Some(&idx) => idx,
            None => {
                self.lines.push(Line::new(layer.clone()));
                let idx = self.lines.len() - 1;
                self.open_lines.insert(layer, idx);
                idx
            }
        };
        self.lines[idx].add_glyph(glyph, &self.options, &mut self.keys);
        self.invalidate();
    }

    /// Close the open line of `layer`; the next glyph starts a new one.
    pub fn new_line(&mut self, layer: Option<&LayerId>) {
        self.open_lines.remove(&layer.cloned());
    }

    /// Re-project every glyph built so far through an XObject placement.
    ///
    /// A placement applied by an earlier call is undone first, so reusing
    /// the same form at several positions never compounds.
    pub fn apply_xobject_transform(&mut self, transform: Transform) {
        let previous = self.xobject_transform;
        for line in &mut self.lines {
            line.normalize(&transform, previous.as_ref());
        }
        self.xobject_transform = Some(transform);
        self.invalidate();
    }

    /// Move all lines of `other` after this page's lines, in paint order.
    pub fn append(&mut self, other: PageText) {
        for (layer, visible) in other.layers {
            self.layers.entry(layer).or_insert(visible);
        }
        self.lines.extend(other.lines);
        self.open_lines.clear();
        self.invalidate();
    }

    /// Show or hide a layer.
    pub fn set_layer_visible(&mut self, layer: &LayerId, visible: bool) {
        let previous = self.layers.insert(layer.clone(), visible);
        if previous != Some(visible) {
            log::debug!("layer {} visible={}", layer, visible);
            self.invalidate();
        }
    }

    /// Layers are visible until hidden; unknown layers count as visible.
    pub fn is_layer_visible(&self, layer: &LayerId) -> bool {
        self.layers.get(layer).copied().unwrap_or(true)
    }

    /// Every layer seen so far with its visibility.
    pub fn layers(&self) -> impl Iterator<Item = (&LayerId, bool)> + '_ {
        self.layers.iter().map(|(id, visible)| (id, *visible))
    }

    fn participates(&self, line: &Line) -> bool {
        line.layer().map_or(true, |layer| self.is_layer_visible(layer))
    }

    fn invalidate(&mut self) {
        self.reading_order = None;
    }

    /// Lines in paint order.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Check if no glyph was added.
    pub fn is_empty(&self) -> bool {
        self.lines.iter().all(Line::is_empty)
    }

    /// Number of words over all lines.
    pub fn word_count(&self) -> usize {
        self.lines.iter().map(|l| l.words().len()).sum()
    }

    /// Number of glyphs over all lines.
    pub fn glyph_count(&self) -> usize {
        self.lines.iter().map(Line::glyph_count).sum()
    }

    /// Whether the cached reading order is current.
    pub fn is_sorted(&self) -> bool {
        self.reading_order.is_some()
    }

    /// Build (or return the cached) reading order.
    pub fn sort_and_format_text(&mut self) -> &ReadingOrder {
        if self.reading_order.is_none() {
            let layers = &self.layers;
            let order = reading_order::sort_and_format(
                &self.lines,
                |layer| layers.get(layer).copied().unwrap_or(true),
                &self.options,
            );
            self.reading_order = Some(order);
        }
        self.reading_order.get_or_insert_with(ReadingOrder::default)
    }

    /// The cached reading order, `None` when it must be rebuilt first.
    pub fn reading_order(&self) -> Option<&ReadingOrder> {
        self.reading_order.as_ref()
    }

    /// Get the word at a paint-order location.
    pub fn word(&self, loc: WordLoc) -> Option<&Word> {
        self.lines.get(loc.line)?.words().get(loc.word)
    }

    fn word_mut(&mut self, loc: WordLoc) -> Option<&mut Word> {
        self.lines.get_mut(loc.line)?.words_mut().get_mut(loc.word)
    }

    /// Locate the live word carrying `key`, e.g. a key kept from a previous
    /// build of the same page.
    pub fn find(&self, key: WordKey) -> Option<WordLoc> {
        self.lines.iter().enumerate().find_map(|(line_idx, line)| {
            line.words()
                .iter()
                .position(|w| w.key() == key)
                .map(|word_idx| WordLoc {
                    line: line_idx,
                    word: word_idx,
                })
        })
    }

    /// The live word carrying `key`.
    pub fn find_word(&self, key: WordKey) -> Option<&Word> {
        self.find(key).and_then(|loc| self.word(loc))
    }

    /// Select every glyph of the visible content.
    pub fn select_all(&mut self) {
        let participating: Vec<bool> = self.lines.iter().map(|l| self.participates(l)).collect();
        for (line, visible) in self.lines.iter_mut().zip(participating) {
            if visible {
                line.select_all();
            }
        }
    }

    /// Clear the selection everywhere, hidden layers included.
    pub fn clear_selected(&mut self) {
        for line in &mut self.lines {
            line.clear_selected();
        }
    }

    /// Clear highlights everywhere, hidden layers included.
    pub fn clear_highlighted(&mut self) {
        for line in &mut self.lines {
            line.clear_highlighted();
        }
    }

    /// Select one word; returns false when the key is unknown.
    pub fn select_word(&mut self, key: WordKey) -> bool {
        self.update_word(key, |w| w.set_selected(true))
    }

    /// Highlight one word; returns false when the key is unknown.
    pub fn highlight_word(&mut self, key: WordKey) -> bool {
        self.update_word(key, |w| w.set_highlighted(true))
    }

    fn update_word<F: FnOnce(&mut Word)>(&mut self, key: WordKey, update: F) -> bool {
        let Some(loc) = self.find(key) else {
            return false;
        };
        if let Some(word) = self.word_mut(loc) {
            update(word);
        }
        self.lines[loc.line].refresh_hints();
        true
    }

    /// Select every visible glyph whose selection bounds touch `area`.
    ///
    /// Returns the number of glyphs selected.
    pub fn select_in_rect(&mut self, area: &Rect) -> usize {
        let mut count = 0;
        let participating: Vec<bool> = self.lines.iter().map(|l| self.participates(l)).collect();
        for (line, visible) in self.lines.iter_mut().zip(participating) {
            if !visible {
                continue;
            }
            for word in line.words_mut() {
                for glyph in word.glyphs_mut() {
                    if glyph.selection_bounds().intersects(area) {
                        glyph.set_selected(true);
                        count += 1;
                    }
                }
            }
            line.refresh_hints();
        }
        count
    }

    /// Key of the word under `point`, using the gap-closed hit bounds.
    pub fn word_at(&mut self, point: Point) -> Option<WordKey> {
        self.sort_and_format_text()
            .words()
            .find(|w| w.hit_bounds.contains_point(&point))
            .map(|w| w.key)
    }

    /// Selected text in reading order, one band per chunk, chunks joined by
    /// the band separator.
    pub fn selected_text(&mut self) -> String {
        self.sort_and_format_text();
        let Some(order) = self.reading_order.as_ref() else {
            return String::new();
        };
        let chunks: Vec<String> = order
            .bands()
            .iter()
            .map(|band| {
                band.words()
                    .iter()
                    .filter_map(|w| self.word(w.loc))
                    .map(Word::selected_text)
                    .collect::<String>()
            })
            .filter(|chunk| !chunk.is_empty())
            .collect();
        chunks.join(self.options.band_separator.as_str())
    }

    /// All visible text in reading order.
    pub fn text(&mut self) -> String {
        self.sort_and_format_text();
        let Some(order) = self.reading_order.as_ref() else {
            return String::new();
        };
        order
            .bands()
            .iter()
            .map(|band| {
                band.words()
                    .iter()
                    .filter_map(|w| self.word(w.loc))
                    .map(Word::text)
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join(self.options.band_separator.as_str())
    }

    /// Bounds of highlighted words in reading order, for painting.
    pub fn highlighted_bounds(&mut self) -> Vec<Rect> {
        self.sort_and_format_text();
        let Some(order) = self.reading_order.as_ref() else {
            return Vec::new();
        };
        order
            .words()
            .filter(|w| self.word(w.loc).is_some_and(Word::has_highlighted))
            .map(|w| w.bounds)
            .collect()
    }

    /// Mark every selected glyph for redaction; returns how many were marked.
    pub fn redact_selected(&mut self) -> usize {
        self.lines
            .iter_mut()
            .flat_map(|line| line.words_mut().iter_mut())
            .map(Word::redact_selected)
            .sum()
    }

    /// Finish the parse pass: sort, then hand the page over behind a lock.
    pub fn publish(mut self) -> SharedPage {
        self.sort_and_format_text();
        Arc::new(RwLock::new(self))
    }
}

/// Paint-order text, one line per row.
impl fmt::Display for PageText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{}", line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glyph(x: f32, y: f32, text: &str) -> Glyph {
        Glyph::simple(Rect::new(x, y, 10.0, 10.0), text)
    }

    fn write(page: &mut PageText, x: f32, y: f32, text: &str) {
        for (i, c) in text.chars().enumerate() {
            page.add_glyph(glyph(x + i as f32 * 10.0, y, &c.to_string()), None);
        }
    }

    #[test]
    fn test_lines_created_lazily() {
        let mut page = PageText::new();
        page.new_line(None);
        page.new_line(None);
        assert!(page.is_empty());
        assert_eq!(page.lines().len(), 0);

        write(&mut page, 0.0, 0.0, "ab");
        page.new_line(None);
        write(&mut page, 0.0, 20.0, "cd");
        assert_eq!(page.lines().len(), 2);
        assert_eq!(page.to_string(), "ab\ncd");
    }

    #[test]
    fn test_with_options_validates() {
        assert!(PageText::with_options(LayoutOptions::new().with_space_fraction(0.0)).is_err());
        assert!(PageText::with_options(LayoutOptions::new()).is_ok());
    }

    #[test]
    fn test_cache_invalidated_by_new_content() {
        let mut page = PageText::new();
        write(&mut page, 0.0, 0.0, "a");
        page.sort_and_format_text();
        assert!(page.is_sorted());
        write(&mut page, 10.0, 0.0, "b");
        assert!(!page.is_sorted());
        assert_eq!(page.text(), "ab");
    }

    #[test]
    fn test_layer_visibility_invalidates_cache() {
        let mut page = PageText::new();
        let layer = LayerId::new("oc1");
        page.add_glyph(glyph(0.0, 0.0, "x"), Some(layer.clone()));
        page.sort_and_format_text();

        page.set_layer_visible(&layer, true);
        assert!(page.is_sorted());
        page.set_layer_visible(&layer, false);
        assert!(!page.is_sorted());
        assert_eq!(page.text(), "");
        assert!(!page.is_layer_visible(&layer));
    }

    #[test]
    fn test_layers_have_independent_open_lines() {
        let mut page = PageText::new();
        let layer = LayerId::new("oc1");
        page.add_glyph(glyph(0.0, 0.0, "a"), None);
        page.add_glyph(glyph(100.0, 0.0, "z"), Some(layer.clone()));
        page.add_glyph(glyph(10.0, 0.0, "b"), None);
        assert_eq!(page.lines().len(), 2);
        assert_eq!(page.lines()[0].text(), "ab");
        assert_eq!(page.lines()[1].layer(), Some(&layer));
    }

    #[test]
    fn test_xobject_transform_does_not_compound() {
        let mut page = PageText::new();
        write(&mut page, 0.0, 0.0, "f");
        page.apply_xobject_transform(Transform::translate(100.0, 0.0));
        assert_eq!(page.lines()[0].bounds(), Rect::new(100.0, 0.0, 10.0, 10.0));

        page.apply_xobject_transform(Transform::translate(0.0, 300.0));
        let word = &page.lines()[0].words()[0];
        assert_eq!(word.bounds(), Rect::new(0.0, 300.0, 10.0, 10.0));
        assert_eq!(page.lines()[0].bounds(), word.bounds());
    }

    #[test]
    fn test_find_survives_rebuild() {
        let build = || {
            let mut page = PageText::new();
            write(&mut page, 0.0, 0.0, "hello");
            page.add_glyph(glyph(50.0, 0.0, " "), None);
            write(&mut page, 60.0, 0.0, "world");
            page
        };
        let old = build();
        let key = old.lines()[0].words()[2].key();

        let rebuilt = build();
        let found = rebuilt.find_word(key).unwrap();
        assert_eq!(found.text(), "world");
        assert!(rebuilt.find(WordKey(0)).is_none());
    }

    #[test]
    fn test_select_word_sets_hints() {
        let mut page = PageText::new();
        write(&mut page, 0.0, 0.0, "ab");
        let key = page.lines()[0].words()[0].key();
        assert!(page.select_word(key));
        assert!(page.lines()[0].has_selected());
        assert_eq!(page.selected_text(), "ab");
        assert!(!page.select_word(WordKey(42)));
    }

    #[test]
    fn test_select_in_rect_and_redact() {
        let mut page = PageText::new();
        write(&mut page, 0.0, 0.0, "abc");
        let count = page.select_in_rect(&Rect::new(12.0, 2.0, 5.0, 5.0));
        assert_eq!(count, 1);
        assert_eq!(page.selected_text(), "b");
        assert_eq!(page.redact_selected(), 1);
        assert!(page.lines()[0].words()[0].glyphs()[1].is_redacted());
    }

    #[test]
    fn test_word_at_uses_hit_bounds() {
        let mut page = PageText::new();
        write(&mut page, 0.0, 0.0, "a");
        page.add_glyph(glyph(10.0, 0.0, " "), None);
        write(&mut page, 30.0, 0.0, "b");
        let space_key = page.lines()[0].words()[1].key();
        // the painted space ends at 20, its hit bounds reach the "b" at 30
        assert_eq!(page.word_at(Point::new(25.0, 5.0)), Some(space_key));
        assert_eq!(page.word_at(Point::new(500.0, 5.0)), None);
    }

    #[test]
    fn test_highlighted_bounds() {
        let mut page = PageText::new();
        write(&mut page, 0.0, 0.0, "a");
        page.add_glyph(glyph(10.0, 0.0, " "), None);
        write(&mut page, 20.0, 0.0, "b");
        let key = page.lines()[0].words()[2].key();
        page.highlight_word(key);
        assert_eq!(page.highlighted_bounds(), vec![Rect::new(20.0, 0.0, 10.0, 10.0)]);
        page.clear_highlighted();
        assert!(page.highlighted_bounds().is_empty());
    }

    #[test]
    fn test_append_merges_lines() {
        let mut page = PageText::new();
        write(&mut page, 0.0, 0.0, "main");
        let mut form = PageText::new();
        write(&mut form, 0.0, 0.0, "form");
        form.apply_xobject_transform(Transform::translate(0.0, 100.0));
        page.append(form);
        assert_eq!(page.lines().len(), 2);
        assert_eq!(page.text(), "main\nform");
    }

    #[test]
    fn test_publish_sorts_before_sharing() {
        let mut page = PageText::new();
        write(&mut page, 0.0, 0.0, "a");
        let shared = page.publish();
        let guard = shared.read().unwrap();
        assert!(guard.is_sorted());
    }
}
