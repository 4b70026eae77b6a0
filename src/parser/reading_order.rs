//! Reading-order reconstruction.
//!
//! Turns paint-order lines into bands: rows of words sorted left to right.
//! Paint order rarely matches what a reader sees (columns, layers painted
//! late, lines split across text objects), so lines are dissolved into words
//! and re-clustered on their vertical position.
//!
//! The pipeline is a pure function of the lines, the layer visibility and the
//! options; running it twice on the same input gives the same bands.

use std::cmp::Ordering;
use std::collections::HashSet;

use serde::Serialize;

use super::LayoutOptions;
use crate::geometry::{union_all, Rect};
use crate::model::{LayerId, Line, WordKey};

/// Position of a word in the paint-order tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct WordLoc {
    /// Index of the line in paint order
    pub line: usize,
    /// Index of the word within its line
    pub word: usize,
}

/// One word as placed in the reading order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandWord {
    pub loc: WordLoc,
    pub key: WordKey,
    /// Word bounds at sort time
    pub bounds: Rect,
    /// Bounds widened up to the next word of the band, for hit-testing
    pub hit_bounds: Rect,
}

/// A row of words in reading order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Band {
    bounds: Rect,
    words: Vec<BandWord>,
}

impl Band {
    /// Union of the band's word bounds.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Words sorted by ascending X.
    pub fn words(&self) -> &[BandWord] {
        &self.words
    }

    /// Number of words in the band.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Check if the band has no words.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// The sorted view of a page.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReadingOrder {
    bands: Vec<Band>,
}

impl ReadingOrder {
    /// Bands in reading order.
    pub fn bands(&self) -> &[Band] {
        &self.bands
    }

    /// Number of bands.
    pub fn len(&self) -> usize {
        self.bands.len()
    }

    /// Check if there are no bands.
    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }

    /// All band words in reading order.
    pub fn words(&self) -> impl Iterator<Item = &BandWord> + '_ {
        self.bands.iter().flat_map(|b| b.words.iter())
    }

    /// Total number of words over all bands.
    pub fn word_count(&self) -> usize {
        self.bands.iter().map(Band::len).sum()
    }
}

/// A word on its way through the pipeline.
#[derive(Debug, Clone)]
struct Entry<'a> {
    loc: WordLoc,
    key: WordKey,
    bounds: Rect,
    text: &'a str,
}

type Cluster<'a> = Vec<Entry<'a>>;

/// Build the reading order of `lines`.
///
/// Lines without a layer always take part; layered lines only when
/// `is_visible` accepts their layer.
pub fn sort_and_format<F>(lines: &[Line], is_visible: F, options: &LayoutOptions) -> ReadingOrder
where
    F: Fn(&LayerId) -> bool,
{
    let mut main = Vec::new();
    let mut layered = Vec::new();
    for (line_idx, line) in lines.iter().enumerate() {
        let target = match line.layer() {
            None => &mut main,
            Some(layer) if is_visible(layer) => &mut layered,
            Some(_) => continue,
        };
        for (word_idx, word) in line.words().iter().enumerate() {
            target.push(Entry {
                loc: WordLoc {
                    line: line_idx,
                    word: word_idx,
                },
                key: word.key(),
                bounds: word.bounds(),
                text: word.text(),
            });
        }
    }

    if main.is_empty() && layered.is_empty() {
        return ReadingOrder::default();
    }

    let clusters = cluster_rows(main);
    let clusters = merge_layered(clusters, layered);
    let mut clusters = cluster_rows(clusters.into_iter().flatten().collect());

    if options.remove_duplicates {
        for cluster in &mut clusters {
            remove_duplicates(cluster);
        }
    }

    let mut bands: Vec<Band> = clusters
        .into_iter()
        .filter(|c| !c.is_empty())
        .map(into_band)
        .collect();

    if !options.preserve_columns {
        bands.sort_by(|a, b| cmp_f32(a.bounds.y, b.bounds.y));
    }

    log::debug!(
        "reading order: {} lines -> {} bands",
        lines.len(),
        bands.len()
    );

    ReadingOrder { bands }
}

/// Start a new row whenever a word's Y moves more than half its height away
/// from the previous word's Y.
fn cluster_rows(entries: Vec<Entry<'_>>) -> Vec<Cluster<'_>> {
    let mut clusters: Vec<Cluster<'_>> = Vec::new();
    let mut previous_y: Option<f32> = None;
    for entry in entries {
        let y = entry.bounds.y;
        let tolerance = entry.bounds.height.abs() / 2.0;
        let starts_row = previous_y.map_or(true, |prev| (y - prev).abs() > tolerance);
        previous_y = Some(y);
        match clusters.last_mut() {
            Some(current) if !starts_row => current.push(entry),
            _ => clusters.push(vec![entry]),
        }
    }
    clusters
}

/// Insert layer words into the closest row they overlap vertically, or
/// append them as new rows.
fn merge_layered<'a>(mut clusters: Vec<Cluster<'a>>, layered: Vec<Entry<'a>>) -> Vec<Cluster<'a>> {
    let mut bounds: Vec<Rect> = clusters.iter().map(|c| cluster_bounds(c)).collect();

    for entry in layered {
        let y = entry.bounds.y;
        let nearest = bounds
            .iter()
            .enumerate()
            .map(|(i, b)| (i, (b.y - y).abs(), b.height))
            .filter(|&(_, diff, height)| diff < height)
            .min_by(|a, b| cmp_f32(a.1, b.1));

        match nearest {
            Some((i, _, _)) => {
                bounds[i] = bounds[i].union(&entry.bounds);
                clusters[i].push(entry);
            }
            None => {
                log::trace!("layer word at y={:.1} starts a new row", y);
                bounds.push(entry.bounds);
                clusters.push(vec![entry]);
            }
        }
    }
    clusters
}

fn cluster_bounds(cluster: &[Entry<'_>]) -> Rect {
    union_all(cluster.iter().map(|e| &e.bounds)).unwrap_or_default()
}

/// Drop words repeating an earlier (text, rounded bounds) pair of the row.
///
/// Some producers paint the same text twice (fake bold, shadows).
fn remove_duplicates(cluster: &mut Cluster<'_>) {
    let mut seen = HashSet::new();
    let before = cluster.len();
    cluster.retain(|e| seen.insert((e.text, e.bounds.rounded())));
    if cluster.len() != before {
        log::trace!("removed {} duplicate words", before - cluster.len());
    }
}

fn into_band(mut cluster: Cluster<'_>) -> Band {
    cluster.sort_by(|a, b| cmp_f32(a.bounds.x, b.bounds.x));
    let bounds = cluster_bounds(&cluster);

    let mut words: Vec<BandWord> = cluster
        .into_iter()
        .map(|e| BandWord {
            loc: e.loc,
            key: e.key,
            bounds: e.bounds,
            hit_bounds: e.bounds,
        })
        .collect();

    for i in 1..words.len() {
        let next_left = words[i].bounds.left();
        let current = &mut words[i - 1].hit_bounds;
        if next_left > current.right() {
            current.width = next_left - current.x;
        }
    }

    Band { bounds, words }
}

fn cmp_f32(a: f32, b: f32) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Glyph, PageText};

    fn page_with_words(words: &[(f32, f32, &str)]) -> PageText {
        let mut page = PageText::new();
        for &(x, y, text) in words {
            page.new_line(None);
            page.add_glyph(Glyph::simple(Rect::new(x, y, 10.0, 10.0), text), None);
        }
        page
    }

    fn band_texts(page: &mut PageText) -> Vec<Vec<String>> {
        let order = page.sort_and_format_text().clone();
        order
            .bands()
            .iter()
            .map(|b| {
                b.words()
                    .iter()
                    .map(|w| page.word(w.loc).unwrap().text().to_string())
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_empty_page_yields_empty_order() {
        let order = sort_and_format(&[], |_| true, &LayoutOptions::default());
        assert!(order.is_empty());
        assert_eq!(order.word_count(), 0);
    }

    #[test]
    fn test_row_tolerance_is_half_height() {
        let mut page = page_with_words(&[(0.0, 100.0, "a"), (20.0, 104.0, "b")]);
        assert_eq!(band_texts(&mut page), vec![vec!["a", "b"]]);

        let mut page = page_with_words(&[(0.0, 100.0, "a"), (20.0, 106.0, "b")]);
        assert_eq!(band_texts(&mut page), vec![vec!["a"], vec!["b"]]);
    }

    #[test]
    fn test_words_sorted_by_x_within_band() {
        let mut page = page_with_words(&[(50.0, 0.0, "c"), (0.0, 0.0, "a"), (25.0, 0.0, "b")]);
        assert_eq!(band_texts(&mut page), vec![vec!["a", "b", "c"]]);
    }

    #[test]
    fn test_hit_bounds_close_gaps() {
        let mut page = page_with_words(&[(0.0, 0.0, "a"), (30.0, 0.0, "b")]);
        let order = page.sort_and_format_text();
        let words = order.bands()[0].words();
        assert_eq!(words[0].bounds.width, 10.0);
        assert_eq!(words[0].hit_bounds.right(), 30.0);
        assert_eq!(words[1].hit_bounds, words[1].bounds);
    }

    #[test]
    fn test_duplicates_removed_when_enabled() {
        let words = [(0.0, 0.0, "x"), (0.2, 0.1, "x"), (20.0, 0.0, "y")];
        let mut page = page_with_words(&words);
        assert_eq!(band_texts(&mut page), vec![vec!["x", "x", "y"]]);

        let options = LayoutOptions::new().with_remove_duplicates(true);
        let mut page = PageText::with_options(options).unwrap();
        for &(x, y, text) in &words {
            page.new_line(None);
            page.add_glyph(Glyph::simple(Rect::new(x, y, 10.0, 10.0), text), None);
        }
        assert_eq!(band_texts(&mut page), vec![vec!["x", "y"]]);
    }

    #[test]
    fn test_hidden_layer_lines_are_skipped() {
        let mut page = page_with_words(&[(0.0, 0.0, "base")]);
        let layer = LayerId::new("watermark");
        page.new_line(Some(&layer));
        page.add_glyph(
            Glyph::simple(Rect::new(40.0, 0.0, 10.0, 10.0), "w"),
            Some(layer.clone()),
        );
        assert_eq!(band_texts(&mut page), vec![vec!["base", "w"]]);

        page.set_layer_visible(&layer, false);
        assert_eq!(band_texts(&mut page), vec![vec!["base"]]);
    }

    #[test]
    fn test_layer_word_without_matching_row_appends_band() {
        let mut page = page_with_words(&[(0.0, 0.0, "top")]);
        let layer = LayerId::new("notes");
        page.add_glyph(
            Glyph::simple(Rect::new(0.0, 500.0, 10.0, 10.0), "n"),
            Some(layer),
        );
        assert_eq!(band_texts(&mut page), vec![vec!["top"], vec!["n"]]);
    }
}
