//! Word segmentation automaton.
//!
//! Each incoming glyph is classified against the open word of its line into
//! exactly one [`Transition`]; the line then performs it. Space synthesis is an
//! explicit two-step transition: flush the space word, then classify the glyph
//! once more with no open word. The second pass can only yield `Whitespace`,
//! `Punctuation` or `Start`, so dispatch never nests.

use super::classify::{detect_punctuation, is_right_to_left, is_whitespace};
use super::options::LayoutOptions;
use crate::geometry::Rect;
use crate::model::{Glyph, Word, WordKey};

/// What to do with an incoming glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// No open word: the glyph starts one.
    Start,
    /// Flush a whitespace word holding only the glyph and close the open word.
    Whitespace,
    /// Flush a standalone punctuation word and close the open word.
    Punctuation,
    /// Flush a synthesized space word, then place the glyph as if no word
    /// were open.
    SpaceThenStart,
    /// Append the glyph to the open word.
    Append,
}

/// Classify `glyph` against the open word.
pub fn transition(open: Option<&Word>, glyph: &Glyph, options: &LayoutOptions) -> Transition {
    if is_whitespace(glyph) {
        return Transition::Whitespace;
    }
    if detect_punctuation(glyph, open.and_then(Word::last_glyph)) {
        return Transition::Punctuation;
    }
    match open {
        None => Transition::Start,
        Some(word) if detect_space(word, glyph, options) => Transition::SpaceThenStart,
        Some(_) => Transition::Append,
    }
}

/// Horizontal distance from the end of `prev` to the start of `glyph`.
///
/// Between two strong right-to-left glyphs the run advances leftward, so the
/// gap is measured from the left edge of `prev` to the right edge of `glyph`.
fn horizontal_gap(prev: &Glyph, glyph: &Glyph) -> f32 {
    let pb = prev.bounds();
    let gb = glyph.bounds();
    if is_right_to_left(prev) && is_right_to_left(glyph) {
        pb.left() - gb.right()
    } else {
        gb.left() - pb.right()
    }
}

/// Check whether `glyph` is far enough from the last glyph of `word` to imply
/// a word break.
pub fn detect_space(word: &Word, glyph: &Glyph, options: &LayoutOptions) -> bool {
    let Some(prev) = word.last_glyph() else {
        return false;
    };
    let pb = prev.bounds();
    let tolerance = pb.height.abs() / options.space_fraction;
    let dx = horizontal_gap(prev, glyph);
    let dy = glyph.bounds().y - pb.y;
    dx.abs() > tolerance || dy.abs() > tolerance
}

/// Synthesize the space glyphs filling the gap between `prev` and `glyph`.
///
/// The count scales with the gap measured in half glyph widths, at least one
/// and at most `max_synthetic_spaces`. A negative gap (right-to-left run, or a
/// jump back to the left) is filled from the right edge of `glyph` to the left
/// edge of `prev`, emitted right to left.
pub fn space_glyphs(prev: &Glyph, glyph: &Glyph, options: &LayoutOptions) -> Vec<Glyph> {
    let pb = prev.bounds();
    let gb = glyph.bounds();
    let mirrored = horizontal_gap(prev, glyph) < 0.0
        || (is_right_to_left(prev) && is_right_to_left(glyph));
    let (start, end) = if mirrored {
        (gb.right(), pb.left())
    } else {
        (pb.right(), gb.left())
    };
    let span = (end - start).max(0.0);
    let unit = pb.width.abs().max(gb.width.abs()) / 2.0;

    let natural = if span > 0.0 && unit > 0.0 {
        ((span / unit).round() as usize).max(1)
    } else {
        1
    };
    let cap = options.max_synthetic_spaces.max(1);
    if natural > cap {
        log::trace!("space synthesis capped at {} glyphs for gap {:.1}", cap, span);
    }
    let count = natural.min(cap);

    let width = span / count as f32;
    (0..count)
        .map(|i| {
            let x = if mirrored {
                end - (i + 1) as f32 * width
            } else {
                start + i as f32 * width
            };
            Glyph::synthetic_space(Rect::new(x, pb.y, width, pb.height), prev.rotation)
        })
        .collect()
}

/// Build the whitespace word for a detected gap.
pub fn build_space_word(key: WordKey, prev: &Glyph, glyph: &Glyph, options: &LayoutOptions) -> Word {
    Word::synthetic_space(key, space_glyphs(prev, glyph, options))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glyph(x: f32, y: f32, text: &str) -> Glyph {
        Glyph::simple(Rect::new(x, y, 10.0, 10.0), text)
    }

    fn open_word(g: Glyph) -> Word {
        Word::new(WordKey::derive(0, &g), g)
    }

    #[test]
    fn test_transition_table() {
        let opts = LayoutOptions::default();
        let word = open_word(glyph(0.0, 0.0, "a"));

        assert_eq!(transition(None, &glyph(10.0, 0.0, "b"), &opts), Transition::Start);
        assert_eq!(
            transition(Some(&word), &glyph(10.0, 0.0, " "), &opts),
            Transition::Whitespace
        );
        assert_eq!(
            transition(Some(&word), &glyph(10.0, 0.0, ","), &opts),
            Transition::Punctuation
        );
        assert_eq!(
            transition(Some(&word), &glyph(40.0, 0.0, "b"), &opts),
            Transition::SpaceThenStart
        );
        assert_eq!(
            transition(Some(&word), &glyph(10.0, 0.0, "b"), &opts),
            Transition::Append
        );
    }

    #[test]
    fn test_punctuation_after_digit_appends() {
        let opts = LayoutOptions::default();
        let word = open_word(glyph(0.0, 0.0, "3"));
        assert_eq!(
            transition(Some(&word), &glyph(10.0, 0.0, "."), &opts),
            Transition::Append
        );
    }

    #[test]
    fn test_empty_text_folds_into_word() {
        let opts = LayoutOptions::default();
        let word = open_word(glyph(0.0, 0.0, "a"));
        assert_eq!(
            transition(Some(&word), &glyph(10.0, 0.0, ""), &opts),
            Transition::Append
        );
    }

    #[test]
    fn test_detect_space_tolerance() {
        let opts = LayoutOptions::default();
        let word = open_word(glyph(0.0, 0.0, "a"));
        // tolerance is 10 / 3
        assert!(!detect_space(&word, &glyph(13.0, 0.0, "b"), &opts));
        assert!(detect_space(&word, &glyph(13.5, 0.0, "b"), &opts));
        assert!(detect_space(&word, &glyph(10.0, 4.0, "b"), &opts));
        assert!(!detect_space(&word, &glyph(10.0, 3.0, "b"), &opts));
    }

    #[test]
    fn test_space_fraction_is_configurable() {
        let loose = LayoutOptions::new().with_space_fraction(1.0);
        let word = open_word(glyph(0.0, 0.0, "a"));
        assert!(!detect_space(&word, &glyph(18.0, 0.0, "b"), &loose));
    }

    #[test]
    fn test_space_glyph_count_scales_with_gap() {
        let opts = LayoutOptions::default();
        let spaces = space_glyphs(&glyph(0.0, 0.0, "a"), &glyph(40.0, 0.0, "b"), &opts);
        assert_eq!(spaces.len(), 6);
        assert_eq!(spaces[0].bounds().left(), 10.0);
        assert_eq!(spaces[5].bounds().right(), 40.0);
        assert!(spaces.iter().all(|g| g.text() == " "));
    }

    #[test]
    fn test_space_glyph_cap() {
        let opts = LayoutOptions::new().with_max_synthetic_spaces(4);
        let spaces = space_glyphs(&glyph(0.0, 0.0, "a"), &glyph(1000.0, 0.0, "b"), &opts);
        assert_eq!(spaces.len(), 4);
        assert_eq!(spaces[3].bounds().right(), 1000.0);
    }

    #[test]
    fn test_vertical_jump_yields_single_space() {
        let opts = LayoutOptions::default();
        let spaces = space_glyphs(&glyph(0.0, 0.0, "a"), &glyph(10.0, 30.0, "b"), &opts);
        assert_eq!(spaces.len(), 1);
        assert_eq!(spaces[0].bounds().width, 0.0);
    }

    #[test]
    fn test_right_to_left_gap_is_mirrored() {
        let opts = LayoutOptions::default();
        // Hebrew run painted right to left with a 20pt gap
        let prev = glyph(100.0, 0.0, "\u{05D0}");
        let next = glyph(70.0, 0.0, "\u{05D1}");
        let word = open_word(prev.clone());
        assert!(detect_space(&word, &next, &opts));

        let spaces = space_glyphs(&prev, &next, &opts);
        assert_eq!(spaces.len(), 4);
        assert_eq!(spaces[0].bounds().right(), 100.0);
        assert_eq!(spaces[3].bounds().left(), 80.0);
    }

    #[test]
    fn test_adjacent_right_to_left_glyphs_stay_together() {
        let opts = LayoutOptions::default();
        let word = open_word(glyph(100.0, 0.0, "\u{05D0}"));
        assert!(!detect_space(&word, &glyph(90.0, 0.0, "\u{05D1}"), &opts));
    }
}
