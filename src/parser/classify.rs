//! Character-class heuristics used for word boundaries.
//!
//! Every classifier looks at the first decoded character of a glyph only.
//! A glyph without decoded text belongs to no class.

use unicode_bidi::{bidi_class, BidiClass};

use crate::model::Glyph;

/// Characters that always split a word.
const PUNCTUATION: &[char] = &['.', ',', '?', '!', ':', ';', '"', '\'', '/', '\\', '`', '#'];

/// Check whether the glyph decodes to whitespace.
pub fn is_whitespace(glyph: &Glyph) -> bool {
    glyph.first_char().is_some_and(char::is_whitespace)
}

/// Check whether the glyph decodes to a word-splitting punctuation mark.
pub fn is_punctuation(glyph: &Glyph) -> bool {
    glyph
        .first_char()
        .is_some_and(|c| PUNCTUATION.contains(&c))
}

/// Check whether the glyph decodes to a decimal digit.
pub fn is_digit(glyph: &Glyph) -> bool {
    glyph.first_char().is_some_and(|c| c.is_ascii_digit())
}

/// Punctuation test with the digit guard: a mark directly after a digit
/// does not split, so `3.14` or `1,000` stay one word.
pub fn detect_punctuation(glyph: &Glyph, previous: Option<&Glyph>) -> bool {
    is_punctuation(glyph) && !previous.is_some_and(is_digit)
}

/// Check whether the glyph is a strong right-to-left character.
pub fn is_right_to_left(glyph: &Glyph) -> bool {
    glyph
        .first_char()
        .is_some_and(|c| matches!(bidi_class(c), BidiClass::R | BidiClass::AL))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;

    fn glyph(text: &str) -> Glyph {
        Glyph::simple(Rect::new(0.0, 0.0, 5.0, 10.0), text)
    }

    #[test]
    fn test_whitespace() {
        assert!(is_whitespace(&glyph(" ")));
        assert!(is_whitespace(&glyph("\t")));
        assert!(is_whitespace(&glyph("\u{00A0}")));
        assert!(!is_whitespace(&glyph("a")));
        assert!(!is_whitespace(&glyph("")));
    }

    #[test]
    fn test_punctuation_set() {
        for p in [".", ",", "?", "!", ":", ";", "\"", "'", "/", "\\", "`", "#"] {
            assert!(is_punctuation(&glyph(p)), "{p:?} should be punctuation");
        }
        assert!(!is_punctuation(&glyph("-")));
        assert!(!is_punctuation(&glyph("a")));
        assert!(!is_punctuation(&glyph("")));
    }

    #[test]
    fn test_digit_guard() {
        let dot = glyph(".");
        assert!(detect_punctuation(&dot, None));
        assert!(detect_punctuation(&dot, Some(&glyph("a"))));
        assert!(!detect_punctuation(&dot, Some(&glyph("3"))));
    }

    #[test]
    fn test_right_to_left() {
        assert!(is_right_to_left(&glyph("\u{05D0}"))); // Hebrew alef
        assert!(is_right_to_left(&glyph("\u{0627}"))); // Arabic alef
        assert!(!is_right_to_left(&glyph("a")));
        assert!(!is_right_to_left(&glyph("")));
    }
}
