//! Glyph aggregation: classification, word segmentation, reading order and
//! the interpreter-facing event surface.

mod classify;
pub mod events;
mod options;
pub mod publish;
pub mod reading_order;
pub mod segmenter;

pub use classify::{detect_punctuation, is_digit, is_punctuation, is_right_to_left, is_whitespace};
pub use events::{replay, GlyphEvent, GlyphSink, PageRecording, Recording};
pub use options::{LayoutOptions, DEFAULT_MAX_SYNTHETIC_SPACES, DEFAULT_SPACE_FRACTION};
pub use reading_order::{Band, BandWord, ReadingOrder, WordLoc};
