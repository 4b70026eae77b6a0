//! Text model: glyphs aggregated into words, words into lines, lines into
//! pages.
//!
//! The tree is built bottom-up in paint order by an interpreter and owns all
//! of its nodes; the reading-order view of a page only refers to words by
//! position.

mod document;
mod glyph;
mod line;
mod page;
mod word;

pub use document::TextDocument;
pub use glyph::{Glyph, PageRotation};
pub use line::{LayerId, Line};
pub use page::{PageText, SharedPage};
pub use word::{Word, WordKey, WordKind};
