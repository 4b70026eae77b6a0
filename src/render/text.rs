//! Plain text rendering in reading order.

use crate::model::{PageText, TextDocument};

/// Convert a page to plain text, one band per line.
pub fn to_text(page: &mut PageText) -> String {
    let text = page.text();
    text.trim_end().to_string()
}

/// Convert a document to plain text, pages separated by a blank line.
pub fn document_to_text(doc: &mut TextDocument) -> String {
    doc.plain_text().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::model::Glyph;

    #[test]
    fn test_to_text_follows_reading_order() {
        let mut page = PageText::new();
        // painted bottom line first
        page.add_glyph(Glyph::simple(Rect::new(0.0, 20.0, 10.0, 10.0), "b"), None);
        page.new_line(None);
        page.add_glyph(Glyph::simple(Rect::new(0.0, 0.0, 10.0, 10.0), "a"), None);

        assert_eq!(to_text(&mut page), "b\na");

        let mut sorted = PageText::with_options(crate::parser::LayoutOptions::new().top_to_bottom())
            .unwrap();
        sorted.add_glyph(Glyph::simple(Rect::new(0.0, 20.0, 10.0, 10.0), "b"), None);
        sorted.new_line(None);
        sorted.add_glyph(Glyph::simple(Rect::new(0.0, 0.0, 10.0, 10.0), "a"), None);
        assert_eq!(to_text(&mut sorted), "a\nb");
    }

    #[test]
    fn test_document_to_text() {
        let mut doc = TextDocument::new();
        let mut page = PageText::new();
        page.add_glyph(Glyph::simple(Rect::new(0.0, 0.0, 10.0, 10.0), "x"), None);
        doc.add_page(page);
        doc.add_page(PageText::new());
        assert_eq!(document_to_text(&mut doc), "x");
    }
}
