//! Glyph-level types.

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rect, Transform};

/// Page rotation applied when the glyph was painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PageRotation {
    #[default]
    Rotate0,
    Rotate90,
    Rotate180,
    Rotate270,
}

impl PageRotation {
    /// Normalize any multiple of 90 degrees (negative included).
    ///
    /// Values that are not a multiple of 90 snap to the nearest quarter turn.
    pub fn from_degrees(degrees: i32) -> Self {
        let quarter = ((degrees as f32 / 90.0).round() as i32).rem_euclid(4);
        match quarter {
            1 => PageRotation::Rotate90,
            2 => PageRotation::Rotate180,
            3 => PageRotation::Rotate270,
            _ => PageRotation::Rotate0,
        }
    }

    /// Rotation in degrees (0, 90, 180, 270).
    pub fn degrees(&self) -> u16 {
        match self {
            PageRotation::Rotate0 => 0,
            PageRotation::Rotate90 => 90,
            PageRotation::Rotate180 => 180,
            PageRotation::Rotate270 => 270,
        }
    }
}

/// One painted character instance.
///
/// Geometry is fixed at construction; the only later geometric change is
/// [`Glyph::normalize_to_user_space`] and widening of the selection bounds
/// by the owning word.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Glyph {
    /// Pen position the glyph was painted at
    pub origin: Point,
    /// Advance vector
    pub advance: Point,
    /// Character code (may be a multi-byte CID)
    pub code: u32,
    /// Decoded Unicode text (empty when the font has no mapping)
    text: String,
    /// Painted bounds
    bounds: Rect,
    /// Bounds used for pointer hit-testing
    selection_bounds: Rect,
    /// Page rotation tag
    pub rotation: PageRotation,
    selected: bool,
    highlighted: bool,
    redacted: bool,
}

impl Glyph {
    /// Create a glyph with its painted bounds.
    pub fn new(
        origin: Point,
        advance: Point,
        bounds: Rect,
        rotation: PageRotation,
        code: u32,
        text: impl Into<String>,
    ) -> Self {
        Self {
            origin,
            advance,
            code,
            text: text.into(),
            bounds,
            selection_bounds: bounds,
            rotation,
            selected: false,
            highlighted: false,
            redacted: false,
        }
    }

    /// Shorthand for a horizontal glyph whose origin is the top-left of `bounds`
    /// and whose advance is its width.
    pub fn simple(bounds: Rect, text: &str) -> Self {
        let code = text.chars().next().map(u32::from).unwrap_or(0);
        Self::new(
            Point::new(bounds.x, bounds.y),
            Point::new(bounds.width, 0.0),
            bounds,
            PageRotation::Rotate0,
            code,
            text,
        )
    }

    /// A synthesized space glyph filling part of a gap.
    pub(crate) fn synthetic_space(bounds: Rect, rotation: PageRotation) -> Self {
        Self::new(
            Point::new(bounds.x, bounds.y),
            Point::new(bounds.width, 0.0),
            bounds,
            rotation,
            u32::from(' '),
            " ",
        )
    }

    /// Decoded text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// First decoded character, if any.
    pub fn first_char(&self) -> Option<char> {
        self.text.chars().next()
    }

    /// Painted bounds.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub(crate) fn bounds_ref(&self) -> &Rect {
        &self.bounds
    }

    /// Hit-testing bounds.
    pub fn selection_bounds(&self) -> Rect {
        self.selection_bounds
    }

    /// Extend the hit-testing bounds rightward to `right`; never shrinks.
    pub(crate) fn widen_selection_to(&mut self, right: f32) {
        if right > self.selection_bounds.right() {
            self.selection_bounds.width = right - self.selection_bounds.x;
        }
    }

    /// Re-project both rectangles through `transform`.
    ///
    /// When `previous` is given its inverse is applied first, undoing an
    /// earlier placement of the same content.
    pub fn normalize_to_user_space(&mut self, transform: &Transform, previous: Option<&Transform>) {
        let effective = match previous.and_then(Transform::invert) {
            Some(inverse) => inverse.then(transform),
            None => {
                if previous.is_some() {
                    log::warn!("previous XObject transform is singular, applying new one as-is");
                }
                *transform
            }
        };
        self.bounds = effective.apply_rect(&self.bounds);
        self.selection_bounds = effective.apply_rect(&self.selection_bounds);
    }

    /// Check if the glyph is selected.
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Set the selection flag.
    pub fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    /// Check if the glyph is highlighted.
    pub fn is_highlighted(&self) -> bool {
        self.highlighted
    }

    /// Set the highlight flag.
    pub fn set_highlighted(&mut self, highlighted: bool) {
        self.highlighted = highlighted;
    }

    /// Check if the glyph was redacted.
    pub fn is_redacted(&self) -> bool {
        self.redacted
    }

    /// Mark the glyph for redaction.
    pub fn redact(&mut self) {
        self.redacted = true;
    }
}
