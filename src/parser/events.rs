//! Interpreter-facing event surface.
//!
//! A content-stream interpreter drives a [`GlyphSink`] while it walks a page.
//! The same calls can be captured as [`GlyphEvent`]s, stored as JSON and
//! replayed later, which is how the CLI and the tests feed pages without a
//! PDF interpreter.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geometry::{Point, Rect, Transform};
use crate::model::{Glyph, LayerId, PageRotation, PageText};
use crate::parser::LayoutOptions;

/// Receiver of the calls a content-stream interpreter makes while painting.
pub trait GlyphSink {
    /// A glyph was painted, optionally inside a visibility layer.
    fn add_glyph(&mut self, glyph: Glyph, layer: Option<LayerId>);

    /// The interpreter moved to a new text line in `layer`.
    fn new_line(&mut self, layer: Option<&LayerId>);

    /// A Form XObject placement applies to everything built so far.
    fn apply_xobject_transform(&mut self, transform: Transform);

    /// The viewer toggled a visibility layer.
    fn set_layer_visible(&mut self, layer: &LayerId, visible: bool);
}

impl GlyphSink for PageText {
    fn add_glyph(&mut self, glyph: Glyph, layer: Option<LayerId>) {
        PageText::add_glyph(self, glyph, layer);
    }

    fn new_line(&mut self, layer: Option<&LayerId>) {
        PageText::new_line(self, layer);
    }

    fn apply_xobject_transform(&mut self, transform: Transform) {
        PageText::apply_xobject_transform(self, transform);
    }

    fn set_layer_visible(&mut self, layer: &LayerId, visible: bool) {
        PageText::set_layer_visible(self, layer, visible);
    }
}

/// One recorded sink call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GlyphEvent {
    Glyph {
        bounds: Rect,
        text: String,
        /// Character code, defaults to the first char of `text`
        #[serde(default, skip_serializing_if = "Option::is_none")]
        code: Option<u32>,
        /// Pen position, defaults to the top-left of `bounds`
        #[serde(default, skip_serializing_if = "Option::is_none")]
        origin: Option<Point>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        advance: Option<Point>,
        #[serde(default)]
        rotation: i32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        layer: Option<LayerId>,
    },
    NewLine {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        layer: Option<LayerId>,
    },
    XObject {
        matrix: [f32; 6],
    },
    LayerVisibility {
        layer: LayerId,
        visible: bool,
    },
}

impl GlyphEvent {
    /// Shorthand for a horizontal glyph event in the main content.
    pub fn glyph(bounds: Rect, text: impl Into<String>) -> Self {
        GlyphEvent::Glyph {
            bounds,
            text: text.into(),
            code: None,
            origin: None,
            advance: None,
            rotation: 0,
            layer: None,
        }
    }

    /// Forward this event to `sink`.
    pub fn apply<S: GlyphSink + ?Sized>(&self, sink: &mut S) {
        match self {
            GlyphEvent::Glyph {
                bounds,
                text,
                code,
                origin,
                advance,
                rotation,
                layer,
            } => {
                let code = code
                    .or_else(|| text.chars().next().map(u32::from))
                    .unwrap_or(0);
                let glyph = Glyph::new(
                    origin.unwrap_or(Point::new(bounds.x, bounds.y)),
                    advance.unwrap_or(Point::new(bounds.width, 0.0)),
                    *bounds,
                    PageRotation::from_degrees(*rotation),
                    code,
                    text.as_str(),
                );
                sink.add_glyph(glyph, layer.clone());
            }
            GlyphEvent::NewLine { layer } => sink.new_line(layer.as_ref()),
            GlyphEvent::XObject { matrix } => {
                sink.apply_xobject_transform(Transform::from_array(*matrix))
            }
            GlyphEvent::LayerVisibility { layer, visible } => {
                sink.set_layer_visible(layer, *visible)
            }
        }
    }
}

/// Replay recorded events into `sink` in order.
pub fn replay<'a, S, I>(events: I, sink: &mut S)
where
    S: GlyphSink + ?Sized,
    I: IntoIterator<Item = &'a GlyphEvent>,
{
    let mut count = 0usize;
    for event in events {
        event.apply(sink);
        count += 1;
    }
    log::trace!("replayed {} glyph events", count);
}

/// The recorded event stream of one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRecording {
    /// Page number (1-indexed)
    pub number: u32,
    #[serde(default)]
    pub events: Vec<GlyphEvent>,
}

impl PageRecording {
    /// Create an empty recording for page `number`.
    pub fn new(number: u32) -> Self {
        Self {
            number,
            events: Vec::new(),
        }
    }

    /// Build a page from the recorded events with `options`.
    pub fn build(&self, options: &LayoutOptions) -> Result<PageText> {
        let mut page = PageText::with_options(options.clone())?;
        replay(&self.events, &mut page);
        Ok(page)
    }
}

/// A recorded document: one event stream per page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    pub pages: Vec<PageRecording>,
}

impl Recording {
    /// Decode a recording from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let recording: Recording = serde_json::from_str(json)?;
        recording.check_numbers()?;
        Ok(recording)
    }

    /// Read and decode a recording file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Encode the recording as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Render(e.to_string()))
    }

    fn check_numbers(&self) -> Result<()> {
        for (i, page) in self.pages.iter().enumerate() {
            let expected = i as u32 + 1;
            if page.number != expected {
                return Err(Error::Recording(format!(
                    "page {} recorded at position {}",
                    page.number, expected
                )));
            }
        }
        Ok(())
    }
}
