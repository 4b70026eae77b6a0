//! Integration tests for event recordings.

use std::fs;

use pagetext::parser::PageRecording;
use pagetext::render::{self, JsonFormat};
use pagetext::{
    extract_text, load_recording, load_recording_with_options, parse_recording, Error, GlyphEvent,
    LayerId, LayoutOptions, Rect, Recording,
};

fn glyph_events(x: f32, y: f32, text: &str) -> Vec<GlyphEvent> {
    text.chars()
        .enumerate()
        .map(|(i, c)| {
            GlyphEvent::glyph(Rect::new(x + i as f32 * 10.0, y, 10.0, 10.0), c.to_string())
        })
        .collect()
}

fn line_events(x: f32, y: f32, text: &str) -> Vec<GlyphEvent> {
    let mut events = vec![GlyphEvent::NewLine { layer: None }];
    events.extend(glyph_events(x, y, text));
    events
}

fn sample_recording() -> Recording {
    let mut first = PageRecording::new(1);
    first.events.extend(line_events(0.0, 0.0, "Left"));
    // same line, 20pt gap
    first.events.extend(glyph_events(60.0, 0.0, "Right"));
    first.events.extend(line_events(0.0, 20.0, "Below"));

    let mut second = PageRecording::new(2);
    second.events.push(GlyphEvent::Glyph {
        bounds: Rect::new(0.0, 0.0, 10.0, 10.0),
        text: "n".to_string(),
        code: Some(110),
        origin: None,
        advance: None,
        rotation: 0,
        layer: Some(LayerId::new("notes")),
    });
    second.events.push(GlyphEvent::LayerVisibility {
        layer: LayerId::new("notes"),
        visible: false,
    });

    Recording {
        pages: vec![first, second],
    }
}

#[test]
fn test_recording_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("events.json");
    let recording = sample_recording();
    fs::write(&path, recording.to_json().unwrap()).unwrap();

    assert_eq!(Recording::load(&path).unwrap(), recording);

    let mut doc = load_recording(&path).unwrap();
    assert_eq!(doc.page_count(), 2);
    assert_eq!(doc.page(2).unwrap().lines().len(), 1);
    assert_eq!(render::document_to_text(&mut doc), "Left    Right\nBelow");
}

#[test]
fn test_extract_text_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("events.json");
    fs::write(&path, sample_recording().to_json().unwrap()).unwrap();

    let text = extract_text(&path).unwrap();
    assert!(text.starts_with("Left"));
    assert!(text.ends_with("Below"));
}

#[test]
fn test_options_flow_into_pages() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("events.json");
    fs::write(&path, sample_recording().to_json().unwrap()).unwrap();

    let options = LayoutOptions::new().with_max_synthetic_spaces(1);
    let mut doc = load_recording_with_options(&path, options).unwrap();
    let page = doc.page_mut(1).unwrap();
    assert_eq!(page.options().max_synthetic_spaces, 1);
    assert_eq!(render::to_text(page), "Left Right\nBelow");
}

#[test]
fn test_invalid_options_rejected() {
    let options = LayoutOptions::new().with_space_fraction(-2.0);
    let result = pagetext::TextDocument::from_recording(&sample_recording(), options);
    assert!(matches!(result, Err(Error::InvalidOptions(_))));
}

#[test]
fn test_malformed_recording() {
    assert!(matches!(
        parse_recording(r#"{"pages":[{"number":1,"events":[{"type":"bogus"}]}]}"#),
        Err(Error::Recording(_))
    ));
}

#[test]
fn test_json_snapshot_of_recording() {
    let json = sample_recording().to_json().unwrap();
    let mut doc = parse_recording(&json).unwrap();
    let snapshot = render::document_to_json(&mut doc, JsonFormat::Compact).unwrap();
    let value: serde_json::Value = serde_json::from_str(&snapshot).unwrap();
    assert_eq!(value[0]["bands"].as_array().unwrap().len(), 2);
    // the hidden layer leaves page two without bands
    assert_eq!(value[1]["bands"].as_array().unwrap().len(), 0);
}
