//! Voice command interpretation
//!
//! Classifies one recognized transcript into a map intent. The grammar is a
//! single level with no backtracking: variable-length navigation prefixes are
//! checked before the exact-match table so they cannot collide with the fixed
//! phrases, and everything else falls through to `Unrecognized`.

use crate::map::layers::BaseLayer;

/// Navigation prefixes, checked before the exact-match table.
const NAVIGATE_PREFIXES: [&str; 2] = ["go to ", "navigate to "];

/// The classified meaning of one transcript.
///
/// Derived purely from the transcript text and consumed immediately after
/// creation; intents carry no session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Move the view to a named destination. `mark` is false for spoken
    /// navigation; the typed text-entry path sets it.
    Navigate { destination: String, mark: bool },
    /// Zoom the map in one step.
    ZoomIn,
    /// Zoom the map out one step.
    ZoomOut,
    /// Switch the active base layer.
    ChangeLayer(BaseLayer),
    /// Drop a marker at the current map center.
    AddMarkerHere,
    /// The transcript matched nothing in the grammar.
    Unrecognized,
}

/// Classify a transcript into an intent.
///
/// Transcripts arrive already lowercased from the recognition engine;
/// matching is exact against that form. Pure function, no side effects.
pub fn interpret(transcript: &str) -> Intent {
    for prefix in NAVIGATE_PREFIXES {
        if let Some(rest) = transcript.strip_prefix(prefix) {
            let destination = rest.trim();
            if destination.is_empty() {
                // "go to" with nothing after it names no target
                return Intent::Unrecognized;
            }
            return Intent::Navigate {
                destination: destination.to_string(),
                mark: false,
            };
        }
    }

    match transcript {
        "zoom in" => Intent::ZoomIn,
        "zoom out" => Intent::ZoomOut,
        "satellite view" => Intent::ChangeLayer(BaseLayer::Satellite),
        "terrain view" => Intent::ChangeLayer(BaseLayer::Terrain),
        "default view" | "osm view" => Intent::ChangeLayer(BaseLayer::Osm),
        "dark view" => Intent::ChangeLayer(BaseLayer::Dark),
        "night view" => Intent::ChangeLayer(BaseLayer::Night),
        "add marker" => Intent::AddMarkerHere,
        _ => Intent::Unrecognized,
    }
}
