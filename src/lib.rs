//! Vocamap - voice-controlled map navigation
//!
//! Interprets spoken commands ("go to paris", "zoom in", "satellite view")
//! and drives an external map surface accordingly. The map widget and the
//! speech recognition engine are collaborators behind trait seams; this
//! crate owns the command grammar, the geocoding client, the map view
//! state, and the continuous listening loop.

pub mod command;
pub mod config;
pub mod feedback;
pub mod geocode;
pub mod listening;
pub mod map;
