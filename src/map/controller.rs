//! Map state coordination
//!
//! Owns the session's view state and turns intents into map surface
//! primitives. All mutation of the view state goes through the controller;
//! the surface itself is an external collaborator behind the `MapSurface`
//! trait.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::geocode::{GeocodeError, GeocodeFix, Geocoder};

use super::layers::BaseLayer;
use super::surface::MapSurface;

/// Zoom level applied after a successful navigation.
pub const NAVIGATE_ZOOM: u8 = 13;

/// The mutable session state of the map view.
///
/// Constructed fresh per session and destroyed with it; nothing here is
/// persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct MapViewState {
    /// The single attached base layer.
    pub active_layer: BaseLayer,
    /// View center as (lat, lon).
    pub center: (f64, f64),
    /// Tracked zoom level.
    pub zoom: u8,
    /// Placed markers, in placement order.
    pub markers: Vec<(f64, f64)>,
}

/// Non-fatal, user-visible failures of a single command.
///
/// These never tear down the session; the listening loop surfaces them as
/// notices and keeps going.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("location not found: {0}")]
    LocationNotFound(String),

    #[error("geocode failed: {0}")]
    GeocodeFailed(#[from] GeocodeError),
}

/// Coordinates intents against the map surface and the geocoder.
///
/// Cheaply cloneable (shared internals) so navigation requests can be
/// spawned as independent tasks.
#[derive(Clone)]
pub struct MapController {
    state: Arc<Mutex<MapViewState>>,
    surface: Arc<dyn MapSurface>,
    geocoder: Arc<dyn Geocoder>,
}

impl MapController {
    /// Create a controller, attach the initial base layer, and center the
    /// initial view.
    pub fn new(
        surface: Arc<dyn MapSurface>,
        geocoder: Arc<dyn Geocoder>,
        center: (f64, f64),
        zoom: u8,
    ) -> Self {
        let initial = BaseLayer::default();
        surface.add_layer(initial);
        surface.set_view(center.0, center.1, zoom);

        Self {
            state: Arc::new(Mutex::new(MapViewState {
                active_layer: initial,
                center,
                zoom,
                markers: Vec::new(),
            })),
            surface,
            geocoder,
        }
    }

    /// Snapshot of the current view state.
    pub fn view(&self) -> MapViewState {
        self.state.lock().clone()
    }

    /// Resolve a destination and move the view there.
    ///
    /// On success sets the center and the fixed navigation zoom; when `mark`
    /// is set (the typed text-entry path) a marker is also placed at the
    /// resolved coordinates. Failures leave the view state untouched.
    ///
    /// Overlapping navigations are not coalesced or cancelled: each request
    /// resolves independently and the later-completing one wins the center.
    pub async fn navigate(
        &self,
        destination: &str,
        mark: bool,
    ) -> Result<GeocodeFix, CommandError> {
        let fix = self
            .geocoder
            .resolve(destination)
            .await?
            .ok_or_else(|| CommandError::LocationNotFound(destination.to_string()))?;

        tracing::info!(
            "Navigating to '{}' at ({:.4}, {:.4})",
            destination,
            fix.lat,
            fix.lon
        );

        self.surface.set_view(fix.lat, fix.lon, NAVIGATE_ZOOM);
        {
            let mut state = self.state.lock();
            state.center = (fix.lat, fix.lon);
            state.zoom = NAVIGATE_ZOOM;
            if mark {
                state.markers.push((fix.lat, fix.lon));
            }
        }
        if mark {
            self.surface.place_marker(fix.lat, fix.lon);
        }

        Ok(fix)
    }

    /// Zoom in one step.
    pub fn zoom_in(&self) {
        self.surface.zoom_in();
        let mut state = self.state.lock();
        state.zoom = state.zoom.saturating_add(1);
    }

    /// Zoom out one step.
    pub fn zoom_out(&self) {
        self.surface.zoom_out();
        let mut state = self.state.lock();
        state.zoom = state.zoom.saturating_sub(1);
    }

    /// Switch the active base layer.
    ///
    /// Idempotent when the target is already active. Otherwise the active
    /// layer is removed before the target is attached, so the surface never
    /// shows zero or two base layers. This is the only path that mutates
    /// the active layer.
    pub fn change_layer(&self, target: BaseLayer) {
        let mut state = self.state.lock();
        if state.active_layer == target {
            tracing::debug!("Layer {} already active", target.label());
            return;
        }

        let previous = state.active_layer;
        self.surface.remove_layer(previous);
        self.surface.add_layer(target);
        state.active_layer = target;

        tracing::info!(
            "Base layer switched: {} -> {}",
            previous.label(),
            target.label()
        );
    }

    /// Place a marker at the surface's current center.
    ///
    /// Reads the center from the surface (not the tracked state) and does
    /// not change center or zoom.
    pub fn add_marker_here(&self) {
        let (lat, lon) = self.surface.get_center();
        self.state.lock().markers.push((lat, lon));
        self.surface.place_marker(lat, lon);
        tracing::info!("Marker placed at current center ({:.4}, {:.4})", lat, lon);
    }
}
