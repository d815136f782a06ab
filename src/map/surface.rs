//! Map surface seam
//!
//! The renderable map widget is an external collaborator; the controller
//! drives it through these primitives only. Implementations are expected to
//! be cheap and synchronous (tile fetching and rendering happen elsewhere).

use parking_lot::Mutex;

use super::layers::BaseLayer;

/// Imperative primitives offered by the map widget.
///
/// Methods take `&self` so a surface can be shared behind an `Arc`;
/// implementations use interior mutability where they track state.
pub trait MapSurface: Send + Sync {
    /// Center the view on a coordinate at the given zoom level.
    fn set_view(&self, lat: f64, lon: f64, zoom: u8);
    /// Attach a base layer.
    fn add_layer(&self, layer: BaseLayer);
    /// Detach a base layer.
    fn remove_layer(&self, layer: BaseLayer);
    /// Whether a base layer is currently attached.
    fn has_layer(&self, layer: BaseLayer) -> bool;
    /// Zoom in one step (step size owned by the widget).
    fn zoom_in(&self);
    /// Zoom out one step.
    fn zoom_out(&self);
    /// Current view center as (lat, lon).
    fn get_center(&self) -> (f64, f64);
    /// Render a marker at a coordinate.
    fn place_marker(&self, lat: f64, lon: f64);
}

/// Surface that logs every primitive call and tracks just enough view state
/// for `get_center` and `has_layer` to answer truthfully. Used by the
/// console demo in place of a real map widget.
pub struct LogSurface {
    inner: Mutex<LogSurfaceState>,
}

struct LogSurfaceState {
    center: (f64, f64),
    zoom: u8,
    layers: Vec<BaseLayer>,
}

impl LogSurface {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(LogSurfaceState {
                center: (0.0, 0.0),
                zoom: 0,
                layers: Vec::new(),
            }),
        }
    }
}

impl Default for LogSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl MapSurface for LogSurface {
    fn set_view(&self, lat: f64, lon: f64, zoom: u8) {
        let mut state = self.inner.lock();
        state.center = (lat, lon);
        state.zoom = zoom;
        tracing::info!("Map: setView({:.4}, {:.4}, z{})", lat, lon, zoom);
    }

    fn add_layer(&self, layer: BaseLayer) {
        let mut state = self.inner.lock();
        if !state.layers.contains(&layer) {
            state.layers.push(layer);
        }
        tracing::info!("Map: addLayer({}) [{}]", layer.label(), layer.tile_url());
    }

    fn remove_layer(&self, layer: BaseLayer) {
        self.inner.lock().layers.retain(|l| *l != layer);
        tracing::info!("Map: removeLayer({})", layer.label());
    }

    fn has_layer(&self, layer: BaseLayer) -> bool {
        self.inner.lock().layers.contains(&layer)
    }

    fn zoom_in(&self) {
        let mut state = self.inner.lock();
        state.zoom = state.zoom.saturating_add(1);
        tracing::info!("Map: zoomIn -> z{}", state.zoom);
    }

    fn zoom_out(&self) {
        let mut state = self.inner.lock();
        state.zoom = state.zoom.saturating_sub(1);
        tracing::info!("Map: zoomOut -> z{}", state.zoom);
    }

    fn get_center(&self) -> (f64, f64) {
        self.inner.lock().center
    }

    fn place_marker(&self, lat: f64, lon: f64) {
        tracing::info!("Map: placeMarker({:.4}, {:.4})", lat, lon);
    }
}
