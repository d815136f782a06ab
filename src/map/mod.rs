//! Map state and the surface seam
//!
//! `layers` enumerates the base tile styles, `surface` defines the external
//! widget primitives, and `controller` owns the per-session view state.

pub mod controller;
pub mod layers;
pub mod surface;

pub use controller::{CommandError, MapController, MapViewState, NAVIGATE_ZOOM};
pub use layers::BaseLayer;
pub use surface::{LogSurface, MapSurface};
