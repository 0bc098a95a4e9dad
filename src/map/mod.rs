//! The route map: SDK seam, marker construction, and load state.
//!
//! The mapping SDK is an opaque capability behind [`MapSdk`]; marker
//! positions come from a fixed coordinate table, not from geocoding.

mod canvas;
mod markers;
mod sdk;
mod view;

pub use canvas::{Bounds, project};
pub use markers::{
    DEFAULT_CENTER, DEFAULT_ZOOM, SIGNAL_COORDINATES, coordinate_for, route_markers,
    signal_markers,
};
pub use sdk::{
    InfoWindow, MapError, MapOptions, MapSdk, MapSurface, Marker, MarkerId, MarkerKind,
    MarkerSpec, StandInLoader,
};
pub use view::{LoadState, MapView};
