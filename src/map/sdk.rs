//! The mapping SDK seam.
//!
//! The application treats the map service as an opaque capability:
//! initialize with a credential and view options to get a surface, then
//! create and dispose markers on it. [`StandInLoader`] is the shipped
//! implementation — it simulates the remote SDK handshake (latency plus
//! credential validation) and hands back an empty surface. Tests swap
//! in their own implementations to exercise the failure paths.

use std::{thread, time::Duration};

use crate::model::LatLng;

use super::markers::{DEFAULT_CENTER, DEFAULT_ZOOM};

/// Errors from map loading and the load state machine.
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("map credential is empty")]
    EmptyCredential,

    #[error("a map load is already in flight")]
    LoadInFlight,

    #[error("map initialization failed: {0}")]
    Init(String),
}

/// View options handed to the SDK when the surface is constructed.
#[derive(Debug, Clone)]
pub struct MapOptions {
    pub center: LatLng,
    pub zoom: u8,

    /// Feature libraries requested from the SDK at load time.
    pub libraries: &'static [&'static str],

    /// Style rule: suppress points-of-interest labels.
    pub hide_poi_labels: bool,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
            libraries: &["places", "geometry"],
            hide_poi_labels: true,
        }
    }
}

/// The opaque map capability: credential in, surface or failure out.
///
/// Initialization is the one genuinely asynchronous operation in the
/// application; callers run it off the event loop.
pub trait MapSdk: Send + Sync {
    fn initialize(&self, key: &str, options: &MapOptions) -> Result<MapSurface, MapError>;
}

/// Handle to a marker placed on a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerId(u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Signal,
    RouteStart,
    RouteEnd,
}

/// Popup content opened by clicking a marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoWindow {
    pub name: String,
    pub location: String,
    pub status_label: String,
}

/// Everything needed to place one marker.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSpec {
    pub position: LatLng,
    pub title: String,

    /// Fill color as a CSS hex string.
    pub color: &'static str,

    pub kind: MarkerKind,

    /// Present on signal markers; route markers carry only a title.
    pub info: Option<InfoWindow>,
}

/// A marker that has been placed on a surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub id: MarkerId,
    pub spec: MarkerSpec,
}

/// A loaded map surface holding the markers placed on it.
///
/// The renderer that placed a marker owns its handle and is responsible
/// for disposing it before re-rendering.
#[derive(Debug)]
pub struct MapSurface {
    options: MapOptions,
    markers: Vec<Marker>,
    next_marker: u32,
}

impl MapSurface {
    pub fn new(options: MapOptions) -> Self {
        Self {
            options,
            markers: Vec::new(),
            next_marker: 0,
        }
    }

    pub fn options(&self) -> &MapOptions {
        &self.options
    }

    pub fn create_marker(&mut self, spec: MarkerSpec) -> MarkerId {
        let id = MarkerId(self.next_marker);
        self.next_marker += 1;
        self.markers.push(Marker { id, spec });
        id
    }

    /// Removes a marker from the surface. Disposing an already-removed
    /// handle does nothing.
    pub fn dispose_marker(&mut self, id: MarkerId) {
        self.markers.retain(|m| m.id != id);
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }
}

/// Stand-in for the remote tile service.
///
/// Accepts any non-blank credential after a simulated network delay.
/// Whether a credential would really be honored is only knowable to the
/// actual service, so rejection here is limited to the blank case.
pub struct StandInLoader {
    latency: Duration,
}

impl StandInLoader {
    pub fn new() -> Self {
        Self {
            latency: Duration::from_millis(600),
        }
    }
}

impl Default for StandInLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl MapSdk for StandInLoader {
    fn initialize(&self, key: &str, options: &MapOptions) -> Result<MapSurface, MapError> {
        if key.trim().is_empty() {
            return Err(MapError::EmptyCredential);
        }
        tracing::debug!("initializing map sdk (libraries: {})", options.libraries.join(", "));
        thread::sleep(self.latency);
        Ok(MapSurface::new(options.clone()))
    }
}
