//! Marker construction: pure functions from state to marker specs.
//!
//! Signal coordinates are not geocoded. Each signal takes the table
//! entry at its registry position, wrapping around when the registry
//! outgrows the table — documented behavior, not an error. The route
//! endpoint markers are fixed points too; the trip's free-text fields
//! only feed the marker titles.

use crate::model::{LatLng, Signal, Trip};

use super::sdk::{InfoWindow, MarkerKind, MarkerSpec};

/// Fixed demo coordinates, cycled by registry position (midtown Manhattan).
pub const SIGNAL_COORDINATES: [LatLng; 5] = [
    LatLng::new(40.7580, -73.9855), // Times Square area
    LatLng::new(40.7505, -73.9934), // Near Herald Square
    LatLng::new(40.7614, -73.9776), // Near Central Park
    LatLng::new(40.7489, -73.9680), // East Side
    LatLng::new(40.7549, -73.9840), // Midtown
];

/// Initial map viewport.
pub const DEFAULT_CENTER: LatLng = LatLng::new(40.7580, -73.9855);
pub const DEFAULT_ZOOM: u8 = 13;

const ROUTE_START: LatLng = LatLng::new(40.7505, -73.9934);
const ROUTE_END: LatLng = LatLng::new(40.7614, -73.9776);

const ROUTE_START_COLOR: &str = "#10b981";
const ROUTE_END_COLOR: &str = "#dc2626";

/// The coordinate assigned to the signal at a registry index.
///
/// `table` must be non-empty. Assignment depends only on the index, so
/// a status change never moves a marker.
pub fn coordinate_for(index: usize, table: &[LatLng]) -> LatLng {
    table[index % table.len()]
}

/// One marker per signal, colored by status, with its info popup.
pub fn signal_markers(signals: &[Signal]) -> Vec<MarkerSpec> {
    signals
        .iter()
        .enumerate()
        .map(|(index, signal)| MarkerSpec {
            position: coordinate_for(index, &SIGNAL_COORDINATES),
            title: signal.name.clone(),
            color: signal.status.color_hex(),
            kind: MarkerKind::Signal,
            info: Some(InfoWindow {
                name: signal.name.clone(),
                location: signal.location.clone(),
                status_label: signal.status.label().to_string(),
            }),
        })
        .collect()
}

/// The two fixed route endpoint markers.
pub fn route_markers(trip: &Trip) -> [MarkerSpec; 2] {
    [
        MarkerSpec {
            position: ROUTE_START,
            title: format!("Start: {}", trip.start_location),
            color: ROUTE_START_COLOR,
            kind: MarkerKind::RouteStart,
            info: None,
        },
        MarkerSpec {
            position: ROUTE_END,
            title: format!("Destination: {}", trip.destination),
            color: ROUTE_END_COLOR,
            kind: MarkerKind::RouteEnd,
            info: None,
        },
    ]
}
