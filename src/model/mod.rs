//! Core data model for Greenwave.
//!
//! These types represent the conceptual architecture:
//! traffic signals, the planned trip, and map geometry.

mod geo;
mod signal;
mod trip;

pub use geo::LatLng;
pub use signal::{Signal, SignalStatus};
pub use trip::Trip;
