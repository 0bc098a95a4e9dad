//! Projection of marker coordinates into the map panel's cell grid.
//!
//! Pure presentation math: the geographic bounding box of the rendered
//! markers is padded and mapped linearly onto a width x height grid of
//! character cells, north up. Marker positions themselves come from the
//! coordinate table and are never affected by projection.

use crate::model::LatLng;

/// Fraction of the span added on each side so edge markers don't sit
/// on the panel border.
const PADDING: f64 = 0.12;

/// Minimum span in degrees, so a single point still gets a viewport.
const MIN_SPAN: f64 = 1e-6;

/// Padded geographic bounding box of a set of points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    min: LatLng,
    max: LatLng,
}

impl Bounds {
    /// The padded box around `points`. `None` when there are no points.
    pub fn around<I: IntoIterator<Item = LatLng>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;

        let mut min = first;
        let mut max = first;
        for p in iter {
            min.lat = min.lat.min(p.lat);
            min.lng = min.lng.min(p.lng);
            max.lat = max.lat.max(p.lat);
            max.lng = max.lng.max(p.lng);
        }

        let lat_pad = ((max.lat - min.lat) * PADDING).max(MIN_SPAN);
        let lng_pad = ((max.lng - min.lng) * PADDING).max(MIN_SPAN);
        Some(Self {
            min: LatLng::new(min.lat - lat_pad, min.lng - lng_pad),
            max: LatLng::new(max.lat + lat_pad, max.lng + lng_pad),
        })
    }

    fn lat_span(&self) -> f64 {
        self.max.lat - self.min.lat
    }

    fn lng_span(&self) -> f64 {
        self.max.lng - self.min.lng
    }
}

/// Maps a point into a `width` x `height` cell grid.
///
/// (0, 0) is the top-left cell; rows grow southward. Points outside the
/// bounds clamp to the nearest edge cell.
pub fn project(point: LatLng, bounds: &Bounds, width: u16, height: u16) -> (u16, u16) {
    if width == 0 || height == 0 {
        return (0, 0);
    }

    let fx = ((point.lng - bounds.min.lng) / bounds.lng_span()).clamp(0.0, 1.0);
    let fy = ((bounds.max.lat - point.lat) / bounds.lat_span()).clamp(0.0, 1.0);

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // Clamped to the grid.
    let col = (fx * f64::from(width - 1)).round() as u16;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let row = (fy * f64::from(height - 1)).round() as u16;
    (col, row)
}
