//! Geographic points, bounding boxes, and the local poster projection.

use serde::{Deserialize, Serialize};

/// Meters spanned by one degree of latitude (and of longitude at the equator).
pub const METERS_PER_DEGREE: f64 = 111_320.0;

/// A WGS84 coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Poster coordinate line, e.g. `48.8566° N / 2.3522° E`.
    ///
    /// Hemisphere letters follow the sign of each axis; magnitudes are absolute.
    pub fn display_coordinates(&self) -> String {
        let ns = if self.lat >= 0.0 { 'N' } else { 'S' };
        let ew = if self.lon >= 0.0 { 'E' } else { 'W' };
        format!(
            "{:.4}° {} / {:.4}° {}",
            self.lat.abs(),
            ns,
            self.lon.abs(),
            ew
        )
    }
}

/// A geographic bounding box in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    /// Create a new bounding box from corner coordinates.
    pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        }
    }

    /// Square box extending `dist_m` meters from `center` in each cardinal direction.
    pub fn around(center: GeoPoint, dist_m: f64) -> Self {
        let dlat = dist_m / METERS_PER_DEGREE;
        let dlon = dist_m / (METERS_PER_DEGREE * lon_scale(center.lat));
        Self::new(
            center.lon - dlon,
            center.lat - dlat,
            center.lon + dlon,
            center.lat + dlat,
        )
    }

    /// Overpass QL bbox filter: `south,west,north,east`.
    pub fn to_overpass(&self) -> String {
        format!(
            "{:.6},{:.6},{:.6},{:.6}",
            self.min_lat, self.min_lon, self.max_lat, self.max_lon
        )
    }
}

/// Cosine of the latitude, floored so boxes near the poles stay finite.
fn lon_scale(lat: f64) -> f64 {
    lat.to_radians().cos().max(0.01)
}

/// Equirectangular projection centered on the poster point.
///
/// The `2 * dist_m` square around the center is scaled to cover the canvas,
/// so the shorter canvas side is cropped symmetrically.
#[derive(Debug, Clone, Copy)]
pub struct LocalProjection {
    center: GeoPoint,
    px_per_meter: f64,
    half_width: f64,
    half_height: f64,
}

impl LocalProjection {
    pub fn new(center: GeoPoint, dist_m: f64, width: u32, height: u32) -> Self {
        let span = (2.0 * dist_m).max(1.0);
        Self {
            center,
            px_per_meter: f64::from(width.max(height)) / span,
            half_width: f64::from(width) / 2.0,
            half_height: f64::from(height) / 2.0,
        }
    }

    /// Project a coordinate to canvas pixels (origin top-left, y down).
    pub fn project(&self, point: GeoPoint) -> (f32, f32) {
        let east = (point.lon - self.center.lon) * METERS_PER_DEGREE * lon_scale(self.center.lat);
        let north = (point.lat - self.center.lat) * METERS_PER_DEGREE;
        let x = self.half_width + east * self.px_per_meter;
        let y = self.half_height - north * self.px_per_meter;
        (x as f32, y as f32)
    }
}
