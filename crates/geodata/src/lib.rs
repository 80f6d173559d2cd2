//! External map collaborators.
//!
//! The poster pipeline only sees two seams:
//! - [`Geocoder`]: city + country to a coordinate
//! - [`MapDataSource`]: coordinate + radius to streets, water and parks
//!
//! Concrete adapters talk to Nominatim and the Overpass API.

pub mod client;
pub mod nominatim;
pub mod overpass;
pub mod parse;

pub use client::HttpConfig;
pub use nominatim::NominatimGeocoder;
pub use overpass::OverpassClient;

use async_trait::async_trait;
use poster_common::{FeatureCollection, GeoPoint, PosterResult, StreetGraph};

/// Resolves a place name to coordinates.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Look up `city, country`.
    ///
    /// Returns `PosterError::CoordinatesNotFound` when the service has no match.
    async fn locate(&self, city: &str, country: &str) -> PosterResult<GeoPoint>;
}

/// Fetches the map layers drawn on a poster.
///
/// Each layer covers the square box extending `dist_m` meters from `center`.
#[async_trait]
pub trait MapDataSource: Send + Sync {
    /// Street network (all highway classes).
    async fn fetch_streets(&self, center: GeoPoint, dist_m: u32) -> PosterResult<StreetGraph>;

    /// Water polygons (`natural=water`, `waterway=riverbank`).
    async fn fetch_water(&self, center: GeoPoint, dist_m: u32) -> PosterResult<FeatureCollection>;

    /// Park polygons (`leisure=park`, `landuse=grass`).
    async fn fetch_parks(&self, center: GeoPoint, dist_m: u32) -> PosterResult<FeatureCollection>;
}
