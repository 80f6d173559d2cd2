//! Common types shared across the city poster workspace.

pub mod error;
pub mod geo;
pub mod map;
pub mod theme;

pub use error::{ErrorKind, PosterError, PosterResult};
pub use geo::{BoundingBox, GeoPoint, LocalProjection};
pub use map::{FeatureCollection, HighwayTag, MapData, PolygonFeature, StreetEdge, StreetGraph};
pub use theme::{ColorRole, HexColor, Theme};

/// Normalize a free-form name into a single path component.
///
/// Lowercases, and turns every character other than a letter, digit, `_` or
/// `-` into `_`, so separators and dots never reach the filesystem. Used for
/// cache keys and output filenames; see `theme::theme_slug` for the stricter
/// theme identifier rule.
pub fn slugify(value: &str) -> String {
    value
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
