//! Local persistence for the poster pipeline.
//!
//! Provides:
//! - Theme store: a directory of JSON theme files
//! - Geo cache: fetched map data on disk, keyed by city/country/radius

pub mod geo_cache;
pub mod theme_store;

pub use geo_cache::{CacheKey, FetchCooldowns, GeoCache, CACHE_SCHEMA_VERSION};
pub use theme_store::{Overwrite, ThemeStore, ThemeSummary};
