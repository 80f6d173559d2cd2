//! On-disk cache of fetched map data.
//!
//! Entries are gzip-compressed JSON records under `<dir>/<key>.json.gz`.
//! A record carries a schema version; anything that fails to decode, or was
//! written by a different schema, is treated as a miss and re-fetched.

use std::fmt;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use geodata::MapDataSource;
use poster_common::{slugify, GeoPoint, MapData, PosterError, PosterResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Bumped whenever `MapData` changes shape.
pub const CACHE_SCHEMA_VERSION: u32 = 1;

const CACHE_EXTENSION: &str = "json.gz";

/// Identifies one cached fetch: `<city>_<country>_<radius>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    city: String,
    country: String,
    radius: u32,
}

impl CacheKey {
    pub fn new(city: &str, country: &str, radius: u32) -> Self {
        Self {
            city: slugify(city),
            country: slugify(country),
            radius,
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.{}", self, CACHE_EXTENSION)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_{}", self.city, self.country, self.radius)
    }
}

/// Pauses between consecutive layer requests to the map service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchCooldowns {
    pub after_streets: Duration,
    pub after_water: Duration,
}

impl Default for FetchCooldowns {
    fn default() -> Self {
        Self {
            after_streets: Duration::from_millis(500),
            after_water: Duration::from_millis(300),
        }
    }
}

impl FetchCooldowns {
    pub fn none() -> Self {
        Self {
            after_streets: Duration::ZERO,
            after_water: Duration::ZERO,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct CacheRecord {
    schema_version: u32,
    key: String,
    created_at: DateTime<Utc>,
    data: MapData,
}

/// Map data cache backed by a directory.
#[derive(Debug, Clone)]
pub struct GeoCache {
    dir: PathBuf,
    cooldowns: FetchCooldowns,
}

impl GeoCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cooldowns: FetchCooldowns::default(),
        }
    }

    pub fn with_cooldowns(mut self, cooldowns: FetchCooldowns) -> Self {
        self.cooldowns = cooldowns;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &CacheKey) -> PathBuf {
        self.dir.join(key.file_name())
    }

    /// Read a cached entry.
    ///
    /// `Ok(None)` when nothing is stored under `key`; `CacheCorrupt` when the
    /// file exists but cannot be decoded.
    pub async fn load(&self, key: &CacheKey) -> PosterResult<Option<MapData>> {
        let path = self.path_for(key);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(PosterError::CacheCorrupt(format!("{}: {}", key, e))),
        };

        let record = decode_record(&bytes)
            .map_err(|e| PosterError::CacheCorrupt(format!("{}: {}", key, e)))?;
        if record.schema_version != CACHE_SCHEMA_VERSION {
            return Err(PosterError::CacheCorrupt(format!(
                "{}: schema version {} (expected {})",
                key, record.schema_version, CACHE_SCHEMA_VERSION
            )));
        }

        debug!(key = %key, created_at = %record.created_at, "Cache hit");
        Ok(Some(record.data))
    }

    /// Write an entry, replacing whatever was stored under `key`.
    ///
    /// The record is written to a sibling file and renamed into place so a
    /// reader never observes a partial entry.
    pub async fn store(&self, key: &CacheKey, data: &MapData) -> PosterResult<()> {
        let what = format!("cache entry '{}'", key);
        let record = CacheRecord {
            schema_version: CACHE_SCHEMA_VERSION,
            key: key.to_string(),
            created_at: Utc::now(),
            data: data.clone(),
        };
        let bytes = encode_record(&record).map_err(|e| PosterError::persistence(&what, e))?;

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| PosterError::persistence(&what, e))?;

        let path = self.path_for(key);
        let partial = path.with_extension("gz.partial");
        tokio::fs::write(&partial, &bytes)
            .await
            .map_err(|e| PosterError::persistence(&what, e))?;
        tokio::fs::rename(&partial, &path)
            .await
            .map_err(|e| PosterError::persistence(&what, e))?;

        debug!(key = %key, bytes = bytes.len(), "Cache entry written");
        Ok(())
    }

    /// Return cached map data for the area, fetching and storing it on a miss.
    ///
    /// Layers are fetched one at a time: streets, then water, then parks,
    /// pausing between requests. A water or parks failure leaves that layer
    /// empty; a street failure aborts. Failing to write the cache is only
    /// logged.
    pub async fn fetch_or_load(
        &self,
        city: &str,
        country: &str,
        point: GeoPoint,
        radius: u32,
        source: &dyn MapDataSource,
    ) -> PosterResult<MapData> {
        let key = CacheKey::new(city, country, radius);

        match self.load(&key).await {
            Ok(Some(data)) => {
                info!(key = %key, "Using cached map data");
                return Ok(data);
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Ignoring unreadable cache entry"),
        }

        info!(key = %key, "Cache miss, downloading map data");
        let data = self.fetch_layers(point, radius, source).await?;

        if let Err(e) = self.store(&key, &data).await {
            warn!(error = %e, "Could not cache map data");
        }

        Ok(data)
    }

    async fn fetch_layers(
        &self,
        point: GeoPoint,
        radius: u32,
        source: &dyn MapDataSource,
    ) -> PosterResult<MapData> {
        info!("[1/3] Downloading street network");
        let streets = source.fetch_streets(point, radius).await?;
        tokio::time::sleep(self.cooldowns.after_streets).await;

        info!("[2/3] Downloading water features");
        let water = match source.fetch_water(point, radius).await {
            Ok(water) => Some(water),
            Err(e) => {
                warn!(error = %e, "Water layer unavailable, continuing without it");
                None
            }
        };
        tokio::time::sleep(self.cooldowns.after_water).await;

        info!("[3/3] Downloading parks and green spaces");
        let parks = match source.fetch_parks(point, radius).await {
            Ok(parks) => Some(parks),
            Err(e) => {
                warn!(error = %e, "Parks layer unavailable, continuing without it");
                None
            }
        };

        Ok(MapData {
            streets,
            water,
            parks,
        })
    }
}

fn encode_record(record: &CacheRecord) -> std::io::Result<Vec<u8>> {
    let json = serde_json::to_vec(record)?;
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&json)?;
    encoder.finish()
}

fn decode_record(bytes: &[u8]) -> std::io::Result<CacheRecord> {
    let mut json = Vec::new();
    GzDecoder::new(bytes).read_to_end(&mut json)?;
    Ok(serde_json::from_slice(&json)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_format() {
        let key = CacheKey::new("New York", "USA", 29000);
        assert_eq!(key.to_string(), "new_york_usa_29000");
        assert_eq!(key.file_name(), "new_york_usa_29000.json.gz");
    }

    #[test]
    fn test_cache_key_distinguishes_radius() {
        assert_ne!(
            CacheKey::new("Paris", "France", 10000),
            CacheKey::new("Paris", "France", 12000)
        );
    }

    #[test]
    fn test_record_round_trip() {
        let record = CacheRecord {
            schema_version: CACHE_SCHEMA_VERSION,
            key: "a_b_1".into(),
            created_at: Utc::now(),
            data: MapData::default(),
        };
        let bytes = encode_record(&record).unwrap();
        assert_eq!(&bytes[..2], &[0x1f, 0x8b]);
        let decoded = decode_record(&bytes).unwrap();
        assert_eq!(decoded.key, "a_b_1");
        assert_eq!(decoded.data, MapData::default());
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(decode_record(b"not gzip at all").is_err());
    }

    #[test]
    fn test_default_cooldowns() {
        let c = FetchCooldowns::default();
        assert_eq!(c.after_streets, Duration::from_millis(500));
        assert_eq!(c.after_water, Duration::from_millis(300));
    }
}
