//! Overpass API client.

use async_trait::async_trait;
use poster_common::{
    BoundingBox, FeatureCollection, GeoPoint, PosterError, PosterResult, StreetGraph,
};
use reqwest::Client;
use tracing::{debug, info, instrument};

use crate::client::HttpConfig;
use crate::parse::{parse_polygons, parse_streets};
use crate::MapDataSource;

/// Public Overpass endpoint.
pub const DEFAULT_OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";

/// Server-side query timeout in seconds.
const QUERY_TIMEOUT_SECS: u32 = 180;

/// Tag filters for the water layer.
pub const WATER_TAGS: &[(&str, &str)] = &[("natural", "water"), ("waterway", "riverbank")];

/// Tag filters for the park layer.
pub const PARK_TAGS: &[(&str, &str)] = &[("leisure", "park"), ("landuse", "grass")];

/// Overpass QL for every highway way inside the box.
pub fn streets_query(bbox: &BoundingBox) -> String {
    format!(
        "[out:json][timeout:{}];way[\"highway\"][\"area\"!=\"yes\"]({});out geom;",
        QUERY_TIMEOUT_SECS,
        bbox.to_overpass()
    )
}

/// Overpass QL for ways and multipolygon relations matching any of `tags`.
pub fn features_query(tags: &[(&str, &str)], bbox: &BoundingBox) -> String {
    let area = bbox.to_overpass();
    let mut query = format!("[out:json][timeout:{}];(", QUERY_TIMEOUT_SECS);
    for (key, value) in tags {
        query.push_str(&format!("way[\"{}\"=\"{}\"]({});", key, value, area));
        query.push_str(&format!("relation[\"{}\"=\"{}\"]({});", key, value, area));
    }
    query.push_str(");out geom;");
    query
}

/// Map data source backed by an Overpass interpreter endpoint.
pub struct OverpassClient {
    client: Client,
    url: String,
}

impl OverpassClient {
    pub fn new(url: impl Into<String>, http: &HttpConfig) -> PosterResult<Self> {
        Ok(Self {
            client: http.build_client()?,
            url: url.into(),
        })
    }

    async fn request(&self, query: String, layer: &str) -> PosterResult<String> {
        debug!(layer, query = %query, "Sending Overpass query");
        let response = self
            .client
            .post(&self.url)
            .form(&[("data", query)])
            .send()
            .await
            .map_err(|e| PosterError::fetch(layer, format!("request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PosterError::fetch(layer, format!("response read failed: {}", e)))?;

        if !status.is_success() {
            let snippet: String = body.chars().take(256).collect();
            return Err(PosterError::fetch(
                layer,
                format!("HTTP {}: {}", status, snippet),
            ));
        }
        Ok(body)
    }
}

#[async_trait]
impl MapDataSource for OverpassClient {
    #[instrument(skip(self))]
    async fn fetch_streets(&self, center: GeoPoint, dist_m: u32) -> PosterResult<StreetGraph> {
        let bbox = BoundingBox::around(center, f64::from(dist_m));
        let body = self.request(streets_query(&bbox), "street network").await?;
        let graph = parse_streets(&body)?;
        info!(edges = graph.len(), "Street network downloaded");
        Ok(graph)
    }

    #[instrument(skip(self))]
    async fn fetch_water(&self, center: GeoPoint, dist_m: u32) -> PosterResult<FeatureCollection> {
        let bbox = BoundingBox::around(center, f64::from(dist_m));
        let body = self
            .request(features_query(WATER_TAGS, &bbox), "water features")
            .await?;
        let water = parse_polygons(&body, "water features")?;
        info!(features = water.len(), "Water features downloaded");
        Ok(water)
    }

    #[instrument(skip(self))]
    async fn fetch_parks(&self, center: GeoPoint, dist_m: u32) -> PosterResult<FeatureCollection> {
        let bbox = BoundingBox::around(center, f64::from(dist_m));
        let body = self
            .request(features_query(PARK_TAGS, &bbox), "parks")
            .await?;
        let parks = parse_polygons(&body, "parks")?;
        info!(features = parks.len(), "Park features downloaded");
        Ok(parks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_streets_query() {
        let bbox = BoundingBox::new(2.0, 48.0, 3.0, 49.0);
        let query = streets_query(&bbox);
        assert!(query.starts_with("[out:json][timeout:180];"));
        assert!(query.contains("way[\"highway\"]"));
        assert!(query.contains("(48.000000,2.000000,49.000000,3.000000)"));
        assert!(query.ends_with("out geom;"));
    }

    #[test]
    fn test_features_query_covers_ways_and_relations() {
        let bbox = BoundingBox::new(2.0, 48.0, 3.0, 49.0);
        let query = features_query(WATER_TAGS, &bbox);
        assert!(query.contains("way[\"natural\"=\"water\"]"));
        assert!(query.contains("relation[\"natural\"=\"water\"]"));
        assert!(query.contains("way[\"waterway\"=\"riverbank\"]"));
        assert!(query.contains("relation[\"waterway\"=\"riverbank\"]"));
    }
}
