//! Nominatim geocoder.

use std::time::Duration;

use async_trait::async_trait;
use poster_common::{GeoPoint, PosterError, PosterResult};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, instrument};

use crate::client::HttpConfig;
use crate::Geocoder;

/// Public Nominatim endpoint.
pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

/// One entry of a Nominatim `/search?format=json` response.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResult {
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub display_name: String,
}

/// Geocoder backed by the Nominatim search API.
pub struct NominatimGeocoder {
    client: Client,
    base_url: String,
    /// Pause before each request, per the Nominatim usage policy (max 1 req/s)
    courtesy_delay: Duration,
}

impl NominatimGeocoder {
    pub fn new(base_url: impl Into<String>, http: &HttpConfig) -> PosterResult<Self> {
        Ok(Self {
            client: http.build_client()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            courtesy_delay: Duration::from_secs(1),
        })
    }

    pub fn with_courtesy_delay(mut self, delay: Duration) -> Self {
        self.courtesy_delay = delay;
        self
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    #[instrument(skip(self))]
    async fn locate(&self, city: &str, country: &str) -> PosterResult<GeoPoint> {
        info!("Looking up coordinates");
        tokio::time::sleep(self.courtesy_delay).await;

        let query = format!("{}, {}", city, country);
        let url = format!("{}/search", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("q", query.as_str()), ("format", "json"), ("limit", "1")])
            .send()
            .await
            .map_err(|e| PosterError::fetch("coordinates", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PosterError::fetch(
                "coordinates",
                format!("geocoder returned HTTP {}", status),
            ));
        }

        let body = response
            .text()
            .await
            .map_err(|e| PosterError::fetch("coordinates", e))?;
        debug!(bytes = body.len(), "Geocoder response received");

        let place = parse_search_response(&body)?
            .ok_or_else(|| PosterError::CoordinatesNotFound {
                city: city.to_string(),
                country: country.to_string(),
            })?;

        info!(address = %place.1, lat = place.0.lat, lon = place.0.lon, "Found location");
        Ok(place.0)
    }
}

/// Parse a search response into the first match and its display name.
///
/// Returns `Ok(None)` for an empty result list.
pub fn parse_search_response(body: &str) -> PosterResult<Option<(GeoPoint, String)>> {
    let results: Vec<SearchResult> = serde_json::from_str(body)
        .map_err(|e| PosterError::fetch("coordinates", format!("invalid geocoder JSON: {}", e)))?;

    let Some(first) = results.into_iter().next() else {
        return Ok(None);
    };

    let parse = |value: &str, axis: &str| {
        value.parse::<f64>().map_err(|_| {
            PosterError::fetch("coordinates", format!("invalid {} '{}'", axis, value))
        })
    };
    let point = GeoPoint::new(parse(&first.lat, "latitude")?, parse(&first.lon, "longitude")?);
    Ok(Some((point, first.display_name)))
}
