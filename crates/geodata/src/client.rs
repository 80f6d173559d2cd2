//! Shared HTTP client construction.

use std::time::Duration;

use poster_common::{PosterError, PosterResult};
use reqwest::Client;

/// Default User-Agent sent to OpenStreetMap services, which require one.
pub const DEFAULT_USER_AGENT: &str = "city_map_poster";

/// Configuration for HTTP clients talking to OSM services.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// User-Agent header value
    pub user_agent: String,
    /// HTTP request timeout
    pub request_timeout: Duration,
    /// TCP connect timeout
    pub connect_timeout: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            // Overpass queries for large radii can legitimately take minutes
            request_timeout: Duration::from_secs(180),
            connect_timeout: Duration::from_secs(30),
        }
    }
}

impl HttpConfig {
    /// Build a reqwest client from this configuration.
    pub fn build_client(&self) -> PosterResult<Client> {
        Client::builder()
            .user_agent(&self.user_agent)
            .timeout(self.request_timeout)
            .connect_timeout(self.connect_timeout)
            .tcp_nodelay(true)
            .build()
            .map_err(|e| PosterError::Internal(format!("Failed to create HTTP client: {}", e)))
    }
}
