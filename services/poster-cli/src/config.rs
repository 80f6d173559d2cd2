//! Runtime configuration for the poster generator.
//!
//! Defaults match the directory layout of a checkout (`themes/`, `fonts/`,
//! `posters/`, `cache/` next to the working directory). Environment variables
//! override defaults; command-line flags override both.

use std::path::PathBuf;

use geodata::nominatim::DEFAULT_NOMINATIM_URL;
use geodata::overpass::DEFAULT_OVERPASS_URL;
use renderer::RenderConfig;

/// Configuration for the poster generator.
#[derive(Debug, Clone)]
pub struct PosterConfig {
    /// Directory of `<id>.json` theme files.
    pub themes_dir: PathBuf,

    /// Where finished posters are written.
    pub posters_dir: PathBuf,

    /// Map data cache directory.
    pub cache_dir: PathBuf,

    /// Directory holding the Roboto font files.
    pub fonts_dir: PathBuf,

    /// Nominatim base URL.
    pub nominatim_url: String,

    /// Overpass interpreter endpoint.
    pub overpass_url: String,

    /// Output raster size and resolution.
    pub render: RenderConfig,
}

impl Default for PosterConfig {
    fn default() -> Self {
        Self {
            themes_dir: PathBuf::from("themes"),
            posters_dir: PathBuf::from("posters"),
            cache_dir: PathBuf::from("cache"),
            fonts_dir: PathBuf::from("fonts"),
            nominatim_url: DEFAULT_NOMINATIM_URL.to_string(),
            overpass_url: DEFAULT_OVERPASS_URL.to_string(),
            render: RenderConfig::default(),
        }
    }
}

impl PosterConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("THEMES_DIR") {
            config.themes_dir = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var("POSTERS_DIR") {
            config.posters_dir = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var("CACHE_DIR") {
            config.cache_dir = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var("FONTS_DIR") {
            config.fonts_dir = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var("NOMINATIM_URL") {
            config.nominatim_url = val;
        }

        if let Ok(val) = std::env::var("OVERPASS_URL") {
            config.overpass_url = val;
        }

        if let Ok(val) = std::env::var("POSTER_WIDTH") {
            if let Ok(width) = val.parse() {
                config.render.width = width;
            }
        }

        if let Ok(val) = std::env::var("POSTER_HEIGHT") {
            if let Ok(height) = val.parse() {
                config.render.height = height;
            }
        }

        if let Ok(val) = std::env::var("POSTER_DPI") {
            if let Ok(dpi) = val.parse() {
                config.render.dpi = dpi;
            }
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        self.render.validate().map_err(|e| e.to_string())?;

        if self.nominatim_url.is_empty() {
            return Err("nominatim_url must not be empty".to_string());
        }

        if self.overpass_url.is_empty() {
            return Err("overpass_url must not be empty".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PosterConfig::default();
        assert_eq!(config.themes_dir, PathBuf::from("themes"));
        assert_eq!(config.posters_dir, PathBuf::from("posters"));
        assert_eq!(config.render.width, 3600);
        assert_eq!(config.render.height, 4800);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_width() {
        let mut config = PosterConfig::default();
        config.render.width = 0;
        assert!(config.validate().is_err());
    }
}
