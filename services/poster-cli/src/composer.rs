//! The poster pipeline.
//!
//! Stages run strictly in order and never loop back:
//!
//! 1. Resolve coordinates (geocoder)
//! 2. Acquire map data (geo cache, fetching on a miss)
//! 3. Draw base layers: water, then parks
//! 4. Draw classified roads
//! 5. Draw gradients: bottom, then top
//! 6. Draw typography
//! 7. Export PNG
//!
//! Nothing is written to the posters directory before stage 7.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Local};
use geodata::{Geocoder, HttpConfig, MapDataSource, NominatimGeocoder, OverpassClient};
use poster_common::{slugify, GeoPoint, MapData, PosterError, PosterResult, Theme};
use renderer::gradient::{Edge, GradientOverlay};
use renderer::png::write_png;
use renderer::typography::{draw_poster_text, FontSet, PosterText};
use renderer::{PosterCanvas, RenderConfig};
use storage::GeoCache;
use tracing::info;

use crate::config::PosterConfig;

/// Default map radius in meters.
pub const DEFAULT_DISTANCE: u32 = 29_000;

/// Default theme identifier.
pub const DEFAULT_THEME: &str = "feature_based";

/// What to draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PosterRequest {
    pub city: String,
    pub country: String,
    /// Theme identifier, used in the output filename.
    pub theme_name: String,
    /// Map radius in meters.
    pub distance: u32,
}

impl PosterRequest {
    pub fn new(
        city: impl Into<String>,
        country: impl Into<String>,
        theme_name: impl Into<String>,
        distance: u32,
    ) -> Self {
        Self {
            city: city.into(),
            country: country.into(),
            theme_name: theme_name.into(),
            distance,
        }
    }

    pub fn validate(&self) -> PosterResult<()> {
        if self.city.trim().is_empty() {
            return Err(PosterError::MissingParameter("city".to_string()));
        }
        if self.country.trim().is_empty() {
            return Err(PosterError::MissingParameter("country".to_string()));
        }
        if self.distance == 0 {
            return Err(PosterError::invalid_parameter(
                "distance",
                "must be a positive number of meters",
            ));
        }
        Ok(())
    }
}

/// `<city_slug>_<theme>_<YYYYmmdd_HHMMSS>.png`
pub fn output_filename(city: &str, theme_name: &str, timestamp: DateTime<Local>) -> String {
    format!(
        "{}_{}_{}.png",
        slugify(city),
        slugify(theme_name),
        timestamp.format("%Y%m%d_%H%M%S")
    )
}

/// Runs the pipeline against a geocoder and map source.
pub struct PosterComposer {
    geocoder: Arc<dyn Geocoder>,
    source: Arc<dyn MapDataSource>,
    cache: GeoCache,
    render: RenderConfig,
    fonts_dir: PathBuf,
    posters_dir: PathBuf,
}

impl PosterComposer {
    pub fn new(
        geocoder: Arc<dyn Geocoder>,
        source: Arc<dyn MapDataSource>,
        config: &PosterConfig,
    ) -> Self {
        Self {
            geocoder,
            source,
            cache: GeoCache::new(&config.cache_dir),
            render: config.render,
            fonts_dir: config.fonts_dir.clone(),
            posters_dir: config.posters_dir.clone(),
        }
    }

    /// Composer backed by the public Nominatim and Overpass services.
    pub fn from_config(config: &PosterConfig) -> PosterResult<Self> {
        let http = HttpConfig::default();
        let geocoder = NominatimGeocoder::new(&config.nominatim_url, &http)?;
        let source = OverpassClient::new(&config.overpass_url, &http)?;
        Ok(Self::new(Arc::new(geocoder), Arc::new(source), config))
    }

    /// Replace the cache, e.g. to change fetch cooldowns.
    pub fn with_cache(mut self, cache: GeoCache) -> Self {
        self.cache = cache;
        self
    }

    pub fn posters_dir(&self) -> &Path {
        &self.posters_dir
    }

    /// Generate one poster and return the path of the written PNG.
    pub async fn generate(&self, request: &PosterRequest, theme: &Theme) -> PosterResult<PathBuf> {
        request.validate()?;
        info!(
            city = %request.city,
            country = %request.country,
            theme = %request.theme_name,
            distance = request.distance,
            "Generating map poster"
        );

        let point = self
            .geocoder
            .locate(&request.city, &request.country)
            .await?;
        info!(lat = point.lat, lon = point.lon, "Coordinates resolved");

        let data = self
            .cache
            .fetch_or_load(
                &request.city,
                &request.country,
                point,
                request.distance,
                self.source.as_ref(),
            )
            .await?;
        info!(
            edges = data.streets.len(),
            water = data.water.as_ref().map(|w| w.len()),
            parks = data.parks.as_ref().map(|p| p.len()),
            "Map data ready"
        );

        let job = RenderJob {
            request: request.clone(),
            theme: theme.clone(),
            point,
            data,
            render: self.render,
            fonts_dir: self.fonts_dir.clone(),
            posters_dir: self.posters_dir.clone(),
        };

        // Rasterizing and encoding are CPU bound
        tokio::task::spawn_blocking(move || job.run())
            .await
            .map_err(|e| PosterError::Internal(format!("render task failed: {}", e)))?
    }
}

/// Everything the blocking render stages need, owned.
struct RenderJob {
    request: PosterRequest,
    theme: Theme,
    point: GeoPoint,
    data: MapData,
    render: RenderConfig,
    fonts_dir: PathBuf,
    posters_dir: PathBuf,
}

impl RenderJob {
    fn run(self) -> PosterResult<PathBuf> {
        let theme = &self.theme;
        info!("Rendering map");
        let mut canvas = PosterCanvas::new(self.render, self.point, f64::from(self.request.distance))?;
        canvas.fill_background(&theme.bg);

        if let Some(water) = &self.data.water {
            let drawn = canvas.draw_polygons(water, &theme.water);
            info!(features = drawn, "Water drawn");
        }
        if let Some(parks) = &self.data.parks {
            let drawn = canvas.draw_polygons(parks, &theme.parks);
            info!(features = drawn, "Parks drawn");
        }

        info!("Applying road hierarchy colors");
        let roads = canvas.draw_roads(&self.data.streets, theme);
        info!(edges = roads, "Roads drawn");

        canvas.draw_gradient(&GradientOverlay::compose(&theme.gradient_color, Edge::Bottom));
        canvas.draw_gradient(&GradientOverlay::compose(&theme.gradient_color, Edge::Top));

        let mut img = canvas.into_rgba_image()?;
        let text = PosterText::new(&self.request.city, &self.request.country, self.point);
        let fonts = FontSet::load(&self.fonts_dir)?;
        draw_poster_text(&mut img, &fonts, &text, theme, &self.render);

        std::fs::create_dir_all(&self.posters_dir).map_err(|e| {
            PosterError::Export(format!("{}: {}", self.posters_dir.display(), e))
        })?;
        let path = self.posters_dir.join(output_filename(
            &self.request.city,
            &self.request.theme_name,
            Local::now(),
        ));

        info!(path = %path.display(), dpi = self.render.dpi, "Saving poster");
        write_png(&path, &img, self.render.dpi)?;
        info!(path = %path.display(), "Poster saved");
        Ok(path)
    }
}
