//! Raster canvas for the geographic layers.
//!
//! Map layers are drawn with tiny-skia in projected pixel space. Once the
//! geographic stages are done the canvas is converted to an `RgbaImage` for
//! typography and export.

use image::RgbaImage;
use poster_common::{
    FeatureCollection, GeoPoint, HexColor, LocalProjection, PosterError, PosterResult,
    StreetGraph, Theme,
};
use rayon::prelude::*;
use tiny_skia::{
    Color, FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform,
};
use tracing::debug;

use crate::gradient::GradientOverlay;
use crate::roads::{classify, pt_to_px, road_style, RoadClass};

/// Output raster size and resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    pub dpi: f32,
}

impl Default for RenderConfig {
    /// 12 × 16 inches at 300 dpi.
    fn default() -> Self {
        Self {
            width: 3600,
            height: 4800,
            dpi: 300.0,
        }
    }
}

impl RenderConfig {
    pub fn pt_to_px(&self, pt: f32) -> f32 {
        pt_to_px(pt, self.dpi)
    }

    pub fn validate(&self) -> PosterResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(PosterError::invalid_parameter(
                "canvas size",
                format!("{}x{} has no pixels", self.width, self.height),
            ));
        }
        if !(self.dpi.is_finite() && self.dpi > 0.0) {
            return Err(PosterError::invalid_parameter(
                "dpi",
                format!("{} must be positive", self.dpi),
            ));
        }
        Ok(())
    }
}

/// Poster canvas centered on a coordinate.
pub struct PosterCanvas {
    pixmap: Pixmap,
    config: RenderConfig,
    projection: LocalProjection,
}

impl PosterCanvas {
    /// Create a canvas covering `dist_m` meters around `center`.
    pub fn new(config: RenderConfig, center: GeoPoint, dist_m: f64) -> PosterResult<Self> {
        config.validate()?;
        let pixmap = Pixmap::new(config.width, config.height).ok_or_else(|| {
            PosterError::Render(format!(
                "cannot allocate {}x{} canvas",
                config.width, config.height
            ))
        })?;
        let projection = LocalProjection::new(center, dist_m, config.width, config.height);

        Ok(Self {
            pixmap,
            config,
            projection,
        })
    }

    pub fn fill_background(&mut self, color: &HexColor) {
        let [r, g, b, a] = color.rgba();
        self.pixmap.fill(Color::from_rgba8(r, g, b, a));
    }

    /// Fill every feature with the even-odd rule. Returns the number drawn.
    pub fn draw_polygons(&mut self, features: &FeatureCollection, color: &HexColor) -> usize {
        let [r, g, b, a] = color.rgba();
        let mut paint = Paint::default();
        paint.set_color_rgba8(r, g, b, a);
        paint.anti_alias = true;

        let mut drawn = 0;
        for feature in &features.features {
            let mut pb = PathBuilder::new();
            for ring in &feature.rings {
                if ring.len() < 3 {
                    continue;
                }
                let (x, y) = self.projection.project(ring[0]);
                pb.move_to(x, y);
                for point in &ring[1..] {
                    let (x, y) = self.projection.project(*point);
                    pb.line_to(x, y);
                }
                pb.close();
            }

            if let Some(path) = pb.finish() {
                self.pixmap
                    .fill_path(&path, &paint, FillRule::EvenOdd, Transform::identity(), None);
                drawn += 1;
            }
        }
        drawn
    }

    /// Stroke the street network, one pass per tier from lowest to highest.
    ///
    /// Returns the number of edges drawn.
    pub fn draw_roads(&mut self, streets: &StreetGraph, theme: &Theme) -> usize {
        let mut drawn = 0;

        for class in RoadClass::ALL {
            let style = road_style(class, theme, self.config.dpi);
            let mut pb = PathBuilder::new();
            let mut edges = 0;

            for edge in streets
                .edges
                .iter()
                .filter(|e| e.points.len() >= 2 && classify(&e.highway) == class)
            {
                let (x, y) = self.projection.project(edge.points[0]);
                pb.move_to(x, y);
                for point in &edge.points[1..] {
                    let (x, y) = self.projection.project(*point);
                    pb.line_to(x, y);
                }
                edges += 1;
            }

            let Some(path) = pb.finish() else {
                continue;
            };

            let [r, g, b, a] = style.rgba;
            let mut paint = Paint::default();
            paint.set_color_rgba8(r, g, b, a);
            paint.anti_alias = true;

            let mut stroke = Stroke::default();
            stroke.width = style.width_px;
            stroke.line_cap = LineCap::Round;
            stroke.line_join = LineJoin::Round;

            self.pixmap
                .stroke_path(&path, &paint, &stroke, Transform::identity(), None);
            debug!(class = ?class, edges, width_px = style.width_px, "Roads drawn");
            drawn += edges;
        }
        drawn
    }

    pub fn draw_gradient(&mut self, overlay: &GradientOverlay) {
        overlay.draw(&mut self.pixmap);
    }

    /// Straight (non-premultiplied) RGBA copy of the canvas.
    pub fn into_rgba_image(self) -> PosterResult<RgbaImage> {
        let (width, height) = (self.pixmap.width(), self.pixmap.height());
        let data: Vec<u8> = self
            .pixmap
            .pixels()
            .par_iter()
            .flat_map_iter(|p| {
                let c = p.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect();

        RgbaImage::from_raw(width, height, data)
            .ok_or_else(|| PosterError::Render("canvas buffer size mismatch".to_string()))
    }
}
