//! Edge fade overlays.
//!
//! A gradient is a column of 256 horizontal bands in a single color whose
//! alpha ramps linearly across a quarter of the canvas height, fully opaque
//! at the canvas edge and fully transparent toward the center.

use poster_common::HexColor;
use tiny_skia::{Paint, Pixmap, Rect, Transform};

/// Number of alpha steps in one overlay.
pub const GRADIENT_STEPS: usize = 256;

/// Fraction of the canvas height covered by one overlay.
pub const EXTENT_FRACTION: f32 = 0.25;

/// Canvas edge an overlay is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Bottom,
    Top,
}

/// A single-color overlay with a linear alpha ramp.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientOverlay {
    rgb: (u8, u8, u8),
    edge: Edge,
    alphas: Vec<f32>,
}

impl GradientOverlay {
    /// Build an overlay in `base` color anchored at `edge`.
    ///
    /// Alpha steps are ordered bottom to top: `Bottom` runs 1 → 0 and `Top`
    /// runs 0 → 1. Endpoints are exactly 0 and 1.
    pub fn compose(base: &HexColor, edge: Edge) -> Self {
        let last = (GRADIENT_STEPS - 1) as f32;
        let alphas = (0..GRADIENT_STEPS)
            .map(|i| {
                let t = i as f32 / last;
                match edge {
                    Edge::Bottom => 1.0 - t,
                    Edge::Top => t,
                }
            })
            .collect();

        Self {
            rgb: base.rgb(),
            edge,
            alphas,
        }
    }

    pub fn edge(&self) -> Edge {
        self.edge
    }

    pub fn rgb(&self) -> (u8, u8, u8) {
        self.rgb
    }

    /// Alpha per band, bottom band first.
    pub fn alpha_steps(&self) -> &[f32] {
        &self.alphas
    }

    /// Vertical pixel span `(top, bottom)` in canvas coordinates (y down).
    pub fn extent(&self, canvas_height: u32) -> (f32, f32) {
        let h = canvas_height as f32;
        let band = h * EXTENT_FRACTION;
        match self.edge {
            Edge::Bottom => (h - band, h),
            Edge::Top => (0.0, band),
        }
    }

    /// Paint the overlay across the full canvas width.
    pub fn draw(&self, pixmap: &mut Pixmap) {
        let width = pixmap.width() as f32;
        let (top, bottom) = self.extent(pixmap.height());
        let band_height = (bottom - top) / GRADIENT_STEPS as f32;
        let (r, g, b) = self.rgb;

        let mut paint = Paint::default();
        // Bands must tile without seams
        paint.anti_alias = false;

        for (i, alpha) in self.alphas.iter().enumerate() {
            let a = (alpha * 255.0).round() as u8;
            if a == 0 {
                continue;
            }
            let y1 = bottom - i as f32 * band_height;
            let y0 = y1 - band_height;
            let Some(rect) = Rect::from_ltrb(0.0, y0, width, y1) else {
                continue;
            };
            paint.set_color_rgba8(r, g, b, a);
            pixmap.fill_rect(rect, &paint, Transform::identity(), None);
        }
    }
}
