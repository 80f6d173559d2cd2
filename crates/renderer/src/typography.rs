//! Poster typography.
//!
//! The text block sits in the bottom fifth of the poster:
//!
//! | Element      | Weight  | Size  | Baseline (from bottom) |
//! |--------------|---------|-------|------------------------|
//! | city         | bold    | 60 pt | 0.14                   |
//! | divider      | 1 pt    |       | 0.125                  |
//! | country      | light   | 22 pt | 0.10                   |
//! | coordinates  | regular | 14 pt | 0.07                   |
//! | attribution  | light   | 8 pt  | 0.02 (bottom edge)     |

use std::path::Path;

use image::RgbaImage;
use imageproc::drawing::text_size;
use poster_common::{GeoPoint, PosterError, PosterResult, Theme};
use rusttype::{point, Font, Scale};
use tracing::warn;

use crate::canvas::RenderConfig;

pub const ATTRIBUTION: &str = "© OpenStreetMap contributors";

const BOLD_FILE: &str = "Roboto-Bold.ttf";
const REGULAR_FILE: &str = "Roboto-Regular.ttf";
const LIGHT_FILE: &str = "Roboto-Light.ttf";

/// Embedded font data - DejaVu Sans Mono, set when a bundled weight is missing
const FALLBACK_FONT_DATA: &[u8] = include_bytes!("../assets/DejaVuSansMono.ttf");

/// The three weights used on a poster.
pub struct FontSet {
    pub bold: Font<'static>,
    pub regular: Font<'static>,
    pub light: Font<'static>,
}

impl FontSet {
    /// Load the bundled Roboto weights from `fonts_dir`.
    ///
    /// Each missing or unreadable weight is replaced by the embedded
    /// monospace typeface, so text is always set.
    pub fn load(fonts_dir: &Path) -> PosterResult<Self> {
        let resolve = |file: &str| -> PosterResult<Font<'static>> {
            let path = fonts_dir.join(file);
            match load_font(&path) {
                Ok(font) => Ok(font),
                Err(e) => {
                    warn!(error = %e, "Font missing, using embedded fallback");
                    fallback_font()
                }
            }
        };

        Ok(Self {
            bold: resolve(BOLD_FILE)?,
            regular: resolve(REGULAR_FILE)?,
            light: resolve(LIGHT_FILE)?,
        })
    }

    /// All three weights set in the embedded fallback typeface.
    pub fn embedded() -> PosterResult<Self> {
        Ok(Self {
            bold: fallback_font()?,
            regular: fallback_font()?,
            light: fallback_font()?,
        })
    }
}

fn load_font(path: &Path) -> PosterResult<Font<'static>> {
    let bytes = std::fs::read(path)
        .map_err(|e| PosterError::Font(format!("{}: {}", path.display(), e)))?;
    Font::try_from_vec(bytes)
        .ok_or_else(|| PosterError::Font(format!("{}: not a TrueType font", path.display())))
}

fn fallback_font() -> PosterResult<Font<'static>> {
    Font::try_from_bytes(FALLBACK_FONT_DATA)
        .ok_or_else(|| PosterError::Font("embedded fallback font is unreadable".to_string()))
}

/// Uppercase a city name and separate its letters with two spaces.
pub fn spaced_city(city: &str) -> String {
    city.to_uppercase()
        .chars()
        .map(String::from)
        .collect::<Vec<_>>()
        .join("  ")
}

/// The strings set on a poster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PosterText {
    pub city: String,
    pub country: String,
    pub coordinates: String,
    pub attribution: String,
}

impl PosterText {
    pub fn new(city: &str, country: &str, point: GeoPoint) -> Self {
        Self {
            city: spaced_city(city),
            country: country.to_uppercase(),
            coordinates: point.display_coordinates(),
            attribution: ATTRIBUTION.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Align {
    Center,
    Right,
}

#[derive(Debug, Clone, Copy)]
enum Anchor {
    Baseline,
    Bottom,
}

/// Draw the divider and all text elements in the theme's text color.
pub fn draw_poster_text(
    img: &mut RgbaImage,
    fonts: &FontSet,
    text: &PosterText,
    theme: &Theme,
    config: &RenderConfig,
) {
    let (r, g, b) = theme.text.rgb();
    let rgb = [r, g, b];
    let (w, h) = (config.width as f32, config.height as f32);
    let y_at = |frac: f32| h * (1.0 - frac);

    let lines: [(&Font<'static>, f32, &str, (f32, f32), Align, Anchor, f32); 4] = [
        (&fonts.bold, 60.0, &text.city, (w * 0.5, y_at(0.14)), Align::Center, Anchor::Baseline, 1.0),
        (&fonts.light, 22.0, &text.country, (w * 0.5, y_at(0.10)), Align::Center, Anchor::Baseline, 1.0),
        (&fonts.regular, 14.0, &text.coordinates, (w * 0.5, y_at(0.07)), Align::Center, Anchor::Baseline, 0.7),
        (&fonts.light, 8.0, &text.attribution, (w * 0.98, y_at(0.02)), Align::Right, Anchor::Bottom, 0.5),
    ];

    for (font, size_pt, s, at, align, anchor, alpha) in lines {
        let scale = Scale::uniform(config.pt_to_px(size_pt));
        draw_text(img, font, scale, s, at, align, anchor, rgb, alpha);
    }

    draw_divider(img, theme, config);
}

/// Horizontal rule between the city and country lines.
fn draw_divider(img: &mut RgbaImage, theme: &Theme, config: &RenderConfig) {
    let (r, g, b) = theme.text.rgb();
    let (w, h) = (config.width as f32, config.height as f32);
    let thickness = config.pt_to_px(1.0).max(1.0);
    let center = h * (1.0 - 0.125);

    let x0 = (w * 0.4).round() as i64;
    let x1 = (w * 0.6).round() as i64;
    let y0 = (center - thickness / 2.0).round() as i64;
    let y1 = (center + thickness / 2.0).round() as i64;

    for y in y0..y1.max(y0 + 1) {
        for x in x0..x1 {
            blend(img, x, y, [r, g, b], 1.0);
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_text(
    img: &mut RgbaImage,
    font: &Font<'static>,
    scale: Scale,
    text: &str,
    (x, y): (f32, f32),
    align: Align,
    anchor: Anchor,
    rgb: [u8; 3],
    alpha: f32,
) {
    if text.is_empty() {
        return;
    }

    let (text_width, _) = text_size(scale, font, text);
    let left = match align {
        Align::Center => x - text_width as f32 / 2.0,
        Align::Right => x - text_width as f32,
    };
    let baseline = match anchor {
        Anchor::Baseline => y,
        // descent is negative
        Anchor::Bottom => y + font.v_metrics(scale).descent,
    };

    for glyph in font.layout(text, scale, point(left, baseline)) {
        if let Some(bb) = glyph.pixel_bounding_box() {
            glyph.draw(|gx, gy, coverage| {
                blend(
                    img,
                    i64::from(bb.min.x) + i64::from(gx),
                    i64::from(bb.min.y) + i64::from(gy),
                    rgb,
                    coverage * alpha,
                );
            });
        }
    }
}

/// Source-over blend of `rgb` at `alpha` onto one pixel; out-of-bounds is a no-op.
fn blend(img: &mut RgbaImage, x: i64, y: i64, rgb: [u8; 3], alpha: f32) {
    if x < 0 || y < 0 || x >= i64::from(img.width()) || y >= i64::from(img.height()) {
        return;
    }
    let a = alpha.clamp(0.0, 1.0);
    if a <= 0.0 {
        return;
    }

    let px = img.get_pixel_mut(x as u32, y as u32);
    let dst_a = px.0[3] as f32 / 255.0;
    let out_a = a + dst_a * (1.0 - a);
    if out_a <= 0.0 {
        return;
    }
    for c in 0..3 {
        let src = rgb[c] as f32;
        let dst = px.0[c] as f32;
        px.0[c] = ((src * a + dst * dst_a * (1.0 - a)) / out_a).round() as u8;
    }
    px.0[3] = (out_a * 255.0).round() as u8;
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_spaced_city() {
        assert_eq!(spaced_city("Paris"), "P  A  R  I  S");
        assert_eq!(spaced_city("new york"), "N  E  W     Y  O  R  K");
        assert_eq!(spaced_city(""), "");
    }

    #[test]
    fn test_poster_text() {
        let text = PosterText::new("Tokyo", "Japan", GeoPoint::new(35.6762, 139.6503));
        assert_eq!(text.city, "T  O  K  Y  O");
        assert_eq!(text.country, "JAPAN");
        assert_eq!(text.coordinates, "35.6762° N / 139.6503° E");
        assert_eq!(text.attribution, ATTRIBUTION);
    }

    #[test]
    fn test_blend_opaque_and_half() {
        let mut img = RgbaImage::from_pixel(2, 1, Rgba([255, 255, 255, 255]));
        blend(&mut img, 0, 0, [0, 0, 0], 1.0);
        blend(&mut img, 1, 0, [0, 0, 0], 0.5);
        blend(&mut img, 5, 5, [0, 0, 0], 1.0);
        assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0, 255]);
        assert_eq!(img.get_pixel(1, 0).0, [128, 128, 128, 255]);
    }

    #[test]
    fn test_divider_drawn_in_text_color() {
        let config = RenderConfig {
            width: 100,
            height: 200,
            dpi: 72.0,
        };
        let mut img = RgbaImage::from_pixel(100, 200, Rgba([255, 255, 255, 255]));
        draw_divider(&mut img, &Theme::feature_based(), &config);
        // 0.125 from the bottom of 200 px
        assert_eq!(img.get_pixel(50, 175).0, [0, 0, 0, 255]);
        assert_eq!(img.get_pixel(10, 175).0, [255, 255, 255, 255]);
    }

    #[test]
    fn test_missing_fonts_fall_back_to_embedded() {
        let tmp = tempfile::tempdir().unwrap();
        let fonts = FontSet::load(tmp.path()).unwrap();
        let scale = Scale::uniform(20.0);
        assert!(text_size(scale, &fonts.bold, "PARIS").0 > 0);
        assert!(text_size(scale, &fonts.light, "FRANCE").0 > 0);
    }

    #[test]
    fn test_unreadable_font_file_falls_back() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join(BOLD_FILE), b"not a font").unwrap();
        assert!(FontSet::load(tmp.path()).is_ok());
    }
}
