//! Tests for drawing map layers and exporting the poster raster.

use poster_common::{FeatureCollection, GeoPoint, Theme};
use renderer::gradient::{Edge, GradientOverlay};
use renderer::png::write_png;
use renderer::{PosterCanvas, RenderConfig};
use test_utils::{minimal_motorway_graph, places, sample_map_data, square_feature};

fn config() -> RenderConfig {
    RenderConfig {
        width: 120,
        height: 160,
        dpi: 72.0,
    }
}

fn rgb_at(img: &image::RgbaImage, x: u32, y: u32) -> [u8; 3] {
    let p = img.get_pixel(x, y).0;
    [p[0], p[1], p[2]]
}

// ============================================================================
// Layers
// ============================================================================

#[test]
fn test_motorway_crosses_center() {
    let theme = Theme::feature_based();
    // 1.2 pt at 720 dpi is a 12 px stroke
    let wide = RenderConfig {
        dpi: 720.0,
        ..config()
    };
    let mut canvas = PosterCanvas::new(wide, places::TESTVILLE, 1000.0).unwrap();
    canvas.fill_background(&theme.bg);

    let drawn = canvas.draw_roads(&minimal_motorway_graph(places::TESTVILLE), &theme);
    assert_eq!(drawn, 1);

    let img = canvas.into_rgba_image().unwrap();
    // The edge runs east-west through the center
    assert_eq!(rgb_at(&img, 60, 80), [0x0A, 0x0A, 0x0A]);
    // Far from the road stays background
    assert_eq!(rgb_at(&img, 60, 10), [0xFF, 0xFF, 0xFF]);
}

#[test]
fn test_polygon_filled_in_layer_color() {
    let theme = Theme::feature_based();
    let mut canvas = PosterCanvas::new(config(), places::PARIS, 1000.0).unwrap();
    canvas.fill_background(&theme.bg);

    let water = FeatureCollection::new(vec![square_feature(1, places::PARIS, 0.002)]);
    assert_eq!(canvas.draw_polygons(&water, &theme.water), 1);

    let img = canvas.into_rgba_image().unwrap();
    assert_eq!(rgb_at(&img, 60, 80), [0xC0, 0xC0, 0xC0]);
}

#[test]
fn test_polygon_hole_left_unfilled() {
    let theme = Theme::feature_based();
    let mut canvas = PosterCanvas::new(config(), places::PARIS, 1000.0).unwrap();
    canvas.fill_background(&theme.bg);

    let outer = square_feature(1, places::PARIS, 0.004);
    let hole = square_feature(2, places::PARIS, 0.001);
    let lake = poster_common::PolygonFeature {
        id: 1,
        rings: vec![outer.rings[0].clone(), hole.rings[0].clone()],
    };
    canvas.draw_polygons(&FeatureCollection::new(vec![lake]), &theme.water);

    let img = canvas.into_rgba_image().unwrap();
    assert_eq!(rgb_at(&img, 60, 80), [0xFF, 0xFF, 0xFF]);
}

#[test]
fn test_degenerate_geometry_skipped() {
    let theme = Theme::feature_based();
    let mut canvas = PosterCanvas::new(config(), places::PARIS, 1000.0).unwrap();
    let sliver = poster_common::PolygonFeature {
        id: 9,
        rings: vec![vec![places::PARIS, places::PARIS]],
    };
    assert_eq!(
        canvas.draw_polygons(&FeatureCollection::new(vec![sliver]), &theme.water),
        0
    );
}

#[test]
fn test_all_road_tiers_drawn() {
    let theme = Theme::feature_based();
    let mut canvas = PosterCanvas::new(config(), places::PARIS, 1000.0).unwrap();
    let data = sample_map_data(places::PARIS);
    assert_eq!(canvas.draw_roads(&data.streets, &theme), 6);
}

// ============================================================================
// Gradients and export
// ============================================================================

#[test]
fn test_gradients_fade_edges_to_color() {
    let theme = Theme::feature_based();
    let mut canvas = PosterCanvas::new(config(), places::PARIS, 1000.0).unwrap();
    canvas.fill_background(&poster_common::HexColor::parse("#000000").unwrap());
    canvas.draw_gradient(&GradientOverlay::compose(&theme.gradient_color, Edge::Bottom));
    canvas.draw_gradient(&GradientOverlay::compose(&theme.gradient_color, Edge::Top));

    let img = canvas.into_rgba_image().unwrap();
    // Nearly opaque at both edges, untouched in the middle
    assert!(rgb_at(&img, 5, 159).iter().all(|c| *c > 240));
    assert!(rgb_at(&img, 5, 0).iter().all(|c| *c > 240));
    assert!(rgb_at(&img, 5, 100).iter().all(|c| *c < 20));
    assert_eq!(rgb_at(&img, 5, 80), [0, 0, 0]);
}

#[test]
fn test_write_png_file() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("poster.png");

    let mut canvas = PosterCanvas::new(config(), GeoPoint::new(0.0, 0.0), 500.0).unwrap();
    canvas.fill_background(&Theme::feature_based().bg);
    let img = canvas.into_rgba_image().unwrap();
    write_png(&path, &img, 72.0).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[..8], &[137, 80, 78, 71, 13, 10, 26, 10]);
    let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (120, 160));
    assert_eq!(decoded.get_pixel(0, 0).0, [255, 255, 255, 255]);
}
