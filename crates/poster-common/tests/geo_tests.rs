//! Tests for geographic helpers used to frame a poster.

use poster_common::geo::{BoundingBox, GeoPoint, LocalProjection, METERS_PER_DEGREE};
use test_utils::assert_approx_eq;

// ============================================================================
// BoundingBox::around tests
// ============================================================================

#[test]
fn test_bbox_is_centered_on_point() {
    let paris = GeoPoint::new(48.8566, 2.3522);
    let bbox = BoundingBox::around(paris, 10_000.0);
    assert_approx_eq!((bbox.min_lat + bbox.max_lat) / 2.0, paris.lat, 1e-9);
    assert_approx_eq!((bbox.min_lon + bbox.max_lon) / 2.0, paris.lon, 1e-9);
    assert!(bbox.min_lat < paris.lat && paris.lat < bbox.max_lat);
    assert!(bbox.min_lon < paris.lon && paris.lon < bbox.max_lon);
}

#[test]
fn test_bbox_height_matches_distance() {
    let bbox = BoundingBox::around(GeoPoint::new(35.0, 139.0), 29_000.0);
    let height_m = (bbox.max_lat - bbox.min_lat) * METERS_PER_DEGREE;
    assert_approx_eq!(height_m, 58_000.0, 1e-6);
}

#[test]
fn test_bbox_near_pole_stays_finite() {
    let bbox = BoundingBox::around(GeoPoint::new(89.999, 0.0), 1000.0);
    let width = bbox.max_lon - bbox.min_lon;
    assert!(width.is_finite());
    assert!(width > 0.0);
}

// ============================================================================
// LocalProjection tests
// ============================================================================

#[test]
fn test_bbox_corners_project_outside_or_on_canvas_edges() {
    let center = GeoPoint::new(52.52, 13.405);
    let dist = 5_000.0;
    let (w, h) = (600u32, 800u32);
    let proj = LocalProjection::new(center, dist, w, h);
    let bbox = BoundingBox::around(center, dist);

    // Vertical extent maps exactly onto the taller side
    let (_, top) = proj.project(GeoPoint::new(bbox.max_lat, center.lon));
    let (_, bottom) = proj.project(GeoPoint::new(bbox.min_lat, center.lon));
    assert_approx_eq!(top, 0.0, 0.01);
    assert_approx_eq!(bottom, h as f32, 0.01);

    // Horizontal extent overflows the narrower side (cropped)
    let (left, _) = proj.project(GeoPoint::new(center.lat, bbox.min_lon));
    let (right, _) = proj.project(GeoPoint::new(center.lat, bbox.max_lon));
    assert!(left < 0.0);
    assert!(right > w as f32);
}

#[test]
fn test_projection_is_linear() {
    let center = GeoPoint::new(0.0, 0.0);
    let proj = LocalProjection::new(center, 1000.0, 100, 100);
    let (x1, _) = proj.project(GeoPoint::new(0.0, 0.001));
    let (x2, _) = proj.project(GeoPoint::new(0.0, 0.002));
    assert_approx_eq!(x2 - 50.0, 2.0 * (x1 - 50.0), 1e-3);
}
