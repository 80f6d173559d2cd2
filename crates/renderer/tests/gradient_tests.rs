//! Tests for edge gradient overlays.

use poster_common::HexColor;
use renderer::gradient::{Edge, GradientOverlay, GRADIENT_STEPS};
use test_utils::assert_approx_eq;

// ============================================================================
// Alpha ramp
// ============================================================================

#[test]
fn test_bottom_ramp_endpoints_and_monotonic() {
    let overlay = GradientOverlay::compose(&HexColor::parse("#F5EDE0").unwrap(), Edge::Bottom);
    let alphas = overlay.alpha_steps();
    assert_eq!(alphas.len(), GRADIENT_STEPS);
    assert_eq!(alphas[0], 1.0);
    assert_eq!(alphas[GRADIENT_STEPS - 1], 0.0);
    assert!(alphas.windows(2).all(|w| w[0] >= w[1]));
}

#[test]
fn test_top_ramp_endpoints_and_monotonic() {
    let overlay = GradientOverlay::compose(&HexColor::parse("#000000").unwrap(), Edge::Top);
    let alphas = overlay.alpha_steps();
    assert_eq!(alphas[0], 0.0);
    assert_eq!(alphas[GRADIENT_STEPS - 1], 1.0);
    assert!(alphas.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn test_ramp_is_linear() {
    let overlay = GradientOverlay::compose(&HexColor::parse("#FFFFFF").unwrap(), Edge::Top);
    let alphas = overlay.alpha_steps();
    let step = 1.0 / (GRADIENT_STEPS - 1) as f32;
    for w in alphas.windows(2) {
        assert_approx_eq!(w[1] - w[0], step, 1e-5);
    }
}

#[test]
fn test_color_is_constant_base() {
    let overlay = GradientOverlay::compose(&HexColor::parse("#1A2B3C").unwrap(), Edge::Bottom);
    assert_eq!(overlay.rgb(), (0x1A, 0x2B, 0x3C));
    assert_eq!(overlay.edge(), Edge::Bottom);
}

// ============================================================================
// Extent
// ============================================================================

#[test]
fn test_extent_is_quarter_of_canvas() {
    let white = HexColor::parse("#FFFFFF").unwrap();
    let bottom = GradientOverlay::compose(&white, Edge::Bottom).extent(1000);
    let top = GradientOverlay::compose(&white, Edge::Top).extent(1000);
    assert_eq!(bottom, (750.0, 1000.0));
    assert_eq!(top, (0.0, 250.0));
}
