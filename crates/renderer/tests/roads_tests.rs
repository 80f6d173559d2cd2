//! Tests for road classification and styling.

use poster_common::{ColorRole, HighwayTag, Theme};
use renderer::roads::{classify, classify_value, road_style, RoadClass};
use test_utils::assert_approx_eq;

// ============================================================================
// Classification
// ============================================================================

#[test]
fn test_classify_known_values() {
    let cases = [
        ("motorway", RoadClass::Motorway),
        ("motorway_link", RoadClass::Motorway),
        ("trunk", RoadClass::Primary),
        ("trunk_link", RoadClass::Primary),
        ("primary", RoadClass::Primary),
        ("primary_link", RoadClass::Primary),
        ("secondary", RoadClass::Secondary),
        ("secondary_link", RoadClass::Secondary),
        ("tertiary", RoadClass::Tertiary),
        ("tertiary_link", RoadClass::Tertiary),
        ("residential", RoadClass::Residential),
        ("living_street", RoadClass::Residential),
        ("unclassified", RoadClass::Residential),
    ];
    for (value, expected) in cases {
        assert_eq!(classify_value(value), expected, "highway={}", value);
    }
}

#[test]
fn test_classify_unknown_values_default() {
    for value in ["service", "footway", "cycleway", "track", "", "MOTORWAY"] {
        assert_eq!(classify_value(value), RoadClass::Default, "highway={:?}", value);
    }
}

#[test]
fn test_classify_uses_first_of_list() {
    let tag = HighwayTag::Multiple(vec!["residential".into(), "motorway".into()]);
    assert_eq!(classify(&tag), RoadClass::Residential);
    assert_eq!(classify(&HighwayTag::Multiple(vec![])), RoadClass::Residential);
}

// ============================================================================
// Styling
// ============================================================================

#[test]
fn test_widths_descend_with_tier() {
    let widths: Vec<f32> = RoadClass::ALL.iter().rev().map(|c| c.width_pt()).collect();
    assert_eq!(widths, vec![1.2, 1.0, 0.8, 0.6, 0.4, 0.4]);
}

#[test]
fn test_color_roles() {
    assert_eq!(RoadClass::Motorway.color_role(), ColorRole::RoadMotorway);
    assert_eq!(RoadClass::Default.color_role(), ColorRole::RoadDefault);
}

#[test]
fn test_road_style_uses_theme_and_dpi() {
    let theme = Theme::feature_based();
    let style = road_style(RoadClass::Motorway, &theme, 72.0);
    assert_eq!(style.rgba, [0x0A, 0x0A, 0x0A, 255]);
    assert_approx_eq!(style.width_px, 1.2, 1e-6);

    let residential = road_style(RoadClass::Residential, &theme, 300.0);
    assert_eq!(residential.rgba, [0x4A, 0x4A, 0x4A, 255]);
    assert_approx_eq!(residential.width_px, 0.4 * 300.0 / 72.0, 1e-4);
}
