//! Road classification and styling.
//!
//! Every OSM `highway` value maps to exactly one of six tiers. The tier picks
//! the theme color role and the stroke width.

use poster_common::{ColorRole, HighwayTag, Theme};

/// Road tier, ordered from least to most prominent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RoadClass {
    Default,
    Residential,
    Tertiary,
    Secondary,
    Primary,
    Motorway,
}

impl RoadClass {
    /// All tiers in drawing order (lowest first).
    pub const ALL: [RoadClass; 6] = [
        RoadClass::Default,
        RoadClass::Residential,
        RoadClass::Tertiary,
        RoadClass::Secondary,
        RoadClass::Primary,
        RoadClass::Motorway,
    ];

    pub fn color_role(&self) -> ColorRole {
        match self {
            RoadClass::Motorway => ColorRole::RoadMotorway,
            RoadClass::Primary => ColorRole::RoadPrimary,
            RoadClass::Secondary => ColorRole::RoadSecondary,
            RoadClass::Tertiary => ColorRole::RoadTertiary,
            RoadClass::Residential => ColorRole::RoadResidential,
            RoadClass::Default => ColorRole::RoadDefault,
        }
    }

    /// Stroke width in points.
    pub fn width_pt(&self) -> f32 {
        match self {
            RoadClass::Motorway => 1.2,
            RoadClass::Primary => 1.0,
            RoadClass::Secondary => 0.8,
            RoadClass::Tertiary => 0.6,
            RoadClass::Residential | RoadClass::Default => 0.4,
        }
    }
}

/// Classify a way by its (first) highway value.
pub fn classify(tag: &HighwayTag) -> RoadClass {
    classify_value(tag.primary())
}

/// Classify a single highway value. Unknown values fall into `Default`.
pub fn classify_value(highway: &str) -> RoadClass {
    match highway {
        "motorway" | "motorway_link" => RoadClass::Motorway,
        "trunk" | "trunk_link" | "primary" | "primary_link" => RoadClass::Primary,
        "secondary" | "secondary_link" => RoadClass::Secondary,
        "tertiary" | "tertiary_link" => RoadClass::Tertiary,
        "residential" | "living_street" | "unclassified" => RoadClass::Residential,
        _ => RoadClass::Default,
    }
}

/// Concrete paint for one road tier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoadStyle {
    pub rgba: [u8; 4],
    pub width_px: f32,
}

/// Convert points to pixels at the given resolution.
pub fn pt_to_px(pt: f32, dpi: f32) -> f32 {
    pt * dpi / 72.0
}

pub fn road_style(class: RoadClass, theme: &Theme, dpi: f32) -> RoadStyle {
    RoadStyle {
        rgba: theme.color(class.color_role()).rgba(),
        width_px: pt_to_px(class.width_pt(), dpi),
    }
}
