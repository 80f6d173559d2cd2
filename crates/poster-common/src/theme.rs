//! Poster themes.
//!
//! A theme maps every semantic color role of the poster (background, text,
//! water, parks, each road class, gradient) to a hex color, plus an optional
//! display name and description. Themes are stored as flat JSON documents:
//!
//! ```json
//! {
//!   "name": "Noir",
//!   "description": "Pure black background with white roads",
//!   "bg": "#000000",
//!   "text": "#FFFFFF",
//!   "gradient_color": "#000000",
//!   "water": "#0A0A0A",
//!   "parks": "#111111",
//!   "road_motorway": "#FFFFFF",
//!   "road_primary": "#E0E0E0",
//!   "road_secondary": "#C0C0C0",
//!   "road_tertiary": "#A0A0A0",
//!   "road_residential": "#808080",
//!   "road_default": "#A0A0A0"
//! }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::PosterError;

/// Key prefixes that mark a theme entry as a color role.
///
/// Extra keys carrying one of these prefixes survive a load/save round trip.
pub const ROLE_PREFIXES: &[&str] = &["bg", "text", "water", "parks", "road", "gradient"];

/// Returns true if `key` names a color role (required or custom).
pub fn has_role_prefix(key: &str) -> bool {
    ROLE_PREFIXES.iter().any(|prefix| key.starts_with(prefix))
}

/// A `#RRGGBB` or `#RRGGBBAA` color that remembers its original spelling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor {
    raw: String,
    rgba: [u8; 4],
}

impl HexColor {
    pub fn parse(s: &str) -> Result<Self, PosterError> {
        let rgba = parse_hex_color(s).ok_or_else(|| {
            PosterError::invalid_parameter("color", format!("'{}' is not a hex color", s))
        })?;
        Ok(Self {
            raw: s.trim().to_string(),
            rgba,
        })
    }

    pub fn rgba(&self) -> [u8; 4] {
        self.rgba
    }

    pub fn rgb(&self) -> (u8, u8, u8) {
        (self.rgba[0], self.rgba[1], self.rgba[2])
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for HexColor {
    type Err = PosterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for HexColor {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).map_err(|e| e.to_string())
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.raw
    }
}

/// Parse `#RGB`, `#RGBA`, `#RRGGBB` or `#RRGGBBAA` (the `#` is optional) into RGBA.
pub fn parse_hex_color(s: &str) -> Option<[u8; 4]> {
    let hex = s.trim().trim_start_matches('#');
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    match hex.len() {
        3 | 4 => {
            // Each digit is doubled: `#F80` is `#FF8800`
            let digit = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|d| d * 17);
            let alpha = if hex.len() == 4 { digit(3)? } else { 255 };
            Some([digit(0)?, digit(1)?, digit(2)?, alpha])
        }
        6 | 8 => {
            let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
            let alpha = if hex.len() == 8 { channel(6)? } else { 255 };
            Some([channel(0)?, channel(2)?, channel(4)?, alpha])
        }
        _ => None,
    }
}

/// Semantic color roles every theme must define.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ColorRole {
    Background,
    Text,
    Gradient,
    Water,
    Parks,
    RoadMotorway,
    RoadPrimary,
    RoadSecondary,
    RoadTertiary,
    RoadResidential,
    RoadDefault,
}

impl ColorRole {
    pub const ALL: [ColorRole; 11] = [
        ColorRole::Background,
        ColorRole::Text,
        ColorRole::Gradient,
        ColorRole::Water,
        ColorRole::Parks,
        ColorRole::RoadMotorway,
        ColorRole::RoadPrimary,
        ColorRole::RoadSecondary,
        ColorRole::RoadTertiary,
        ColorRole::RoadResidential,
        ColorRole::RoadDefault,
    ];

    /// JSON key of this role in a theme file.
    pub fn key(&self) -> &'static str {
        match self {
            ColorRole::Background => "bg",
            ColorRole::Text => "text",
            ColorRole::Gradient => "gradient_color",
            ColorRole::Water => "water",
            ColorRole::Parks => "parks",
            ColorRole::RoadMotorway => "road_motorway",
            ColorRole::RoadPrimary => "road_primary",
            ColorRole::RoadSecondary => "road_secondary",
            ColorRole::RoadTertiary => "road_tertiary",
            ColorRole::RoadResidential => "road_residential",
            ColorRole::RoadDefault => "road_default",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.key() == key)
    }
}

impl fmt::Display for ColorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A complete poster theme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    /// Human-readable name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Description shown in theme listings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub bg: HexColor,
    pub text: HexColor,
    pub gradient_color: HexColor,
    pub water: HexColor,
    pub parks: HexColor,
    pub road_motorway: HexColor,
    pub road_primary: HexColor,
    pub road_secondary: HexColor,
    pub road_tertiary: HexColor,
    pub road_residential: HexColor,
    pub road_default: HexColor,

    /// Custom role-prefixed keys, kept verbatim
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Theme {
    /// Built-in theme used when a theme file is missing or unusable.
    pub fn feature_based() -> Self {
        let c = |hex: &str| HexColor {
            raw: hex.to_string(),
            rgba: parse_hex_color(hex).unwrap_or([0, 0, 0, 255]),
        };
        Self {
            name: Some("Feature-Based Shading".to_string()),
            description: None,
            bg: c("#FFFFFF"),
            text: c("#000000"),
            gradient_color: c("#FFFFFF"),
            water: c("#C0C0C0"),
            parks: c("#F0F0F0"),
            road_motorway: c("#0A0A0A"),
            road_primary: c("#1A1A1A"),
            road_secondary: c("#2A2A2A"),
            road_tertiary: c("#3A3A3A"),
            road_residential: c("#4A4A4A"),
            road_default: c("#3A3A3A"),
            extra: BTreeMap::new(),
        }
    }

    /// Parse a theme document, dropping unknown keys that are not color roles.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut theme: Theme = serde_json::from_str(json)?;
        theme.extra.retain(|key, _| has_role_prefix(key));
        Ok(theme)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Display name, falling back to the given identifier.
    pub fn display_name<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.name.as_deref().unwrap_or(fallback)
    }

    pub fn color(&self, role: ColorRole) -> &HexColor {
        match role {
            ColorRole::Background => &self.bg,
            ColorRole::Text => &self.text,
            ColorRole::Gradient => &self.gradient_color,
            ColorRole::Water => &self.water,
            ColorRole::Parks => &self.parks,
            ColorRole::RoadMotorway => &self.road_motorway,
            ColorRole::RoadPrimary => &self.road_primary,
            ColorRole::RoadSecondary => &self.road_secondary,
            ColorRole::RoadTertiary => &self.road_tertiary,
            ColorRole::RoadResidential => &self.road_residential,
            ColorRole::RoadDefault => &self.road_default,
        }
    }

    fn color_mut(&mut self, role: ColorRole) -> &mut HexColor {
        match role {
            ColorRole::Background => &mut self.bg,
            ColorRole::Text => &mut self.text,
            ColorRole::Gradient => &mut self.gradient_color,
            ColorRole::Water => &mut self.water,
            ColorRole::Parks => &mut self.parks,
            ColorRole::RoadMotorway => &mut self.road_motorway,
            ColorRole::RoadPrimary => &mut self.road_primary,
            ColorRole::RoadSecondary => &mut self.road_secondary,
            ColorRole::RoadTertiary => &mut self.road_tertiary,
            ColorRole::RoadResidential => &mut self.road_residential,
            ColorRole::RoadDefault => &mut self.road_default,
        }
    }

    /// Set a color by theme key: a required role or a role-prefixed custom key.
    pub fn set_color(&mut self, key: &str, color: HexColor) -> Result<(), PosterError> {
        if let Some(role) = ColorRole::from_key(key) {
            *self.color_mut(role) = color;
            return Ok(());
        }
        if has_role_prefix(key) {
            self.extra.insert(key.to_string(), Value::String(color.into()));
            return Ok(());
        }
        Err(PosterError::invalid_parameter(
            "color key",
            format!(
                "'{}' is not a color role (expected a key starting with one of: {})",
                key,
                ROLE_PREFIXES.join(", ")
            ),
        ))
    }

    /// All color entries, required and custom, sorted by key.
    pub fn color_entries(&self) -> Vec<(String, HexColor)> {
        let mut entries: Vec<(String, HexColor)> = ColorRole::ALL
            .iter()
            .map(|role| (role.key().to_string(), self.color(*role).clone()))
            .collect();

        for (key, value) in &self.extra {
            if let Some(color) = value.as_str().and_then(|s| HexColor::parse(s).ok()) {
                entries.push((key.clone(), color));
            }
        }

        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::feature_based()
    }
}

/// Derive a filesystem-safe theme identifier from a display name.
///
/// Lowercases, turns spaces into underscores, then drops every character that
/// is neither alphanumeric nor an underscore. May return an empty string.
pub fn theme_slug(name: &str) -> String {
    name.to_lowercase()
        .replace(' ', "_")
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOIR: &str = r##"{
        "name": "Noir",
        "description": "Pure black background with white roads",
        "bg": "#000000",
        "text": "#FFFFFF",
        "gradient_color": "#000000",
        "water": "#0A0A0A",
        "parks": "#111111",
        "road_motorway": "#FFFFFF",
        "road_primary": "#E0E0E0",
        "road_secondary": "#C0C0C0",
        "road_tertiary": "#A0A0A0",
        "road_residential": "#808080",
        "road_default": "#A0A0A0",
        "road_highlight": "#FF0000",
        "author": "someone"
    }"##;

    #[test]
    fn test_hex_color_parsing() {
        assert_eq!(parse_hex_color("#FF5500"), Some([255, 85, 0, 255]));
        assert_eq!(parse_hex_color("ff5500"), Some([255, 85, 0, 255]));
        assert_eq!(parse_hex_color("#FF550080"), Some([255, 85, 0, 128]));
        assert_eq!(parse_hex_color("#GGGGGG"), None);
        assert_eq!(parse_hex_color("#+F+F+F"), None);
        assert_eq!(parse_hex_color("#FFFFF"), None);
    }

    #[test]
    fn test_short_hex_color_parsing() {
        assert_eq!(parse_hex_color("#FFF"), Some([255, 255, 255, 255]));
        assert_eq!(parse_hex_color("#f80"), Some([255, 136, 0, 255]));
        assert_eq!(parse_hex_color("#0008"), Some([0, 0, 0, 136]));
        assert_eq!(parse_hex_color("#FG0"), None);
    }

    #[test]
    fn test_theme_with_short_colors_loads() {
        let json = NOIR.replace("\"#000000\"", "\"#000\"");
        assert_ne!(json, NOIR);
        let theme = Theme::from_json(&json).unwrap();
        assert_eq!(theme.bg.rgba(), [0, 0, 0, 255]);
        assert_eq!(theme.bg.as_str(), "#000");
    }

    #[test]
    fn test_hex_color_keeps_spelling() {
        let color = HexColor::parse("#c0ffee").unwrap();
        assert_eq!(color.as_str(), "#c0ffee");
        assert_eq!(color.rgb(), (0xc0, 0xff, 0xee));
    }

    #[test]
    fn test_parse_theme() {
        let theme = Theme::from_json(NOIR).unwrap();
        assert_eq!(theme.name.as_deref(), Some("Noir"));
        assert_eq!(theme.color(ColorRole::Background).rgb(), (0, 0, 0));
        assert_eq!(theme.color(ColorRole::RoadMotorway).rgb(), (255, 255, 255));
    }

    #[test]
    fn test_extra_keys_filtered_by_role_prefix() {
        let theme = Theme::from_json(NOIR).unwrap();
        assert!(theme.extra.contains_key("road_highlight"));
        assert!(!theme.extra.contains_key("author"));

        let json = theme.to_json_pretty().unwrap();
        let reparsed = Theme::from_json(&json).unwrap();
        assert_eq!(reparsed, theme);
    }

    #[test]
    fn test_missing_role_is_an_error() {
        let json = r##"{"name": "Broken", "bg": "#000000"}"##;
        assert!(Theme::from_json(json).is_err());
    }

    #[test]
    fn test_invalid_color_is_an_error() {
        let json = NOIR.replace("\"#0A0A0A\"", "\"blue-ish\"");
        assert!(Theme::from_json(&json).is_err());
    }

    #[test]
    fn test_set_color() {
        let mut theme = Theme::feature_based();
        theme
            .set_color("water", HexColor::parse("#0000FF").unwrap())
            .unwrap();
        assert_eq!(theme.water.rgb(), (0, 0, 255));

        theme
            .set_color("road_cycleway", HexColor::parse("#00FF00").unwrap())
            .unwrap();
        assert!(theme.extra.contains_key("road_cycleway"));

        assert!(theme
            .set_color("author", HexColor::parse("#00FF00").unwrap())
            .is_err());
    }

    #[test]
    fn test_color_entries_sorted_and_complete() {
        let theme = Theme::from_json(NOIR).unwrap();
        let entries = theme.color_entries();
        assert_eq!(entries.len(), ColorRole::ALL.len() + 1);
        let keys: Vec<&str> = entries.iter().map(|(k, _)| k.as_str()).collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }

    #[test]
    fn test_theme_slug() {
        assert_eq!(theme_slug("My Cool Theme!!"), "my_cool_theme");
        assert_eq!(theme_slug("Midnight Blue"), "midnight_blue");
        assert_eq!(theme_slug("!!!"), "");
        assert_eq!(theme_slug("  "), "__");
    }

    #[test]
    fn test_role_keys_round_trip() {
        for role in ColorRole::ALL {
            assert_eq!(ColorRole::from_key(role.key()), Some(role));
            assert!(has_role_prefix(role.key()));
        }
    }
}
