//! Map data model: street graph plus polygon feature layers.

use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

/// Value of an OSM `highway` tag.
///
/// Merged ways can carry several values; only the first one is significant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HighwayTag {
    Single(String),
    Multiple(Vec<String>),
}

impl HighwayTag {
    pub const UNCLASSIFIED: &'static str = "unclassified";

    /// The tag value used for classification.
    pub fn primary(&self) -> &str {
        match self {
            HighwayTag::Single(value) => value,
            HighwayTag::Multiple(values) => values
                .first()
                .map(String::as_str)
                .unwrap_or(Self::UNCLASSIFIED),
        }
    }
}

impl Default for HighwayTag {
    fn default() -> Self {
        HighwayTag::Single(Self::UNCLASSIFIED.to_string())
    }
}

impl From<&str> for HighwayTag {
    fn from(value: &str) -> Self {
        HighwayTag::Single(value.to_string())
    }
}

/// A drawable street: one OSM way with its classification tag and geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreetEdge {
    pub way_id: i64,
    #[serde(default)]
    pub highway: HighwayTag,
    pub points: Vec<GeoPoint>,
}

/// The street network around the poster center.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreetGraph {
    pub edges: Vec<StreetEdge>,
}

impl StreetGraph {
    pub fn new(edges: Vec<StreetEdge>) -> Self {
        Self { edges }
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

/// A polygon feature made of one or more closed rings, filled even-odd.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonFeature {
    pub id: i64,
    pub rings: Vec<Vec<GeoPoint>>,
}

/// A layer of polygon features (water bodies, parks).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    pub features: Vec<PolygonFeature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<PolygonFeature>) -> Self {
        Self { features }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Everything fetched for one poster.
///
/// `None` layers failed to download; `Some` with no features means the area
/// simply has none.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapData {
    pub streets: StreetGraph,
    pub water: Option<FeatureCollection>,
    pub parks: Option<FeatureCollection>,
}
