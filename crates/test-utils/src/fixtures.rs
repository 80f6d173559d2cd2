//! Common test fixtures for city-poster tests.
//!
//! Sample coordinates, theme documents and small map layers.

use poster_common::{
    FeatureCollection, GeoPoint, HighwayTag, MapData, PolygonFeature, StreetEdge, StreetGraph,
};

/// Well-known coordinates.
pub mod places {
    use poster_common::GeoPoint;

    pub const PARIS: GeoPoint = GeoPoint {
        lat: 48.8566,
        lon: 2.3522,
    };

    pub const SYDNEY: GeoPoint = GeoPoint {
        lat: -33.8688,
        lon: 151.2093,
    };

    pub const NEW_YORK: GeoPoint = GeoPoint {
        lat: 40.7128,
        lon: -74.0060,
    };

    /// Where the stub geocoder puts Testville.
    pub const TESTVILLE: GeoPoint = GeoPoint {
        lat: 10.0,
        lon: 20.0,
    };
}

/// Theme documents as they appear on disk.
pub mod themes {
    /// A complete theme with name and description.
    pub const NOIR: &str = r##"{
  "name": "Noir",
  "description": "Pure black background with white roads",
  "bg": "#000000",
  "text": "#FFFFFF",
  "gradient_color": "#000000",
  "water": "#0A0A0A",
  "parks": "#111111",
  "road_motorway": "#FFFFFF",
  "road_primary": "#E0E0E0",
  "road_secondary": "#B0B0B0",
  "road_tertiary": "#909090",
  "road_residential": "#707070",
  "road_default": "#909090"
}"##;

    /// All color roles, no name or description.
    pub const UNNAMED: &str = r##"{
  "bg": "#FAF8F5",
  "text": "#2C2C2C",
  "gradient_color": "#FAF8F5",
  "water": "#D4DADC",
  "parks": "#E8E8E3",
  "road_motorway": "#2C2C2C",
  "road_primary": "#3C3C3C",
  "road_secondary": "#5C5C5C",
  "road_tertiary": "#7C7C7C",
  "road_residential": "#9C9C9C",
  "road_default": "#7C7C7C"
}"##;

    /// Missing most color roles.
    pub const INCOMPLETE: &str = r##"{ "name": "Broken", "bg": "#000000" }"##;

    /// Not JSON at all.
    pub const MALFORMED: &str = "{ this is not json";
}

/// A short street edge from `a` to `b`.
pub fn edge(way_id: i64, highway: &str, a: GeoPoint, b: GeoPoint) -> StreetEdge {
    StreetEdge {
        way_id,
        highway: HighwayTag::from(highway),
        points: vec![a, b],
    }
}

/// One motorway running east-west through `center`.
pub fn minimal_motorway_graph(center: GeoPoint) -> StreetGraph {
    StreetGraph::new(vec![edge(
        1,
        "motorway",
        GeoPoint::new(center.lat, center.lon - 0.005),
        GeoPoint::new(center.lat, center.lon + 0.005),
    )])
}

/// A square polygon of half-size `half_deg` degrees around `center`.
pub fn square_feature(id: i64, center: GeoPoint, half_deg: f64) -> PolygonFeature {
    let ring = vec![
        GeoPoint::new(center.lat - half_deg, center.lon - half_deg),
        GeoPoint::new(center.lat - half_deg, center.lon + half_deg),
        GeoPoint::new(center.lat + half_deg, center.lon + half_deg),
        GeoPoint::new(center.lat + half_deg, center.lon - half_deg),
        GeoPoint::new(center.lat - half_deg, center.lon - half_deg),
    ];
    PolygonFeature {
        id,
        rings: vec![ring],
    }
}

/// Streets of every major class plus one water and one park polygon.
pub fn sample_map_data(center: GeoPoint) -> MapData {
    let tags = [
        "motorway",
        "primary",
        "secondary",
        "tertiary",
        "residential",
        "service",
    ];
    let edges = tags
        .iter()
        .enumerate()
        .map(|(i, tag)| {
            let offset = (i as f64 - 2.5) * 0.001;
            edge(
                i as i64 + 1,
                tag,
                GeoPoint::new(center.lat + offset, center.lon - 0.004),
                GeoPoint::new(center.lat + offset, center.lon + 0.004),
            )
        })
        .collect();

    MapData {
        streets: StreetGraph::new(edges),
        water: Some(FeatureCollection::new(vec![square_feature(
            100,
            GeoPoint::new(center.lat + 0.002, center.lon + 0.002),
            0.001,
        )])),
        parks: Some(FeatureCollection::new(vec![square_feature(
            200,
            GeoPoint::new(center.lat - 0.002, center.lon - 0.002),
            0.001,
        )])),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_graph_has_one_motorway() {
        let graph = minimal_motorway_graph(places::TESTVILLE);
        assert_eq!(graph.len(), 1);
        assert_eq!(graph.edges[0].highway.primary(), "motorway");
    }

    #[test]
    fn test_square_feature_is_closed() {
        let f = square_feature(1, places::PARIS, 0.01);
        let ring = &f.rings[0];
        assert_eq!(ring.first(), ring.last());
    }

    #[test]
    fn test_sample_map_data_layers() {
        let data = sample_map_data(places::PARIS);
        assert_eq!(data.streets.len(), 6);
        assert_eq!(data.water.as_ref().map(|w| w.len()), Some(1));
        assert_eq!(data.parks.as_ref().map(|p| p.len()), Some(1));
    }
}
