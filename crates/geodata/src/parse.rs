//! Overpass JSON (`out geom`) parsing into poster map layers.

use std::collections::HashMap;

use poster_common::{
    FeatureCollection, GeoPoint, HighwayTag, PolygonFeature, PosterError, PosterResult,
    StreetEdge, StreetGraph,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<OverpassElement>,
    /// Set by Overpass on runtime errors such as query timeouts
    #[serde(default)]
    remark: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OverpassElement {
    #[serde(rename = "type")]
    element_type: String,
    id: i64,
    #[serde(default)]
    tags: HashMap<String, String>,
    #[serde(default)]
    geometry: Vec<Option<LatLon>>,
    #[serde(default)]
    members: Vec<OverpassMember>,
}

#[derive(Debug, Deserialize)]
struct OverpassMember {
    #[serde(rename = "type")]
    member_type: String,
    #[serde(default)]
    geometry: Vec<Option<LatLon>>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct LatLon {
    lat: f64,
    lon: f64,
}

fn points(geometry: &[Option<LatLon>]) -> Vec<GeoPoint> {
    geometry
        .iter()
        .flatten()
        .map(|p| GeoPoint::new(p.lat, p.lon))
        .collect()
}

fn parse_response(body: &str, layer: &str) -> PosterResult<Vec<OverpassElement>> {
    let parsed: OverpassResponse = serde_json::from_str(body)
        .map_err(|e| PosterError::fetch(layer, format!("invalid overpass JSON: {}", e)))?;

    if let Some(remark) = parsed.remark {
        if remark.contains("error") {
            return Err(PosterError::fetch(layer, remark));
        }
    }
    Ok(parsed.elements)
}

/// Split a raw `highway` value; `;` separates multiple values on one way.
pub fn highway_tag(raw: &str) -> HighwayTag {
    let values: Vec<String> = raw
        .split(';')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect();

    match values.len() {
        1 => HighwayTag::Single(values.into_iter().next().unwrap_or_default()),
        _ => HighwayTag::Multiple(values),
    }
}

/// Parse highway ways into a street graph. Area highways are skipped.
pub fn parse_streets(body: &str) -> PosterResult<StreetGraph> {
    let mut edges = Vec::new();
    for element in parse_response(body, "street network")? {
        if element.element_type != "way" {
            continue;
        }
        let Some(highway) = element.tags.get("highway") else {
            continue;
        };
        if element.tags.get("area").map(String::as_str) == Some("yes") {
            continue;
        }

        let points = points(&element.geometry);
        if points.len() < 2 {
            continue;
        }
        edges.push(StreetEdge {
            way_id: element.id,
            highway: highway_tag(highway),
            points,
        });
    }
    Ok(StreetGraph::new(edges))
}

/// Parse closed ways and multipolygon relations into polygon features.
pub fn parse_polygons(body: &str, layer: &str) -> PosterResult<FeatureCollection> {
    let mut features = Vec::new();
    for element in parse_response(body, layer)? {
        match element.element_type.as_str() {
            "way" => {
                let ring = points(&element.geometry);
                if is_closed_ring(&ring) {
                    features.push(PolygonFeature {
                        id: element.id,
                        rings: vec![ring],
                    });
                }
            }
            "relation" => {
                let segments = element
                    .members
                    .iter()
                    .filter(|m| m.member_type == "way")
                    .map(|m| points(&m.geometry))
                    .collect();
                let rings = stitch_rings(segments);
                if !rings.is_empty() {
                    features.push(PolygonFeature {
                        id: element.id,
                        rings,
                    });
                }
            }
            _ => {}
        }
    }
    Ok(FeatureCollection::new(features))
}

fn is_closed_ring(ring: &[GeoPoint]) -> bool {
    ring.len() >= 4 && ring.first() == ring.last()
}

/// Join way segments that share endpoints into closed rings.
///
/// Multipolygon members are often split across several ways. Segments that
/// cannot be closed are dropped.
pub fn stitch_rings(mut segments: Vec<Vec<GeoPoint>>) -> Vec<Vec<GeoPoint>> {
    segments.retain(|s| s.len() >= 2);
    let mut rings = Vec::new();

    while let Some(mut current) = segments.pop() {
        while !is_closed_ring(&current) {
            let Some(&tail) = current.last() else {
                break;
            };
            let next = segments
                .iter()
                .position(|s| s.first() == Some(&tail) || s.last() == Some(&tail));
            let Some(index) = next else {
                break;
            };

            let mut segment = segments.swap_remove(index);
            if segment.first() != Some(&tail) {
                segment.reverse();
            }
            current.extend(segment.into_iter().skip(1));
        }

        if is_closed_ring(&current) {
            rings.push(current);
        }
    }
    rings
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon)
    }

    #[test]
    fn test_highway_tag_split() {
        assert_eq!(highway_tag("primary"), HighwayTag::Single("primary".into()));
        assert_eq!(
            highway_tag("secondary;tertiary"),
            HighwayTag::Multiple(vec!["secondary".into(), "tertiary".into()])
        );
        assert_eq!(highway_tag(""), HighwayTag::Multiple(vec![]));
    }

    #[test]
    fn test_stitch_two_halves() {
        let a = vec![p(0.0, 0.0), p(0.0, 1.0), p(1.0, 1.0)];
        // Reversed orientation on purpose
        let b = vec![p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0)];
        let rings = stitch_rings(vec![a, b]);
        assert_eq!(rings.len(), 1);
        assert_eq!(rings[0].len(), 5);
        assert_eq!(rings[0].first(), rings[0].last());
    }

    #[test]
    fn test_stitch_drops_open_segments() {
        let open = vec![p(0.0, 0.0), p(0.0, 1.0)];
        assert!(stitch_rings(vec![open]).is_empty());
    }

    #[test]
    fn test_remark_error_is_fetch_failure() {
        let body = r#"{"elements":[],"remark":"runtime error: Query timed out in \"query\" at line 1 after 180 seconds."}"#;
        let err = parse_streets(body).unwrap_err();
        assert!(err.to_string().contains("street network"));
    }
}
