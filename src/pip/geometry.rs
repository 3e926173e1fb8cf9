//! GeoJSON geometry parsing and point containment.

use geo::Contains;
use geo_types::{Coord, LineString, MultiPolygon, Point, Polygon};
use serde_json::Value;

/// Geometry attached to a region
#[derive(Debug, Clone, PartialEq)]
pub enum RegionGeometry {
    Point(Point<f64>),
    Polygon(Polygon<f64>),
    MultiPolygon(MultiPolygon<f64>),
}

impl RegionGeometry {
    /// Parse a GeoJSON geometry object.
    ///
    /// Returns `None` for `null`, unsupported types, missing coordinates or
    /// coordinates that contain no usable point.
    pub fn from_geojson(value: &Value) -> Option<Self> {
        let geometry_type = value.get("type")?.as_str()?;
        let coords = value.get("coordinates")?;

        match geometry_type {
            "Point" => parse_position(coords).map(|c| RegionGeometry::Point(c.into())),
            "Polygon" => parse_polygon(coords).map(RegionGeometry::Polygon),
            "MultiPolygon" => parse_multi_polygon(coords).map(RegionGeometry::MultiPolygon),
            _ => None,
        }
    }

    /// Planar containment test with `x = longitude`, `y = latitude`.
    ///
    /// Points on a ring (outer or hole) are not contained. Point geometries
    /// have no area and never contain anything.
    pub fn contains(&self, point: &Point<f64>) -> bool {
        match self {
            RegionGeometry::Point(_) => false,
            RegionGeometry::Polygon(polygon) => polygon.contains(point),
            RegionGeometry::MultiPolygon(multi) => multi.iter().any(|p| p.contains(point)),
        }
    }

    /// GeoJSON type name, for diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            RegionGeometry::Point(_) => "Point",
            RegionGeometry::Polygon(_) => "Polygon",
            RegionGeometry::MultiPolygon(_) => "MultiPolygon",
        }
    }
}

/// `[longitude, latitude, ...]`; both leading components must be numeric.
fn parse_position(value: &Value) -> Option<Coord<f64>> {
    let position = value.as_array()?;
    if position.len() < 2 {
        return None;
    }
    let x = position[0].as_f64()?;
    let y = position[1].as_f64()?;
    Some(Coord { x, y })
}

/// Ring of positions; invalid positions are skipped, an empty ring is dropped.
fn parse_ring(value: &Value) -> Option<LineString<f64>> {
    let coords: Vec<Coord<f64>> = value
        .as_array()?
        .iter()
        .filter_map(parse_position)
        .collect();

    if coords.is_empty() {
        return None;
    }
    Some(LineString::new(coords))
}

/// First surviving ring is the exterior, the rest are holes.
pub fn parse_polygon(value: &Value) -> Option<Polygon<f64>> {
    let mut rings = value.as_array()?.iter().filter_map(parse_ring);
    let exterior = rings.next()?;
    Some(Polygon::new(exterior, rings.collect()))
}

pub fn parse_multi_polygon(value: &Value) -> Option<MultiPolygon<f64>> {
    let polygons: Vec<Polygon<f64>> = value
        .as_array()?
        .iter()
        .filter_map(parse_polygon)
        .collect();

    if polygons.is_empty() {
        return None;
    }
    Some(MultiPolygon::new(polygons))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn square(min: f64, max: f64) -> Value {
        json!([[min, min], [max, min], [max, max], [min, max], [min, min]])
    }

    #[test]
    fn test_polygon_contains_interior_only() {
        let geometry =
            RegionGeometry::from_geojson(&json!({"type": "Polygon", "coordinates": [square(0.0, 10.0)]}))
                .unwrap();
        assert!(geometry.contains(&Point::new(5.0, 5.0)));
        assert!(!geometry.contains(&Point::new(11.0, 5.0)));
        // boundary is excluded
        assert!(!geometry.contains(&Point::new(0.0, 5.0)));
    }

    #[test]
    fn test_hole_subtracts() {
        let geometry = RegionGeometry::from_geojson(&json!({
            "type": "Polygon",
            "coordinates": [square(0.0, 10.0), square(4.0, 6.0)]
        }))
        .unwrap();
        assert!(!geometry.contains(&Point::new(5.0, 5.0)));
        assert!(geometry.contains(&Point::new(2.0, 2.0)));
    }

    #[test]
    fn test_multipolygon_union() {
        let geometry = RegionGeometry::from_geojson(&json!({
            "type": "MultiPolygon",
            "coordinates": [[square(0.0, 1.0)], [square(10.0, 11.0)]]
        }))
        .unwrap();
        assert!(geometry.contains(&Point::new(0.5, 0.5)));
        assert!(geometry.contains(&Point::new(10.5, 10.5)));
        assert!(!geometry.contains(&Point::new(5.0, 5.0)));
    }

    #[test]
    fn test_point_parses_but_never_contains() {
        let geometry =
            RegionGeometry::from_geojson(&json!({"type": "Point", "coordinates": [2.35, 48.85]}))
                .unwrap();
        assert_eq!(geometry.kind(), "Point");
        assert!(!geometry.contains(&Point::new(2.35, 48.85)));
    }

    #[test]
    fn test_bad_point() {
        assert!(RegionGeometry::from_geojson(&json!({"type": "Point", "coordinates": [2.35]})).is_none());
        assert!(
            RegionGeometry::from_geojson(&json!({"type": "Point", "coordinates": ["x", 1.0]})).is_none()
        );
    }

    #[test]
    fn test_unsupported_or_missing() {
        assert!(RegionGeometry::from_geojson(&Value::Null).is_none());
        assert!(RegionGeometry::from_geojson(&json!({"type": "LineString", "coordinates": [[0, 0], [1, 1]]})).is_none());
        assert!(RegionGeometry::from_geojson(&json!({"type": "Polygon"})).is_none());
    }

    #[test]
    fn test_invalid_points_skipped_and_empty_rings_dropped() {
        // first ring has no valid point, so the second becomes the exterior
        let polygon = parse_polygon(&json!([
            [["a", 0], [1]],
            [[0, 0], [10, 0], "junk", [10, 10], [0, 10], [0, 0]]
        ]))
        .unwrap();
        assert!(polygon.interiors().is_empty());
        assert_eq!(polygon.exterior().0.len(), 5);
    }

    #[test]
    fn test_empty_polygon_is_no_geometry() {
        assert!(parse_polygon(&json!([])).is_none());
        assert!(parse_polygon(&json!([[["x", "y"]]])).is_none());
        assert!(parse_multi_polygon(&json!([[], [[]]])).is_none());
    }
}
