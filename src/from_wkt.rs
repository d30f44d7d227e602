//! WKT ingest. Parsed coordinates go through a `GeometryFactory`, which
//! fixes the SRID, precision and axis count of the result.

use crate::errors::{GeometryError, Result};
use crate::geometry::{Geometry, GeometryFactory, GeometryKind};
use crate::CoordinateSequence;
use wkt::types::{self, Coord};

/// Parse every geometry in `wkt_str`.
pub fn parse_wkt(factory: &GeometryFactory, wkt_str: &str) -> Result<Vec<Geometry>> {
    let parsed: wkt::Wkt<f64> =
        wkt::Wkt::from_str(wkt_str).map_err(|reason| GeometryError::InvalidWkt {
            reason: reason.to_string(),
        })?;
    parsed
        .items
        .into_iter()
        .map(|g| from_wkt_geometry(factory, g))
        .collect()
}

/// Parse text holding exactly one geometry.
pub fn parse_wkt_one(factory: &GeometryFactory, wkt_str: &str) -> Result<Geometry> {
    let mut geometries = parse_wkt(factory, wkt_str)?;
    if geometries.len() != 1 {
        return Err(GeometryError::InvalidWkt {
            reason: format!("expected one geometry, found {}", geometries.len()),
        });
    }
    Ok(geometries.remove(0))
}

/// Vertices with Z or M keep them; missing ordinates are NaN.
fn sequence(coords: &[&Coord<f64>]) -> Result<CoordinateSequence> {
    let has_m = coords.iter().any(|c| c.m.is_some());
    let has_z = has_m || coords.iter().any(|c| c.z.is_some());
    let axis_count = 2 + has_z as usize + has_m as usize;
    let mut ordinates = Vec::with_capacity(coords.len() * axis_count);
    for c in coords {
        ordinates.push(c.x);
        ordinates.push(c.y);
        if has_z {
            ordinates.push(c.z.unwrap_or(f64::NAN));
        }
        if has_m {
            ordinates.push(c.m.unwrap_or(f64::NAN));
        }
    }
    CoordinateSequence::new(axis_count, ordinates)
}

fn linestring_sequence(linestring: &types::LineString<f64>) -> Result<CoordinateSequence> {
    sequence(&linestring.0.iter().collect::<Vec<_>>())
}

fn polygon_rings(polygon: &types::Polygon<f64>) -> Result<Vec<CoordinateSequence>> {
    polygon.0.iter().map(linestring_sequence).collect()
}

fn from_wkt_geometry(factory: &GeometryFactory, geometry: wkt::Geometry<f64>) -> Result<Geometry> {
    match geometry {
        wkt::Geometry::Point(p) => match p.0.as_ref() {
            Some(c) => factory.point(&sequence(&[c])?),
            None => Ok(factory.empty(GeometryKind::Point)),
        },
        wkt::Geometry::LineString(ls) => factory.line_string(&linestring_sequence(&ls)?),
        wkt::Geometry::Polygon(p) => factory.polygon(&polygon_rings(&p)?),
        wkt::Geometry::MultiPoint(mp) => {
            let coords: Vec<&Coord<f64>> = mp.0.iter().filter_map(|p| p.0.as_ref()).collect();
            factory.multi_point(&sequence(&coords)?)
        }
        wkt::Geometry::MultiLineString(mls) => {
            let lines = mls
                .0
                .iter()
                .map(linestring_sequence)
                .collect::<Result<Vec<_>>>()?;
            factory.multi_line_string(&lines)
        }
        wkt::Geometry::MultiPolygon(mp) => {
            let polygons = mp
                .0
                .iter()
                .map(polygon_rings)
                .collect::<Result<Vec<_>>>()?;
            factory.multi_polygon(&polygons)
        }
        wkt::Geometry::GeometryCollection(gc) => {
            let children = gc
                .0
                .into_iter()
                .map(|g| from_wkt_geometry(factory, g))
                .collect::<Result<Vec<_>>>()?;
            factory.geometry_collection(children)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Coordinate, PrecisionModel};

    fn make_positions(coords: Vec<(f64, f64)>) -> Vec<Coordinate> {
        coords.into_iter().map(|c| c.into()).collect()
    }

    fn get_single_geom(wkt_str: &str) -> Geometry {
        parse_wkt_one(&GeometryFactory::default(), wkt_str).unwrap()
    }

    fn assert_parsed(wkt_str: &str, kind: GeometryKind, coords: Vec<(f64, f64)>) {
        let geometry = get_single_geom(wkt_str);
        assert_eq!(geometry.kind(), kind);
        assert_eq!(geometry.vertices().collect::<Vec<_>>(), make_positions(coords));
    }

    #[test]
    fn check_empty_str() {
        assert_eq!(
            parse_wkt(&GeometryFactory::default(), "").unwrap(),
            Vec::new()
        );
    }

    #[test]
    fn check_bad_str() {
        assert!(matches!(
            parse_wkt(&GeometryFactory::default(), "xyz"),
            Err(GeometryError::InvalidWkt { .. })
        ));
        assert!(matches!(
            parse_wkt_one(&GeometryFactory::default(), "POINT(1 1) POINT(2 2)"),
            Err(GeometryError::InvalidWkt { .. })
        ));
    }

    #[test]
    fn check_point() {
        assert_parsed("POINT(1.0 1.0)", GeometryKind::Point, vec![(1., 1.)]);
        let empty = get_single_geom("POINT EMPTY");
        assert!(empty.is_empty());
        assert_eq!(empty.kind(), GeometryKind::Point);
    }

    #[test]
    fn check_linestring() {
        assert_parsed(
            "LINESTRING(1.0 1.0, 2.0 2.0, 3 3)",
            GeometryKind::LineString,
            vec![(1., 1.), (2., 2.), (3., 3.)],
        );
        assert!(parse_wkt(&GeometryFactory::default(), "LINESTRING(1 1)").is_err());
    }

    #[test]
    fn check_polygon() {
        let polygon = get_single_geom(
            "POLYGON((0 0, 10 0, 10 10, 0 10, 0 0), (2 2, 2 4, 4 4, 4 2, 2 2))",
        );
        assert_eq!(polygon.kind(), GeometryKind::Polygon);
        assert_eq!(polygon.area(), 96.);
        assert!(matches!(
            parse_wkt(&GeometryFactory::default(), "POLYGON((0 0, 1 0, 1 1, 0 0.5))"),
            Err(GeometryError::InvalidGeometryKind { .. })
        ));
    }

    #[test]
    fn check_multi_geometries() {
        assert_parsed(
            "MULTIPOINT(1 1, 2 2)",
            GeometryKind::MultiPoint,
            vec![(1., 1.), (2., 2.)],
        );
        let lines = get_single_geom("MULTILINESTRING((0 0, 1 1), (2 2, 3 3, 4 4))");
        assert_eq!(lines.kind(), GeometryKind::MultiLineString);
        assert_eq!(lines.num_geometries(), 2);
        let polygons = get_single_geom(
            "MULTIPOLYGON(((0 0, 1 0, 1 1, 0 0)), ((5 5, 7 5, 7 7, 5 7, 5 5)))",
        );
        assert_eq!(polygons.kind(), GeometryKind::MultiPolygon);
        assert_eq!(polygons.area(), 4.5);
    }

    #[test]
    fn check_geometry_collection() {
        let collection = get_single_geom("GEOMETRYCOLLECTION(POINT(1 2), LINESTRING(0 0, 1 1))");
        assert_eq!(collection.kind(), GeometryKind::GeometryCollection);
        assert_eq!(collection.num_geometries(), 2);
        assert_eq!(
            collection.geometry_n(0).map(|g| g.kind()),
            Some(GeometryKind::Point)
        );
    }

    #[test]
    fn check_factory_configuration() {
        let fixed = GeometryFactory::new(4326, 3, PrecisionModel::fixed_xy(10.)).unwrap();
        let point = parse_wkt_one(&fixed, "POINT(1.234 5.678 9.5)").unwrap();
        assert_eq!(point.srid(), 4326);
        assert_eq!(point.axis_count(), 3);
        assert_eq!(
            point.coordinate_sequences()[0].ordinates(),
            &[1.2, 5.7, 9.5][..]
        );

        // Z is dropped by a two-axis factory.
        let flat = parse_wkt_one(&GeometryFactory::default(), "POINT(1 2 3)").unwrap();
        assert_eq!(flat.coordinate_sequences()[0].ordinates(), &[1., 2.][..]);
    }
}
