use crate::errors::{GeometryError, Result};
use crate::geometry::{Collection, Geometry, GeometryFactory, LineString, Point, Polygon};
use crate::index::KdTree;
use crate::{Coordinate, CoordinateSequence, HasBoundingBox};

/// Fraction of the smaller extent of the inputs used as the snap distance
/// for floating precision.
const SNAP_TOLERANCE_FACTOR: f64 = 1e-9;

/// How close vertices must be to be merged before the retry: a tiny
/// fraction of the extent of the inputs, widened to about one grid cell
/// under a fixed precision.
pub(crate) fn snap_tolerance(a: &Geometry, b: &Geometry) -> f64 {
    let mut bbox = a.bounding_box();
    bbox.expand(b.bounding_box());
    let extent = bbox.width().min(bbox.height());
    let tolerance = if extent.is_finite() {
        extent * SNAP_TOLERANCE_FACTOR
    } else {
        0.
    };
    let precision = a.factory().precision();
    if precision.is_floating(0) {
        tolerance
    } else {
        tolerance.max(2. / precision.scale(0) / 1.415)
    }
}

/// Both inputs with every vertex moved onto the first vertex inserted within
/// `tolerance` of it. Parts that collapse are dropped.
pub(crate) fn snap_pair(
    a: &Geometry,
    b: &Geometry,
    tolerance: f64,
) -> Result<(Geometry, Geometry)> {
    let mut tree: KdTree<()> = KdTree::new(tolerance);
    for vertex in a.vertices().chain(b.vertices()) {
        tree.insert(vertex, ());
    }
    let snapped_a = snap_geometry(a, &mut tree)?;
    let snapped_b = snap_geometry(b, &mut tree)?;
    Ok((snapped_a, snapped_b))
}

fn snap_coords(coords: &CoordinateSequence, tree: &mut KdTree<()>) -> Vec<Coordinate> {
    let mut snapped: Vec<Coordinate> = coords
        .iter()
        .map(|c| tree.insert(c, ()).coordinate())
        .collect();
    snapped.dedup();
    snapped
}

fn snap_geometry(geometry: &Geometry, tree: &mut KdTree<()>) -> Result<Geometry> {
    let factory = *geometry.factory();
    Ok(match geometry {
        Geometry::Point(p) => Geometry::Point(snap_point(&factory, p, tree)),
        Geometry::LineString(l) => match snap_line(&factory, l, tree)? {
            Some(line) => Geometry::LineString(line),
            None => factory.empty(geometry.kind()),
        },
        Geometry::LinearRing(r) => {
            let coords = snap_coords(r.coords(), tree);
            if coords.len() < 4 {
                factory.empty(geometry.kind())
            } else {
                let coords = CoordinateSequence::from_coordinates(&coords);
                Geometry::LinearRing(factory.make_ring(&coords)?)
            }
        }
        Geometry::Polygon(p) => Geometry::Polygon(snap_polygon(&factory, p, tree)?),
        Geometry::MultiPoint(m) => Geometry::MultiPoint(Collection::from_parts(
            factory,
            m.iter().map(|p| snap_point(&factory, p, tree)).collect(),
        )),
        Geometry::MultiLineString(m) => {
            let mut lines = Vec::new();
            for line in m.iter() {
                lines.extend(snap_line(&factory, line, tree)?);
            }
            Geometry::MultiLineString(Collection::from_parts(factory, lines))
        }
        Geometry::MultiPolygon(m) => {
            let mut polygons = Vec::new();
            for polygon in m.iter() {
                let snapped = snap_polygon(&factory, polygon, tree)?;
                if !snapped.is_empty() {
                    polygons.push(snapped);
                }
            }
            Geometry::MultiPolygon(Collection::from_parts(factory, polygons))
        }
        Geometry::GeometryCollection(c) => {
            let children = c
                .iter()
                .map(|g| snap_geometry(g, tree))
                .collect::<Result<Vec<Geometry>>>()?;
            Geometry::GeometryCollection(Collection::from_parts(factory, children))
        }
    })
}

fn snap_point(factory: &GeometryFactory, point: &Point, tree: &mut KdTree<()>) -> Point {
    match point.coordinate() {
        Some(c) => factory.make_point_xy(tree.insert(c, ()).coordinate()),
        None => point.clone(),
    }
}

fn snap_line(
    factory: &GeometryFactory,
    line: &LineString,
    tree: &mut KdTree<()>,
) -> Result<Option<LineString>> {
    let coords = snap_coords(line.coords(), tree);
    if coords.len() < 2 {
        return Ok(None);
    }
    factory
        .make_line_string(&CoordinateSequence::from_coordinates(&coords))
        .map(Some)
}

fn snap_polygon(
    factory: &GeometryFactory,
    polygon: &Polygon,
    tree: &mut KdTree<()>,
) -> Result<Polygon> {
    let mut rings: Vec<Vec<Coordinate>> = Vec::new();
    for (i, ring) in polygon.rings().iter().enumerate() {
        let coords = snap_coords(ring.coords(), tree);
        if coords.len() >= 4 {
            rings.push(coords);
        } else if i == 0 {
            return Ok(Polygon::from_parts(*factory, Vec::new()));
        }
    }
    factory.make_polygon_xy(&rings).map_err(|_| GeometryError::TopologyCollapse {
        position: polygon
            .shell()
            .and_then(|s| s.coords().first())
            .unwrap_or_else(|| Coordinate::new(f64::NAN, f64::NAN)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tolerance() {
        let factory = GeometryFactory::default();
        let a = factory
            .line_string_xy(&[(0., 0.).into(), (1000., 10.).into()])
            .unwrap();
        let b = factory.point_xy((5., 5.).into());
        assert!((snap_tolerance(&a, &b) - 1e-8).abs() < 1e-20);

        let fixed = GeometryFactory::fixed(0, 100.);
        let a = fixed
            .line_string_xy(&[(0., 0.).into(), (1000., 10.).into()])
            .unwrap();
        assert!((snap_tolerance(&a, &b) - 2. / 100. / 1.415).abs() < 1e-12);
    }

    #[test]
    fn test_snap_pair_merges_close_vertices() {
        let factory = GeometryFactory::default();
        let a = factory
            .polygon_from_xy(vec![vec![(0., 0.), (1., 0.), (1., 1.), (0., 1.), (0., 0.)]])
            .unwrap();
        let b = factory
            .line_string_xy(&[(1.0001, 1.).into(), (3., 3.).into()])
            .unwrap();
        let (snapped_a, snapped_b) = snap_pair(&a, &b, 0.001).unwrap();
        assert_eq!(snapped_a, a);
        let vertices: Vec<Coordinate> = snapped_b.vertices().collect();
        assert_eq!(vertices, vec![(1., 1.).into(), (3., 3.).into()]);
    }

    #[test]
    fn test_collapsed_parts_are_dropped() {
        let factory = GeometryFactory::default();
        let sliver = factory
            .polygon_from_xy(vec![vec![(0., 0.), (1., 0.), (1., 0.0001), (0., 0.)]])
            .unwrap();
        let other = factory.point_xy((5., 5.).into());
        let (snapped, _) = snap_pair(&sliver, &other, 0.01).unwrap();
        assert!(snapped.is_empty());
    }
}
