//! Boolean overlay: intersection, union, difference and symmetric
//! difference of two geometries.
//!
//! Both inputs are noded together into one arrangement. Faces, edges and
//! nodes are then selected by the operation, and the result is assembled
//! from the lowest-dimension parts that are not already covered by a
//! higher-dimension part. If the graph turns out inconsistent, the inputs
//! are snapped together once and the overlay is retried.

mod graph;
mod snap;

use crate::errors::{GeometryError, Result};
use crate::geometry::{Collection, Dimension, Geometry, GeometryFactory, GeometryKind};
use crate::noding::{IndexedNoder, ScaledNoder, SnapRoundingNoder};
use crate::relate::arrangement::Arrangement;
use crate::{Coordinate, CoordinateSequence, HasBoundingBox};
use graph::{OverlayGraph, PolygonRings};
use snap::{snap_pair, snap_tolerance};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayOp {
    Intersection,
    Union,
    Difference,
    SymDifference,
}

impl OverlayOp {
    /// Whether a point in `a` (or not) and in `b` (or not) is in the result.
    pub fn is_in_result(self, in_a: bool, in_b: bool) -> bool {
        match self {
            OverlayOp::Intersection => in_a && in_b,
            OverlayOp::Union => in_a || in_b,
            OverlayOp::Difference => in_a && !in_b,
            OverlayOp::SymDifference => in_a != in_b,
        }
    }

    /// The dimension an empty result is given.
    fn empty_dimension(self, a: Dimension, b: Dimension) -> Dimension {
        match self {
            OverlayOp::Intersection => a.min(b),
            OverlayOp::Union | OverlayOp::SymDifference => a.max(b),
            OverlayOp::Difference => a,
        }
    }
}

impl Geometry {
    pub fn intersection(&self, other: &Geometry) -> Result<Geometry> {
        self.overlay(other, OverlayOp::Intersection)
    }

    pub fn union(&self, other: &Geometry) -> Result<Geometry> {
        self.overlay(other, OverlayOp::Union)
    }

    pub fn difference(&self, other: &Geometry) -> Result<Geometry> {
        self.overlay(other, OverlayOp::Difference)
    }

    pub fn sym_difference(&self, other: &Geometry) -> Result<Geometry> {
        self.overlay(other, OverlayOp::SymDifference)
    }

    /// The result is built with the factory of `self`.
    pub fn overlay(&self, other: &Geometry, op: OverlayOp) -> Result<Geometry> {
        if let Some(result) = empty_shortcut(self, other, op)? {
            return Ok(result);
        }
        self.check_homogeneous()?;
        other.check_homogeneous()?;
        with_snap_retry(self, other, |a, b| overlay_once(a, b, op))
    }
}

/// The result when either input is empty, rebuilt with the factory of `a`.
fn empty_shortcut(a: &Geometry, b: &Geometry, op: OverlayOp) -> Result<Option<Geometry>> {
    if !a.is_empty() && !b.is_empty() {
        return Ok(None);
    }
    let factory = a.factory();
    Ok(Some(match op {
        OverlayOp::Intersection => empty_of(factory, a.dimension().min(b.dimension())),
        OverlayOp::Union | OverlayOp::SymDifference => {
            if !a.is_empty() {
                a.clone()
            } else if b.factory() == factory {
                b.clone()
            } else {
                b.copy_to(factory)?
            }
        }
        OverlayOp::Difference => {
            if a.is_empty() {
                empty_of(factory, a.dimension())
            } else {
                a.clone()
            }
        }
    }))
}

fn empty_of(factory: &GeometryFactory, dimension: Dimension) -> Geometry {
    factory.empty(match dimension {
        Dimension::Zero => GeometryKind::Point,
        Dimension::One => GeometryKind::LineString,
        Dimension::Two => GeometryKind::Polygon,
        Dimension::False => GeometryKind::GeometryCollection,
    })
}

/// Runs `overlay`, and once more on snapped inputs if it reports a
/// topology collapse. A second failure is returned as is.
fn with_snap_retry<F>(a: &Geometry, b: &Geometry, overlay: F) -> Result<Geometry>
where
    F: Fn(&Geometry, &Geometry) -> Result<Geometry>,
{
    match overlay(a, b) {
        Err(GeometryError::TopologyCollapse { position }) => {
            let tolerance = snap_tolerance(a, b);
            tracing::warn!(
                x = position.x,
                y = position.y,
                tolerance,
                "topology collapse in overlay, retrying with snapped inputs"
            );
            let (a, b) = snap_pair(a, b, tolerance)?;
            overlay(&a, &b)
        }
        result => result,
    }
}

fn overlay_once(a: &Geometry, b: &Geometry, op: OverlayOp) -> Result<Geometry> {
    let precision = a.factory().precision();
    let arrangement = if precision.is_floating(0) {
        Arrangement::build(a, b, &IndexedNoder::new())?
    } else {
        let noder = ScaledNoder::new(SnapRoundingNoder::new(), precision.scale(0));
        Arrangement::build(a, b, &noder)?
    };
    let graph = OverlayGraph::new(&arrangement, op);
    let polygons = graph.polygons()?;
    let lines = graph.lines();
    let points = graph.points(op);
    tracing::debug!(
        ?op,
        polygons = polygons.len(),
        lines = lines.len(),
        points = points.len(),
        "overlay"
    );
    let empty_dimension = op.empty_dimension(a.dimension(), b.dimension());
    assemble(a.factory(), polygons, lines, points, empty_dimension)
}

fn assemble(
    factory: &GeometryFactory,
    polygons: Vec<PolygonRings>,
    lines: Vec<Vec<Coordinate>>,
    points: Vec<Coordinate>,
    empty_dimension: Dimension,
) -> Result<Geometry> {
    let polygons = polygons
        .iter()
        .map(|rings| factory.make_polygon_xy(rings))
        .collect::<Result<Vec<_>>>()?;
    let lines = lines
        .iter()
        .map(|l| factory.make_line_string(&CoordinateSequence::from_coordinates(l)))
        .collect::<Result<Vec<_>>>()?;
    let points: Vec<_> = points.into_iter().map(|p| factory.make_point_xy(p)).collect();

    let kinds = [polygons.is_empty(), lines.is_empty(), points.is_empty()]
        .iter()
        .filter(|empty| !**empty)
        .count();
    Ok(match kinds {
        0 => empty_of(factory, empty_dimension),
        1 if !polygons.is_empty() => {
            single_or_multi(factory, polygons, Geometry::Polygon, Geometry::MultiPolygon)
        }
        1 if !lines.is_empty() => {
            single_or_multi(factory, lines, Geometry::LineString, Geometry::MultiLineString)
        }
        1 => single_or_multi(factory, points, Geometry::Point, Geometry::MultiPoint),
        _ => {
            let parts: Vec<Geometry> = polygons
                .into_iter()
                .map(Geometry::Polygon)
                .chain(lines.into_iter().map(Geometry::LineString))
                .chain(points.into_iter().map(Geometry::Point))
                .collect();
            Geometry::GeometryCollection(Collection::from_parts(*factory, parts))
        }
    })
}

fn single_or_multi<T: HasBoundingBox>(
    factory: &GeometryFactory,
    mut parts: Vec<T>,
    single: fn(T) -> Geometry,
    multi: fn(Collection<T>) -> Geometry,
) -> Geometry {
    if parts.len() == 1 {
        single(parts.remove(0))
    } else {
        multi(Collection::from_parts(*factory, parts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::from_wkt::parse_wkt_one;
    use crate::PrecisionModel;
    use std::cell::Cell;

    fn factory() -> GeometryFactory {
        GeometryFactory::default()
    }

    fn geom(wkt_str: &str) -> Geometry {
        parse_wkt_one(&factory(), wkt_str).unwrap()
    }

    fn square(x: f64, y: f64, size: f64) -> Geometry {
        geom(&format!(
            "POLYGON(({0} {1}, {2} {1}, {2} {3}, {0} {3}, {0} {1}))",
            x,
            y,
            x + size,
            y + size
        ))
    }

    fn vertices(g: &Geometry) -> Vec<(f64, f64)> {
        g.vertices().map(|c| (c.x, c.y)).collect()
    }

    fn assert_area(g: &Geometry, kind: GeometryKind, area: f64) {
        assert_eq!(g.kind(), kind, "{:?}", g);
        assert!((g.area() - area).abs() < 1e-9, "area {} != {}", g.area(), area);
    }

    #[test]
    fn test_overlapping_squares() {
        let a = square(0., 0., 2.);
        let b = square(1., 1., 2.);

        let union = a.union(&b).unwrap();
        assert_area(&union, GeometryKind::Polygon, 7.);
        let expected = geom("POLYGON((0 0, 2 0, 2 1, 3 1, 3 3, 1 3, 1 2, 0 2, 0 0))");
        assert!(union.equals_topo(&expected).unwrap());

        let intersection = a.intersection(&b).unwrap();
        assert_area(&intersection, GeometryKind::Polygon, 1.);
        assert!(intersection.equals_topo(&square(1., 1., 1.)).unwrap());

        assert_area(&a.difference(&b).unwrap(), GeometryKind::Polygon, 3.);
        assert_area(&a.sym_difference(&b).unwrap(), GeometryKind::MultiPolygon, 6.);
    }

    #[test]
    fn test_disjoint_squares() {
        let a = square(0., 0., 1.);
        let b = square(5., 5., 1.);
        assert_area(&a.union(&b).unwrap(), GeometryKind::MultiPolygon, 2.);
        let intersection = a.intersection(&b).unwrap();
        assert!(intersection.is_empty());
        assert_eq!(intersection.kind(), GeometryKind::Polygon);
        assert!(a.difference(&b).unwrap().equals_topo(&a).unwrap());
    }

    #[test]
    fn test_square_with_hole() {
        let outer = square(0., 0., 10.);
        let inner = square(2., 2., 2.);
        let holed = outer.difference(&inner).unwrap();
        assert_area(&holed, GeometryKind::Polygon, 96.);
        match &holed {
            Geometry::Polygon(p) => assert_eq!(p.holes().len(), 1),
            _ => unreachable!(),
        }
        // Filling the hole back in gives the outer square.
        let filled = holed.union(&inner).unwrap();
        assert!(filled.equals_topo(&outer).unwrap());
    }

    #[test]
    fn test_touching_squares() {
        let a = square(0., 0., 1.);
        let b = square(1., 0., 1.);
        assert_area(&a.union(&b).unwrap(), GeometryKind::Polygon, 2.);
        let shared = a.intersection(&b).unwrap();
        assert_eq!(shared.kind(), GeometryKind::LineString);
        assert_eq!(vertices(&shared), vec![(1., 0.), (1., 1.)]);

        let corner = a.intersection(&square(1., 1., 1.)).unwrap();
        assert_eq!(corner.kind(), GeometryKind::Point);
        assert_eq!(vertices(&corner), vec![(1., 1.)]);
    }

    #[test]
    fn test_overlapping_polygons_in_collection() {
        let collection = geom(
            "GEOMETRYCOLLECTION(POLYGON((0 0, 2 0, 2 2, 0 2, 0 0)), \
             POLYGON((1 1, 3 1, 3 3, 1 3, 1 1)))",
        );
        let union = collection.union(&square(10., 10., 1.)).unwrap();
        assert_area(&union, GeometryKind::MultiPolygon, 8.);
        let outline = geom("POLYGON((0 0, 2 0, 2 1, 3 1, 3 3, 1 3, 1 2, 0 2, 0 0))");
        assert!((0..2).any(|i| union.geometry_n(i).unwrap().equals_topo(&outline).unwrap()));

        let clipped = collection.intersection(&square(0., 0., 3.)).unwrap();
        assert_area(&clipped, GeometryKind::Polygon, 7.);
        // The overlap is covered once, not cancelled out.
        assert_area(
            &square(0., 0., 3.).difference(&collection).unwrap(),
            GeometryKind::MultiPolygon,
            2.,
        );
    }

    #[test]
    fn test_edge_sharing_polygons_in_collection() {
        let collection = geom(
            "GEOMETRYCOLLECTION(POLYGON((0 0, 1 0, 1 1, 0 1, 0 0)), \
             POLYGON((1 0, 2 0, 2 1, 1 1, 1 0)))",
        );
        let union = collection.union(&square(0.5, 0.5, 1.)).unwrap();
        assert_area(&union, GeometryKind::Polygon, 2.5);
        match &union {
            Geometry::Polygon(p) => assert!(p.holes().is_empty()),
            _ => unreachable!(),
        }
        // The shared edge is inside the area, so nothing of it survives.
        let clipped = collection.intersection(&geom("LINESTRING(1 -1, 1 2)")).unwrap();
        assert_eq!(clipped.kind(), GeometryKind::LineString);
        assert_eq!(vertices(&clipped), vec![(1., 0.), (1., 1.)]);
        assert!(collection
            .sym_difference(&geom("POLYGON((0 0, 2 0, 2 1, 0 1, 0 0))"))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_line_and_polygon() {
        let a = square(0., 0., 2.);
        let crossing = geom("LINESTRING(-1 1, 3 1)");

        let clipped = a.intersection(&crossing).unwrap();
        assert_eq!(clipped.kind(), GeometryKind::LineString);
        assert_eq!(vertices(&clipped), vec![(0., 1.), (2., 1.)]);

        let outside = crossing.difference(&a).unwrap();
        assert_eq!(outside.kind(), GeometryKind::MultiLineString);
        assert!((outside.length() - 2.).abs() < 1e-12);

        let union = a.union(&crossing).unwrap();
        assert_eq!(union.kind(), GeometryKind::GeometryCollection);
        assert_eq!(union.num_geometries(), 3);
        assert!((union.area() - 4.).abs() < 1e-12);
        assert!((union.length() - 10.).abs() < 1e-12);
    }

    #[test]
    fn test_lines() {
        let a = geom("LINESTRING(0 0, 10 0)");
        let b = geom("LINESTRING(5 -5, 5 5)");
        let crossing = a.intersection(&b).unwrap();
        assert_eq!(crossing.kind(), GeometryKind::Point);
        assert_eq!(vertices(&crossing), vec![(5., 0.)]);

        // The union is split at the crossing but merged elsewhere.
        let union = a.union(&b).unwrap();
        assert_eq!(union.kind(), GeometryKind::MultiLineString);
        assert_eq!(union.num_geometries(), 4);

        let c = geom("LINESTRING(0 0, 4 0, 8 0)");
        let overlap = a.intersection(&c).unwrap();
        assert_eq!(overlap.kind(), GeometryKind::LineString);
        assert_eq!(vertices(&overlap), vec![(0., 0.), (4., 0.), (8., 0.)]);
    }

    #[test]
    fn test_points() {
        let points = geom("MULTIPOINT(1 1, 5 5)");
        let a = square(0., 0., 2.);
        let inside = points.intersection(&a).unwrap();
        assert_eq!(inside.kind(), GeometryKind::Point);
        assert_eq!(vertices(&inside), vec![(1., 1.)]);
        let outside = points.difference(&a).unwrap();
        assert_eq!(vertices(&outside), vec![(5., 5.)]);

        let union = a.union(&points).unwrap();
        assert_eq!(union.kind(), GeometryKind::GeometryCollection);
        assert_eq!(union.num_geometries(), 2);
    }

    #[test]
    fn test_empty_shortcuts() {
        let a = square(0., 0., 2.);
        let empty_point = geom("POINT EMPTY");
        let empty_polygon = geom("POLYGON EMPTY");

        assert!(a.union(&empty_point).unwrap().equals_exact(&a));
        assert!(empty_polygon.union(&a).unwrap().equals_exact(&a));
        assert!(a.sym_difference(&empty_polygon).unwrap().equals_exact(&a));
        assert!(a.difference(&empty_point).unwrap().equals_exact(&a));

        let intersection = a.intersection(&empty_point).unwrap();
        assert!(intersection.is_empty());
        assert_eq!(intersection.kind(), GeometryKind::Point);

        let difference = empty_polygon.difference(&a).unwrap();
        assert!(difference.is_empty());
        assert_eq!(difference.kind(), GeometryKind::Polygon);
    }

    #[test]
    fn test_empty_shortcut_uses_first_factory() {
        let fixed = GeometryFactory::new(4326, 2, PrecisionModel::fixed_xy(10.)).unwrap();
        let empty = fixed.empty(GeometryKind::Polygon);
        let other = geom("POLYGON((0 0, 1.234 0, 1.234 1.234, 0 0))");

        let union = empty.union(&other).unwrap();
        assert_eq!(union.factory(), &fixed);
        assert_eq!(union.srid(), 4326);
        assert_eq!(
            vertices(&union),
            vec![(0., 0.), (1.2, 0.), (1.2, 1.2), (0., 0.)]
        );

        // Same configuration: returned as is.
        let same = factory().empty(GeometryKind::Point).union(&other).unwrap();
        assert!(same.equals_exact(&other));
        assert_eq!(same.factory(), other.factory());
    }

    #[test]
    fn test_heterogeneous_collection() {
        let mixed = geom("GEOMETRYCOLLECTION(POLYGON((0 0, 1 0, 1 1, 0 1, 0 0)), LINESTRING(0 0, 2 2))");
        assert_eq!(
            square(0., 0., 2.).union(&mixed),
            Err(GeometryError::UnsupportedGeometryCollection)
        );
    }

    #[test]
    fn test_fixed_precision() {
        let fixed = GeometryFactory::fixed(0, 10.);
        let a = parse_wkt_one(&fixed, "LINESTRING(0 0, 1 0.9)").unwrap();
        let b = parse_wkt_one(&fixed, "LINESTRING(0 0.9, 1 0)").unwrap();
        // The exact crossing at (0.5, 0.45) rounds onto the grid.
        let crossing = a.intersection(&b).unwrap();
        assert_eq!(vertices(&crossing), vec![(0.5, 0.5)]);
    }

    #[test]
    fn test_snap_retry() {
        let a = square(0., 0., 1.);
        let b = square(0.5, 0.5, 1.);
        let attempts = Cell::new(0);
        let result = with_snap_retry(&a, &b, |a, b| {
            attempts.set(attempts.get() + 1);
            if attempts.get() == 1 {
                Err(GeometryError::TopologyCollapse {
                    position: (0.5, 0.5).into(),
                })
            } else {
                a.union(b)
            }
        });
        assert_eq!(attempts.get(), 2);
        assert_area(&result.unwrap(), GeometryKind::Polygon, 1.75);
    }

    #[test]
    fn test_hole_poking_through_shell_is_snapped() {
        // The hole's tip lies a hair outside the shell vertex at (10 5), so
        // the hole crosses the shell and the rings cannot be linked.
        let poked = geom(
            "POLYGON((0 0, 10 0, 10 5, 10 10, 0 10, 0 0), \
             (4 4, 10.000000000001 5, 4 6, 4 4))",
        );
        let far = square(20., 20., 1.);
        assert!(matches!(
            overlay_once(&poked, &far, OverlayOp::Union),
            Err(GeometryError::TopologyCollapse { .. })
        ));

        // Snapped, the tip lands on the shell vertex.
        let union = poked.union(&far).unwrap();
        assert_area(&union, GeometryKind::MultiPolygon, 95.);
        assert!(union.vertices().all(|v| v.x <= 10. || v.x >= 20.));
    }

    #[test]
    fn test_snap_retry_failure_is_returned() {
        // Too far out for the snap tolerance: both attempts fail.
        let poked = geom(
            "POLYGON((0 0, 10 0, 10 5, 10 10, 0 10, 0 0), (4 4, 10.001 5, 4 6, 4 4))",
        );
        let far = square(20., 20., 1.);
        let result = poked.union(&far);
        assert!(matches!(
            result,
            Err(GeometryError::TopologyCollapse { .. })
        ));

        let attempts = Cell::new(0);
        let result = with_snap_retry(&poked, &far, |a, b| {
            attempts.set(attempts.get() + 1);
            overlay_once(a, b, OverlayOp::Union)
        });
        assert_eq!(attempts.get(), 2);
        assert!(matches!(result, Err(GeometryError::TopologyCollapse { .. })));
    }
}
