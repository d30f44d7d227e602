use proptest::prelude::*;

use planar_kernel::triangulate::Segment;
use planar_kernel::{
    ConformingDelaunayTriangulator, Coordinate, Geometry, GeometryFactory, GeometryKind, KdTree,
};

fn factory() -> GeometryFactory {
    GeometryFactory::default()
}

fn rectangle(x: f64, y: f64, width: f64, height: f64) -> Geometry {
    factory()
        .polygon_from_xy(vec![vec![
            (x, y),
            (x + width, y),
            (x + width, y + height),
            (x, y + height),
            (x, y),
        ]])
        .unwrap()
}

fn triangle(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> Option<Geometry> {
    let cross = (b.0 - a.0) * (c.1 - a.1) - (b.1 - a.1) * (c.0 - a.0);
    if cross.abs() < 1e-3 {
        return None;
    }
    factory().polygon_from_xy(vec![vec![a, b, c, a]]).ok()
}

fn point(x: f64, y: f64) -> Geometry {
    factory().point_xy((x, y).into())
}

fn coordinate() -> impl Strategy<Value = (f64, f64)> {
    (0f64..100., 0f64..100.)
}

proptest! {
    #[test]
    fn intersects_is_not_disjoint(
        (x1, y1) in coordinate(),
        (x2, y2) in coordinate(),
        w1 in 0.5f64..50.,
        w2 in 0.5f64..50.,
    ) {
        let a = rectangle(x1, y1, w1, w1);
        let b = rectangle(x2, y2, w2, w2);
        prop_assert_eq!(a.intersects(&b).unwrap(), !a.disjoint(&b).unwrap());
    }

    #[test]
    fn within_is_contains_reversed(
        a in coordinate(),
        b in coordinate(),
        c in coordinate(),
        (px, py) in coordinate(),
    ) {
        if let Some(polygon) = triangle(a, b, c) {
            let p = point(px, py);
            prop_assert_eq!(p.within(&polygon).unwrap(), polygon.contains(&p).unwrap());
            prop_assert_eq!(polygon.within(&p).unwrap(), p.contains(&polygon).unwrap());
        }
    }

    #[test]
    fn overlay_with_empty(
        (x, y) in coordinate(),
        width in 0.5f64..50.,
    ) {
        let a = rectangle(x, y, width, width);
        let empty = factory().empty(GeometryKind::Polygon);
        prop_assert!(a.union(&empty).unwrap().equals_exact(&a));
        prop_assert!(empty.union(&a).unwrap().equals_exact(&a));
        prop_assert!(a.intersection(&empty).unwrap().is_empty());
        prop_assert!(a.difference(&empty).unwrap().equals_exact(&a));
    }

    #[test]
    fn rectangle_contains_interior_points(
        (x, y) in coordinate(),
        width in 1f64..50.,
        fx in 0.01f64..0.99,
        fy in 0.01f64..0.99,
    ) {
        let rect = rectangle(x, y, width, width);
        let inside = point(x + fx * width, y + fy * width);
        prop_assert!(rect.contains(&inside).unwrap());
        prop_assert!(rect.intersects(&inside).unwrap());

        let on_edge = point(x + fx * width, y);
        prop_assert!(!rect.contains(&on_edge).unwrap());
        prop_assert!(rect.intersects(&on_edge).unwrap());
    }

    #[test]
    fn kd_tree_merges_repeated_inserts(
        points in prop::collection::vec(coordinate(), 1..40),
    ) {
        let mut tree = KdTree::new(0.);
        for &p in points.iter() {
            tree.insert(p.into(), ());
        }
        let len = tree.len();
        for &p in points.iter() {
            prop_assert!(tree.insert(p.into(), ()).is_repeated());
        }
        prop_assert_eq!(tree.len(), len);
        let total: usize = tree.nodes().iter().map(|n| n.count()).sum();
        prop_assert_eq!(total, 2 * points.len());
    }

    #[test]
    fn conforming_triangulation_is_gabriel(
        sites in prop::collection::vec(coordinate(), 3..15),
    ) {
        let sites: Vec<Coordinate> = sites.into_iter().map(|c| c.into()).collect();
        let constraint = Segment::new((0., 0.).into(), (100., 100.).into());
        let mut triangulator = ConformingDelaunayTriangulator::new(sites, 0.);
        triangulator.set_constraints(vec![constraint], Vec::new()).unwrap();
        triangulator.form_initial_delaunay().unwrap();
        triangulator.enforce_constraints().unwrap();

        let pieces = triangulator.constraint_segments().to_vec();
        let total: f64 = pieces.iter().map(|s| s.length()).sum();
        prop_assert!((total - constraint.length()).abs() < 1e-6);

        let vertices = triangulator.vertices();
        for piece in pieces.iter() {
            let midpoint = piece.midpoint();
            let radius = piece.start.distance(midpoint);
            for v in vertices.iter().map(|v| v.coordinate()) {
                if v != piece.start && v != piece.end {
                    prop_assert!(midpoint.distance(v) >= radius);
                }
            }
        }

        // Enforcing again finds nothing to split.
        let sites = triangulator.site_count();
        triangulator.enforce_constraints().unwrap();
        prop_assert_eq!(triangulator.site_count(), sites);
        prop_assert_eq!(triangulator.constraint_segments().len(), pieces.len());
    }
}
