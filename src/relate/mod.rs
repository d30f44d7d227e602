//! The DE-9IM relate engine and the named spatial predicates built on it.
//!
//! Every predicate first compares bounding boxes and returns early when they
//! settle the answer. Axis-aligned rectangles take a direct path for
//! `contains` and `intersects`. Everything else nodes both geometries
//! together and reads the matrix off the labelled arrangement.

pub(crate) mod arrangement;
mod intersection_matrix;
mod locator;
mod rectangle;

pub use intersection_matrix::IntersectionMatrix;

use crate::errors::Result;
use crate::geometry::Geometry;
use crate::noding::IndexedNoder;
use crate::HasBoundingBox;
use arrangement::Arrangement;
use rectangle::{rectangle_contains, rectangle_intersects};

impl Geometry {
    /// The DE-9IM matrix of `self` against `other`. Collections mixing
    /// geometry kinds are rejected.
    pub fn relate(&self, other: &Geometry) -> Result<IntersectionMatrix> {
        self.check_homogeneous()?;
        other.check_homogeneous()?;
        let arrangement = Arrangement::build(self, other, &IndexedNoder::new())?;
        Ok(arrangement.intersection_matrix())
    }

    pub fn relate_pattern(&self, other: &Geometry, pattern: &str) -> Result<bool> {
        self.relate(other)?.matches(pattern)
    }

    pub fn intersects(&self, other: &Geometry) -> Result<bool> {
        if !self.bounding_box().intersects(other.bounding_box()) {
            tracing::trace!("intersects settled by bounding boxes");
            return Ok(false);
        }
        self.check_homogeneous()?;
        other.check_homogeneous()?;
        if self.is_rectangle() {
            return Ok(rectangle_intersects(&self.bounding_box(), other));
        }
        if other.is_rectangle() {
            return Ok(rectangle_intersects(&other.bounding_box(), self));
        }
        Ok(self.relate(other)?.is_intersects())
    }

    pub fn disjoint(&self, other: &Geometry) -> Result<bool> {
        Ok(!self.intersects(other)?)
    }

    pub fn contains(&self, other: &Geometry) -> Result<bool> {
        if !self.may_cover(other) {
            tracing::trace!("contains settled by bounding boxes");
            return Ok(false);
        }
        self.check_homogeneous()?;
        other.check_homogeneous()?;
        if self.is_rectangle() {
            return Ok(rectangle_contains(&self.bounding_box(), other));
        }
        Ok(self.relate(other)?.is_contains())
    }

    pub fn within(&self, other: &Geometry) -> Result<bool> {
        other.contains(self)
    }

    pub fn covers(&self, other: &Geometry) -> Result<bool> {
        if !self.may_cover(other) {
            return Ok(false);
        }
        Ok(self.relate(other)?.is_covers())
    }

    pub fn covered_by(&self, other: &Geometry) -> Result<bool> {
        other.covers(self)
    }

    /// Like `contains`, but `other` may not touch the boundary of `self`.
    pub fn contains_properly(&self, other: &Geometry) -> Result<bool> {
        if !self.may_cover(other) {
            return Ok(false);
        }
        self.relate_pattern(other, "T**FF*FF*")
    }

    pub fn crosses(&self, other: &Geometry) -> Result<bool> {
        if !self.bounding_box().intersects(other.bounding_box()) {
            return Ok(false);
        }
        let matrix = self.relate(other)?;
        Ok(matrix.is_crosses(self.dimension(), other.dimension()))
    }

    pub fn touches(&self, other: &Geometry) -> Result<bool> {
        if !self.bounding_box().intersects(other.bounding_box()) {
            return Ok(false);
        }
        let matrix = self.relate(other)?;
        Ok(matrix.is_touches(self.dimension(), other.dimension()))
    }

    pub fn overlaps(&self, other: &Geometry) -> Result<bool> {
        if !self.bounding_box().intersects(other.bounding_box()) {
            return Ok(false);
        }
        let matrix = self.relate(other)?;
        Ok(matrix.is_overlaps(self.dimension(), other.dimension()))
    }

    /// Topological equality: the same point set, whatever the vertices.
    pub fn equals_topo(&self, other: &Geometry) -> Result<bool> {
        if self.is_empty() && other.is_empty() {
            return Ok(true);
        }
        if self.bounding_box() != other.bounding_box() {
            return Ok(false);
        }
        let matrix = self.relate(other)?;
        Ok(matrix.is_equals(self.dimension(), other.dimension()))
    }

    /// Cheap necessary conditions for `self` to cover `other`.
    fn may_cover(&self, other: &Geometry) -> bool {
        !other.is_empty()
            && other.dimension() <= self.dimension()
            && self.bounding_box().covers(other.bounding_box())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::GeometryError;
    use crate::from_wkt::parse_wkt_one;
    use crate::geometry::GeometryFactory;

    fn geom(wkt_str: &str) -> Geometry {
        parse_wkt_one(&GeometryFactory::default(), wkt_str).unwrap()
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

    fn assert_matrix(a: &Geometry, b: &Geometry, expected: &str) {
        assert_eq!(a.relate(b).unwrap().to_string(), expected);
        let transposed: IntersectionMatrix = expected.parse().unwrap();
        assert_eq!(b.relate(a).unwrap(), transposed.transpose());
    }

    #[test]
    fn test_polygon_contains_point() {
        let square = geom("POLYGON((0 0, 4 0, 4 4, 0 4, 0 0))");
        let center = geom("POINT(2 2)");
        assert_matrix(&square, &center, "0F2FF1FF2");
        assert!(square.relate(&center).unwrap().matches("T*****FF*").unwrap());
        assert!(square.contains(&center).unwrap());
        assert!(center.within(&square).unwrap());
        assert!(!square.contains(&geom("POINT(0 2)")).unwrap());
        assert!(square.covers(&geom("POINT(0 2)")).unwrap());
    }

    #[test]
    fn test_crossing_lines() {
        let a = geom("LINESTRING(0 0, 10 0)");
        let b = geom("LINESTRING(5 -5, 5 5)");
        assert_matrix(&a, &b, "0F1FF0102");
        assert!(a.crosses(&b).unwrap());
        assert!(!a.touches(&b).unwrap());
        assert!(a.intersects(&b).unwrap());
    }

    #[test]
    fn test_touching_lines() {
        let a = geom("LINESTRING(0 0, 5 0)");
        let b = geom("LINESTRING(5 0, 5 5)");
        assert!(a.touches(&b).unwrap());
        assert!(!a.crosses(&b).unwrap());
    }

    #[test]
    fn test_overlapping_lines() {
        let a = geom("LINESTRING(0 0, 6 0)");
        let b = geom("LINESTRING(3 0, 9 0)");
        assert_matrix(&a, &b, "1010F0102");
        assert!(a.overlaps(&b).unwrap());
    }

    #[test]
    fn test_polygons() {
        let a = square(0., 0., 2.);
        assert_matrix(&a, &square(2., 0., 2.), "FF2F11212");
        assert!(a.touches(&square(2., 0., 2.)).unwrap());
        assert_matrix(&a, &square(1., 1., 2.), "212101212");
        assert!(a.overlaps(&square(1., 1., 2.)).unwrap());
        assert_matrix(&a, &square(5., 5., 1.), "FF2FF1212");
    }

    #[test]
    fn test_polygon_with_hole() {
        let holed = geom("POLYGON((0 0, 10 0, 10 10, 0 10, 0 0), (2 2, 2 8, 8 8, 8 2, 2 2))");
        assert!(!holed.contains(&geom("POINT(5 5)")).unwrap());
        assert!(holed.contains(&geom("POINT(1 1)")).unwrap());
        assert!(holed.touches(&geom("POINT(2 5)")).unwrap());
        assert!(!holed.intersects(&square(3., 3., 1.)).unwrap());
        assert!(holed.intersects(&square(1., 1., 2.)).unwrap());
    }

    #[test]
    fn test_line_in_polygon() {
        let triangle = geom("POLYGON((0 0, 10 0, 0 10, 0 0))");
        let inner = geom("LINESTRING(1 1, 3 3)");
        let edge = geom("LINESTRING(0 0, 10 0)");
        assert!(triangle.contains(&inner).unwrap());
        assert!(!triangle.contains(&edge).unwrap());
        assert!(triangle.covers(&edge).unwrap());
        assert!(triangle.crosses(&geom("LINESTRING(1 1, 9 9)")).unwrap());
        assert!(triangle.contains_properly(&inner).unwrap());
        assert!(!triangle
            .contains_properly(&geom("LINESTRING(0 1, 3 3)"))
            .unwrap());
    }

    #[test]
    fn test_rectangle_boundary_is_not_contained() {
        let rectangle = square(0., 0., 4.);
        let edge = geom("LINESTRING(0 0, 4 0)");
        assert!(!rectangle.contains(&edge).unwrap());
        assert!(rectangle.contains(&geom("LINESTRING(1 1, 3 2)")).unwrap());
        // The general path agrees with the rectangle shortcut.
        assert!(!rectangle.relate(&edge).unwrap().is_contains());
    }

    #[test]
    fn test_equals_topo() {
        let a = square(0., 0., 2.);
        let b = geom("POLYGON((2 2, 0 2, 0 0, 1 0, 2 0, 2 2))");
        assert!(a.equals_topo(&b).unwrap());
        assert!(!a.equals_exact(&b));
        assert!(!a.equals_topo(&square(0., 0., 3.)).unwrap());
    }

    #[test]
    fn test_multi_point() {
        let points = geom("MULTIPOINT(1 1, 5 5)");
        let square = square(0., 0., 2.);
        assert!(points.intersects(&square).unwrap());
        assert!(!square.contains(&points).unwrap());
        assert!(points.crosses(&square).unwrap());
    }

    #[test]
    fn test_overlapping_polygons_in_collection() {
        let collection = geom(
            "GEOMETRYCOLLECTION(POLYGON((0 0, 2 0, 2 2, 0 2, 0 0)), \
             POLYGON((1 1, 3 1, 3 3, 1 3, 1 1)))",
        );
        let shared = geom("POINT(1.5 1.5)");
        assert_matrix(&collection, &shared, "0F2FF1FF2");
        assert_eq!(
            shared.relate(&collection).unwrap().to_string(),
            "0FFFFF212"
        );
        assert!(collection.contains(&shared).unwrap());
        assert!(collection.intersects(&shared).unwrap());
        // On one member's edge, inside the other.
        assert!(collection.contains(&geom("POINT(1.5 1)")).unwrap());
        assert!(collection.touches(&geom("POINT(3 2)")).unwrap());

        let outline = geom("POLYGON((0 0, 2 0, 2 1, 3 1, 3 3, 1 3, 1 2, 0 2, 0 0))");
        assert_matrix(&collection, &outline, "2FFF1FFF2");
        assert!(collection.equals_topo(&outline).unwrap());
    }

    #[test]
    fn test_edge_sharing_polygons_in_collection() {
        let collection = geom(
            "GEOMETRYCOLLECTION(POLYGON((0 0, 1 0, 1 1, 0 1, 0 0)), \
             POLYGON((1 0, 2 0, 2 1, 1 1, 1 0)))",
        );
        let on_shared_edge = geom("POINT(1 0.5)");
        assert_matrix(&collection, &on_shared_edge, "0F2FF1FF2");
        assert!(collection.contains(&on_shared_edge).unwrap());
        assert!(collection.contains(&geom("LINESTRING(1 0.2, 1 0.8)")).unwrap());

        let rectangle = square(0., 0., 1.).union(&square(1., 0., 1.)).unwrap();
        assert!(collection.equals_topo(&rectangle).unwrap());
        assert!(collection
            .equals_topo(&geom("POLYGON((0 0, 2 0, 2 1, 0 1, 0 0))"))
            .unwrap());
    }

    #[test]
    fn test_empty_operands() {
        let empty = geom("POLYGON EMPTY");
        let square = square(0., 0., 2.);
        assert!(!square.intersects(&empty).unwrap());
        assert!(square.disjoint(&empty).unwrap());
        assert!(!square.contains(&empty).unwrap());
        assert!(empty.equals_topo(&geom("POINT EMPTY")).unwrap());
        assert_eq!(square.relate(&empty).unwrap().to_string(), "FF2FF1FF2");
    }

    #[test]
    fn test_heterogeneous_collection() {
        let mixed = geom("GEOMETRYCOLLECTION(POINT(1 1), LINESTRING(0 0, 2 2))");
        let square = square(0., 0., 2.);
        assert_eq!(
            square.relate(&mixed),
            Err(GeometryError::UnsupportedGeometryCollection)
        );
        assert_eq!(
            square.intersects(&mixed),
            Err(GeometryError::UnsupportedGeometryCollection)
        );
        // Disjoint boxes settle the answer before the collection is examined.
        let far = geom("GEOMETRYCOLLECTION(POINT(100 100), LINESTRING(100 0, 100 1))");
        assert_eq!(square.intersects(&far), Ok(false));
        let homogeneous = geom("GEOMETRYCOLLECTION(POINT(1 1), POINT(3 3))");
        assert!(square.intersects(&homogeneous).unwrap());
    }

    #[test]
    fn test_invalid_pattern() {
        let a = geom("POINT(0 0)");
        assert!(a.relate_pattern(&a, "T*F").is_err());
        assert!(a.relate_pattern(&a, "0FFFFFFF2").unwrap());
    }
}
