use crate::algorithms::{locate_in_polygon, Location};
use crate::geometry::{Geometry, Polygon};
use crate::{BoundingBox, Coordinate, CoordinateSequence, HasBoundingBox};

/// Whether a rectangle contains `other`: it must lie inside the rectangle
/// without lying wholly within its boundary.
pub(crate) fn rectangle_contains(rectangle: &BoundingBox, other: &Geometry) -> bool {
    if other.is_empty() || !rectangle.covers(other.bounding_box()) {
        return false;
    }
    !in_boundary(rectangle, other)
}

fn in_boundary(rectangle: &BoundingBox, geometry: &Geometry) -> bool {
    match geometry {
        Geometry::Polygon(_) | Geometry::MultiPolygon(_) => false,
        Geometry::GeometryCollection(c) => c.iter().all(|g| in_boundary(rectangle, g)),
        _ => geometry
            .coordinate_sequences()
            .into_iter()
            .all(|s| sequence_in_boundary(rectangle, s)),
    }
}

fn sequence_in_boundary(rectangle: &BoundingBox, sequence: &CoordinateSequence) -> bool {
    match sequence.len() {
        0 => true,
        1 => point_in_boundary(rectangle, sequence.coordinate(0)),
        n => (1..n).all(|i| {
            segment_in_boundary(rectangle, sequence.coordinate(i - 1), sequence.coordinate(i))
        }),
    }
}

/// Assumes the point lies within the rectangle.
fn point_in_boundary(rectangle: &BoundingBox, point: Coordinate) -> bool {
    point.x == rectangle.x_min
        || point.x == rectangle.x_max
        || point.y == rectangle.y_min
        || point.y == rectangle.y_max
}

fn segment_in_boundary(rectangle: &BoundingBox, start: Coordinate, end: Coordinate) -> bool {
    if start == end {
        point_in_boundary(rectangle, start)
    } else if start.x == end.x {
        start.x == rectangle.x_min || start.x == rectangle.x_max
    } else if start.y == end.y {
        start.y == rectangle.y_min || start.y == rectangle.y_max
    } else {
        false
    }
}

/// Whether a rectangle and `other` share any point.
pub(crate) fn rectangle_intersects(rectangle: &BoundingBox, other: &Geometry) -> bool {
    if !rectangle.intersects(other.bounding_box()) {
        return false;
    }
    if other.vertices().any(|v| rectangle.contains(v)) {
        return true;
    }
    let mut polygons = Vec::new();
    collect_polygons(other, &mut polygons);
    let corner_inside = rectangle.corners().iter().any(|corner| {
        polygons
            .iter()
            .any(|p| locate_in_polygon(*corner, p) != Location::Exterior)
    });
    if corner_inside {
        return true;
    }
    other.coordinate_sequences().into_iter().any(|s| {
        (1..s.len()).any(|i| {
            rectangle
                .intersect_segment(s.coordinate(i - 1), s.coordinate(i))
                .is_some()
        })
    })
}

fn collect_polygons<'a>(geometry: &'a Geometry, out: &mut Vec<&'a Polygon>) {
    match geometry {
        Geometry::Polygon(p) => out.push(p),
        Geometry::MultiPolygon(m) => out.extend(m.iter()),
        Geometry::GeometryCollection(c) => {
            for g in c.iter() {
                collect_polygons(g, out);
            }
        }
        _ => {}
    }
}
