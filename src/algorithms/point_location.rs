use super::orientation::orientation_index;
use crate::geometry::Polygon;
use crate::{Coordinate, HasBoundingBox};

/// Where a point sits relative to a geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Location {
    Interior,
    Boundary,
    Exterior,
}

impl Location {
    pub(crate) fn index(self) -> usize {
        match self {
            Location::Interior => 0,
            Location::Boundary => 1,
            Location::Exterior => 2,
        }
    }
}

/// Counts crossings of the rightward horizontal ray from a point, one
/// segment at a time. Ring orientation does not matter, so shells and holes
/// of any number of polygons can be fed in together.
#[derive(Debug, Clone)]
pub struct RayCrossingCounter {
    point: Coordinate,
    crossings: usize,
    on_segment: bool,
}

impl RayCrossingCounter {
    pub fn new(point: Coordinate) -> Self {
        RayCrossingCounter {
            point,
            crossings: 0,
            on_segment: false,
        }
    }

    pub fn count_segment(&mut self, p1: Coordinate, p2: Coordinate) {
        let p = self.point;
        if p1.x < p.x && p2.x < p.x {
            return;
        }
        if p == p2 || p == p1 {
            self.on_segment = true;
            return;
        }
        if p1.y == p.y && p2.y == p.y {
            let (min_x, max_x) = if p1.x < p2.x { (p1.x, p2.x) } else { (p2.x, p1.x) };
            if p.x >= min_x && p.x <= max_x {
                self.on_segment = true;
            }
            return;
        }
        if (p1.y > p.y && p2.y <= p.y) || (p2.y > p.y && p1.y <= p.y) {
            let mut orientation = orientation_index(p1, p2, p);
            if orientation == 0 {
                self.on_segment = true;
                return;
            }
            if p2.y < p1.y {
                orientation = -orientation;
            }
            if orientation > 0 {
                self.crossings += 1;
            }
        }
    }

    pub fn location(&self) -> Location {
        if self.on_segment {
            Location::Boundary
        } else if self.crossings % 2 == 1 {
            Location::Interior
        } else {
            Location::Exterior
        }
    }
}

pub fn locate_in_ring(point: Coordinate, ring: &[Coordinate]) -> Location {
    let mut counter = RayCrossingCounter::new(point);
    for w in ring.windows(2) {
        counter.count_segment(w[0], w[1]);
    }
    counter.location()
}

pub fn locate_in_polygon(point: Coordinate, polygon: &Polygon) -> Location {
    if !polygon.bounding_box().contains(point) {
        return Location::Exterior;
    }
    let mut counter = RayCrossingCounter::new(point);
    for ring in polygon.rings() {
        for (start, end) in ring.segments() {
            counter.count_segment(start, end);
        }
    }
    counter.location()
}
