use planar_kernel::algorithms::{Location, RayCrossingCounter};
use planar_kernel::Coordinate;
use rstar::{RTree, RTreeObject, AABB};

pub struct Segment {
    start: Coordinate,
    end: Coordinate,
}

impl RTreeObject for Segment {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners([self.start.x, self.start.y], [self.end.x, self.end.y])
    }
}

pub(crate) fn build_rstar(coords: &[Coordinate]) -> RTree<Segment> {
    RTree::bulk_load(
        coords
            .windows(2)
            .map(|w| Segment {
                start: w[0],
                end: w[1],
            })
            .collect(),
    )
}

pub(crate) fn build_rstar_points(points: &[Coordinate]) -> RTree<[f64; 2]> {
    RTree::bulk_load(points.iter().map(|p| [p.x, p.y]).collect())
}

pub(crate) fn point_in_polygon_rstar(point: Coordinate, rtree: &RTree<Segment>) -> bool {
    let mut counter = RayCrossingCounter::new(point);
    let ray = AABB::from_corners([point.x, point.y], [f64::INFINITY, point.y]);
    for seg in rtree.locate_in_envelope_intersecting(&ray) {
        counter.count_segment(seg.start, seg.end);
    }
    counter.location() != Location::Exterior
}
