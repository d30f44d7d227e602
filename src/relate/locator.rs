use crate::algorithms::line_intersector::point_on_segment;
use crate::algorithms::{Location, RayCrossingCounter};
use crate::index::Quadtree;
use crate::{BoundingBox, Coordinate};
use std::iter::once;

/// Above this many segments, lookups go through a quadtree.
const INDEX_THRESHOLD: usize = 64;

/// Locates points against a fixed set of segments: as a ray-crossing area
/// test against rings, or as an on-segment test against lines.
#[derive(Debug, Clone)]
pub(crate) struct SegmentLocator {
    extent: BoundingBox,
    segments: Vec<(Coordinate, Coordinate)>,
    index: Option<Quadtree<usize>>,
}

impl SegmentLocator {
    pub(crate) fn new(segments: Vec<(Coordinate, Coordinate)>) -> Self {
        let extent =
            BoundingBox::of_coordinates(segments.iter().flat_map(|&(a, b)| once(a).chain(once(b))));
        let index = if segments.len() > INDEX_THRESHOLD {
            let mut tree = Quadtree::new();
            for (i, (start, end)) in segments.iter().enumerate() {
                tree.insert(BoundingBox::new(*start, *end), i);
            }
            Some(tree)
        } else {
            None
        };
        SegmentLocator {
            extent,
            segments,
            index,
        }
    }

    fn for_each_candidate<F: FnMut(Coordinate, Coordinate)>(&self, bbox: BoundingBox, mut f: F) {
        match &self.index {
            Some(tree) => {
                for i in tree.query(bbox) {
                    let (start, end) = self.segments[*i];
                    f(start, end);
                }
            }
            None => {
                for (start, end) in self.segments.iter() {
                    f(*start, *end);
                }
            }
        }
    }

    /// Location of `point` in the area bounded by the segments, which must
    /// form closed rings.
    pub(crate) fn locate_area(&self, point: Coordinate) -> Location {
        if !self.extent.contains(point) {
            return Location::Exterior;
        }
        let ray = BoundingBox::new(point, Coordinate::new(self.extent.x_max, point.y));
        let mut counter = RayCrossingCounter::new(point);
        self.for_each_candidate(ray, |start, end| counter.count_segment(start, end));
        counter.location()
    }

    pub(crate) fn on_segment(&self, point: Coordinate) -> bool {
        if !self.extent.contains(point) {
            return false;
        }
        let mut found = false;
        self.for_each_candidate(BoundingBox::of_point(point), |start, end| {
            found = found || point_on_segment(point, start, end);
        });
        found
    }
}
