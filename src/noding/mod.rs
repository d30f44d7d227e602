mod indexed;
mod scaled;
mod snap_rounding;

pub use indexed::IndexedNoder;
pub use scaled::ScaledNoder;
pub use snap_rounding::SnapRoundingNoder;

use crate::errors::{GeometryError, Result};
use crate::Coordinate;
use std::cmp::Ordering;

/// A run of vertices carrying caller data through noding unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentString<D> {
    coords: Vec<Coordinate>,
    data: D,
}

impl<D> SegmentString<D> {
    pub fn new(coords: Vec<Coordinate>, data: D) -> Self {
        SegmentString { coords, data }
    }

    pub fn coords(&self) -> &[Coordinate] {
        &self.coords
    }

    pub fn data(&self) -> &D {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.coords.len() > 1 && self.coords.first() == self.coords.last()
    }

    pub fn segments(&self) -> impl Iterator<Item = (Coordinate, Coordinate)> + '_ {
        self.coords.windows(2).map(|w| (w[0], w[1]))
    }

    pub fn into_parts(self) -> (Vec<Coordinate>, D) {
        (self.coords, self.data)
    }

    pub(crate) fn map_coords<F: Fn(Coordinate) -> Coordinate>(self, f: F) -> Self {
        SegmentString {
            coords: self.coords.into_iter().map(f).collect(),
            data: self.data,
        }
    }

    /// Drop consecutive duplicate vertices.
    pub(crate) fn remove_repeated(mut self) -> Self {
        self.coords.dedup();
        self
    }
}

/// Computes a noding of a set of segment strings: every intersection
/// between input segments becomes a vertex of the output, and output strings
/// run between consecutive nodes.
pub trait Noder<D> {
    fn compute_nodes(&self, strings: Vec<SegmentString<D>>) -> Result<Vec<SegmentString<D>>>;
}

pub(crate) fn check_finite<D>(strings: &[SegmentString<D>]) -> Result<()> {
    if strings
        .iter()
        .all(|s| s.coords().iter().all(|c| c.is_finite()))
    {
        Ok(())
    } else {
        Err(GeometryError::NotRepresentable)
    }
}

/// A node on a segment string: the index of the segment it lies on, its
/// distance from that segment's start, and its position. A node on a vertex
/// is always attributed to the segment starting there.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SegmentNode {
    segment: usize,
    distance: f64,
    point: Coordinate,
}

impl SegmentNode {
    pub(crate) fn new(coords: &[Coordinate], segment: usize, point: Coordinate) -> Self {
        if segment + 1 < coords.len() && point == coords[segment + 1] {
            SegmentNode {
                segment: segment + 1,
                distance: 0.,
                point,
            }
        } else {
            SegmentNode {
                segment,
                distance: coords[segment].distance(point),
                point,
            }
        }
    }

    fn compare(&self, other: &SegmentNode) -> Ordering {
        self.segment
            .cmp(&other.segment)
            .then_with(|| self.distance.total_cmp(&other.distance))
    }
}

/// Split `string` at its endpoints and at `nodes`.
pub(crate) fn split_at_nodes<D: Clone>(
    string: &SegmentString<D>,
    mut nodes: Vec<SegmentNode>,
    out: &mut Vec<SegmentString<D>>,
) {
    let coords = string.coords();
    if coords.len() < 2 {
        return;
    }
    nodes.push(SegmentNode::new(coords, 0, coords[0]));
    let last = coords.len() - 1;
    nodes.push(SegmentNode {
        segment: last,
        distance: 0.,
        point: coords[last],
    });
    nodes.sort_by(|a, b| a.compare(b));
    nodes.dedup_by(|b, a| a.segment == b.segment && a.point == b.point);

    for pair in nodes.windows(2) {
        let (start, end) = (pair[0], pair[1]);
        let mut piece = vec![start.point];
        for vertex in coords.iter().take(end.segment + 1).skip(start.segment + 1) {
            piece.push(*vertex);
        }
        piece.push(end.point);
        piece.dedup();
        if piece.len() > 1 {
            out.push(SegmentString::new(piece, string.data().clone()));
        }
    }
}
