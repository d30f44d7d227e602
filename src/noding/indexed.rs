use super::{check_finite, split_at_nodes, Noder, SegmentNode, SegmentString};
use crate::algorithms::line_intersector::{intersect_segments, SegmentIntersection};
use crate::errors::Result;
use crate::index::{SegmentRTree, DEFAULT_DEGREE};
use crate::BoundingBox;

/// Finds candidate segment pairs with a packed R-tree and nodes them with
/// the robust line intersector.
#[derive(Debug, Clone, Copy)]
pub struct IndexedNoder {
    degree: usize,
}

impl Default for IndexedNoder {
    fn default() -> Self {
        IndexedNoder::new()
    }
}

impl IndexedNoder {
    pub fn new() -> Self {
        IndexedNoder {
            degree: DEFAULT_DEGREE,
        }
    }

    pub fn with_degree(degree: usize) -> Self {
        IndexedNoder {
            degree: degree.max(2),
        }
    }

    /// The nodes each string gets from intersecting every pair of segments.
    pub(crate) fn find_nodes<D>(&self, strings: &[SegmentString<D>]) -> Vec<Vec<SegmentNode>> {
        let mut segments: Vec<(usize, usize)> = Vec::new();
        let mut boxes: Vec<BoundingBox> = Vec::new();
        for (s, string) in strings.iter().enumerate() {
            for (i, (start, end)) in string.segments().enumerate() {
                segments.push((s, i));
                boxes.push(BoundingBox::new(start, end));
            }
        }
        let rtree = SegmentRTree::new_loaded(self.degree, &boxes);

        let mut nodes: Vec<Vec<SegmentNode>> = strings.iter().map(|_| Vec::new()).collect();
        let mut intersections = 0;
        for (a, b) in rtree.query_self_intersections() {
            let (string_a, seg_a) = segments[a];
            let (string_b, seg_b) = segments[b];
            let coords_a = strings[string_a].coords();
            let coords_b = strings[string_b].coords();
            let result = intersect_segments(
                coords_a[seg_a],
                coords_a[seg_a + 1],
                coords_b[seg_b],
                coords_b[seg_b + 1],
            );
            if result.is_none()
                || is_trivial(&strings[string_a], string_a, seg_a, string_b, seg_b, &result)
            {
                continue;
            }
            for point in result.points() {
                intersections += 1;
                nodes[string_a].push(SegmentNode::new(coords_a, seg_a, point));
                nodes[string_b].push(SegmentNode::new(coords_b, seg_b, point));
            }
        }
        tracing::trace!(
            strings = strings.len(),
            segments = boxes.len(),
            intersections,
            "indexed noding"
        );
        nodes
    }
}

/// Adjacent segments of one string always meet at their shared vertex.
fn is_trivial<D>(
    string: &SegmentString<D>,
    string_a: usize,
    seg_a: usize,
    string_b: usize,
    seg_b: usize,
    result: &SegmentIntersection,
) -> bool {
    if string_a != string_b {
        return false;
    }
    let point = match result {
        SegmentIntersection::Point { point, .. } => *point,
        _ => return false,
    };
    let coords = string.coords();
    let (low, high) = if seg_a < seg_b { (seg_a, seg_b) } else { (seg_b, seg_a) };
    if high == low + 1 {
        return point == coords[high];
    }
    // The closing segment of a ring meets the first one at the ring start.
    let last_segment = coords.len() - 2;
    string.is_closed() && low == 0 && high == last_segment && point == coords[0]
}

impl<D: Clone> Noder<D> for IndexedNoder {
    fn compute_nodes(&self, strings: Vec<SegmentString<D>>) -> Result<Vec<SegmentString<D>>> {
        check_finite(&strings)?;
        let nodes = self.find_nodes(&strings);
        let mut out = Vec::new();
        for (string, string_nodes) in strings.iter().zip(nodes) {
            split_at_nodes(string, string_nodes, &mut out);
        }
        Ok(out)
    }
}
