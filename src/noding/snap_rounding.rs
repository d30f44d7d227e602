use super::{check_finite, split_at_nodes, IndexedNoder, Noder, SegmentNode, SegmentString};
use crate::algorithms::line_intersector::projection_factor;
use crate::errors::Result;
use crate::index::KdTree;
use crate::{BoundingBox, Coordinate};
use std::collections::HashMap;

/// Half the side of a hot pixel on the unit grid.
const PIXEL_HALF_SIZE: f64 = 0.5;

/// Snap-rounding on the unit integer grid. Every vertex and every
/// intersection rounds to the center of its hot pixel, and each segment is
/// rerouted through the centers of all hot pixels it passes through. Meant
/// to run behind a `ScaledNoder` that maps the working precision onto
/// integers.
#[derive(Debug, Clone, Copy, Default)]
pub struct SnapRoundingNoder {
    finder: IndexedNoder,
}

impl SnapRoundingNoder {
    pub fn new() -> Self {
        SnapRoundingNoder {
            finder: IndexedNoder::new(),
        }
    }

    fn hot_pixels<D>(&self, strings: &[SegmentString<D>]) -> KdTree<()> {
        let mut pixels = KdTree::new(0.);
        for string in strings {
            for c in string.coords() {
                pixels.insert(*c, ());
            }
        }
        for node in self.finder.find_nodes(strings).into_iter().flatten() {
            pixels.insert(round(node.point), ());
        }
        pixels
    }

    fn snap_string<D: Clone>(pixels: &KdTree<()>, string: &SegmentString<D>) -> SegmentString<D> {
        let coords = string.coords();
        let mut snapped: Vec<Coordinate> = Vec::with_capacity(coords.len());
        for (start, end) in string.segments() {
            snapped.push(start);
            let search = BoundingBox::new(start, end).expanded_by(PIXEL_HALF_SIZE);
            let mut crossed: Vec<(f64, Coordinate)> = pixels
                .query(search)
                .into_iter()
                .map(|node| node.coordinate())
                .filter(|&center| center != start && center != end)
                .filter(|&center| {
                    BoundingBox::of_point(center)
                        .expanded_by(PIXEL_HALF_SIZE)
                        .intersect_segment(start, end)
                        .is_some()
                })
                .map(|center| (projection_factor(center, start, end), center))
                .collect();
            crossed.sort_by(|a, b| a.0.total_cmp(&b.0));
            snapped.extend(crossed.into_iter().map(|(_, c)| c));
        }
        if let Some(last) = coords.last() {
            snapped.push(*last);
        }
        SegmentString::new(snapped, string.data().clone()).remove_repeated()
    }
}

fn round(c: Coordinate) -> Coordinate {
    Coordinate::new(c.x.round(), c.y.round())
}

impl<D: Clone> Noder<D> for SnapRoundingNoder {
    fn compute_nodes(&self, strings: Vec<SegmentString<D>>) -> Result<Vec<SegmentString<D>>> {
        check_finite(&strings)?;
        let strings: Vec<SegmentString<D>> = strings
            .into_iter()
            .map(|s| s.map_coords(round).remove_repeated())
            .collect();
        let pixels = self.hot_pixels(&strings);
        let snapped: Vec<SegmentString<D>> = strings
            .iter()
            .map(|s| Self::snap_string(&pixels, s))
            .collect();

        // A vertex used more than once, by any string, is a node.
        let mut uses: HashMap<(u64, u64), usize> = HashMap::new();
        for string in snapped.iter() {
            let coords = string.coords();
            let distinct = if string.is_closed() {
                &coords[..coords.len() - 1]
            } else {
                coords
            };
            for c in distinct {
                *uses.entry(c.key()).or_insert(0) += 1;
            }
        }

        let mut out = Vec::new();
        for string in snapped.iter() {
            let coords = string.coords();
            let nodes: Vec<SegmentNode> = coords
                .iter()
                .enumerate()
                .skip(1)
                .filter(|(_, c)| uses.get(&c.key()).copied().unwrap_or(0) > 1)
                .map(|(i, c)| SegmentNode::new(coords, i, *c))
                .collect();
            split_at_nodes(string, nodes, &mut out);
        }
        tracing::trace!(
            strings = snapped.len(),
            pixels = pixels.len(),
            pieces = out.len(),
            "snap-rounded noding"
        );
        Ok(out)
    }
}
