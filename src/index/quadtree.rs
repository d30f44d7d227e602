use crate::BoundingBox;

/// Insertion stops descending after this many levels below the root.
const MAX_DEPTH: usize = 32;

#[derive(Debug, Clone)]
struct QuadNode<T> {
    /// Square cell covered by this node.
    cell: BoundingBox,
    items: Vec<(BoundingBox, T)>,
    children: [Option<Box<QuadNode<T>>>; 4],
}

impl<T> QuadNode<T> {
    fn new(cell: BoundingBox) -> Self {
        QuadNode {
            cell,
            items: Vec::new(),
            children: [None, None, None, None],
        }
    }

    fn size(&self) -> f64 {
        self.cell.width()
    }

    /// The quadrant wholly covering `bbox`, if any: bit 0 is east, bit 1 north.
    fn quadrant_of(&self, bbox: &BoundingBox) -> Option<usize> {
        let center = self.cell.center();
        let east = if bbox.x_min >= center.x {
            1
        } else if bbox.x_max <= center.x {
            0
        } else {
            return None;
        };
        let north = if bbox.y_min >= center.y {
            2
        } else if bbox.y_max <= center.y {
            0
        } else {
            return None;
        };
        Some(east | north)
    }

    fn quadrant_cell(&self, quadrant: usize) -> BoundingBox {
        let half = self.size() / 2.;
        let x_min = self.cell.x_min + if quadrant & 1 == 1 { half } else { 0. };
        let y_min = self.cell.y_min + if quadrant & 2 == 2 { half } else { 0. };
        BoundingBox {
            x_min,
            y_min,
            x_max: x_min + half,
            y_max: y_min + half,
        }
    }
}

/// A region quadtree keyed by bounding boxes, holding any payload. Each item
/// lives in the smallest cell that covers its box; the root cell doubles in
/// size whenever an item falls outside it.
#[derive(Debug, Clone)]
pub struct Quadtree<T> {
    root: Option<QuadNode<T>>,
    min_extent: f64,
    len: usize,
}

impl<T> Default for Quadtree<T> {
    fn default() -> Self {
        Quadtree::new()
    }
}

impl<T> Quadtree<T> {
    pub fn new() -> Self {
        Quadtree::with_min_extent(0.)
    }

    /// Cells are never split below `min_extent`.
    pub fn with_min_extent(min_extent: f64) -> Self {
        Quadtree {
            root: None,
            min_extent: min_extent.max(0.),
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Items with an empty or unbounded box are dropped.
    pub fn insert(&mut self, bbox: BoundingBox, item: T) {
        let bounded = [bbox.x_min, bbox.y_min, bbox.x_max, bbox.y_max]
            .iter()
            .all(|v| v.is_finite());
        if !bounded {
            return;
        }
        self.len += 1;
        let min_extent = self.min_extent;
        let root = self.grow_to_cover(&bbox);
        let mut node = root;
        for _ in 0..MAX_DEPTH {
            let quadrant = match node.quadrant_of(&bbox) {
                Some(q) if node.size() / 2. > min_extent => q,
                _ => break,
            };
            let cell = node.quadrant_cell(quadrant);
            node = node.children[quadrant]
                .get_or_insert_with(|| Box::new(QuadNode::new(cell)))
                .as_mut();
        }
        node.items.push((bbox, item));
    }

    fn grow_to_cover(&mut self, bbox: &BoundingBox) -> &mut QuadNode<T> {
        let min_extent = self.min_extent;
        let mut root = match self.root.take() {
            Some(root) => root,
            None => {
                let size = bbox.width().max(bbox.height()).max(min_extent).max(1.);
                let corner = bbox.center();
                let half = size / 2.;
                QuadNode::new(BoundingBox::new(
                    (corner.x - half, corner.y - half).into(),
                    (corner.x + half, corner.y + half).into(),
                ))
            }
        };
        while !root.cell.covers(*bbox) {
            let size = root.size();
            let grow_west = bbox.x_min < root.cell.x_min;
            let grow_south = bbox.y_min < root.cell.y_min;
            let x_min = if grow_west { root.cell.x_min - size } else { root.cell.x_min };
            let y_min = if grow_south { root.cell.y_min - size } else { root.cell.y_min };
            let mut parent = QuadNode::new(BoundingBox {
                x_min,
                y_min,
                x_max: x_min + 2. * size,
                y_max: y_min + 2. * size,
            });
            let quadrant = (if grow_west { 1 } else { 0 }) | (if grow_south { 2 } else { 0 });
            tracing::trace!(size = 2. * size, "quadtree root grew");
            parent.children[quadrant] = Some(Box::new(root));
            root = parent;
        }
        self.root.get_or_insert(root)
    }

    /// Every item whose box intersects `bbox`.
    pub fn query(&self, bbox: BoundingBox) -> Vec<&T> {
        self.query_filtered(bbox, |_, _| true)
    }

    /// Every item whose box intersects `bbox` and which passes `filter`.
    pub fn query_filtered<F>(&self, bbox: BoundingBox, filter: F) -> Vec<&T>
    where
        F: Fn(&BoundingBox, &T) -> bool,
    {
        let mut results = Vec::new();
        if bbox.is_empty() {
            return results;
        }
        let mut stack: Vec<&QuadNode<T>> = self.root.iter().collect();
        while let Some(node) = stack.pop() {
            if !node.cell.intersects(bbox) {
                continue;
            }
            for (item_box, item) in node.items.iter() {
                if item_box.intersects(bbox) && filter(item_box, item) {
                    results.push(item);
                }
            }
            stack.extend(node.children.iter().flatten().map(|c| c.as_ref()));
        }
        results
    }

    /// Every item, in no particular order.
    pub fn items(&self) -> Vec<&T> {
        let mut results = Vec::new();
        let mut stack: Vec<&QuadNode<T>> = self.root.iter().collect();
        while let Some(node) = stack.pop() {
            results.extend(node.items.iter().map(|(_, item)| item));
            stack.extend(node.children.iter().flatten().map(|c| c.as_ref()));
        }
        results
    }

    /// The cell covered by the root, or the empty box.
    pub fn extent(&self) -> BoundingBox {
        self.root
            .as_ref()
            .map(|r| r.cell)
            .unwrap_or_else(BoundingBox::new_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Coordinate;

    fn bbox(a: (f64, f64), b: (f64, f64)) -> BoundingBox {
        BoundingBox::new(a.into(), b.into())
    }

    fn assert_query(tree: &Quadtree<usize>, query: BoundingBox, expected: Vec<usize>) {
        let mut actual: Vec<usize> = tree.query(query).into_iter().copied().collect();
        actual.sort_unstable();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_query() {
        let mut tree = Quadtree::new();
        tree.insert(bbox((0., 0.), (1., 1.)), 0);
        tree.insert(bbox((5., 5.), (6., 6.)), 1);
        tree.insert(bbox((-10., -10.), (-9., -9.)), 2);
        tree.insert(bbox((0.5, 0.5), (5.5, 5.5)), 3);
        assert_eq!(tree.len(), 4);
        assert_query(&tree, bbox((0.9, 0.9), (1.1, 1.1)), vec![0, 3]);
        assert_query(&tree, bbox((-20., -20.), (20., 20.)), vec![0, 1, 2, 3]);
        assert_query(&tree, bbox((-9.5, -9.5), (-9.5, -9.5)), vec![2]);
        assert_query(&tree, bbox((100., 100.), (101., 101.)), vec![]);
    }

    #[test]
    fn test_root_grows_to_cover() {
        let mut tree = Quadtree::new();
        tree.insert(BoundingBox::of_point((0., 0.).into()), 0);
        let first = tree.extent();
        tree.insert(BoundingBox::of_point((1000., -1000.).into()), 1);
        let grown = tree.extent();
        assert!(grown.covers(first));
        assert!(grown.contains((1000., -1000.).into()));
        assert_query(&tree, bbox((999., -1001.), (1001., -999.)), vec![1]);
        assert_query(&tree, bbox((-1., -1.), (1., 1.)), vec![0]);
    }

    #[test]
    fn test_filtered_query() {
        let mut tree = Quadtree::new();
        let points: Vec<Coordinate> = vec![(0., 0.).into(), (1., 1.).into(), (0.9, 0.1).into()];
        for (i, p) in points.iter().enumerate() {
            tree.insert(BoundingBox::of_point(*p), i);
        }
        let center: Coordinate = (0., 0.).into();
        let near = tree.query_filtered(bbox((-1., -1.), (1., 1.)), |b, _| {
            b.center().distance(center) <= 1.
        });
        let mut near: Vec<usize> = near.into_iter().copied().collect();
        near.sort_unstable();
        assert_eq!(near, vec![0, 2]);
    }

    #[test]
    fn test_empty_box_is_dropped() {
        let mut tree = Quadtree::new();
        tree.insert(BoundingBox::new_empty(), 0);
        assert!(tree.is_empty());
        assert!(tree.items().is_empty());
    }
}
