use crate::BoundingBox;

pub const DEFAULT_DEGREE: usize = 16;

/// A bulk-loaded, packed R-tree over segment boxes. Level 0 holds the input
/// boxes in order; each higher level holds the union of `degree` children.
/// Unused slots hold the empty box, which intersects nothing.
#[derive(Debug, Clone)]
pub struct SegmentRTree {
    degree: usize,
    size: usize,
    height: usize,
    level_indices: Vec<usize>,
    tree: Vec<BoundingBox>,
}

impl SegmentRTree {
    pub fn new_loaded(degree: usize, boxes: &[BoundingBox]) -> Self {
        let degree = degree.max(2);
        let size = boxes.len();
        let level_indices = calculate_level_indices(degree, size);
        let tree_size = level_indices[level_indices.len() - 1] + 1;
        let mut tree = vec![BoundingBox::new_empty(); tree_size];
        copy_into_tree(&mut tree, 0, boxes);

        for level in 1..level_indices.len() {
            let level_index = level_indices[level];
            let previous_items = &tree[level_indices[level - 1]..level_index];
            let next_items: Vec<BoundingBox> = previous_items
                .chunks(degree)
                .map(|items| BoundingBox::of(items))
                .collect();
            copy_into_tree(&mut tree, level_index, &next_items);
        }

        tree.shrink_to_fit();
        SegmentRTree {
            degree,
            size,
            height: level_indices.len() - 1,
            level_indices,
            tree,
        }
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn bounding_box(&self) -> BoundingBox {
        if self.is_empty() {
            BoundingBox::new_empty()
        } else {
            self.get_rectangle(self.height, 0)
        }
    }

    /// Indices of the boxes intersecting `bbox`.
    pub fn query_rect(&self, bbox: BoundingBox) -> Vec<usize> {
        let mut results = Vec::new();
        if self.size == 0 {
            return results;
        }

        // Stack entries: (level, offset)
        let mut stack = vec![(self.height, 0)];
        while let Some((level, offset)) = stack.pop() {
            if !self.get_rectangle(level, offset).intersects(bbox) {
                continue;
            }
            if level == 0 {
                results.push(offset);
            } else {
                let child_level = level - 1;
                let first_child_offset = self.degree * offset;
                for child_offset in first_child_offset..(first_child_offset + self.degree) {
                    stack.push((child_level, child_offset));
                }
            }
        }

        results
    }

    /// Every pair `(a, b)` with `a < b` whose boxes intersect.
    pub fn query_self_intersections(&self) -> Vec<(usize, usize)> {
        let mut results = Vec::new();
        if self.size == 0 {
            return results;
        }

        // Stack entries: (level_a, offset_a, level_b, offset_b)
        let mut stack = vec![(self.height, 0, self.height, 0)];

        while let Some((level_a, offset_a, level_b, offset_b)) = stack.pop() {
            let rect_a = self.get_rectangle(level_a, offset_a);
            let rect_b = self.get_rectangle(level_b, offset_b);
            if !rect_a.intersects(rect_b) {
                continue;
            }

            if level_a == 0 && level_b == 0 {
                if offset_a < offset_b {
                    results.push((offset_a, offset_b));
                }
            } else if level_a == level_b {
                let child_level = level_a - 1;
                let first_child_offset = self.degree * offset_a;
                for child_offset in first_child_offset..(first_child_offset + self.degree) {
                    stack.push((child_level, child_offset, level_b, offset_b));
                }
            } else {
                let child_level = level_b - 1;
                let first_child_offset = self.degree * offset_b;
                let last_child_offset = first_child_offset + self.degree;
                for child_offset in first_child_offset..last_child_offset {
                    stack.push((level_a, offset_a, child_level, child_offset));
                }
            }
        }

        results
    }

    fn get_rectangle(&self, level: usize, offset: usize) -> BoundingBox {
        self.tree
            .get(self.level_indices[level] + offset)
            .copied()
            .unwrap_or_else(BoundingBox::new_empty)
    }
}

fn calculate_level_indices(degree: usize, num_items: usize) -> Vec<usize> {
    let mut level_indices: Vec<usize> = vec![0];

    let mut level = 0;
    let mut level_size = num_items;

    while level_size > 1 {
        let level_buffer = if level_size % degree > 0 { 1 } else { 0 };
        // least multiple of degree >= level_size
        let level_capacity = degree * (level_size / degree + level_buffer);
        level_indices.push(level_indices[level] + level_capacity);
        level += 1;
        level_size = level_capacity / degree;
    }
    level_indices
}

fn copy_into_tree(tree: &mut [BoundingBox], index: usize, boxes: &[BoundingBox]) {
    let (_, subtree) = tree.split_at_mut(index);
    let (subtree, _) = subtree.split_at_mut(boxes.len());
    subtree.copy_from_slice(boxes);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point_boxes(n: usize) -> Vec<BoundingBox> {
        (0..n)
            .map(|i| BoundingBox::of_point((i as f64, i as f64).into()))
            .collect()
    }

    fn assert_sorted_query(tree: &SegmentRTree, bbox: BoundingBox, expected: Vec<usize>) {
        let mut results = tree.query_rect(bbox);
        results.sort_unstable();
        assert_eq!(results, expected);
    }

    #[test]
    fn test_level_indices() {
        assert_eq!(calculate_level_indices(2, 0), vec![0]);
        assert_eq!(calculate_level_indices(2, 1), vec![0]);
        assert_eq!(calculate_level_indices(2, 6), vec![0, 6, 10, 12]);
        assert_eq!(calculate_level_indices(16, 20), vec![0, 32, 48]);
    }

    #[test]
    fn test_empty_tree() {
        let tree = SegmentRTree::new_loaded(2, &[]);
        assert!(tree.is_empty());
        assert_eq!(tree.height(), 0);
        assert_eq!(
            tree.query_rect(BoundingBox::new((-10., -5.).into(), (1., 5.).into())),
            Vec::<usize>::new()
        );
        assert!(tree.query_self_intersections().is_empty());
        assert!(tree.bounding_box().is_empty());
    }

    #[test]
    fn test_query_loaded() {
        let boxes = point_boxes(6);
        let tree = SegmentRTree::new_loaded(2, &boxes);
        assert_eq!(tree.height(), 3);
        for (i, b) in boxes.iter().enumerate() {
            assert_eq!(tree.query_rect(*b), vec![i]);
        }
        assert_sorted_query(
            &tree,
            BoundingBox::new((0., 0.).into(), (5., 5.).into()),
            vec![0, 1, 2, 3, 4, 5],
        );
        assert_sorted_query(
            &tree,
            BoundingBox::new((1., 1.).into(), (3., 3.).into()),
            vec![1, 2, 3],
        );
        assert_eq!(
            tree.bounding_box(),
            BoundingBox::new((0., 0.).into(), (5., 5.).into())
        );
    }

    #[test]
    fn test_self_intersections() {
        let boxes = vec![
            BoundingBox::new((0., 0.).into(), (2., 2.).into()),
            BoundingBox::new((1., 1.).into(), (3., 3.).into()),
            BoundingBox::new((5., 5.).into(), (6., 6.).into()),
            BoundingBox::new((2., 2.).into(), (5., 5.).into()),
        ];
        let tree = SegmentRTree::new_loaded(2, &boxes);
        let mut pairs = tree.query_self_intersections();
        pairs.sort_unstable();
        assert_eq!(pairs, vec![(0, 1), (0, 3), (1, 3), (2, 3)]);
    }
}
