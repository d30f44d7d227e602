use crate::{BoundingBox, Coordinate};

/// A vertex stored in a `KdTree`, with the payload of its first insertion
/// and a count of how many insertions landed on it.
#[derive(Debug, Clone)]
pub struct KdNode<D> {
    coordinate: Coordinate,
    data: D,
    count: usize,
    left: Option<usize>,
    right: Option<usize>,
}

impl<D> KdNode<D> {
    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    pub fn data(&self) -> &D {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut D {
        &mut self.data
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// True once a second insertion has matched this node.
    pub fn is_repeated(&self) -> bool {
        self.count > 1
    }
}

/// A 2-D tree over points, split alternately on X and Y. Insertions within
/// `tolerance` of an existing node snap to it instead of adding a node; a
/// tolerance of 0 snaps only exact duplicates.
#[derive(Debug, Clone)]
pub struct KdTree<D> {
    nodes: Vec<KdNode<D>>,
    root: Option<usize>,
    tolerance: f64,
}

impl<D> Default for KdTree<D> {
    fn default() -> Self {
        KdTree::new(0.)
    }
}

impl<D> KdTree<D> {
    pub fn new(tolerance: f64) -> Self {
        KdTree {
            nodes: Vec::new(),
            root: None,
            tolerance: tolerance.max(0.),
        }
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// The number of distinct nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[KdNode<D>] {
        &self.nodes
    }

    /// Insert `coordinate`, or return the node it snaps to. A snapped
    /// insertion drops `data` and bumps the node's count, so the returned
    /// node reports `is_repeated()`.
    pub fn insert(&mut self, coordinate: Coordinate, data: D) -> &mut KdNode<D> {
        let index = self.insert_index(coordinate, data);
        &mut self.nodes[index]
    }

    fn insert_index(&mut self, coordinate: Coordinate, data: D) -> usize {
        if self.tolerance > 0. {
            if let Some(index) = self.best_match(coordinate) {
                self.nodes[index].count += 1;
                return index;
            }
        }

        let mut parent: Option<(usize, bool)> = None;
        let mut current = self.root;
        let mut split_on_x = true;
        while let Some(index) = current {
            let node = &self.nodes[index];
            if node.coordinate == coordinate {
                self.nodes[index].count += 1;
                return index;
            }
            let is_less = if split_on_x {
                coordinate.x < node.coordinate.x
            } else {
                coordinate.y < node.coordinate.y
            };
            parent = Some((index, is_less));
            current = if is_less { node.left } else { node.right };
            split_on_x = !split_on_x;
        }

        let index = self.nodes.len();
        self.nodes.push(KdNode {
            coordinate,
            data,
            count: 1,
            left: None,
            right: None,
        });
        match parent {
            None => self.root = Some(index),
            Some((p, true)) => self.nodes[p].left = Some(index),
            Some((p, false)) => self.nodes[p].right = Some(index),
        }
        index
    }

    /// The closest node within tolerance; among equally close nodes the
    /// earliest inserted wins.
    fn best_match(&self, coordinate: Coordinate) -> Option<usize> {
        let search = BoundingBox::of_point(coordinate).expanded_by(self.tolerance);
        let mut best: Option<(usize, f64)> = None;
        self.visit(search, |index, node| {
            let distance = node.coordinate.distance(coordinate);
            if distance > self.tolerance {
                return;
            }
            let better = match best {
                None => true,
                Some((best_index, best_distance)) => {
                    distance < best_distance || (distance == best_distance && index < best_index)
                }
            };
            if better {
                best = Some((index, distance));
            }
        });
        best.map(|(index, _)| index)
    }

    /// Every node whose coordinate lies in `bbox`, boundary included.
    pub fn query(&self, bbox: BoundingBox) -> Vec<&KdNode<D>> {
        let mut results = Vec::new();
        self.visit(bbox, |_, node| results.push(node));
        results
    }

    fn visit<'a, F>(&'a self, bbox: BoundingBox, mut visitor: F)
    where
        F: FnMut(usize, &'a KdNode<D>),
    {
        if bbox.is_empty() {
            return;
        }
        // Stack entries: (node index, split on x)
        let mut stack: Vec<(usize, bool)> = self.root.into_iter().map(|r| (r, true)).collect();
        while let Some((index, split_on_x)) = stack.pop() {
            let node = &self.nodes[index];
            let (value, min, max) = if split_on_x {
                (node.coordinate.x, bbox.x_min, bbox.x_max)
            } else {
                (node.coordinate.y, bbox.y_min, bbox.y_max)
            };
            if min < value {
                if let Some(left) = node.left {
                    stack.push((left, !split_on_x));
                }
            }
            if value <= max {
                if let Some(right) = node.right {
                    stack.push((right, !split_on_x));
                }
            }
            if bbox.contains(node.coordinate) {
                visitor(index, node);
            }
        }
    }

    /// The node closest to `point`.
    pub fn nearest(&self, point: Coordinate) -> Option<&KdNode<D>> {
        let mut best: Option<(usize, f64)> = None;
        let mut stack: Vec<(usize, bool)> = self.root.into_iter().map(|r| (r, true)).collect();
        while let Some((index, split_on_x)) = stack.pop() {
            let node = &self.nodes[index];
            let distance = node.coordinate.distance(point);
            if best.map_or(true, |(_, d)| distance < d) {
                best = Some((index, distance));
            }
            let delta = if split_on_x {
                point.x - node.coordinate.x
            } else {
                point.y - node.coordinate.y
            };
            let (near, far) = if delta < 0. {
                (node.left, node.right)
            } else {
                (node.right, node.left)
            };
            // The far side is pushed first so the near side is searched first.
            if let Some(far) = far {
                if best.map_or(true, |(_, d)| delta.abs() < d) {
                    stack.push((far, !split_on_x));
                }
            }
            if let Some(near) = near {
                stack.push((near, !split_on_x));
            }
        }
        best.map(|(index, _)| &self.nodes[index])
    }
}
