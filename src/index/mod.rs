mod kd_tree;
mod quadtree;
mod segment_rtree;

pub use kd_tree::{KdNode, KdTree};
pub use quadtree::Quadtree;
pub use segment_rtree::{SegmentRTree, DEFAULT_DEGREE};
