pub mod convex_hull;
pub mod line_intersector;
pub mod orientation;
pub mod point_location;

pub use line_intersector::{homogeneous_intersection, intersect_segments, SegmentIntersection};
pub use orientation::{in_circle, orientation_index, signed_area};
pub use point_location::{locate_in_polygon, locate_in_ring, Location, RayCrossingCounter};
