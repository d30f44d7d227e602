mod bounding_box;
mod coordinate;
mod coordinate_sequence;

pub mod algorithms;
pub mod errors;
pub mod from_wkt;
pub mod geometry;
pub mod index;
pub mod noding;
pub mod overlay;
pub mod relate;
pub mod triangulate;

pub use bounding_box::{BoundingBox, HasBoundingBox};
pub use coordinate::Coordinate;
pub use coordinate_sequence::{CoordinateSequence, MAX_AXIS_COUNT, MIN_AXIS_COUNT};
pub use errors::{GeometryError, Result};
pub use geometry::{
    Dimension, Geometry, GeometryFactory, GeometryKind, LineString, LinearRing, Point, Polygon,
    PrecisionModel,
};
pub use index::{KdTree, Quadtree};
pub use relate::IntersectionMatrix;
pub use triangulate::ConformingDelaunayTriangulator;
