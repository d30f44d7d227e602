//! Conforming Delaunay triangulation.
//!
//! Sites are triangulated incrementally in a quadedge subdivision. Each
//! constraint segment is then split with Steiner points until no site lies
//! inside its Gabriel circle, which makes every piece a Delaunay edge.

mod builder;
mod conforming;
mod quadedge;
mod split;

pub use builder::ConformingDelaunayBuilder;
pub use conforming::{
    ConformingDelaunayTriangulator, ConstraintVertex, SplitAnomaly, SplitSnapPolicy,
    TriangulationState, ENVELOPE_PADDING_FRACTION, MAX_SPLIT_ITERATIONS,
};
pub use split::{
    ConstraintSplitPointFinder, MidpointSplitPointFinder, NonEncroachingSplitPointFinder, Segment,
};
