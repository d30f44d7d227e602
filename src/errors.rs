use crate::geometry::GeometryKind;
use crate::triangulate::TriangulationState;
use crate::Coordinate;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("Invalid {kind:?}: {reason}")]
    InvalidGeometryKind {
        kind: GeometryKind,
        reason: &'static str,
    },

    #[error("Axis count {actual} is not supported (expected {expected})")]
    AxisCountMismatch { expected: usize, actual: usize },

    #[error("Heterogeneous GeometryCollection arguments are not supported")]
    UnsupportedGeometryCollection,

    #[error("Topology collapse near {position}")]
    TopologyCollapse { position: Coordinate },

    #[error("Constraint enforcement failed ({cause:?}); last split point was {split_point} on segment {segment:?}")]
    ConstraintEnforcementFailure {
        cause: EnforcementFailure,
        split_point: Coordinate,
        segment: (Coordinate, Coordinate),
    },

    #[error("Intersection is not representable as a finite coordinate")]
    NotRepresentable,

    #[error("Invalid intersection matrix pattern {pattern:?}")]
    InvalidPattern { pattern: String },

    #[error("Invalid WKT: {reason}")]
    InvalidWkt { reason: String },

    #[error("Triangulator is {actual:?}, expected {expected:?}")]
    InvalidTriangulationState {
        expected: TriangulationState,
        actual: TriangulationState,
    },
}

/// Why constraint enforcement gave up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnforcementFailure {
    /// The splitting passes did not converge within the iteration ceiling.
    IterationLimit,
    /// A split point snapped onto an existing site and the policy forbids it.
    SplitPointSnapped,
}

pub type Result<T> = std::result::Result<T, GeometryError>;
