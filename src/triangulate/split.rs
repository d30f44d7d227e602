use crate::algorithms::line_intersector::project;
use crate::Coordinate;
use std::fmt;

/// Fraction of the distance to the encroaching site kept clear around a
/// split point.
const NON_ENCROACHING_FACTOR: f64 = 0.8;

/// A constraint segment of a conforming triangulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Coordinate,
    pub end: Coordinate,
}

impl Segment {
    pub fn new(start: Coordinate, end: Coordinate) -> Self {
        Segment { start, end }
    }

    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }

    pub fn midpoint(&self) -> Coordinate {
        self.start.midpoint(self.end)
    }

    /// The point `fraction` of the way from `start` to `end`.
    pub fn point_along(&self, fraction: f64) -> Coordinate {
        self.start + (self.end - self.start) * fraction
    }

    pub fn reversed(&self) -> Segment {
        Segment::new(self.end, self.start)
    }
}

impl From<(Coordinate, Coordinate)> for Segment {
    fn from((start, end): (Coordinate, Coordinate)) -> Self {
        Segment::new(start, end)
    }
}

/// Chooses where to split a constraint segment whose Gabriel circle holds
/// the site `encroaching`.
pub trait ConstraintSplitPointFinder: fmt::Debug {
    fn find_split_point(&self, segment: &Segment, encroaching: Coordinate) -> Coordinate;
}

/// Splits at the projection of the encroaching site, moved inward far
/// enough that neither half is shorter than the site's clearance (but at
/// most to the midpoint).
#[derive(Debug, Clone, Copy, Default)]
pub struct NonEncroachingSplitPointFinder;

impl ConstraintSplitPointFinder for NonEncroachingSplitPointFinder {
    fn find_split_point(&self, segment: &Segment, encroaching: Coordinate) -> Coordinate {
        let length = segment.length();
        let projected = project(encroaching, segment.start, segment.end);
        let clearance = projected.distance(encroaching) * 2. * NON_ENCROACHING_FACTOR;
        let min_length = clearance.min(length / 2.);
        let fraction = min_length / length;
        if projected.distance(segment.start) < min_length {
            segment.point_along(fraction)
        } else if projected.distance(segment.end) < min_length {
            segment.reversed().point_along(fraction)
        } else {
            projected
        }
    }
}

/// Always splits at the midpoint.
#[derive(Debug, Clone, Copy, Default)]
pub struct MidpointSplitPointFinder;

impl ConstraintSplitPointFinder for MidpointSplitPointFinder {
    fn find_split_point(&self, segment: &Segment, _encroaching: Coordinate) -> Coordinate {
        segment.midpoint()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment() -> Segment {
        Segment::new((0., 0.).into(), (10., 0.).into())
    }

    fn assert_split(
        finder: &dyn ConstraintSplitPointFinder,
        encroaching: (f64, f64),
        expected: (f64, f64),
    ) {
        let actual = finder.find_split_point(&segment(), encroaching.into());
        assert!(
            actual.distance(expected.into()) < 1e-12,
            "{} != {:?}",
            actual,
            expected
        );
    }

    #[test]
    fn test_non_encroaching() {
        let finder = NonEncroachingSplitPointFinder;
        assert_split(&finder, (4., 1.), (4., 0.));
        // Too close to the start: moved to the clearance length.
        assert_split(&finder, (0.5, 2.), (3.2, 0.));
        assert_split(&finder, (9.5, 2.), (6.8, 0.));
        // Clearance is capped at half the segment.
        assert_split(&finder, (1., 4.9), (5., 0.));
    }

    #[test]
    fn test_midpoint() {
        assert_split(&MidpointSplitPointFinder, (1., 1.), (5., 0.));
    }
}
