use crate::errors::{GeometryError, Result};
use crate::{BoundingBox, Coordinate};
use std::cmp::Ordering;

pub const MIN_AXIS_COUNT: usize = 2;
pub const MAX_AXIS_COUNT: usize = 4;

/// Packed vertex storage: `axis_count` ordinates per vertex (X, Y, then
/// optional Z and M). The axis count is fixed for the life of the sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateSequence {
    axis_count: usize,
    ordinates: Vec<f64>,
}

impl CoordinateSequence {
    pub fn new(axis_count: usize, ordinates: Vec<f64>) -> Result<Self> {
        check_axis_count(axis_count)?;
        if ordinates.len() % axis_count != 0 {
            return Err(GeometryError::AxisCountMismatch {
                expected: axis_count,
                actual: ordinates.len() % axis_count,
            });
        }
        Ok(CoordinateSequence {
            axis_count,
            ordinates,
        })
    }

    pub fn empty(axis_count: usize) -> Result<Self> {
        CoordinateSequence::new(axis_count, Vec::new())
    }

    pub fn from_coordinates(coords: &[Coordinate]) -> Self {
        let mut ordinates = Vec::with_capacity(coords.len() * 2);
        for c in coords {
            ordinates.push(c.x);
            ordinates.push(c.y);
        }
        CoordinateSequence {
            axis_count: 2,
            ordinates,
        }
    }

    pub fn axis_count(&self) -> usize {
        self.axis_count
    }

    pub fn len(&self) -> usize {
        self.ordinates.len() / self.axis_count
    }

    pub fn is_empty(&self) -> bool {
        self.ordinates.is_empty()
    }

    pub fn ordinates(&self) -> &[f64] {
        &self.ordinates
    }

    pub fn x(&self, index: usize) -> f64 {
        self.ordinates[index * self.axis_count]
    }

    pub fn y(&self, index: usize) -> f64 {
        self.ordinates[index * self.axis_count + 1]
    }

    /// The ordinate of `axis` at `index`; NaN for axes this sequence lacks.
    pub fn value(&self, index: usize, axis: usize) -> f64 {
        if axis < self.axis_count {
            self.ordinates[index * self.axis_count + axis]
        } else {
            f64::NAN
        }
    }

    pub fn vertex(&self, index: usize) -> &[f64] {
        let start = index * self.axis_count;
        &self.ordinates[start..start + self.axis_count]
    }

    pub fn coordinate(&self, index: usize) -> Coordinate {
        Coordinate::new(self.x(index), self.y(index))
    }

    pub fn first(&self) -> Option<Coordinate> {
        if self.is_empty() {
            None
        } else {
            Some(self.coordinate(0))
        }
    }

    pub fn last(&self) -> Option<Coordinate> {
        if self.is_empty() {
            None
        } else {
            Some(self.coordinate(self.len() - 1))
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Coordinate> + '_ {
        self.ordinates
            .chunks_exact(self.axis_count)
            .map(|v| Coordinate::new(v[0], v[1]))
    }

    pub fn vertices(&self) -> impl Iterator<Item = &[f64]> + '_ {
        self.ordinates.chunks_exact(self.axis_count)
    }

    pub fn to_coordinates(&self) -> Vec<Coordinate> {
        self.iter().collect()
    }

    /// First and last vertices are equal in X and Y.
    pub fn is_closed(&self) -> bool {
        match (self.first(), self.last()) {
            (Some(first), Some(last)) => first == last,
            _ => false,
        }
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::of_coordinates(self.iter())
    }

    pub fn reversed(&self) -> CoordinateSequence {
        let ordinates = self
            .ordinates
            .chunks_exact(self.axis_count)
            .rev()
            .flatten()
            .copied()
            .collect();
        CoordinateSequence {
            axis_count: self.axis_count,
            ordinates,
        }
    }

    /// Copy into a sequence with another axis count. Missing axes are NaN;
    /// surplus axes are dropped.
    pub fn with_axis_count(&self, axis_count: usize) -> Result<CoordinateSequence> {
        check_axis_count(axis_count)?;
        if axis_count == self.axis_count {
            return Ok(self.clone());
        }
        let mut ordinates = Vec::with_capacity(self.len() * axis_count);
        for index in 0..self.len() {
            for axis in 0..axis_count {
                ordinates.push(self.value(index, axis));
            }
        }
        Ok(CoordinateSequence {
            axis_count,
            ordinates,
        })
    }

    /// Copy with every ordinate passed through `f(axis, value)`.
    pub fn map_ordinates<F: Fn(usize, f64) -> f64>(&self, f: F) -> CoordinateSequence {
        let ordinates = self
            .ordinates
            .iter()
            .enumerate()
            .map(|(i, &v)| f(i % self.axis_count, v))
            .collect();
        CoordinateSequence {
            axis_count: self.axis_count,
            ordinates,
        }
    }

    /// Vertex-by-vertex XY comparison; a proper prefix sorts first.
    pub fn compare(&self, other: &CoordinateSequence) -> Ordering {
        for (a, b) in self.iter().zip(other.iter()) {
            let ordering = a.compare(&b);
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        self.len().cmp(&other.len())
    }

    /// Exact equality on the first `axis_count` axes (NaN equals NaN).
    pub fn equals(&self, other: &CoordinateSequence, axis_count: usize) -> bool {
        self.len() == other.len()
            && (0..self.len()).all(|i| {
                (0..axis_count).all(|axis| {
                    let a = self.value(i, axis);
                    let b = other.value(i, axis);
                    a == b || (a.is_nan() && b.is_nan())
                })
            })
    }

    pub fn equals_tolerance(&self, other: &CoordinateSequence, tolerance: f64) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .zip(other.iter())
                .all(|(a, b)| a.distance(b) <= tolerance)
    }
}

fn check_axis_count(axis_count: usize) -> Result<()> {
    if axis_count < MIN_AXIS_COUNT {
        Err(GeometryError::AxisCountMismatch {
            expected: MIN_AXIS_COUNT,
            actual: axis_count,
        })
    } else if axis_count > MAX_AXIS_COUNT {
        Err(GeometryError::AxisCountMismatch {
            expected: MAX_AXIS_COUNT,
            actual: axis_count,
        })
    } else {
        Ok(())
    }
}
