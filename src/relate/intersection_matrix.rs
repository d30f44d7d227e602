use crate::algorithms::Location;
use crate::errors::{GeometryError, Result};
use crate::geometry::Dimension;
use std::fmt;
use std::str::FromStr;

const LOCATIONS: [Location; 3] = [Location::Interior, Location::Boundary, Location::Exterior];

/// The DE-9IM matrix: the dimension of the intersection of the interior,
/// boundary and exterior of one geometry with those of another. Rows are
/// locations in the first geometry, columns in the second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IntersectionMatrix {
    cells: [[Dimension; 3]; 3],
}

impl Default for IntersectionMatrix {
    fn default() -> Self {
        IntersectionMatrix::new()
    }
}

impl IntersectionMatrix {
    /// Every cell `False`.
    pub fn new() -> Self {
        IntersectionMatrix {
            cells: [[Dimension::False; 3]; 3],
        }
    }

    pub fn get(&self, a: Location, b: Location) -> Dimension {
        self.cells[a.index()][b.index()]
    }

    pub fn set(&mut self, a: Location, b: Location, dimension: Dimension) {
        self.cells[a.index()][b.index()] = dimension;
    }

    /// Raise a cell to `dimension` if it is lower.
    pub fn set_at_least(&mut self, a: Location, b: Location, dimension: Dimension) {
        let cell = &mut self.cells[a.index()][b.index()];
        if *cell < dimension {
            *cell = dimension;
        }
    }

    pub fn transpose(&self) -> IntersectionMatrix {
        let mut transposed = IntersectionMatrix::new();
        for a in LOCATIONS.iter() {
            for b in LOCATIONS.iter() {
                transposed.set(*b, *a, self.get(*a, *b));
            }
        }
        transposed
    }

    /// Tests the matrix against a nine-character pattern of `T`, `F`, `*`,
    /// `0`, `1` and `2`, in row-major order.
    pub fn matches(&self, pattern: &str) -> Result<bool> {
        let symbols: Vec<char> = pattern.chars().collect();
        if symbols.len() != 9 {
            return Err(GeometryError::InvalidPattern {
                pattern: pattern.to_string(),
            });
        }
        let mut matched = true;
        for (i, symbol) in symbols.iter().enumerate() {
            let actual = self.cells[i / 3][i % 3];
            matched &= match symbol.to_ascii_uppercase() {
                'T' => actual != Dimension::False,
                'F' => actual == Dimension::False,
                '*' => true,
                '0' => actual == Dimension::Zero,
                '1' => actual == Dimension::One,
                '2' => actual == Dimension::Two,
                _ => {
                    return Err(GeometryError::InvalidPattern {
                        pattern: pattern.to_string(),
                    })
                }
            };
        }
        Ok(matched)
    }

    /// Matching against a pattern known to be well formed.
    fn is(&self, pattern: &'static str) -> bool {
        self.matches(pattern).unwrap_or(false)
    }

    pub fn is_disjoint(&self) -> bool {
        self.is("FF*FF****")
    }

    pub fn is_intersects(&self) -> bool {
        !self.is_disjoint()
    }

    pub fn is_contains(&self) -> bool {
        self.is("T*****FF*")
    }

    pub fn is_within(&self) -> bool {
        self.is("T*F**F***")
    }

    pub fn is_covers(&self) -> bool {
        ["T*****FF*", "*T****FF*", "***T**FF*", "****T*FF*"]
            .iter()
            .any(|p| self.is(p))
    }

    pub fn is_covered_by(&self) -> bool {
        ["T*F**F***", "*TF**F***", "**FT*F***", "**F*TF***"]
            .iter()
            .any(|p| self.is(p))
    }

    /// Crossing depends on the dimensions of the two geometries.
    pub fn is_crosses(&self, dimension_a: Dimension, dimension_b: Dimension) -> bool {
        use Dimension::*;
        match (dimension_a, dimension_b) {
            (Zero, One) | (Zero, Two) | (One, Two) => self.is("T*T******"),
            (One, Zero) | (Two, Zero) | (Two, One) => self.is("T*****T**"),
            (One, One) => self.is("0********"),
            _ => false,
        }
    }

    pub fn is_touches(&self, dimension_a: Dimension, dimension_b: Dimension) -> bool {
        if dimension_a > dimension_b {
            return self.transpose().is_touches(dimension_b, dimension_a);
        }
        use Dimension::*;
        match (dimension_a, dimension_b) {
            (Two, Two) | (One, One) | (One, Two) | (Zero, Two) | (Zero, One) => {
                self.is("FT*******") || self.is("F**T*****") || self.is("F***T****")
            }
            _ => false,
        }
    }

    pub fn is_overlaps(&self, dimension_a: Dimension, dimension_b: Dimension) -> bool {
        use Dimension::*;
        match (dimension_a, dimension_b) {
            (Zero, Zero) | (Two, Two) => self.is("T*T***T**"),
            (One, One) => self.is("1*T***T**"),
            _ => false,
        }
    }

    pub fn is_equals(&self, dimension_a: Dimension, dimension_b: Dimension) -> bool {
        dimension_a == dimension_b && self.is("T*F**FFF*")
    }
}

impl fmt::Display for IntersectionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.iter() {
            for cell in row.iter() {
                write!(f, "{}", cell.symbol())?;
            }
        }
        Ok(())
    }
}

/// Parses the nine-symbol form written by `Display`.
impl FromStr for IntersectionMatrix {
    type Err = GeometryError;

    fn from_str(s: &str) -> Result<Self> {
        let symbols: Vec<char> = s.chars().collect();
        if symbols.len() != 9 {
            return Err(GeometryError::InvalidPattern {
                pattern: s.to_string(),
            });
        }
        let mut matrix = IntersectionMatrix::new();
        for (i, symbol) in symbols.iter().enumerate() {
            matrix.cells[i / 3][i % 3] = match symbol.to_ascii_uppercase() {
                'F' => Dimension::False,
                '0' => Dimension::Zero,
                '1' => Dimension::One,
                '2' => Dimension::Two,
                _ => {
                    return Err(GeometryError::InvalidPattern {
                        pattern: s.to_string(),
                    })
                }
            };
        }
        Ok(matrix)
    }
}
