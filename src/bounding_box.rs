use crate::Coordinate;

use self::Side::*;

/// An axis-aligned XY box. The empty box stores NaN bounds, so it can never
/// be confused with a degenerate zero-area box around a single point.
#[derive(Copy, Clone, Debug)]
pub struct BoundingBox {
    pub x_min: f64,
    pub y_min: f64,
    pub x_max: f64,
    pub y_max: f64,
}

pub trait HasBoundingBox {
    fn bounding_box(&self) -> BoundingBox;
}

impl PartialEq for BoundingBox {
    fn eq(&self, other: &Self) -> bool {
        if self.is_empty() {
            other.is_empty()
        } else {
            self.x_min == other.x_min
                && self.y_min == other.y_min
                && self.x_max == other.x_max
                && self.y_max == other.y_max
        }
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        BoundingBox::new_empty()
    }
}

impl BoundingBox {
    pub fn new(p1: Coordinate, p2: Coordinate) -> Self {
        BoundingBox {
            x_min: p1.x.min(p2.x),
            y_min: p1.y.min(p2.y),
            x_max: p1.x.max(p2.x),
            y_max: p1.y.max(p2.y),
        }
    }

    pub fn new_empty() -> Self {
        BoundingBox {
            x_min: f64::NAN,
            y_min: f64::NAN,
            x_max: f64::NAN,
            y_max: f64::NAN,
        }
    }

    pub fn of_point(point: Coordinate) -> Self {
        BoundingBox::new(point, point)
    }

    pub fn of(boxes: &[BoundingBox]) -> Self {
        boxes.iter().fold(BoundingBox::new_empty(), |mut s, r| {
            s.expand(*r);
            s
        })
    }

    pub fn of_coordinates<I: IntoIterator<Item = Coordinate>>(coords: I) -> Self {
        coords
            .into_iter()
            .fold(BoundingBox::new_empty(), |mut s, c| {
                s.expand_to_include(c);
                s
            })
    }

    pub fn is_empty(&self) -> bool {
        self.x_min.is_nan() || self.y_min.is_nan() || self.x_max.is_nan() || self.y_max.is_nan()
    }

    pub fn width(&self) -> f64 {
        if self.is_empty() {
            0.
        } else {
            self.x_max - self.x_min
        }
    }

    pub fn height(&self) -> f64 {
        if self.is_empty() {
            0.
        } else {
            self.y_max - self.y_min
        }
    }

    pub fn center(&self) -> Coordinate {
        Coordinate {
            x: (self.x_max + self.x_min) / 2.,
            y: (self.y_max + self.y_min) / 2.,
        }
    }

    /// Corners in counter-clockwise order, starting at the lower left.
    pub fn corners(&self) -> [Coordinate; 4] {
        [
            Coordinate::new(self.x_min, self.y_min),
            Coordinate::new(self.x_max, self.y_min),
            Coordinate::new(self.x_max, self.y_max),
            Coordinate::new(self.x_min, self.y_max),
        ]
    }

    pub fn intersects(&self, other: BoundingBox) -> bool {
        self.x_min <= other.x_max
            && self.x_max >= other.x_min
            && self.y_min <= other.y_max
            && self.y_max >= other.y_min
    }

    pub fn contains(&self, point: Coordinate) -> bool {
        self.x_min <= point.x
            && point.x <= self.x_max
            && self.y_min <= point.y
            && point.y <= self.y_max
    }

    /// True if `other` lies inside this box, boundaries included.
    /// Nothing covers, or is covered by, the empty box.
    pub fn covers(&self, other: BoundingBox) -> bool {
        self.x_min <= other.x_min
            && self.x_max >= other.x_max
            && self.y_min <= other.y_min
            && self.y_max >= other.y_max
    }

    pub fn expand(&mut self, other: BoundingBox) {
        self.x_min = self.x_min.min(other.x_min);
        self.y_min = self.y_min.min(other.y_min);
        self.x_max = self.x_max.max(other.x_max);
        self.y_max = self.y_max.max(other.y_max);
    }

    pub fn expand_to_include(&mut self, point: Coordinate) {
        self.expand(BoundingBox::of_point(point));
    }

    /// A copy grown by `delta` on every side. The empty box stays empty.
    pub fn expanded_by(&self, delta: f64) -> BoundingBox {
        BoundingBox {
            x_min: self.x_min - delta,
            y_min: self.y_min - delta,
            x_max: self.x_max + delta,
            y_max: self.y_max + delta,
        }
    }

    /// Return the intersection of the segment defined by start and end.
    /// Uses the Liang-Barsky algorithm:
    /// https://www.skytopia.com/project/articles/compsci/clipping.html
    pub fn intersect_segment(
        &self,
        start: Coordinate,
        end: Coordinate,
    ) -> Option<(Coordinate, Coordinate)> {
        if self.contains(start) && self.contains(end) {
            return Some((start, end));
        } else if start == end {
            return None;
        }

        let mut t0 = 0.;
        let mut t1 = 1.;
        let x_delta = end.x - start.x;
        let y_delta = end.y - start.y;

        for side in SIDES.iter() {
            let (p, q) = match side {
                Left => (-x_delta, -(self.x_min - start.x)),
                Right => (x_delta, (self.x_max - start.x)),
                Top => (-y_delta, -(self.y_min - start.y)),
                Bottom => (y_delta, (self.y_max - start.y)),
            };
            let r = q / p;
            if p == 0. && q < 0. {
                return None;
            }
            if p < 0. {
                if r > t1 {
                    return None;
                } else if r > t0 {
                    t0 = r;
                }
            } else if p > 0. {
                if r < t0 {
                    return None;
                } else if r < t1 {
                    t1 = r;
                }
            }
        }
        Some((
            Coordinate::new(start.x + t0 * x_delta, start.y + t0 * y_delta),
            Coordinate::new(start.x + t1 * x_delta, start.y + t1 * y_delta),
        ))
    }
}

enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

static SIDES: [Side; 4] = [Left, Right, Top, Bottom];
