use crate::Coordinate;

/// Relative error bound for the floating-point orientation filter.
const SAFE_EPSILON: f64 = 1e-15;

/// Shoelace area: positive for counter-clockwise rings.
pub fn signed_area(ring: &[Coordinate]) -> f64 {
    if ring.len() < 3 {
        return 0.;
    }
    let origin = ring[0];
    let twice_area: f64 = ring
        .windows(2)
        .map(|w| (w[0] - origin).cross(w[1] - origin))
        .sum();
    twice_area / 2.
}

/// The side of the directed line `p1 -> p2` that `q` lies on: 1 for left
/// (counter-clockwise), -1 for right (clockwise), 0 for collinear.
///
/// A floating-point filter decides the clear cases; near-degenerate ones are
/// recomputed in double-double arithmetic.
pub fn orientation_index(p1: Coordinate, p2: Coordinate, q: Coordinate) -> i8 {
    match orientation_filter(p1, p2, q) {
        Some(index) => index,
        None => orientation_dd(p1, p2, q),
    }
}

fn orientation_filter(pa: Coordinate, pb: Coordinate, pc: Coordinate) -> Option<i8> {
    let det_left = (pa.x - pc.x) * (pb.y - pc.y);
    let det_right = (pa.y - pc.y) * (pb.x - pc.x);
    let det = det_left - det_right;

    let det_sum = if det_left > 0. {
        if det_right <= 0. {
            return Some(signum(det));
        }
        det_left + det_right
    } else if det_left < 0. {
        if det_right >= 0. {
            return Some(signum(det));
        }
        -det_left - det_right
    } else {
        return Some(signum(det));
    };

    let error_bound = SAFE_EPSILON * det_sum;
    if det >= error_bound || -det >= error_bound {
        Some(signum(det))
    } else {
        None
    }
}

fn orientation_dd(p1: Coordinate, p2: Coordinate, q: Coordinate) -> i8 {
    let dx1 = DoubleDouble::from(p2.x) - p1.x;
    let dy1 = DoubleDouble::from(p2.y) - p1.y;
    let dx2 = DoubleDouble::from(q.x) - p2.x;
    let dy2 = DoubleDouble::from(q.y) - p2.y;
    (dx1 * dy2 - dy1 * dx2).signum()
}

/// True if `d` lies strictly inside the circle through `a`, `b`, `c`, which
/// must be in counter-clockwise order.
pub fn in_circle(a: Coordinate, b: Coordinate, c: Coordinate, d: Coordinate) -> bool {
    let adx = DoubleDouble::from(a.x) - d.x;
    let ady = DoubleDouble::from(a.y) - d.y;
    let bdx = DoubleDouble::from(b.x) - d.x;
    let bdy = DoubleDouble::from(b.y) - d.y;
    let cdx = DoubleDouble::from(c.x) - d.x;
    let cdy = DoubleDouble::from(c.y) - d.y;

    let a_lift = adx * adx + ady * ady;
    let b_lift = bdx * bdx + bdy * bdy;
    let c_lift = cdx * cdx + cdy * cdy;

    let det = a_lift * (bdx * cdy - cdx * bdy)
        + b_lift * (cdx * ady - adx * cdy)
        + c_lift * (adx * bdy - bdx * ady);
    det.signum() > 0
}

fn signum(value: f64) -> i8 {
    if value > 0. {
        1
    } else if value < 0. {
        -1
    } else {
        0
    }
}

/// An unevaluated sum `hi + lo` carrying about 106 bits of mantissa.
#[derive(Debug, Clone, Copy, PartialEq)]
struct DoubleDouble {
    hi: f64,
    lo: f64,
}

impl DoubleDouble {
    fn signum(self) -> i8 {
        if self.hi != 0. {
            signum(self.hi)
        } else {
            signum(self.lo)
        }
    }
}

impl From<f64> for DoubleDouble {
    fn from(value: f64) -> Self {
        DoubleDouble { hi: value, lo: 0. }
    }
}

fn two_sum(a: f64, b: f64) -> (f64, f64) {
    let s = a + b;
    let bb = s - a;
    (s, (a - (s - bb)) + (b - bb))
}

fn quick_two_sum(a: f64, b: f64) -> DoubleDouble {
    let s = a + b;
    DoubleDouble {
        hi: s,
        lo: b - (s - a),
    }
}

impl std::ops::Add for DoubleDouble {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        let (s, e) = two_sum(self.hi, rhs.hi);
        quick_two_sum(s, e + self.lo + rhs.lo)
    }
}

impl std::ops::Neg for DoubleDouble {
    type Output = Self;

    fn neg(self) -> Self {
        DoubleDouble {
            hi: -self.hi,
            lo: -self.lo,
        }
    }
}

impl std::ops::Sub for DoubleDouble {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self + (-rhs)
    }
}

impl std::ops::Sub<f64> for DoubleDouble {
    type Output = Self;

    fn sub(self, rhs: f64) -> Self {
        self - DoubleDouble::from(rhs)
    }
}

impl std::ops::Mul for DoubleDouble {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let p = self.hi * rhs.hi;
        let e = self.hi.mul_add(rhs.hi, -p);
        quick_two_sum(p, e + self.hi * rhs.lo + self.lo * rhs.hi)
    }
}
