use super::orientation::orientation_index;
use crate::errors::{GeometryError, Result};
use crate::{BoundingBox, Coordinate};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SegmentIntersection {
    None,
    /// A single shared point. `proper` means it is interior to both segments.
    Point { point: Coordinate, proper: bool },
    /// A collinear overlap, from `.0` to `.1`.
    Collinear(Coordinate, Coordinate),
}

impl SegmentIntersection {
    pub fn is_none(&self) -> bool {
        matches!(self, SegmentIntersection::None)
    }

    pub fn points(&self) -> Vec<Coordinate> {
        match *self {
            SegmentIntersection::None => Vec::new(),
            SegmentIntersection::Point { point, .. } => vec![point],
            SegmentIntersection::Collinear(start, end) => vec![start, end],
        }
    }
}

/// Intersect the lines through `p1 -> p2` and `q1 -> q2` in homogeneous
/// coordinates. Parallel lines have no representable intersection.
pub fn homogeneous_intersection(
    p1: Coordinate,
    p2: Coordinate,
    q1: Coordinate,
    q2: Coordinate,
) -> Result<Coordinate> {
    let px = p1.y - p2.y;
    let py = p2.x - p1.x;
    let pw = p1.x * p2.y - p2.x * p1.y;

    let qx = q1.y - q2.y;
    let qy = q2.x - q1.x;
    let qw = q1.x * q2.y - q2.x * q1.y;

    let x = py * qw - qy * pw;
    let y = qx * pw - px * qw;
    let w = px * qy - qx * py;

    let intersection = Coordinate::new(x / w, y / w);
    if intersection.is_finite() {
        Ok(intersection)
    } else {
        Err(GeometryError::NotRepresentable)
    }
}

/// True if `point` lies on the closed segment `start -> end`.
pub fn point_on_segment(point: Coordinate, start: Coordinate, end: Coordinate) -> bool {
    BoundingBox::new(start, end).contains(point) && orientation_index(start, end, point) == 0
}

/// Classify how segments `p1 -> p2` and `q1 -> q2` meet, using robust
/// orientation tests for the topology and a conditioned homogeneous
/// computation for the position of a proper crossing.
pub fn intersect_segments(
    p1: Coordinate,
    p2: Coordinate,
    q1: Coordinate,
    q2: Coordinate,
) -> SegmentIntersection {
    let p_box = BoundingBox::new(p1, p2);
    let q_box = BoundingBox::new(q1, q2);
    if !p_box.intersects(q_box) {
        return SegmentIntersection::None;
    }

    let pq1 = orientation_index(p1, p2, q1);
    let pq2 = orientation_index(p1, p2, q2);
    if (pq1 > 0 && pq2 > 0) || (pq1 < 0 && pq2 < 0) {
        return SegmentIntersection::None;
    }
    let qp1 = orientation_index(q1, q2, p1);
    let qp2 = orientation_index(q1, q2, p2);
    if (qp1 > 0 && qp2 > 0) || (qp1 < 0 && qp2 < 0) {
        return SegmentIntersection::None;
    }

    if pq1 == 0 && pq2 == 0 && qp1 == 0 && qp2 == 0 {
        return collinear_intersection(p1, p2, q1, q2);
    }

    if pq1 == 0 || pq2 == 0 || qp1 == 0 || qp2 == 0 {
        let point = if p1 == q1 || p1 == q2 {
            p1
        } else if p2 == q1 || p2 == q2 {
            p2
        } else if pq1 == 0 {
            q1
        } else if pq2 == 0 {
            q2
        } else if qp1 == 0 {
            p1
        } else {
            p2
        };
        return SegmentIntersection::Point {
            point,
            proper: false,
        };
    }

    SegmentIntersection::Point {
        point: proper_intersection(p1, p2, q1, q2),
        proper: true,
    }
}

fn collinear_intersection(
    p1: Coordinate,
    p2: Coordinate,
    q1: Coordinate,
    q2: Coordinate,
) -> SegmentIntersection {
    let p_box = BoundingBox::new(p1, p2);
    let q_box = BoundingBox::new(q1, q2);
    let q1_in_p = p_box.contains(q1);
    let q2_in_p = p_box.contains(q2);
    let p1_in_q = q_box.contains(p1);
    let p2_in_q = q_box.contains(p2);

    let span = |a: Coordinate, b: Coordinate| {
        if a == b {
            SegmentIntersection::Point {
                point: a,
                proper: false,
            }
        } else {
            SegmentIntersection::Collinear(a, b)
        }
    };

    if q1_in_p && q2_in_p {
        span(q1, q2)
    } else if p1_in_q && p2_in_q {
        span(p1, p2)
    } else if q1_in_p && p1_in_q {
        span(q1, p1)
    } else if q1_in_p && p2_in_q {
        span(q1, p2)
    } else if q2_in_p && p1_in_q {
        span(q2, p1)
    } else if q2_in_p && p2_in_q {
        span(q2, p2)
    } else {
        SegmentIntersection::None
    }
}

/// The crossing point of two properly intersecting segments. Coordinates
/// are shifted toward the origin first to condition the computation; a
/// result outside the segments' common box falls back to the endpoint
/// nearest the other segment.
fn proper_intersection(p1: Coordinate, p2: Coordinate, q1: Coordinate, q2: Coordinate) -> Coordinate {
    let mut common = BoundingBox::new(p1, p2);
    let q_box = BoundingBox::new(q1, q2);
    common.x_min = common.x_min.max(q_box.x_min);
    common.y_min = common.y_min.max(q_box.y_min);
    common.x_max = common.x_max.min(q_box.x_max);
    common.y_max = common.y_max.min(q_box.y_max);
    let center = common.center();

    let shifted = homogeneous_intersection(p1 - center, p2 - center, q1 - center, q2 - center)
        .map(|c| c + center);
    match shifted {
        Ok(point) if common.contains(point) => point,
        _ => nearest_endpoint(p1, p2, q1, q2),
    }
}

fn nearest_endpoint(p1: Coordinate, p2: Coordinate, q1: Coordinate, q2: Coordinate) -> Coordinate {
    let candidates = [
        (p1, segment_distance(p1, q1, q2)),
        (p2, segment_distance(p2, q1, q2)),
        (q1, segment_distance(q1, p1, p2)),
        (q2, segment_distance(q2, p1, p2)),
    ];
    let mut best = candidates[0];
    for candidate in candidates.iter().skip(1) {
        if candidate.1 < best.1 {
            best = *candidate;
        }
    }
    best.0
}

/// Position of the projection of `point` onto the line through `start` and
/// `end`, as a fraction of the segment (0 at `start`, 1 at `end`).
pub fn projection_factor(point: Coordinate, start: Coordinate, end: Coordinate) -> f64 {
    if point == start {
        return 0.;
    }
    if point == end {
        return 1.;
    }
    let d = end - start;
    let len2 = d.dot(d);
    if len2 == 0. {
        return 0.;
    }
    (point - start).dot(d) / len2
}

pub fn project(point: Coordinate, start: Coordinate, end: Coordinate) -> Coordinate {
    let t = projection_factor(point, start, end);
    start + (end - start) * t
}

pub fn segment_distance(point: Coordinate, start: Coordinate, end: Coordinate) -> f64 {
    let t = projection_factor(point, start, end);
    if t <= 0. {
        point.distance(start)
    } else if t >= 1. {
        point.distance(end)
    } else {
        point.distance(start + (end - start) * t)
    }
}
