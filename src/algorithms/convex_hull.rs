use super::orientation::orientation_index;
use crate::Coordinate;

/// Andrew's monotone chain. Returns the hull vertices counter-clockwise
/// without repeating the first, dropping duplicate and collinear points.
/// Fewer than three distinct input points come back as-is (sorted).
pub fn convex_hull(mut points: Vec<Coordinate>) -> Vec<Coordinate> {
    points.retain(|p| p.is_finite());
    points.sort_by(|a, b| a.compare(b));
    points.dedup();
    if points.len() < 3 {
        return points;
    }

    let mut lower: Vec<Coordinate> = Vec::with_capacity(points.len());
    for &p in points.iter() {
        while lower.len() >= 2 && turns_right_or_straight(&lower, p) {
            lower.pop();
        }
        lower.push(p);
    }

    let mut upper: Vec<Coordinate> = Vec::with_capacity(points.len());
    for &p in points.iter().rev() {
        while upper.len() >= 2 && turns_right_or_straight(&upper, p) {
            upper.pop();
        }
        upper.push(p);
    }

    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}

fn turns_right_or_straight(chain: &[Coordinate], next: Coordinate) -> bool {
    let n = chain.len();
    orientation_index(chain[n - 2], chain[n - 1], next) <= 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hull(points: Vec<(f64, f64)>) -> Vec<(f64, f64)> {
        convex_hull(points.into_iter().map(|p| p.into()).collect())
            .into_iter()
            .map(|c| (c.x, c.y))
            .collect()
    }

    #[test]
    fn test_hull() {
        assert_eq!(
            hull(vec![(1., 1.), (0., 0.), (2., 0.), (2., 2.), (0., 2.), (1., 0.)]),
            vec![(0., 0.), (2., 0.), (2., 2.), (0., 2.)]
        );
    }

    #[test]
    fn test_degenerate_hulls() {
        assert_eq!(hull(vec![]), vec![]);
        assert_eq!(hull(vec![(1., 1.), (1., 1.)]), vec![(1., 1.)]);
        assert_eq!(
            hull(vec![(2., 2.), (0., 0.), (1., 1.)]),
            vec![(0., 0.), (2., 2.)]
        );
    }
}
