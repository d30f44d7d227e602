pub mod other_impls;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;

use planar_kernel::{BoundingBox, Coordinate, Geometry, GeometryFactory};

//// Utility functions

/// A closed, counter-clockwise star-shaped ring around the origin with
/// radii drawn from `[radius / 2, radius)`.
pub(crate) fn get_star_ring(vertex_count: usize, radius: f64, seed: u64) -> Vec<Coordinate> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut ring: Vec<Coordinate> = (0..vertex_count)
        .map(|i| {
            let angle = 2. * PI * (i as f64) / (vertex_count as f64);
            let r = rng.gen_range(radius / 2., radius);
            Coordinate::new(r * angle.cos(), r * angle.sin())
        })
        .collect();
    ring.push(ring[0]);
    ring
}

pub(crate) fn get_star_polygon(vertex_count: usize, radius: f64, seed: u64) -> Geometry {
    let ring: Vec<(f64, f64)> = get_star_ring(vertex_count, radius, seed)
        .into_iter()
        .map(|c| (c.x, c.y))
        .collect();
    GeometryFactory::default()
        .polygon_from_xy(vec![ring])
        .unwrap()
}

pub(crate) fn make_boxes(coords: &[Coordinate]) -> Vec<BoundingBox> {
    coords
        .windows(2)
        .map(|c| BoundingBox::new(c[0], c[1]))
        .collect()
}

pub(crate) fn get_random_points(bbox: BoundingBox, n: usize, seed: u64) -> Vec<Coordinate> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut results = Vec::new();
    for _i in 0..n {
        results.push(Coordinate::new(
            rng.gen_range(bbox.x_min, bbox.x_max),
            rng.gen_range(bbox.y_min, bbox.y_max),
        ));
    }

    results
}
