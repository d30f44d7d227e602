mod utils;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use planar_kernel::index::SegmentRTree;
use planar_kernel::{BoundingBox, KdTree, Quadtree};
use utils::{get_random_points, get_star_ring, make_boxes};

pub fn segment_index_benchmark(c: &mut Criterion) {
    let coords = get_star_ring(10_000, 100., 17);
    let boxes = make_boxes(&coords);
    let mut group = c.benchmark_group("build_segment_index");
    for degree in [8, 16].iter() {
        group.bench_with_input(
            BenchmarkId::new("segment_rtree_bulk", degree),
            degree,
            |b, &d| {
                b.iter(|| SegmentRTree::new_loaded(d, &boxes));
            },
        );
    }
    group.bench_function("quadtree", |b| {
        b.iter(|| {
            let mut tree = Quadtree::new();
            for (i, bbox) in boxes.iter().enumerate() {
                tree.insert(*bbox, i);
            }
            tree
        });
    });
    group.bench_function("build_rstar", |b| {
        b.iter(|| utils::other_impls::build_rstar(&coords));
    });
    group.finish();
}

pub fn point_index_benchmark(c: &mut Criterion) {
    let extent = BoundingBox::new((0., 0.).into(), (1000., 1000.).into());
    let points = get_random_points(extent, 10_000, 342);
    let mut group = c.benchmark_group("build_point_index");
    for tolerance in [0., 1.].iter() {
        group.bench_with_input(
            BenchmarkId::new("kd_tree", tolerance),
            tolerance,
            |b, &t| {
                b.iter(|| {
                    let mut tree = KdTree::new(t);
                    for p in points.iter() {
                        tree.insert(*p, ());
                    }
                    tree
                });
            },
        );
    }
    group.bench_function("build_rstar", |b| {
        b.iter(|| utils::other_impls::build_rstar_points(&points));
    });
    group.finish();
}

criterion_group!(benches, segment_index_benchmark, point_index_benchmark);
criterion_main!(benches);
