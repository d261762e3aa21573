use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use heatmap::{Coordinate, PointCount, QueryFilter, SpatialIndex};

fn synthetic_points(n: usize) -> Vec<PointCount> {
    let mut state: u64 = 0x9e37_79b9_7f4a_7c15;
    (0..n)
        .map(|i| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            let lat = (state % 180_000) as f64 / 1000.0 - 90.0;
            let lon = ((state >> 20) % 360_000) as f64 / 1000.0 - 180.0;
            PointCount::new(Coordinate::new(lat, lon), (i % 50) as u64 + 1)
        })
        .collect()
}

fn benchmark_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid_build");

    for size in [10_000, 50_000] {
        let points = synthetic_points(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &points, |b, points| {
            b.iter(|| SpatialIndex::build(black_box(points.clone()), 1.0))
        });
    }

    group.finish();
}

fn benchmark_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid_query");
    let index = SpatialIndex::build(synthetic_points(50_000), 1.0);

    let filters = [
        ("city", QueryFilter::new(40.5, 41.0, -74.3, -73.7)),
        ("country", QueryFilter::new(35.0, 55.0, -10.0, 20.0)),
        ("world", QueryFilter::new(-90.0, 90.0, -180.0, 180.0)),
    ];

    for (name, filter) in filters {
        group.bench_function(name, |b| {
            b.iter(|| heatmap::compute::spatial::range_query(&index, black_box(&filter)))
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_build, benchmark_query);
criterion_main!(benches);
