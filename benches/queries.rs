use criterion::{criterion_group, criterion_main, Criterion};
use convexity::{AffineTransform, ConvexHull, DistanceFunction, Point, Quaternion, Triangle};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const NUM_QUERIES: usize = 10_000;

fn random_points(seed: u64, n: usize, extent: f64) -> Vec<Point> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            Point::new(
                rng.gen_range(-extent..extent),
                rng.gen_range(-extent..extent),
                rng.gen_range(-extent..extent),
            )
        })
        .collect()
}

fn benchmark_hull_queries(c: &mut Criterion) {
    let hull = ConvexHull::from_points(&random_points(1, 200, 1.0));
    let queries = random_points(2, NUM_QUERIES, 2.0);

    c.bench_function(&format!("hull_eval_{}_queries", NUM_QUERIES), |b| {
        b.iter(|| queries.iter().map(|&p| hull.signed_distance(p)).sum::<f64>())
    });

    c.bench_function(&format!("hull_contains_{}_queries", NUM_QUERIES), |b| {
        b.iter(|| queries.iter().filter(|&&p| hull.contains(p)).count())
    });

    let rigid = AffineTransform::from_rotation(Quaternion::from_rotation_vector(Point::new(0.3, 0.2, 0.1)), 1.5, Point::X);
    c.bench_function(&format!("hull_eval_similarity_{}_queries", NUM_QUERIES), |b| {
        b.iter(|| queries.iter().map(|&p| hull.eval(p, f64::INFINITY, Some(&rigid))).sum::<f64>())
    });

    let stretch = AffineTransform::from_scale(Point::new(2.0, 1.0, 0.5));
    c.bench_function(&format!("hull_eval_stretched_{}_queries", NUM_QUERIES), |b| {
        b.iter(|| queries.iter().map(|&p| hull.eval(p, f64::INFINITY, Some(&stretch))).sum::<f64>())
    });
}

fn benchmark_triangle_queries(c: &mut Criterion) {
    let tri = Triangle::new(Point::ZERO, Point::X, Point::Y);
    let queries = random_points(3, NUM_QUERIES, 2.0);
    c.bench_function(&format!("triangle_eval_{}_queries", NUM_QUERIES), |b| {
        b.iter(|| queries.iter().map(|&p| tri.eval(p, 0.5, None)).filter(|d| d.is_finite()).count())
    });
}

criterion_group!(benches, benchmark_hull_queries, benchmark_triangle_queries);
criterion_main!(benches);
