use criterion::{criterion_group, criterion_main, Criterion};
use convexity::{ConvexHull, Plane, Point};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const NUM_POINTS: usize = 1000;

fn sphere_points(n: usize) -> Vec<Point> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..n)
        .map(|_| {
            let z: f64 = rng.gen_range(-1.0..1.0);
            let a: f64 = rng.gen_range(0.0..std::f64::consts::TAU);
            let r = (1.0 - z * z).sqrt();
            Point::new(r * a.cos(), r * a.sin(), z)
        })
        .collect()
}

fn ball_points(n: usize) -> Vec<Point> {
    let mut rng = StdRng::seed_from_u64(43);
    (0..n)
        .map(|_| Point::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0)))
        .collect()
}

fn tangent_planes(n: usize) -> Vec<Plane> {
    sphere_points(n).into_iter().map(|p| Plane::new(p, 1.0)).collect()
}

fn benchmark_point_hull(c: &mut Criterion) {
    let surface = sphere_points(NUM_POINTS);
    c.bench_function(&format!("hull_from_{}_sphere_points", NUM_POINTS), |b| {
        b.iter(|| ConvexHull::from_points(&surface))
    });

    let cube = ball_points(NUM_POINTS);
    c.bench_function(&format!("hull_from_{}_cube_points", NUM_POINTS), |b| {
        b.iter(|| ConvexHull::from_points(&cube))
    });
}

fn benchmark_plane_hull(c: &mut Criterion) {
    for n in [16, 64, 256] {
        let planes = tangent_planes(n);
        c.bench_function(&format!("hull_from_{}_planes", n), |b| {
            b.iter(|| ConvexHull::from_planes(&planes))
        });
    }
}

criterion_group!(benches, benchmark_point_hull, benchmark_plane_hull);
criterion_main!(benches);
