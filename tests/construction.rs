use convexity::{ConvexHull, DEFAULT_EPSILON, HullMode, HullState, KernelConfig, Plane, Point};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_unit(rng: &mut StdRng) -> Point {
    loop {
        let p = Point::new(
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
        );
        let m = p.mag();
        if m > 1e-3 && m <= 1.0 {
            return p / m;
        }
    }
}

fn random_cloud(rng: &mut StdRng, n: usize) -> Vec<Point> {
    (0..n)
        .map(|_| random_unit(rng) * rng.gen_range(0.5..2.0) + Point::new(0.3, -0.2, 0.1))
        .collect()
}

/// Every plane through three of `points` that has all of them on one side.
fn supporting_planes(points: &[Point]) -> Vec<Plane> {
    let mut planes = Vec::new();
    let n = points.len();
    for i in 0..n {
        for j in i + 1..n {
            for k in j + 1..n {
                let normal = (points[j] - points[i]).cross(points[k] - points[i]);
                if normal.mag() < 1e-9 {
                    continue;
                }
                for plane in [
                    Plane::from_point_normal(points[i], normal),
                    Plane::from_point_normal(points[i], -normal),
                ] {
                    if points.iter().all(|&p| plane.eval(p) <= 1e-9) {
                        planes.push(plane);
                    }
                }
            }
        }
    }
    planes
}

#[test]
fn test_point_and_plane_hulls_agree_on_support() {
    let mut rng = StdRng::seed_from_u64(7);
    let points = random_cloud(&mut rng, 14);
    let from_points = ConvexHull::from_points(&points);
    let from_planes = ConvexHull::from_planes(&supporting_planes(&points));
    assert_eq!(from_points.state(), HullState::Volumetric);
    assert_eq!(from_planes.state(), HullState::Bounded);

    for _ in 0..200 {
        let dir = random_unit(&mut rng);
        let expected = points.iter().map(|p| p.dot(dir)).fold(f64::NEG_INFINITY, f64::max);
        let a = from_points.support(dir);
        let b = from_planes.support(dir);
        assert!((a - expected).abs() <= DEFAULT_EPSILON, "Point hull support {} != {} along {:?}", a, expected, dir);
        assert!((b - expected).abs() <= DEFAULT_EPSILON, "Plane hull support {} != {} along {:?}", b, expected, dir);
    }
    assert!((from_points.volume() - from_planes.volume()).abs() < 1e-6);
}

fn sphere_or_ball(rng: &mut StdRng, n: usize, on_sphere: bool) -> Vec<Point> {
    (0..n)
        .map(|_| {
            let u = random_unit(rng);
            if on_sphere { u } else { u * rng.gen_range(0.0f64..1.0).cbrt() }
        })
        .collect()
}

fn check_reproduces_cloud(hull: &ConvexHull, points: &[Point], rng: &mut StdRng, label: &str) {
    assert_eq!(hull.state(), HullState::Volumetric, "{}", label);
    for v in hull.vertices() {
        let gap = points.iter().map(|p| p.dist(v)).fold(f64::INFINITY, f64::min);
        assert!(gap <= DEFAULT_EPSILON, "{}: corner {:?} is {} away from every input point", label, v, gap);
    }
    for _ in 0..200 {
        let dir = random_unit(rng);
        let expected = points.iter().map(|p| p.dot(dir)).fold(f64::NEG_INFINITY, f64::max);
        let got = hull.support(dir);
        assert!((got - expected).abs() <= DEFAULT_EPSILON, "{}: support {} != {} along {:?}", label, got, expected, dir);
    }
}

#[test]
fn test_point_hulls_reproduce_random_clouds() {
    for seed in 0..40 {
        let mut rng = StdRng::seed_from_u64(seed);
        let n = rng.gen_range(8..=100);
        let on_sphere = seed % 2 == 0;
        let points = sphere_or_ball(&mut rng, n, on_sphere);

        let batch = ConvexHull::from_points(&points);
        check_reproduces_cloud(&batch, &points, &mut rng, &format!("batch seed {} n {} sphere {}", seed, n, on_sphere));

        let mut single = ConvexHull::new(HullMode::Points);
        for &p in &points {
            single.add_point(p);
        }
        check_reproduces_cloud(&single, &points, &mut rng, &format!("single seed {} n {} sphere {}", seed, n, on_sphere));
    }
}

#[test]
fn test_interior_points_and_loose_planes_change_nothing() {
    let mut rng = StdRng::seed_from_u64(11);
    let points = random_cloud(&mut rng, 20);
    let mut hull = ConvexHull::from_points(&points);
    let faces = hull.face_count();
    let volume = hull.volume();
    let centroid = hull.centroid().unwrap();
    hull.add_points(&[centroid, (centroid + points[0]) * 0.5]);
    hull.add_points(&points);
    assert_eq!(hull.face_count(), faces);
    assert!((hull.volume() - volume).abs() < 1e-9);

    let mut cube = ConvexHull::from_planes(
        &[Point::X, -Point::X, Point::Y, -Point::Y, Point::Z, -Point::Z]
            .map(|n| Plane::new(n, 1.0)),
    );
    cube.add_planes(&[
        Plane::new(Point::new(1.0, 1.0, 1.0), 10.0),
        Plane::new(Point::X, 1.0),
        Plane::new(-Point::Y, 3.0),
    ]);
    assert_eq!(cube.face_count(), 6);
    assert!((cube.volume() - 8.0).abs() < 1e-9);
}

fn check_sign_agreement(hull: &ConvexHull, rng: &mut StdRng) {
    for _ in 0..500 {
        let p = Point::new(
            rng.gen_range(-3.0..3.0),
            rng.gen_range(-3.0..3.0),
            rng.gen_range(-3.0..3.0),
        );
        let d = hull.signed_distance(p);
        assert_eq!(d <= 0.0, hull.contains(p), "eval {} disagrees with contains at {:?}", d, p);
    }
}

#[test]
fn test_eval_sign_matches_contains() {
    let mut rng = StdRng::seed_from_u64(3);
    let points = random_cloud(&mut rng, 30);
    check_sign_agreement(&ConvexHull::from_points(&points), &mut rng);
    check_sign_agreement(&ConvexHull::from_planes(&supporting_planes(&points[..10])), &mut rng);

    let mut wedge = ConvexHull::new(HullMode::Planes);
    wedge.add_planes(&[Plane::new(Point::X, 0.0), Plane::new(Point::Y, 0.0)]);
    assert_eq!(wedge.state(), HullState::Unbounded);
    check_sign_agreement(&wedge, &mut rng);
}

macro_rules! test_seed_state {
    ($test_name:ident, $points:expr, $state:expr, $faces:expr) => {
        #[test]
        fn $test_name() {
            let hull = ConvexHull::from_points(&$points);
            assert_eq!(hull.state(), $state);
            assert_eq!(hull.face_count(), $faces);
        }
    };
}

test_seed_state!(test_seed_empty, [] as [Point; 0], HullState::Empty, 0);
test_seed_state!(test_seed_point, [Point::X], HullState::Point, 1);
test_seed_state!(
    test_seed_collinear,
    [Point::ZERO, Point::X, Point::X * 3.0, Point::X * -2.0],
    HullState::Segment,
    2
);
test_seed_state!(
    test_seed_coplanar,
    [Point::ZERO, Point::X, Point::Y, Point::new(1.0, 1.0, 0.0), Point::new(0.5, 2.0, 0.0)],
    HullState::Planar,
    2
);

#[test]
fn test_collinear_and_coplanar_extents() {
    let segment = ConvexHull::from_points(&[Point::ZERO, Point::X, Point::X * 3.0, Point::X * -2.0]);
    assert!((segment.support(Point::X) - 3.0).abs() < 1e-9);
    assert!((segment.support(-Point::X) - 2.0).abs() < 1e-9);
    assert_eq!(segment.volume(), 0.0);

    let square = ConvexHull::from_points(&[
        Point::ZERO,
        Point::X,
        Point::Y,
        Point::new(1.0, 1.0, 0.0),
        Point::new(0.5, 0.5, 0.0),
    ]);
    for (_, face) in square.faces() {
        assert_eq!(face.vertices_3d().len(), 4);
        assert!((face.area() - 1.0).abs() < 1e-9);
    }
    let d = square.signed_distance(Point::new(0.5, 0.5, 0.25));
    assert!((d - 0.25).abs() < 1e-9);
}

#[test]
fn test_cube_corners_give_six_faces() {
    let mut pts = Vec::new();
    for x in [-1.0, 1.0] {
        for y in [-1.0, 1.0] {
            for z in [-1.0, 1.0] {
                pts.push(Point::new(x, y, z));
            }
        }
    }
    let hull = ConvexHull::from_points(&pts);
    assert_eq!(hull.face_count(), 6);
    assert_eq!(hull.vertices().len(), 8);
    assert_eq!(hull.triangles().len(), 12);
    assert!((hull.volume() - 8.0).abs() < 1e-9);
    assert!((hull.signed_distance(Point::new(0.0, 0.0, 3.0)) - 2.0).abs() < 1e-9);
}

#[test]
fn test_infeasible_and_redundant_planes() {
    let mut hull = ConvexHull::new(HullMode::Planes);
    hull.add_plane(Plane::new(Point::X, 1.0));
    hull.add_plane(Plane::new(Point::X, 2.0));
    assert_eq!(hull.face_count(), 1);
    hull.add_plane(Plane::new(-Point::X, -3.0));
    assert_eq!(hull.state(), HullState::Infeasible);

    // Later planes cannot revive an infeasible hull.
    hull.add_plane(Plane::new(Point::Y, 1.0));
    assert_eq!(hull.state(), HullState::Infeasible);
    assert_eq!(hull.face_count(), 0);
    assert_eq!(hull.signed_distance(Point::ZERO), f64::INFINITY);
}

#[test]
fn test_tolerance_is_per_hull() {
    let coarse = KernelConfig::new(0.1).unwrap();
    let mut hull = ConvexHull::with_config(HullMode::Points, coarse);
    hull.add_points(&[Point::ZERO, Point::new(0.05, 0.0, 0.0)]);
    assert_eq!(hull.state(), HullState::Point);

    let mut fine = ConvexHull::new(HullMode::Points);
    fine.add_points(&[Point::ZERO, Point::new(0.05, 0.0, 0.0)]);
    assert_eq!(fine.state(), HullState::Segment);
}
