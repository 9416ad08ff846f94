//! Parallel queries over many points and parallel hull construction.

use crate::config::KernelConfig;
use crate::plane::Plane;
use crate::polytope::{ConvexHull, HullMode};
use crate::shape::DistanceFunction;
use crate::vector::{AffineTransform, Point};
use rayon::prelude::*;

/// Signed distances of `points`, in order.
pub fn eval_batch<S: DistanceFunction + ?Sized>(
    shape: &S,
    points: &[Point],
    radius: f64,
    transform: Option<&AffineTransform>,
) -> Vec<f64> {
    points
        .par_iter()
        .map(|&p| shape.eval(p, radius, transform))
        .collect()
}

/// Gradients at `points`, in order.
pub fn gradient_batch<S: DistanceFunction + ?Sized>(
    shape: &S,
    points: &[Point],
    transform: Option<&AffineTransform>,
) -> Vec<Point> {
    points
        .par_iter()
        .map(|&p| shape.gradient(p, transform))
        .collect()
}

pub fn contains_batch(hull: &ConvexHull, points: &[Point]) -> Vec<bool> {
    points.par_iter().map(|&p| hull.contains(p)).collect()
}

/// Builds one plane-driven hull per plane set.
pub fn build_hulls(plane_sets: &[Vec<Plane>], config: KernelConfig) -> Vec<ConvexHull> {
    plane_sets
        .par_iter()
        .map(|planes| {
            let mut hull = ConvexHull::with_config(HullMode::Planes, config);
            hull.add_planes(planes);
            hull
        })
        .collect()
}

/// Builds one point-driven hull per point cloud.
pub fn build_point_hulls(clouds: &[Vec<Point>], config: KernelConfig) -> Vec<ConvexHull> {
    clouds
        .par_iter()
        .map(|points| {
            let mut hull = ConvexHull::with_config(HullMode::Points, config);
            hull.add_points(points);
            hull
        })
        .collect()
}
