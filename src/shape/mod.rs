//! Signed-distance queries shared by every solid of the crate.

mod combinators;
mod primitives;

pub use combinators::{EmptyShape, Invert, Transformed, Union};
pub use primitives::{Cuboid, Sphere, Triangle};

use crate::bounds::{BoundingBox, BoundingSphere};
use crate::config::{DEFAULT_EPSILON, DEFAULT_REFINE_ITERATIONS};
use crate::vector::{AffineTransform, Point};
use std::fmt;

/// A solid that answers signed-distance queries.
///
/// Implementors describe themselves in their local frame; `eval` and
/// `gradient` map a world query through an optional transform without
/// mutating the shape. Must be Send + Sync so finished shapes can be queried
/// from a rayon pool.
pub trait DistanceFunction: Send + Sync + fmt::Debug {
    /// Signed distance in the local frame, negative inside. May return
    /// positive infinity when the point is provably farther than `radius`.
    fn local_eval(&self, p: Point, radius: f64) -> f64;

    /// Nearest point of the solid in the local frame. Points inside map to
    /// themselves.
    fn local_closest(&self, p: Point) -> Point;

    /// Outward direction in the local frame.
    fn local_gradient(&self, p: Point) -> Point {
        central_difference(self, p)
    }

    fn bounding_box(&self) -> BoundingBox {
        BoundingBox::infinite()
    }

    fn bounding_sphere(&self) -> BoundingSphere {
        BoundingSphere::infinite()
    }

    fn epsilon(&self) -> f64 {
        DEFAULT_EPSILON
    }

    fn refine_iterations(&self) -> usize {
        DEFAULT_REFINE_ITERATIONS
    }

    /// Signed distance of the world point `p` to the shape placed by
    /// `transform`. Positive infinity means no contact within `radius`.
    fn eval(&self, p: Point, radius: f64, transform: Option<&AffineTransform>) -> f64 {
        match transform {
            None => self.local_eval(p, radius),
            Some(t) => transformed_eval(self, p, radius, t),
        }
    }

    /// Unit outward direction at the world point `p`.
    fn gradient(&self, p: Point, transform: Option<&AffineTransform>) -> Point {
        match transform {
            None => self.local_gradient(p),
            Some(t) => transformed_gradient(self, p, t),
        }
    }
}

/// Step of the numerical gradient.
const GRADIENT_STEP: f64 = 1e-5;

/// Numerical gradient from central differences of `local_eval`.
pub fn central_difference<S: DistanceFunction + ?Sized>(shape: &S, p: Point) -> Point {
    let h = GRADIENT_STEP;
    let axis = |e: Point| {
        let a = shape.local_eval(p + e * h, f64::INFINITY);
        let b = shape.local_eval(p - e * h, f64::INFINITY);
        (a - b) / (2.0 * h)
    };
    Point::new(axis(Point::X), axis(Point::Y), axis(Point::Z)).normalize()
}

/// Distance under an affine placement.
///
/// Similarities rescale the local distance exactly. Other transforms scale
/// inside distances by the shortest basis column and refine outside ones by
/// projected gradient descent on the world-space distance.
pub fn transformed_eval<S: DistanceFunction + ?Sized>(
    shape: &S,
    p: Point,
    radius: f64,
    t: &AffineTransform,
) -> f64 {
    let q = t.inverse().apply(p);
    if let Some(s) = t.uniform_scale(shape.epsilon()) {
        return shape.local_eval(q, radius / s) * s;
    }
    let local = shape.local_eval(q, f64::INFINITY);
    if local <= 0.0 {
        return local * t.min_scale();
    }
    if !local.is_finite() {
        return local;
    }
    let d = p.dist(t.apply(refine_foot(shape, p, t)));
    if d > radius { f64::INFINITY } else { d }
}

/// Outward direction under an affine placement.
pub fn transformed_gradient<S: DistanceFunction + ?Sized>(shape: &S, p: Point, t: &AffineTransform) -> Point {
    let q = t.inverse().apply(p);
    if t.is_similarity(shape.epsilon()) || shape.local_eval(q, f64::INFINITY) <= 0.0 {
        return t.apply_normal(shape.local_gradient(q)).normalize();
    }
    let foot = t.apply(refine_foot(shape, p, t));
    if foot.dist(p) <= shape.epsilon() {
        return t.apply_normal(shape.local_gradient(q)).normalize();
    }
    (p - foot).normalize()
}

/// Local point whose image is nearest to the world point `p`.
///
/// Minimizes `|A x + b - p|²` over the solid with a fixed budget of
/// projected gradient steps; the step `1 / |A|²_F` never overshoots.
pub fn refine_foot<S: DistanceFunction + ?Sized>(shape: &S, p: Point, t: &AffineTransform) -> Point {
    let step = 1.0 / t.frobenius2();
    let mut x = shape.local_closest(t.inverse().apply(p));
    for _ in 0..shape.refine_iterations() {
        let residual = t.apply(x) - p;
        let next = shape.local_closest(x - t.apply_transpose(residual) * step);
        if next.dist2(x) == 0.0 {
            break;
        }
        x = next;
    }
    x
}
