use super::DistanceFunction;
use crate::bounds::{BoundingBox, BoundingSphere};
use crate::vector::{AffineTransform, Point};

/// The nearest of several shapes.
#[derive(Debug, Default)]
pub struct Union {
    shapes: Vec<Box<dyn DistanceFunction>>,
}

impl Union {
    pub fn new(shapes: Vec<Box<dyn DistanceFunction>>) -> Self {
        Self { shapes }
    }

    pub fn push(&mut self, shape: Box<dyn DistanceFunction>) {
        self.shapes.push(shape);
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    fn nearest(&self, p: Point, radius: f64, transform: Option<&AffineTransform>) -> Option<(usize, f64)> {
        self.shapes
            .iter()
            .map(|s| s.eval(p, radius, transform))
            .enumerate()
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }
}

impl DistanceFunction for Union {
    fn local_eval(&self, p: Point, radius: f64) -> f64 {
        self.eval(p, radius, None)
    }

    fn local_closest(&self, p: Point) -> Point {
        match self.nearest(p, f64::INFINITY, None) {
            Some((i, _)) => self.shapes[i].local_closest(p),
            None => p,
        }
    }

    fn local_gradient(&self, p: Point) -> Point {
        self.gradient(p, None)
    }

    fn eval(&self, p: Point, radius: f64, transform: Option<&AffineTransform>) -> f64 {
        self.nearest(p, radius, transform).map_or(f64::INFINITY, |(_, d)| d)
    }

    fn gradient(&self, p: Point, transform: Option<&AffineTransform>) -> Point {
        match self.nearest(p, f64::INFINITY, transform) {
            Some((i, _)) => self.shapes[i].gradient(p, transform),
            None => Point::X,
        }
    }

    fn bounding_box(&self) -> BoundingBox {
        self.shapes
            .iter()
            .fold(BoundingBox::empty(), |b, s| b.union(s.bounding_box()))
    }

    fn bounding_sphere(&self) -> BoundingSphere {
        self.shapes
            .iter()
            .fold(BoundingSphere::empty(), |b, s| b.union(s.bounding_sphere()))
    }
}

/// The complement of a shape.
#[derive(Debug)]
pub struct Invert {
    inner: Box<dyn DistanceFunction>,
}

impl Invert {
    pub fn new(inner: Box<dyn DistanceFunction>) -> Self {
        Self { inner }
    }
}

impl DistanceFunction for Invert {
    fn local_eval(&self, p: Point, _radius: f64) -> f64 {
        -self.inner.local_eval(p, f64::INFINITY)
    }

    fn local_closest(&self, p: Point) -> Point {
        if self.inner.local_eval(p, f64::INFINITY) >= 0.0 {
            return p;
        }
        // The inner surface bounds the complement too.
        let g = self.inner.local_gradient(p);
        p - g * self.inner.local_eval(p, f64::INFINITY)
    }

    fn local_gradient(&self, p: Point) -> Point {
        -self.inner.local_gradient(p)
    }

    fn eval(&self, p: Point, _radius: f64, transform: Option<&AffineTransform>) -> f64 {
        -self.inner.eval(p, f64::INFINITY, transform)
    }

    fn gradient(&self, p: Point, transform: Option<&AffineTransform>) -> Point {
        -self.inner.gradient(p, transform)
    }
}

/// A shape with no points: never in contact.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EmptyShape {
    gradient: Point,
}

impl EmptyShape {
    pub fn new(gradient: Point) -> Self {
        Self { gradient }
    }
}

impl Default for EmptyShape {
    fn default() -> Self {
        Self::new(Point::X)
    }
}

impl DistanceFunction for EmptyShape {
    fn local_eval(&self, _p: Point, _radius: f64) -> f64 {
        f64::INFINITY
    }

    fn local_closest(&self, p: Point) -> Point {
        p
    }

    fn local_gradient(&self, _p: Point) -> Point {
        self.gradient
    }

    fn gradient(&self, _p: Point, _transform: Option<&AffineTransform>) -> Point {
        self.gradient
    }

    fn bounding_box(&self) -> BoundingBox {
        BoundingBox::empty()
    }

    fn bounding_sphere(&self) -> BoundingSphere {
        BoundingSphere::empty()
    }
}

/// A shape placed by a fixed transform. Incoming transforms are composed
/// on the outside.
#[derive(Debug)]
pub struct Transformed {
    inner: Box<dyn DistanceFunction>,
    transform: AffineTransform,
}

impl Transformed {
    pub fn new(inner: Box<dyn DistanceFunction>, transform: AffineTransform) -> Self {
        Self { inner, transform }
    }

    pub fn transform(&self) -> &AffineTransform {
        &self.transform
    }
}

impl DistanceFunction for Transformed {
    fn local_eval(&self, p: Point, radius: f64) -> f64 {
        self.inner.eval(p, radius, Some(&self.transform))
    }

    fn local_closest(&self, p: Point) -> Point {
        let t = &self.transform;
        t.apply(self.inner.local_closest(t.inverse().apply(p)))
    }

    fn local_gradient(&self, p: Point) -> Point {
        self.inner.gradient(p, Some(&self.transform))
    }

    fn eval(&self, p: Point, radius: f64, transform: Option<&AffineTransform>) -> f64 {
        match transform {
            None => self.inner.eval(p, radius, Some(&self.transform)),
            Some(t) => self.inner.eval(p, radius, Some(&t.after(&self.transform))),
        }
    }

    fn gradient(&self, p: Point, transform: Option<&AffineTransform>) -> Point {
        match transform {
            None => self.inner.gradient(p, Some(&self.transform)),
            Some(t) => self.inner.gradient(p, Some(&t.after(&self.transform))),
        }
    }

    fn bounding_box(&self) -> BoundingBox {
        self.inner.bounding_box().transform(&self.transform)
    }

    fn bounding_sphere(&self) -> BoundingSphere {
        self.inner.bounding_sphere().transform(&self.transform)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::{Cuboid, Sphere};

    #[test]
    fn test_union_picks_nearer_shape() {
        let shapes: Vec<Box<dyn DistanceFunction>> = vec![
            Box::new(Sphere::new(Point::ZERO, 1.0)),
            Box::new(Sphere::new(Point::new(10.0, 0.0, 0.0), 1.0)),
        ];
        let union = Union::new(shapes);
        assert!((union.eval(Point::new(8.0, 0.0, 0.0), f64::INFINITY, None) - 1.0).abs() < 1e-12);
        assert!((union.gradient(Point::new(8.0, 0.0, 0.0), None) + Point::X).mag() < 1e-12);
        let b = union.bounding_box();
        assert_eq!(b.min, Point::splat(-1.0));
        assert_eq!(b.max, Point::new(11.0, 1.0, 1.0));
        assert!((union.bounding_sphere().radius - 6.0).abs() < 1e-12);
        assert_eq!(Union::default().eval(Point::ZERO, 1.0, None), f64::INFINITY);
    }

    #[test]
    fn test_invert_flips_sign() {
        let inv = Invert::new(Box::new(Sphere::new(Point::ZERO, 2.0)));
        assert!((inv.eval(Point::ZERO, f64::INFINITY, None) - 2.0).abs() < 1e-12);
        assert!((inv.eval(Point::new(3.0, 0.0, 0.0), f64::INFINITY, None) + 1.0).abs() < 1e-12);
        assert!((inv.gradient(Point::new(1.0, 0.0, 0.0), None) + Point::X).mag() < 1e-12);
        assert_eq!(inv.bounding_box(), BoundingBox::infinite());
    }

    #[test]
    fn test_empty_shape() {
        let empty = EmptyShape::new(Point::Y);
        assert_eq!(empty.eval(Point::ZERO, f64::INFINITY, None), f64::INFINITY);
        assert_eq!(empty.gradient(Point::ZERO, None), Point::Y);
        assert!(empty.bounding_box().is_empty());
        assert!(empty.bounding_sphere().is_empty());
    }

    #[test]
    fn test_transforms_compose() {
        let moved = Transformed::new(
            Box::new(Cuboid::from_center(Point::ZERO, Point::splat(1.0))),
            AffineTransform::from_translation(Point::new(5.0, 0.0, 0.0)),
        );
        assert!((moved.eval(Point::new(5.0, 3.0, 0.0), f64::INFINITY, None) - 2.0).abs() < 1e-12);
        let outer = AffineTransform::from_translation(Point::new(0.0, 0.0, 5.0));
        assert!((moved.eval(Point::new(5.0, 0.0, 5.0), f64::INFINITY, Some(&outer)) + 1.0).abs() < 1e-12);
        let b = moved.bounding_box();
        assert_eq!(b.min, Point::new(4.0, -1.0, -1.0));
    }
}
