use super::DistanceFunction;
use crate::bounds::{BoundingBox, BoundingSphere};
use crate::plane::Plane;
use crate::vector::{AffineTransform, Point};
use serde::{Deserialize, Serialize};

/// The closed half-space behind the plane. The image of a half-space under an
/// affine map is a half-space, so transformed queries stay exact.
impl DistanceFunction for Plane {
    fn local_eval(&self, p: Point, _radius: f64) -> f64 {
        Plane::eval(self, p)
    }

    fn local_closest(&self, p: Point) -> Point {
        if Plane::eval(self, p) <= 0.0 { p } else { self.project(p) }
    }

    fn local_gradient(&self, _p: Point) -> Point {
        self.normal()
    }

    fn eval(&self, p: Point, _radius: f64, transform: Option<&AffineTransform>) -> f64 {
        match transform {
            None => Plane::eval(self, p),
            Some(t) => Plane::eval(&self.transformed(t), p),
        }
    }

    fn gradient(&self, _p: Point, transform: Option<&AffineTransform>) -> Point {
        match transform {
            None => self.normal(),
            Some(t) => self.transformed(t).normal(),
        }
    }
}

/// A solid ball.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sphere {
    pub center: Point,
    pub radius: f64,
}

impl Sphere {
    pub fn new(center: Point, radius: f64) -> Self {
        Self { center, radius }
    }
}

impl DistanceFunction for Sphere {
    fn local_eval(&self, p: Point, radius: f64) -> f64 {
        let d = p.dist(self.center) - self.radius;
        if d > radius { f64::INFINITY } else { d }
    }

    fn local_closest(&self, p: Point) -> Point {
        let offset = p - self.center;
        if offset.mag() <= self.radius {
            return p;
        }
        self.center + offset.norm(self.radius)
    }

    fn local_gradient(&self, p: Point) -> Point {
        (p - self.center).normalize()
    }

    fn bounding_box(&self) -> BoundingBox {
        BoundingBox::new(self.center - Point::splat(self.radius), self.center + Point::splat(self.radius))
    }

    fn bounding_sphere(&self) -> BoundingSphere {
        BoundingSphere::new(self.center, self.radius)
    }
}

/// A solid axis-aligned box.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cuboid {
    pub min: Point,
    pub max: Point,
}

impl Cuboid {
    pub fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    pub fn from_center(center: Point, half_extent: Point) -> Self {
        Self::new(center - half_extent, center + half_extent)
    }

    fn center(&self) -> Point {
        (self.min + self.max) * 0.5
    }

    fn half_extent(&self) -> Point {
        (self.max - self.min) * 0.5
    }
}

impl DistanceFunction for Cuboid {
    fn local_eval(&self, p: Point, radius: f64) -> f64 {
        let q = (p - self.center()).abs() - self.half_extent();
        let outside = q.max_elem(Point::ZERO).mag();
        let inside = q.max_component().min(0.0);
        let d = outside + inside;
        if d > radius { f64::INFINITY } else { d }
    }

    fn local_closest(&self, p: Point) -> Point {
        p.max_elem(self.min).min_elem(self.max)
    }

    fn local_gradient(&self, p: Point) -> Point {
        let foot = self.local_closest(p);
        if foot != p {
            return (p - foot).normalize();
        }
        // Inside: the normal of the nearest side.
        let rel = p - self.center();
        let q = rel.abs() - self.half_extent();
        if q.x >= q.y && q.x >= q.z {
            Point::X * rel.x.signum()
        } else if q.y >= q.z {
            Point::Y * rel.y.signum()
        } else {
            Point::Z * rel.z.signum()
        }
    }

    fn bounding_box(&self) -> BoundingBox {
        BoundingBox::new(self.min, self.max)
    }

    fn bounding_sphere(&self) -> BoundingSphere {
        BoundingSphere::new(self.center(), self.half_extent().mag())
    }
}

/// A filled triangle, as thin as a surface: its distance is unsigned.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    pub a: Point,
    pub b: Point,
    pub c: Point,
}

impl Triangle {
    pub fn new(a: Point, b: Point, c: Point) -> Self {
        Self { a, b, c }
    }

    pub fn normal(&self) -> Point {
        (self.b - self.a).cross(self.c - self.a).normalize()
    }

    fn transformed(&self, t: &AffineTransform) -> Triangle {
        Triangle::new(t.apply(self.a), t.apply(self.b), t.apply(self.c))
    }

    /// Nearest point of the triangle, by Voronoi region of its vertices and
    /// edges.
    pub fn closest_point(&self, p: Point) -> Point {
        let (a, b, c) = (self.a, self.b, self.c);
        let ab = b - a;
        let ac = c - a;
        let ap = p - a;
        let d1 = ab.dot(ap);
        let d2 = ac.dot(ap);
        if d1 <= 0.0 && d2 <= 0.0 {
            return a;
        }

        let bp = p - b;
        let d3 = ab.dot(bp);
        let d4 = ac.dot(bp);
        if d3 >= 0.0 && d4 <= d3 {
            return b;
        }

        let vc = d1 * d4 - d3 * d2;
        if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
            return a + ab * (d1 / (d1 - d3));
        }

        let cp = p - c;
        let d5 = ab.dot(cp);
        let d6 = ac.dot(cp);
        if d6 >= 0.0 && d5 <= d6 {
            return c;
        }

        let vb = d5 * d2 - d1 * d6;
        if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
            return a + ac * (d2 / (d2 - d6));
        }

        let va = d3 * d6 - d5 * d4;
        if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
            return b + (c - b) * ((d4 - d3) / ((d4 - d3) + (d5 - d6)));
        }

        let denom = va + vb + vc;
        if denom == 0.0 {
            // Degenerate: every vertex region test failed on a sliver.
            return a;
        }
        a + ab * (vb / denom) + ac * (vc / denom)
    }

    fn distance(&self, p: Point, radius: f64) -> f64 {
        let sphere = self.bounding_sphere();
        let reach = sphere.radius + radius;
        if radius.is_finite() && p.dist2(sphere.center) > reach * reach {
            return f64::INFINITY;
        }
        let d = p.dist(self.closest_point(p));
        if d > radius { f64::INFINITY } else { d }
    }
}

impl DistanceFunction for Triangle {
    fn local_eval(&self, p: Point, radius: f64) -> f64 {
        self.distance(p, radius)
    }

    fn local_closest(&self, p: Point) -> Point {
        self.closest_point(p)
    }

    fn local_gradient(&self, p: Point) -> Point {
        let offset = p - self.closest_point(p);
        if offset.mag2() == 0.0 {
            return self.normal();
        }
        offset.normalize()
    }

    fn eval(&self, p: Point, radius: f64, transform: Option<&AffineTransform>) -> f64 {
        match transform {
            None => self.distance(p, radius),
            Some(t) => self.transformed(t).distance(p, radius),
        }
    }

    fn gradient(&self, p: Point, transform: Option<&AffineTransform>) -> Point {
        match transform {
            None => self.local_gradient(p),
            Some(t) => self.transformed(t).local_gradient(p),
        }
    }

    fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_points(&[self.a, self.b, self.c])
    }

    fn bounding_sphere(&self) -> BoundingSphere {
        BoundingSphere::from_points(&[self.a, self.b, self.c])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_half_space() {
        let plane = Plane::new(Point::Z, 1.0);
        assert!((DistanceFunction::eval(&plane, Point::new(4.0, 2.0, 3.0), f64::INFINITY, None) - 2.0).abs() < 1e-12);
        let t = AffineTransform::from_scale(Point::new(1.0, 1.0, 2.0));
        assert!((DistanceFunction::eval(&plane, Point::new(0.0, 0.0, 3.0), f64::INFINITY, Some(&t)) - 1.0).abs() < 1e-12);
        assert_eq!(plane.local_closest(Point::ZERO), Point::ZERO);
    }

    #[test]
    fn test_sphere_and_cuboid() {
        let sphere = Sphere::new(Point::new(1.0, 0.0, 0.0), 2.0);
        assert!((sphere.local_eval(Point::new(1.0, 0.0, 5.0), f64::INFINITY) - 3.0).abs() < 1e-12);
        assert!((sphere.local_eval(Point::new(1.0, 0.0, 0.0), f64::INFINITY) + 2.0).abs() < 1e-12);
        assert_eq!(sphere.local_eval(Point::new(1.0, 0.0, 5.0), 2.0), f64::INFINITY);

        let cube = Cuboid::from_center(Point::ZERO, Point::splat(1.0));
        assert!((cube.local_eval(Point::new(2.0, 2.0, 0.0), f64::INFINITY) - 2f64.sqrt()).abs() < 1e-12);
        assert!((cube.local_eval(Point::new(0.5, 0.0, 0.0), f64::INFINITY) + 0.5).abs() < 1e-12);
        assert_eq!(cube.local_gradient(Point::new(0.0, -0.9, 0.1)), -Point::Y);
        assert_eq!(cube.local_gradient(Point::new(3.0, 0.0, 0.0)), Point::X);
    }

    #[test]
    fn test_triangle_regions() {
        let tri = Triangle::new(Point::ZERO, Point::X, Point::Y);
        assert_eq!(tri.closest_point(Point::new(-1.0, -1.0, 0.0)), Point::ZERO);
        assert_eq!(tri.closest_point(Point::new(0.25, 0.25, 3.0)), Point::new(0.25, 0.25, 0.0));
        assert!((tri.closest_point(Point::new(1.0, 1.0, 0.0)) - Point::new(0.5, 0.5, 0.0)).mag() < 1e-12);
        assert!((tri.closest_point(Point::new(0.5, -2.0, 0.0)) - Point::new(0.5, 0.0, 0.0)).mag() < 1e-12);
        assert!((tri.local_eval(Point::new(0.25, 0.25, -2.0), f64::INFINITY) - 2.0).abs() < 1e-12);
        assert_eq!(tri.local_eval(Point::new(0.25, 0.25, -2.0), 1.0), f64::INFINITY);
    }

    #[test]
    fn test_triangle_is_exact_under_stretch() {
        let tri = Triangle::new(Point::ZERO, Point::X, Point::Y);
        let t = AffineTransform::from_scale(Point::new(4.0, 1.0, 1.0));
        let d = tri.eval(Point::new(6.0, 0.0, 0.0), f64::INFINITY, Some(&t));
        assert!((d - 2.0).abs() < 1e-12);
        let g = tri.gradient(Point::new(1.0, 0.1, 2.0), Some(&t));
        assert!((g - Point::Z).mag() < 1e-12);
    }
}
