use super::{ROOT_INFINITY, ROOT_ZERO};
use crate::error::{check_stride, Result};
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

/// A 3D vector with value semantics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point {
    pub const ZERO: Point = Point::new(0.0, 0.0, 0.0);
    pub const X: Point = Point::new(1.0, 0.0, 0.0);
    pub const Y: Point = Point::new(0.0, 1.0, 0.0);
    pub const Z: Point = Point::new(0.0, 0.0, 1.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub const fn splat(v: f64) -> Self {
        Self::new(v, v, v)
    }

    pub fn from_array(v: [f64; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Decodes a flat `[x, y, z, x, y, z, ...]` buffer.
    pub fn from_flat(buffer: &[f64]) -> Result<Vec<Point>> {
        check_stride(buffer, 3)?;
        Ok(buffer
            .chunks_exact(3)
            .map(|c| Point::new(c[0], c[1], c[2]))
            .collect())
    }

    pub fn flatten(points: &[Point]) -> Vec<f64> {
        points.iter().flat_map(|p| p.to_array()).collect()
    }

    pub fn dot(self, o: Point) -> f64 {
        self.x * o.x + self.y * o.y + self.z * o.z
    }

    pub fn cross(self, o: Point) -> Point {
        Point::new(
            self.y * o.z - self.z * o.y,
            self.z * o.x - self.x * o.z,
            self.x * o.y - self.y * o.x,
        )
    }

    pub fn mul_elem(self, o: Point) -> Point {
        Point::new(self.x * o.x, self.y * o.y, self.z * o.z)
    }

    pub fn div_elem(self, o: Point) -> Point {
        Point::new(self.x / o.x, self.y / o.y, self.z / o.z)
    }

    pub fn mag2(self) -> f64 {
        self.dot(self)
    }

    /// Euclidean length, rescaling first when the squared length under- or
    /// overflows.
    pub fn mag(self) -> f64 {
        let m = self.mag2();
        if m == 0.0 {
            if self == Point::ZERO {
                return 0.0;
            }
            (self / ROOT_ZERO).mag2().sqrt() * ROOT_ZERO
        } else if m == f64::INFINITY {
            (self / ROOT_INFINITY).mag2().sqrt() * ROOT_INFINITY
        } else {
            m.sqrt()
        }
    }

    pub fn dist(self, o: Point) -> f64 {
        (self - o).mag()
    }

    pub fn dist2(self, o: Point) -> f64 {
        (self - o).mag2()
    }

    /// Rescales to length `l`. A zero vector becomes `(l, 0, 0)`.
    pub fn norm(self, l: f64) -> Point {
        let m = self.mag();
        if m == 0.0 {
            return Point::new(l, 0.0, 0.0);
        }
        self * (l / m)
    }

    pub fn normalize(self) -> Point {
        self.norm(1.0)
    }

    /// Clamps the length into `[lo, hi]`.
    pub fn clamp_mag(self, lo: f64, hi: f64) -> Point {
        let m = self.mag();
        if m < lo {
            if m == 0.0 {
                return Point::new(lo, 0.0, 0.0);
            }
            return self * (lo / m);
        }
        if m > hi {
            return self * (hi / m);
        }
        self
    }

    /// Removes the component along `v`, which need not be normalized.
    pub fn remove_component(self, v: Point) -> Point {
        self - v * (self.dot(v) / v.mag2())
    }

    /// Reflects the component along `n` with restitution `r`.
    pub fn bounce(self, n: Point, r: f64) -> Point {
        self - n * (self.dot(n) / n.mag2() * (1.0 + r))
    }

    /// Same as [`Point::bounce`] for a unit normal.
    pub fn bounce_normal(self, n: Point, r: f64) -> Point {
        self - n * (self.dot(n) * (1.0 + r))
    }

    pub fn lerp(self, o: Point, t: f64) -> Point {
        self + (o - self) * t
    }

    pub fn min_elem(self, o: Point) -> Point {
        Point::new(self.x.min(o.x), self.y.min(o.y), self.z.min(o.z))
    }

    pub fn max_elem(self, o: Point) -> Point {
        Point::new(self.x.max(o.x), self.y.max(o.y), self.z.max(o.z))
    }

    pub fn abs(self) -> Point {
        Point::new(self.x.abs(), self.y.abs(), self.z.abs())
    }

    pub fn max_component(self) -> f64 {
        self.x.max(self.y).max(self.z)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// A unit vector perpendicular to `self`, built against the least aligned axis.
    pub fn perpendicular(self) -> Point {
        let n = self.normalize();
        let a = n.abs();
        let axis = if a.x <= a.y && a.x <= a.z {
            Point::X
        } else if a.y <= a.z {
            Point::Y
        } else {
            Point::Z
        };
        (axis - n * n.dot(axis)).normalize()
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, o: Point) -> Point {
        Point::new(self.x + o.x, self.y + o.y, self.z + o.z)
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, o: Point) -> Point {
        Point::new(self.x - o.x, self.y - o.y, self.z - o.z)
    }
}

impl Neg for Point {
    type Output = Point;
    fn neg(self) -> Point {
        Point::new(-self.x, -self.y, -self.z)
    }
}

impl Mul<f64> for Point {
    type Output = Point;
    fn mul(self, s: f64) -> Point {
        Point::new(self.x * s, self.y * s, self.z * s)
    }
}

impl Mul<Point> for f64 {
    type Output = Point;
    fn mul(self, p: Point) -> Point {
        p * self
    }
}

impl Div<f64> for Point {
    type Output = Point;
    fn div(self, s: f64) -> Point {
        Point::new(self.x / s, self.y / s, self.z / s)
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, o: Point) {
        self.x += o.x;
        self.y += o.y;
        self.z += o.z;
    }
}

impl SubAssign for Point {
    fn sub_assign(&mut self, o: Point) {
        self.x -= o.x;
        self.y -= o.y;
        self.z -= o.z;
    }
}

impl MulAssign<f64> for Point {
    fn mul_assign(&mut self, s: f64) {
        self.x *= s;
        self.y *= s;
        self.z *= s;
    }
}

impl DivAssign<f64> for Point {
    fn div_assign(&mut self, s: f64) {
        self.x /= s;
        self.y /= s;
        self.z /= s;
    }
}

impl From<[f64; 3]> for Point {
    fn from(v: [f64; 3]) -> Self {
        Point::from_array(v)
    }
}
