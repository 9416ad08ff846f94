use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign};

/// A 2D vector in a plane's local (u, v) frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub const ZERO: Point2D = Point2D::new(0.0, 0.0);

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn to_array(self) -> [f64; 2] {
        [self.x, self.y]
    }

    pub fn dot(self, o: Point2D) -> f64 {
        self.x * o.x + self.y * o.y
    }

    /// z component of the 3D cross product.
    pub fn cross(self, o: Point2D) -> f64 {
        self.x * o.y - self.y * o.x
    }

    pub fn mag2(self) -> f64 {
        self.dot(self)
    }

    pub fn mag(self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn dist(self, o: Point2D) -> f64 {
        (self - o).mag()
    }

    pub fn norm(self, l: f64) -> Point2D {
        let m = self.mag();
        if m == 0.0 {
            return Point2D::new(l, 0.0);
        }
        self * (l / m)
    }

    /// Rotates a quarter turn counter-clockwise.
    pub fn rot_ccw(self) -> Point2D {
        Point2D::new(-self.y, self.x)
    }

    /// Rotates a quarter turn clockwise.
    pub fn rot_cw(self) -> Point2D {
        Point2D::new(self.y, -self.x)
    }

    pub fn lerp(self, o: Point2D, t: f64) -> Point2D {
        self + (o - self) * t
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Point2D {
    type Output = Point2D;
    fn add(self, o: Point2D) -> Point2D {
        Point2D::new(self.x + o.x, self.y + o.y)
    }
}

impl Sub for Point2D {
    type Output = Point2D;
    fn sub(self, o: Point2D) -> Point2D {
        Point2D::new(self.x - o.x, self.y - o.y)
    }
}

impl Neg for Point2D {
    type Output = Point2D;
    fn neg(self) -> Point2D {
        Point2D::new(-self.x, -self.y)
    }
}

impl Mul<f64> for Point2D {
    type Output = Point2D;
    fn mul(self, s: f64) -> Point2D {
        Point2D::new(self.x * s, self.y * s)
    }
}

impl Div<f64> for Point2D {
    type Output = Point2D;
    fn div(self, s: f64) -> Point2D {
        Point2D::new(self.x / s, self.y / s)
    }
}

impl AddAssign for Point2D {
    fn add_assign(&mut self, o: Point2D) {
        self.x += o.x;
        self.y += o.y;
    }
}

impl SubAssign for Point2D {
    fn sub_assign(&mut self, o: Point2D) {
        self.x -= o.x;
        self.y -= o.y;
    }
}

impl MulAssign<f64> for Point2D {
    fn mul_assign(&mut self, s: f64) {
        self.x *= s;
        self.y *= s;
    }
}
