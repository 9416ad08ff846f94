use super::Point;
use serde::{Deserialize, Serialize};
use std::ops::{Mul, MulAssign, Neg};

/// Threshold below which the twist axis is considered orthogonal to the rotation.
const TWIST_THRESHOLD: f64 = 1e-3;

/// A rotation quaternion `w + xi + yj + zk`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quaternion {
    pub w: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quaternion {
    pub const IDENTITY: Quaternion = Quaternion::new(1.0, 0.0, 0.0, 0.0);

    pub const fn new(w: f64, x: f64, y: f64, z: f64) -> Self {
        Self { w, x, y, z }
    }

    /// Rotation by `|v|` radians around `v`.
    pub fn from_rotation_vector(v: Point) -> Self {
        let theta = v.mag();
        if theta == 0.0 {
            return Self::IDENTITY;
        }
        let s = (theta / 2.0).sin() / theta;
        Self::new((theta / 2.0).cos(), v.x * s, v.y * s, v.z * s)
    }

    pub fn from_axis_angle(axis: Point, angle: f64) -> Self {
        Self::from_rotation_vector(axis.norm(angle))
    }

    pub fn from_xyzw(v: [f64; 4]) -> Self {
        Self::new(v[3], v[0], v[1], v[2])
    }

    pub fn to_xyzw(self) -> [f64; 4] {
        [self.x, self.y, self.z, self.w]
    }

    pub fn vector_part(self) -> Point {
        Point::new(self.x, self.y, self.z)
    }

    fn pure(p: Point) -> Self {
        Self::new(0.0, p.x, p.y, p.z)
    }

    pub fn norm2(self) -> f64 {
        self.w * self.w + self.x * self.x + self.y * self.y + self.z * self.z
    }

    pub fn norm(self) -> f64 {
        self.norm2().sqrt()
    }

    pub fn normalize(self) -> Self {
        let m = self.norm();
        Self::new(self.w / m, self.x / m, self.y / m, self.z / m)
    }

    pub fn conjugate(self) -> Self {
        Self::new(self.w, -self.x, -self.y, -self.z)
    }

    pub fn inverse(self) -> Self {
        let m2 = self.norm2();
        let c = self.conjugate();
        Self::new(c.w / m2, c.x / m2, c.y / m2, c.z / m2)
    }

    /// Rotates `p` as `q p q*`.
    pub fn apply(self, p: Point) -> Point {
        (self * Self::pure(p) * self.conjugate()).vector_part()
    }

    /// Undoes [`Quaternion::apply`] for a unit quaternion.
    pub fn unapply(self, p: Point) -> Point {
        (self.conjugate() * Self::pure(p) * self).vector_part()
    }

    /// The rotation that applies `o` first, then `self`.
    pub fn after(self, o: Quaternion) -> Self {
        self * o
    }

    /// The rotation that applies `self` first, then `o`.
    pub fn before(self, o: Quaternion) -> Self {
        o * self
    }

    /// Splits the rotation into `(swing, twist)` with `self = swing * twist`,
    /// where `twist` rotates around the unit `axis`.
    pub fn swing_twist(self, axis: Point) -> (Quaternion, Quaternion) {
        let pm = axis.dot(self.vector_part());
        if pm.abs() < TWIST_THRESHOLD {
            return (self, Self::IDENTITY);
        }
        let twist = Self::new(self.w, axis.x * pm, axis.y * pm, axis.z * pm).normalize();
        (self * twist.conjugate(), twist)
    }

    /// Integrates an angular velocity step given as a rotation vector.
    pub fn add_velocity(self, v: Point) -> Self {
        self.before(Self::from_rotation_vector(v))
    }
}

impl Mul for Quaternion {
    type Output = Quaternion;
    fn mul(self, o: Quaternion) -> Quaternion {
        Quaternion::new(
            self.w * o.w - self.x * o.x - self.y * o.y - self.z * o.z,
            self.w * o.x + self.x * o.w + self.y * o.z - self.z * o.y,
            self.w * o.y - self.x * o.z + self.y * o.w + self.z * o.x,
            self.w * o.z + self.x * o.y - self.y * o.x + self.z * o.w,
        )
    }
}

impl MulAssign for Quaternion {
    fn mul_assign(&mut self, o: Quaternion) {
        *self = *self * o;
    }
}

impl Neg for Quaternion {
    type Output = Quaternion;
    fn neg(self) -> Quaternion {
        Quaternion::new(-self.w, -self.x, -self.y, -self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn close(a: Point, b: Point) -> bool {
        (a - b).mag() < 1e-12
    }

    #[test]
    fn test_quarter_turn_about_z() {
        let q = Quaternion::from_axis_angle(Point::Z, FRAC_PI_2);
        assert!(close(q.apply(Point::X), Point::Y));
        assert!(close(q.unapply(Point::Y), Point::X));
    }

    #[test]
    fn test_after_composes_right_to_left() {
        let a = Quaternion::from_axis_angle(Point::Z, FRAC_PI_2);
        let b = Quaternion::from_axis_angle(Point::X, FRAC_PI_2);
        let p = Point::new(0.3, -1.2, 2.0);
        assert!(close(a.after(b).apply(p), a.apply(b.apply(p))));
        assert!(close(a.before(b).apply(p), b.apply(a.apply(p))));
    }

    #[test]
    fn test_swing_twist_recomposes() {
        let q = Quaternion::from_rotation_vector(Point::new(0.4, -0.2, 0.9));
        let (swing, twist) = q.swing_twist(Point::Z);
        let r = swing * twist;
        for (a, b) in r.to_xyzw().iter().zip(q.to_xyzw()) {
            assert!((a - b).abs() < 1e-12);
        }
        // The twist rotates about z only.
        assert!(twist.x.abs() < 1e-12 && twist.y.abs() < 1e-12);
    }

    #[test]
    fn test_inverse_undoes_rotation() {
        let q = Quaternion::new(2.0, 0.5, -1.0, 0.25);
        let id = q * q.inverse();
        assert!((id.w - 1.0).abs() < 1e-12 && id.vector_part().mag() < 1e-12);
    }
}
