use super::{Point, Quaternion};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// An affine frame: three basis columns plus a translation.
///
/// The inverse is computed on first use and cached. The cached inverse in turn
/// caches the original, so `t.inverse().inverse()` never recomputes.
#[derive(Clone, Serialize, Deserialize)]
pub struct AffineTransform {
    x: Point,
    y: Point,
    z: Point,
    translation: Point,
    #[serde(skip)]
    inverse: OnceLock<Box<AffineTransform>>,
}

impl AffineTransform {
    pub fn new(x: Point, y: Point, z: Point, translation: Point) -> Self {
        Self {
            x,
            y,
            z,
            translation,
            inverse: OnceLock::new(),
        }
    }

    pub fn identity() -> Self {
        Self::new(Point::X, Point::Y, Point::Z, Point::ZERO)
    }

    pub fn from_translation(t: Point) -> Self {
        Self::new(Point::X, Point::Y, Point::Z, t)
    }

    /// Axis-aligned, possibly anisotropic scaling.
    pub fn from_scale(s: Point) -> Self {
        Self::new(Point::X * s.x, Point::Y * s.y, Point::Z * s.z, Point::ZERO)
    }

    /// Rotation and uniform scale followed by translation.
    pub fn from_rotation(rotation: Quaternion, scale: f64, translation: Point) -> Self {
        Self::new(
            rotation.apply(Point::X) * scale,
            rotation.apply(Point::Y) * scale,
            rotation.apply(Point::Z) * scale,
            translation,
        )
    }

    pub fn basis(&self) -> [Point; 3] {
        [self.x, self.y, self.z]
    }

    pub fn translation(&self) -> Point {
        self.translation
    }

    pub fn apply(&self, p: Point) -> Point {
        self.apply_vector(p) + self.translation
    }

    pub fn apply_vector(&self, v: Point) -> Point {
        self.x * v.x + self.y * v.y + self.z * v.z
    }

    /// Multiplies by the transpose of the linear part.
    pub fn apply_transpose(&self, v: Point) -> Point {
        Point::new(self.x.dot(v), self.y.dot(v), self.z.dot(v))
    }

    /// Maps a surface normal from local to world space, unnormalized.
    pub fn apply_normal(&self, n: Point) -> Point {
        self.inverse().apply_transpose(n)
    }

    pub fn determinant(&self) -> f64 {
        self.x.dot(self.y.cross(self.z))
    }

    pub fn frobenius2(&self) -> f64 {
        self.x.mag2() + self.y.mag2() + self.z.mag2()
    }

    /// Shortest basis column, a cheap stand-in for the smallest stretch.
    pub fn min_scale(&self) -> f64 {
        self.x.mag().min(self.y.mag()).min(self.z.mag())
    }

    /// Upper bound on how much the transform can stretch a vector.
    pub fn max_stretch(&self) -> f64 {
        self.frobenius2().sqrt()
    }

    /// The common column length when the linear part is a scaled rotation or
    /// reflection, within relative tolerance `eps`.
    pub fn uniform_scale(&self, eps: f64) -> Option<f64> {
        let s2 = (self.x.mag2() + self.y.mag2() + self.z.mag2()) / 3.0;
        if s2 == 0.0 {
            return None;
        }
        let tol = eps * s2;
        let similar = [self.x.mag2(), self.y.mag2(), self.z.mag2()]
            .iter()
            .all(|m| (m - s2).abs() <= tol)
            && self.x.dot(self.y).abs() <= tol
            && self.y.dot(self.z).abs() <= tol
            && self.z.dot(self.x).abs() <= tol;
        similar.then(|| s2.sqrt())
    }

    pub fn is_similarity(&self, eps: f64) -> bool {
        self.uniform_scale(eps).is_some()
    }

    /// `self ∘ o`: applies `o` first, then `self`.
    pub fn after(&self, o: &AffineTransform) -> AffineTransform {
        AffineTransform::new(
            self.apply_vector(o.x),
            self.apply_vector(o.y),
            self.apply_vector(o.z),
            self.apply(o.translation),
        )
    }

    /// `o ∘ self`: applies `self` first, then `o`.
    pub fn before(&self, o: &AffineTransform) -> AffineTransform {
        o.after(self)
    }

    /// Cached inverse. A singular transform yields non-finite entries.
    pub fn inverse(&self) -> &AffineTransform {
        self.inverse.get_or_init(|| {
            let det = self.determinant();
            let r0 = self.y.cross(self.z) / det;
            let r1 = self.z.cross(self.x) / det;
            let r2 = self.x.cross(self.y) / det;
            let t = self.translation;
            let inv = AffineTransform::new(
                Point::new(r0.x, r1.x, r2.x),
                Point::new(r0.y, r1.y, r2.y),
                Point::new(r0.z, r1.z, r2.z),
                -Point::new(r0.dot(t), r1.dot(t), r2.dot(t)),
            );
            let _ = inv.inverse.set(Box::new(self.without_cache()));
            Box::new(inv)
        })
    }

    #[cfg(test)]
    fn has_cached_inverse(&self) -> bool {
        self.inverse.get().is_some()
    }

    fn without_cache(&self) -> AffineTransform {
        AffineTransform::new(self.x, self.y, self.z, self.translation)
    }
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl PartialEq for AffineTransform {
    fn eq(&self, o: &Self) -> bool {
        self.x == o.x && self.y == o.y && self.z == o.z && self.translation == o.translation
    }
}

impl fmt::Debug for AffineTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AffineTransform")
            .field("x", &self.x)
            .field("y", &self.y)
            .field("z", &self.z)
            .field("translation", &self.translation)
            .finish_non_exhaustive()
    }
}
