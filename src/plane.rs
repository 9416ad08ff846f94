use crate::error::{check_stride, Result};
use crate::line::Line2D;
use crate::vector::{AffineTransform, Point, Point2D};

/// An oriented plane `{p : p·normal = distance}` with its inside on the
/// negative side.
///
/// The normal is normalized at construction and a right-handed local frame
/// `(perp, perp2, normal)` is cached for the plane-local (u, v, w) coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
    normal: Point,
    distance: f64,
    perp: Point,
    perp2: Point,
}

impl Plane {
    /// A zero normal is replaced by `+x`.
    pub fn new(normal: Point, distance: f64) -> Self {
        let m = normal.mag();
        let (normal, distance) = if m == 0.0 {
            (Point::X, distance)
        } else {
            (normal / m, distance / m)
        };
        let perp = normal.perpendicular();
        let perp2 = normal.cross(perp);
        Self {
            normal,
            distance,
            perp,
            perp2,
        }
    }

    pub fn from_point_normal(point: Point, normal: Point) -> Self {
        Self::new(normal, normal.dot(point))
    }

    /// Plane through three points, with normal `(b - a) × (c - a)`.
    pub fn from_points(a: Point, b: Point, c: Point) -> Self {
        Self::from_point_normal(a, (b - a).cross(c - a))
    }

    /// Decodes a flat `[nx, ny, nz, d, ...]` buffer.
    pub fn from_flat(buffer: &[f64]) -> Result<Vec<Plane>> {
        check_stride(buffer, 4)?;
        Ok(buffer
            .chunks_exact(4)
            .map(|c| Plane::new(Point::new(c[0], c[1], c[2]), c[3]))
            .collect())
    }

    pub fn normal(&self) -> Point {
        self.normal
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn perp(&self) -> Point {
        self.perp
    }

    pub fn perp2(&self) -> Point {
        self.perp2
    }

    /// The point of the plane closest to the world origin.
    pub fn origin(&self) -> Point {
        self.normal * self.distance
    }

    /// Signed distance, positive outside.
    pub fn eval(&self, p: Point) -> f64 {
        self.normal.dot(p) - self.distance
    }

    pub fn flipped(&self) -> Plane {
        Plane {
            normal: -self.normal,
            distance: -self.distance,
            perp: self.perp2,
            perp2: self.perp,
        }
    }

    pub fn project(&self, p: Point) -> Point {
        p - self.normal * self.eval(p)
    }

    pub fn to_uvw(&self, p: Point) -> Point {
        Point::new(p.dot(self.perp), p.dot(self.perp2), self.eval(p))
    }

    pub fn from_uvw(&self, q: Point) -> Point {
        self.perp * q.x + self.perp2 * q.y + self.normal * (q.z + self.distance)
    }

    pub fn to_uv(&self, p: Point) -> Point2D {
        Point2D::new(p.dot(self.perp), p.dot(self.perp2))
    }

    pub fn from_uv(&self, q: Point2D) -> Point {
        self.from_uvw(Point::new(q.x, q.y, 0.0))
    }

    /// Same orientation and offset within `eps`.
    pub fn coincides(&self, o: &Plane, eps: f64) -> bool {
        self.normal.dot(o.normal) >= 1.0 - eps && (self.distance - o.distance).abs() <= eps
    }

    /// Normals parallel or antiparallel within `eps`.
    pub fn is_parallel(&self, o: &Plane, eps: f64) -> bool {
        self.normal.cross(o.normal).mag() <= eps
    }

    /// The dual line of `o` in this plane's (u, v) frame.
    ///
    /// Points of this plane satisfy `o` exactly on the line and lie inside `o`
    /// on the line's inside. The line is left unnormalized so that callers can
    /// reject near-parallel planes by [`Line2D::magnitude`].
    pub fn intersection_line(&self, o: &Plane) -> Line2D {
        Line2D::new(
            o.normal.dot(self.perp),
            o.normal.dot(self.perp2),
            o.distance - self.distance * o.normal.dot(self.normal),
        )
    }

    /// The image of this plane under `t`.
    pub fn transformed(&self, t: &AffineTransform) -> Plane {
        let normal = t.apply_normal(self.normal);
        let point = t.apply(self.origin());
        Plane::from_point_normal(point, normal)
    }
}
