use crate::polytope::FaceKey;
use crate::vector::Point2D;

/// A dual line `{q : q·(x, y) = z}` in a host plane's (u, v) frame.
///
/// The inside half-plane is `q·(x, y) ≤ z`. Once normalized, the line is
/// parametrized as `origin + direction * t` with `direction = (-y, x)`, so
/// walking towards increasing `t` keeps the inside on the left. The extent
/// `[start, end]` bounds the part of the line that is an edge; its finite
/// end points are cached.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Line2D {
    x: f64,
    y: f64,
    z: f64,
    start: f64,
    end: f64,
    start_pos: Option<Point2D>,
    end_pos: Option<Point2D>,
    neighbor: Option<FaceKey>,
}

impl Line2D {
    /// An unbounded line.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            x,
            y,
            z,
            start: f64::NEG_INFINITY,
            end: f64::INFINITY,
            start_pos: None,
            end_pos: None,
            neighbor: None,
        }
    }

    /// The edge from `a` to `b`, with the inside on its left.
    pub fn through(a: Point2D, b: Point2D) -> Self {
        let dir = (b - a).norm(1.0);
        let n = dir.rot_cw();
        let mut line = Self::new(n.x, n.y, n.dot(a));
        line.set_extent(dir.dot(a), dir.dot(b));
        line
    }

    pub fn with_neighbor(mut self, neighbor: FaceKey) -> Self {
        self.neighbor = Some(neighbor);
        self
    }

    pub fn neighbor(&self) -> Option<FaceKey> {
        self.neighbor
    }

    pub fn normal(&self) -> Point2D {
        Point2D::new(self.x, self.y)
    }

    pub fn offset(&self) -> f64 {
        self.z
    }

    pub fn magnitude(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Rescales to a unit normal and drops any extent.
    pub fn normalized(&self) -> Self {
        let m = self.magnitude();
        Self {
            neighbor: self.neighbor,
            ..Self::new(self.x / m, self.y / m, self.z / m)
        }
    }

    pub fn direction(&self) -> Point2D {
        Point2D::new(-self.y, self.x)
    }

    /// The point of the line closest to the frame origin.
    pub fn origin(&self) -> Point2D {
        self.normal() * self.z
    }

    /// Signed distance of `q`, positive outside.
    pub fn eval(&self, q: Point2D) -> f64 {
        self.normal().dot(q) - self.z
    }

    /// Maps `q` to (signed distance, position along the line).
    pub fn to_uv(&self, q: Point2D) -> Point2D {
        Point2D::new(self.eval(q), self.direction().dot(q))
    }

    /// Inverse of [`Line2D::to_uv`].
    pub fn from_uv(&self, uv: Point2D) -> Point2D {
        self.normal() * (uv.x + self.z) + self.direction() * uv.y
    }

    pub fn point_at(&self, t: f64) -> Point2D {
        self.origin() + self.direction() * t
    }

    /// Monotone stand-in for the angle of the normal, in `[0, 4)`.
    pub fn pseudo_angle(&self) -> f64 {
        let (x, y) = (self.x, self.y);
        if y >= 0.0 {
            if x >= 0.0 { y / (x + y) } else { 1.0 - x / (y - x) }
        } else if x < 0.0 {
            2.0 - y / (-x - y)
        } else {
            3.0 + x / (x - y)
        }
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn length(&self) -> f64 {
        self.end - self.start
    }

    pub fn is_bounded(&self) -> bool {
        self.start.is_finite() && self.end.is_finite()
    }

    pub fn set_extent(&mut self, start: f64, end: f64) {
        self.start = start;
        self.end = end;
        self.start_pos = start.is_finite().then(|| self.point_at(start));
        self.end_pos = end.is_finite().then(|| self.point_at(end));
    }

    pub fn reset_extent(&mut self) {
        self.set_extent(f64::NEG_INFINITY, f64::INFINITY);
    }

    pub fn start_point(&self) -> Option<Point2D> {
        self.start_pos
    }

    pub fn end_point(&self) -> Option<Point2D> {
        self.end_pos
    }

    /// Foot of `q` on the edge, clamped to the extent.
    pub fn closest_point(&self, q: Point2D) -> Point2D {
        let t = self.direction().dot(q).clamp(self.start, self.end);
        self.point_at(t)
    }
}
