use crate::vector::{AffineTransform, Point};

/// Axis-aligned bounding box. An empty box has `min > max`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub min: Point,
    pub max: Point,
}

impl BoundingBox {
    pub fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    /// The box containing nothing, neutral for [`BoundingBox::union`].
    pub fn empty() -> Self {
        Self::new(Point::splat(f64::INFINITY), Point::splat(f64::NEG_INFINITY))
    }

    pub fn infinite() -> Self {
        Self::new(Point::splat(f64::NEG_INFINITY), Point::splat(f64::INFINITY))
    }

    pub fn from_points(points: &[Point]) -> Self {
        points.iter().fold(Self::empty(), |b, &p| b.include(p))
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }

    pub fn include(self, p: Point) -> Self {
        Self::new(self.min.min_elem(p), self.max.max_elem(p))
    }

    pub fn union(self, o: BoundingBox) -> Self {
        Self::new(self.min.min_elem(o.min), self.max.max_elem(o.max))
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min.x
            && p.y >= self.min.y
            && p.z >= self.min.z
            && p.x <= self.max.x
            && p.y <= self.max.y
            && p.z <= self.max.z
    }

    pub fn center(&self) -> Point {
        (self.min + self.max) * 0.5
    }

    pub fn corners(&self) -> [Point; 8] {
        let (a, b) = (self.min, self.max);
        [
            Point::new(a.x, a.y, a.z),
            Point::new(b.x, a.y, a.z),
            Point::new(b.x, b.y, a.z),
            Point::new(a.x, b.y, a.z),
            Point::new(a.x, a.y, b.z),
            Point::new(b.x, a.y, b.z),
            Point::new(b.x, b.y, b.z),
            Point::new(a.x, b.y, b.z),
        ]
    }

    /// Bounds of the transformed box, from its eight corners.
    pub fn transform(&self, t: &AffineTransform) -> Self {
        if self.is_empty() {
            return *self;
        }
        if !self.is_finite() {
            return Self::infinite();
        }
        Self::from_points(&self.corners().map(|c| t.apply(c)))
    }
}

/// Bounding sphere. An empty sphere has a radius of negative infinity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingSphere {
    pub center: Point,
    pub radius: f64,
}

impl BoundingSphere {
    pub fn new(center: Point, radius: f64) -> Self {
        Self { center, radius }
    }

    pub fn empty() -> Self {
        Self::new(Point::ZERO, f64::NEG_INFINITY)
    }

    pub fn infinite() -> Self {
        Self::new(Point::ZERO, f64::INFINITY)
    }

    /// Sphere around the centroid of `points`.
    pub fn from_points(points: &[Point]) -> Self {
        if points.is_empty() {
            return Self::empty();
        }
        let center = points.iter().fold(Point::ZERO, |acc, &p| acc + p) / points.len() as f64;
        let radius = points
            .iter()
            .map(|p| p.dist(center))
            .fold(0.0, f64::max);
        Self::new(center, radius)
    }

    pub fn is_empty(&self) -> bool {
        self.radius < 0.0
    }

    pub fn contains(&self, p: Point) -> bool {
        p.dist(self.center) <= self.radius
    }

    /// Distance from `p` to the sphere surface, negative inside.
    pub fn distance(&self, p: Point) -> f64 {
        p.dist(self.center) - self.radius
    }

    /// Smallest sphere enclosing both.
    pub fn union(self, o: BoundingSphere) -> Self {
        if o.is_empty() {
            return self;
        }
        if self.is_empty() {
            return o;
        }
        if self.radius == f64::INFINITY || o.radius == f64::INFINITY {
            return Self::infinite();
        }
        let d = o.center.dist(self.center);
        if d + o.radius <= self.radius {
            return self;
        }
        if d + self.radius <= o.radius {
            return o;
        }
        let radius = (d + self.radius + o.radius) / 2.0;
        let center = self.center + (o.center - self.center) * ((radius - self.radius) / d);
        Self::new(center, radius)
    }

    /// A sphere enclosing the transformed sphere.
    pub fn transform(&self, t: &AffineTransform) -> Self {
        if self.is_empty() {
            return *self;
        }
        Self::new(t.apply(self.center), self.radius * t.max_stretch())
    }
}
