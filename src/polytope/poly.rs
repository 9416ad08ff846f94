use super::FaceKey;
use crate::bounds::{BoundingBox, BoundingSphere};
use crate::config::KernelConfig;
use crate::line::Line2D;
use crate::plane::Plane;
use crate::shape::DistanceFunction;
use crate::vector::{Point, Point2D};
use log::{trace, warn};

/// How a [`ConvexPoly`] is fed. A poly accepts one protocol over its lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PolyMode {
    /// Empty until points arrive; grows as the 2D hull of its points.
    PointDriven,
    /// The whole plane until clipped; shrinks as half-planes are added.
    PlaneDriven,
}

/// Result of projecting a 3D point onto a face.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceQuery {
    /// Distance to the nearest point of the filled face.
    pub distance: f64,
    /// Signed distance to the face's plane.
    pub w: f64,
    /// Whether the projection onto the plane lies inside the face.
    pub inside: bool,
    /// Nearest point of the filled face.
    pub foot: Point,
}

/// One convex planar face: a ring of dual-line edges in its plane's frame.
///
/// Edges are kept in counter-clockwise order (increasing pseudo-angle of
/// their outward normals), so edge `i` ends where edge `i + 1` starts whenever
/// the ring is bounded.
#[derive(Clone, Debug)]
pub struct ConvexPoly {
    plane: Plane,
    mode: PolyMode,
    lines: Vec<Line2D>,
    // Seed points of a point-driven poly that has no edges yet.
    points: Vec<Point2D>,
    empty: bool,
    config: KernelConfig,
}

impl ConvexPoly {
    pub fn new(plane: Plane, mode: PolyMode) -> Self {
        Self::with_config(plane, mode, KernelConfig::default())
    }

    pub fn with_config(plane: Plane, mode: PolyMode, config: KernelConfig) -> Self {
        Self {
            plane,
            mode,
            lines: Vec::new(),
            points: Vec::new(),
            empty: false,
            config,
        }
    }

    pub fn point_driven(plane: Plane, config: KernelConfig) -> Self {
        Self::with_config(plane, PolyMode::PointDriven, config)
    }

    pub fn plane_driven(plane: Plane, config: KernelConfig) -> Self {
        Self::with_config(plane, PolyMode::PlaneDriven, config)
    }

    pub fn plane(&self) -> &Plane {
        &self.plane
    }

    pub fn mode(&self) -> PolyMode {
        self.mode
    }

    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    pub fn lines(&self) -> &[Line2D] {
        &self.lines
    }

    pub fn edge_count(&self) -> usize {
        self.lines.len()
    }

    /// True when the face holds no point at all.
    pub fn is_empty(&self) -> bool {
        match self.mode {
            PolyMode::PointDriven => self.points.is_empty() && self.lines.is_empty(),
            PolyMode::PlaneDriven => self.empty,
        }
    }

    pub fn is_whole_plane(&self) -> bool {
        self.mode == PolyMode::PlaneDriven && !self.empty && self.lines.is_empty()
    }

    pub fn is_bounded(&self) -> bool {
        match self.mode {
            PolyMode::PointDriven => true,
            PolyMode::PlaneDriven => self.empty || (!self.lines.is_empty() && self.lines.iter().all(Line2D::is_bounded)),
        }
    }

    // --- Point-driven construction ---

    /// Grows the face to the convex hull of its points and `points`, given in
    /// the plane's (u, v) frame.
    pub fn add_points(&mut self, points: &[Point2D]) {
        if self.mode != PolyMode::PointDriven {
            warn!("ignoring {} points fed to a plane-driven poly", points.len());
            return;
        }
        let mut pending = Vec::new();
        for &p in points {
            if self.lines.len() >= 3 {
                pending.push(p);
            } else {
                self.seed_point(p);
            }
        }
        if !pending.is_empty() {
            self.grow(pending);
        }
    }

    /// Projects world points into the plane, then calls [`ConvexPoly::add_points`].
    pub fn add_points_3d(&mut self, points: &[Point]) {
        let projected: Vec<Point2D> = points.iter().map(|&p| self.plane.to_uv(p)).collect();
        self.add_points(&projected);
    }

    fn seed_point(&mut self, p: Point2D) {
        let eps = self.config.epsilon();
        if self.lines.is_empty() {
            match self.points.first() {
                None => self.points.push(p),
                Some(&a) if a.dist(p) <= eps => trace!("skipping duplicate point {:?}", p),
                Some(&a) => {
                    self.lines = vec![Line2D::through(a, p), Line2D::through(p, a)];
                    self.points.clear();
                }
            }
            return;
        }

        // Two opposite edges along a segment.
        let edge = self.lines[0];
        let uv = edge.to_uv(p);
        if uv.x.abs() > eps {
            self.grow(vec![p]);
            return;
        }
        let (Some(mut a), Some(mut b)) = (edge.start_point(), edge.end_point()) else {
            return;
        };
        if uv.y < edge.start() {
            a = p;
        } else if uv.y > edge.end() {
            b = p;
        } else {
            return;
        }
        self.lines = vec![Line2D::through(a, b), Line2D::through(b, a)];
    }

    /// General step: repeatedly pick the farthest outside point of some edge,
    /// replace the run of edges that see it by two edges through it, and hand
    /// the run's outside points to the new edges.
    fn grow(&mut self, pending: Vec<Point2D>) {
        let eps = self.config.epsilon();
        let mut sets: Vec<Vec<Point2D>> = vec![Vec::new(); self.lines.len()];
        for p in pending {
            if let Some(i) = self.lines.iter().position(|l| l.eval(p) > eps) {
                sets[i].push(p);
            }
        }

        while let Some(e) = sets.iter().position(|s| !s.is_empty()) {
            let line = self.lines[e];
            let far_idx = sets[e]
                .iter()
                .enumerate()
                .max_by(|a, b| line.eval(*a.1).total_cmp(&line.eval(*b.1)))
                .map(|(i, _)| i)
                .unwrap_or(0);
            let far = sets[e].swap_remove(far_idx);

            let n = self.lines.len();
            let visible: Vec<bool> = self.lines.iter().map(|l| l.eval(far) > eps).collect();
            let Some(first) = (0..n).find(|&i| visible[i] && !visible[(i + n - 1) % n]) else {
                continue;
            };
            let run = (0..n).take_while(|k| visible[(first + k) % n]).count();
            let last = (first + run - 1) % n;
            let (Some(a), Some(b)) = (self.lines[first].start_point(), self.lines[last].end_point()) else {
                continue;
            };

            let mut orphans = Vec::new();
            for k in 0..run {
                orphans.append(&mut sets[(first + k) % n]);
            }

            let mut lines = Vec::with_capacity(n - run + 2);
            let mut next_sets = Vec::with_capacity(n - run + 2);
            lines.push(Line2D::through(a, far));
            lines.push(Line2D::through(far, b));
            next_sets.push(Vec::new());
            next_sets.push(Vec::new());
            for k in 0..n - run {
                let idx = (last + 1 + k) % n;
                lines.push(self.lines[idx]);
                next_sets.push(std::mem::take(&mut sets[idx]));
            }
            self.lines = lines;
            sets = next_sets;

            for q in orphans {
                let target = (0..2)
                    .find(|&i| self.lines[i].eval(q) > eps)
                    .or_else(|| self.lines.iter().position(|l| l.eval(q) > eps));
                if let Some(i) = target {
                    sets[i].push(q);
                }
            }
        }
        self.merge_collinear();
    }

    fn merge_collinear(&mut self) {
        let eps = self.config.epsilon();
        let mut i = 0;
        while self.lines.len() > 3 && i < self.lines.len() {
            let j = (i + 1) % self.lines.len();
            let (a, b) = (self.lines[i], self.lines[j]);
            let (na, nb) = (a.normal(), b.normal());
            if na.cross(nb).abs() <= eps && na.dot(nb) > 0.0 {
                if let (Some(s), Some(e)) = (a.start_point(), b.end_point()) {
                    self.lines[i] = Line2D::through(s, e);
                    self.lines.remove(j);
                    if j < i {
                        i -= 1;
                    }
                    continue;
                }
            }
            i += 1;
        }
    }

    // --- Plane-driven construction ---

    /// Intersects the face with the inside half-planes of `lines`.
    ///
    /// Near-degenerate candidates (normal shorter than the tolerance) are
    /// ignored. Accepted lines are merged with the current edges and every
    /// extent is recomputed, so the edge set stays minimal.
    pub fn add_lines<I: IntoIterator<Item = Line2D>>(&mut self, lines: I) {
        if self.mode != PolyMode::PlaneDriven {
            warn!("ignoring lines fed to a point-driven poly");
            return;
        }
        if self.empty {
            return;
        }
        let eps = self.config.epsilon();
        let before = self.lines.len();
        self.lines.extend(
            lines
                .into_iter()
                .filter(|l| l.magnitude() > eps)
                .map(|l| l.normalized()),
        );
        if self.lines.len() != before {
            self.clip_lines();
        }
    }

    /// Drops edges whose neighbor fails `keep`, then re-clips.
    pub(crate) fn retain_neighbors<F: Fn(FaceKey) -> bool>(&mut self, keep: F) {
        let before = self.lines.len();
        self.lines.retain(|l| l.neighbor().is_none_or(&keep));
        if self.lines.len() != before && !self.empty {
            self.clip_lines();
        }
    }

    /// Tags each edge with the face `neighbor` names for it.
    pub(crate) fn assign_neighbors<F: Fn(&Line2D) -> Option<FaceKey>>(&mut self, neighbor: F) {
        for line in &mut self.lines {
            if let Some(key) = neighbor(line) {
                *line = line.with_neighbor(key);
            }
        }
    }

    fn clip_lines(&mut self) {
        let eps = self.config.epsilon();
        self.lines
            .sort_by(|a, b| a.pseudo_angle().total_cmp(&b.pseudo_angle()));
        let n = self.lines.len();
        let mut keep = vec![true; n];
        let mut extents = vec![(f64::NEG_INFINITY, f64::INFINITY); n];

        for i in 0..n {
            let li = self.lines[i];
            let (o, d, ni) = (li.origin(), li.direction(), li.normal());
            for j in 0..n {
                if i == j {
                    continue;
                }
                let lj = self.lines[j];
                let nj = lj.normal();
                let denom = nj.dot(d);
                if denom.abs() <= eps {
                    if ni.dot(nj) > 0.0 {
                        let dz = li.offset() - lj.offset();
                        if dz > eps || (dz.abs() <= eps && i > j) {
                            keep[i] = false;
                        }
                    } else if li.offset() + lj.offset() <= eps {
                        trace!("half-planes leave no area in face");
                        self.mark_empty();
                        return;
                    }
                    continue;
                }
                let t = (lj.offset() - nj.dot(o)) / denom;
                let (start, end) = &mut extents[i];
                if denom > 0.0 {
                    *end = end.min(t);
                } else {
                    *start = start.max(t);
                }
            }
        }

        let mut kept = Vec::with_capacity(n);
        for (i, mut line) in self.lines.drain(..).enumerate() {
            let (start, end) = extents[i];
            if keep[i] && end - start > eps {
                line.set_extent(start, end);
                kept.push(line);
            }
        }
        if kept.is_empty() && n > 0 {
            self.mark_empty();
            return;
        }
        self.lines = kept;
    }

    fn mark_empty(&mut self) {
        self.empty = true;
        self.lines.clear();
    }

    // --- Queries ---

    /// Vertices in ring order, in the plane's frame. Unbounded rings list only
    /// their finite corners.
    pub fn vertices_2d(&self) -> Vec<Point2D> {
        if self.lines.is_empty() {
            return self.points.clone();
        }
        let eps = self.config.epsilon();
        let mut out: Vec<Point2D> = Vec::with_capacity(self.lines.len());
        for line in &self.lines {
            for p in [line.start_point(), line.end_point()].into_iter().flatten() {
                if out.last().is_none_or(|last| last.dist(p) > eps) {
                    out.push(p);
                }
            }
        }
        if out.len() > 1 && out[0].dist(out[out.len() - 1]) <= eps {
            out.pop();
        }
        out
    }

    pub fn vertices_3d(&self) -> Vec<Point> {
        self.vertices_2d()
            .into_iter()
            .map(|q| self.plane.from_uv(q))
            .collect()
    }

    /// A point of the face, used as a witness of its region.
    pub fn sample_point(&self) -> Option<Point> {
        if self.is_empty() {
            return None;
        }
        let verts = self.vertices_3d();
        if !verts.is_empty() {
            let sum = verts.iter().fold(Point::ZERO, |acc, &v| acc + v);
            return Some(sum / verts.len() as f64);
        }
        match self.lines.first() {
            Some(line) => Some(self.plane.from_uv(line.point_at(0.0f64.clamp(line.start(), line.end())))),
            None => Some(self.plane.origin()),
        }
    }

    pub fn area(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        if !self.is_bounded() {
            return f64::INFINITY;
        }
        let v = self.vertices_2d();
        let twice: f64 = (0..v.len()).map(|i| v[i].cross(v[(i + 1) % v.len()])).sum();
        twice.abs() / 2.0
    }

    pub fn contains_2d(&self, q: Point2D) -> bool {
        let eps = self.config.epsilon();
        if self.is_empty() {
            return false;
        }
        if self.lines.is_empty() {
            return match self.mode {
                PolyMode::PointDriven => self.points.iter().any(|a| a.dist(q) <= eps),
                PolyMode::PlaneDriven => true,
            };
        }
        if !self.lines.iter().all(|l| l.eval(q) <= eps) {
            return false;
        }
        if self.is_segment() {
            let edge = self.lines[0];
            let t = edge.direction().dot(q);
            return t >= edge.start() - eps && t <= edge.end() + eps;
        }
        true
    }

    fn is_segment(&self) -> bool {
        self.mode == PolyMode::PointDriven && self.lines.len() == 2
    }

    /// Nearest point of the filled face, or `None` when the face is empty.
    pub fn closest_point_2d(&self, q: Point2D) -> Option<Point2D> {
        if self.is_empty() {
            return None;
        }
        if self.lines.is_empty() {
            return match self.mode {
                PolyMode::PointDriven => self.points.first().copied(),
                PolyMode::PlaneDriven => Some(q),
            };
        }
        if !self.is_segment() && self.lines.iter().all(|l| l.eval(q) <= 0.0) {
            return Some(q);
        }
        self.lines
            .iter()
            .map(|l| l.closest_point(q))
            .min_by(|a, b| a.dist(q).total_cmp(&b.dist(q)))
    }

    /// Index of the edge nearest to `q`.
    pub fn closest_edge(&self, q: Point2D) -> Option<usize> {
        self.lines
            .iter()
            .enumerate()
            .min_by(|a, b| {
                a.1.closest_point(q)
                    .dist(q)
                    .total_cmp(&b.1.closest_point(q).dist(q))
            })
            .map(|(i, _)| i)
    }

    pub fn face_query(&self, p: Point) -> Option<FaceQuery> {
        let uvw = self.plane.to_uvw(p);
        let q = Point2D::new(uvw.x, uvw.y);
        let foot_2d = self.closest_point_2d(q)?;
        let foot = self.plane.from_uv(foot_2d);
        Some(FaceQuery {
            distance: p.dist(foot),
            w: uvw.z,
            inside: self.contains_2d(q),
            foot,
        })
    }
}

impl DistanceFunction for ConvexPoly {
    /// Unsigned distance to the filled face.
    fn local_eval(&self, p: Point, radius: f64) -> f64 {
        match self.face_query(p) {
            Some(q) if q.distance <= radius => q.distance,
            _ => f64::INFINITY,
        }
    }

    fn local_gradient(&self, p: Point) -> Point {
        let n = self.plane.normal();
        match self.face_query(p) {
            Some(q) if q.distance > self.config.epsilon() => (p - q.foot).normalize(),
            Some(q) if q.w < 0.0 => -n,
            _ => n,
        }
    }

    fn local_closest(&self, p: Point) -> Point {
        self.face_query(p).map_or(p, |q| q.foot)
    }

    fn bounding_box(&self) -> BoundingBox {
        if !self.is_bounded() {
            return BoundingBox::infinite();
        }
        BoundingBox::from_points(&self.vertices_3d())
    }

    fn bounding_sphere(&self) -> BoundingSphere {
        if !self.is_bounded() {
            return BoundingSphere::infinite();
        }
        BoundingSphere::from_points(&self.vertices_3d())
    }

    fn epsilon(&self) -> f64 {
        self.config.epsilon()
    }

    fn refine_iterations(&self) -> usize {
        self.config.refine_iterations()
    }
}
