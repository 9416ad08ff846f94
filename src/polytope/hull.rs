use super::mesh::TriangleMesh;
use super::poly::{ConvexPoly, FaceQuery};
use super::FaceKey;
use crate::bounds::{BoundingBox, BoundingSphere};
use crate::config::KernelConfig;
use crate::plane::Plane;
use crate::shape::DistanceFunction;
use crate::vector::{Point, Point2D};
use log::{debug, trace, warn};
use slotmap::SlotMap;

/// Which insertion protocol a hull accepts, fixed at construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HullMode {
    /// Incremental hull of inserted points.
    Points,
    /// Intersection of inserted half-spaces.
    Planes,
}

/// Construction state. Transitions only move forward.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HullState {
    /// No points yet.
    Empty,
    /// A single point.
    Point,
    /// Collinear points.
    Segment,
    /// Coplanar points spanning a polygon.
    Planar,
    /// A polytope with volume.
    Volumetric,
    /// Half-spaces that leave an unbounded region, the whole space included.
    Unbounded,
    /// Half-spaces that enclose a bounded region.
    Bounded,
    /// Half-spaces with an empty intersection.
    Infeasible,
}

impl HullState {
    pub fn is_degenerate(&self) -> bool {
        matches!(self, HullState::Point | HullState::Segment | HullState::Planar)
    }
}

/// A convex polytope assembled from [`ConvexPoly`] faces.
///
/// Point-driven hulls grow quickhull style: the farthest outside point is
/// joined to the horizon of the triangles it sees, and coplanar triangles are
/// regrouped into faces whose corners are input points. Their face keys are
/// reissued whenever the hull grows. Plane-driven hulls clip the current
/// region by one half-space at a time. Both keep the structure queryable
/// after every insertion.
///
/// Signed distance scans the faces for the nearest filled face and takes its
/// plane side when the projection falls inside the face, positive otherwise.
/// This is an approximation: it does not classify Voronoi regions across
/// neighboring faces.
#[derive(Clone, Debug)]
pub struct ConvexHull {
    pub(super) mode: HullMode,
    pub(super) state: HullState,
    pub(super) faces: SlotMap<FaceKey, ConvexPoly>,
    pub(super) config: KernelConfig,
    // Input points kept while the hull is flat.
    pub(super) seeds: Vec<Point>,
    pub(super) mesh: Option<TriangleMesh>,
    fallback_gradient: Point,
    bounding_box: BoundingBox,
    bounding_sphere: BoundingSphere,
}

impl ConvexHull {
    pub fn new(mode: HullMode) -> Self {
        Self::with_config(mode, KernelConfig::default())
    }

    pub fn with_config(mode: HullMode, config: KernelConfig) -> Self {
        let state = match mode {
            HullMode::Points => HullState::Empty,
            HullMode::Planes => HullState::Unbounded,
        };
        let mut hull = Self {
            mode,
            state,
            faces: SlotMap::with_key(),
            config,
            seeds: Vec::new(),
            mesh: None,
            fallback_gradient: Point::X,
            bounding_box: BoundingBox::empty(),
            bounding_sphere: BoundingSphere::empty(),
        };
        hull.refresh_bounds();
        hull
    }

    pub fn from_points(points: &[Point]) -> Self {
        let mut hull = Self::new(HullMode::Points);
        hull.add_points(points);
        hull
    }

    pub fn from_planes(planes: &[Plane]) -> Self {
        let mut hull = Self::new(HullMode::Planes);
        hull.add_planes(planes);
        hull
    }

    /// Direction returned by `gradient` when the hull has no faces to ask.
    pub fn with_fallback_gradient(mut self, gradient: Point) -> Self {
        self.fallback_gradient = gradient;
        self
    }

    pub fn mode(&self) -> HullMode {
        self.mode
    }

    pub fn state(&self) -> HullState {
        self.state
    }

    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    pub fn fallback_gradient(&self) -> Point {
        self.fallback_gradient
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn faces(&self) -> impl Iterator<Item = (FaceKey, &ConvexPoly)> {
        self.faces.iter()
    }

    pub fn face(&self, key: FaceKey) -> Option<&ConvexPoly> {
        self.faces.get(key)
    }

    pub(super) fn set_state(&mut self, state: HullState) {
        if self.state != state {
            debug!("hull state {:?} -> {:?}", self.state, state);
            self.state = state;
        }
    }

    // --- Point-driven construction ---

    pub fn add_point(&mut self, point: Point) {
        self.add_points(&[point]);
    }

    pub fn add_points(&mut self, points: &[Point]) {
        if self.mode != HullMode::Points {
            warn!("ignoring {} points fed to a plane-driven hull", points.len());
            return;
        }
        let mut pending = Vec::new();
        for &p in points {
            if self.state == HullState::Volumetric {
                pending.push(p);
            } else {
                self.seed_point(p);
            }
        }
        if !pending.is_empty() {
            self.expand(pending);
        }
        self.refresh_bounds();
    }

    /// Inserts the farthest outside point until every pending point is inside.
    pub(super) fn expand(&mut self, mut pending: Vec<Point>) {
        let eps = self.config.epsilon();
        let Some(mesh) = self.mesh.as_mut() else {
            return;
        };
        loop {
            let mut outside: Vec<(Point, f64)> = pending
                .iter()
                .map(|&p| (p, mesh.max_eval(p)))
                .filter(|&(_, d)| d > eps)
                .collect();
            let Some(idx) = outside
                .iter()
                .enumerate()
                .max_by(|a, b| a.1.1.total_cmp(&b.1.1))
                .map(|(i, _)| i)
            else {
                break;
            };
            let (apex, _) = outside.swap_remove(idx);
            pending = outside.into_iter().map(|(p, _)| p).collect();
            mesh.insert(apex, eps);
        }
        self.rebuild_faces();
    }

    /// Regroups the triangulated boundary into faces and links neighbors.
    pub(super) fn rebuild_faces(&mut self) {
        let Some(mesh) = &self.mesh else {
            return;
        };
        let patches = mesh.patches(self.config.epsilon());
        trace!("{} triangles regrouped into {} faces", mesh.facet_count(), patches.len());

        self.faces.clear();
        let mut keys = Vec::with_capacity(patches.len());
        for patch in &patches {
            let mut face = ConvexPoly::point_driven(patch.plane, self.config);
            face.add_points_3d(&patch.corners);
            keys.push(self.faces.insert(face));
        }
        for (patch, &key) in patches.iter().zip(&keys) {
            let borders: Vec<(Point2D, Point2D, FaceKey)> = patch
                .borders
                .iter()
                .map(|&(a, b, other)| (patch.plane.to_uv(a), patch.plane.to_uv(b), keys[other]))
                .collect();
            let Some(face) = self.faces.get_mut(key) else {
                continue;
            };
            face.assign_neighbors(|line| {
                let off = |&(a, b, _): &(Point2D, Point2D, FaceKey)| line.eval(a).abs() + line.eval(b).abs();
                borders
                    .iter()
                    .min_by(|x, y| off(*x).total_cmp(&off(*y)))
                    .map(|&(_, _, k)| k)
            });
        }
    }

    fn forget_faces(&mut self, keys: &[FaceKey]) {
        for &key in keys {
            self.faces.remove(key);
        }
        for face in self.faces.values_mut() {
            face.retain_neighbors(|n| !keys.contains(&n));
        }
    }

    // --- Plane-driven construction ---

    pub fn add_plane(&mut self, plane: Plane) {
        self.add_planes(&[plane]);
    }

    pub fn add_planes(&mut self, planes: &[Plane]) {
        if self.mode != HullMode::Planes {
            warn!("ignoring {} planes fed to a point-driven hull", planes.len());
            return;
        }
        for &plane in planes {
            if self.state == HullState::Infeasible {
                break;
            }
            self.clip(plane);
        }
        self.refresh_state();
        self.refresh_bounds();
    }

    /// Intersects the region with the inside of `plane`.
    fn clip(&mut self, plane: Plane) {
        let eps = self.config.epsilon();
        let mut covered = Vec::new();
        let mut lines = Vec::with_capacity(self.faces.len());
        let mut disjoint = false;
        for (key, face) in &self.faces {
            let other = face.plane();
            if !plane.is_parallel(other, eps) {
                lines.push(plane.intersection_line(other).with_neighbor(key));
            } else if plane.normal().dot(other.normal()) > 0.0 {
                if plane.distance() >= other.distance() - eps {
                    trace!("discarding plane {:?} behind a parallel face", plane);
                    return;
                }
                covered.push(key);
            } else if -plane.distance() >= other.distance() - eps {
                disjoint = true;
                break;
            }
        }
        if disjoint {
            self.make_infeasible();
            return;
        }

        let mut face = ConvexPoly::plane_driven(plane, self.config);
        face.add_lines(lines);
        if face.is_empty() {
            match self.witness() {
                Some(w) if plane.eval(w) <= eps => {
                    trace!("discarding plane {:?} that misses the region", plane)
                }
                _ => self.make_infeasible(),
            }
            return;
        }

        let key = self.faces.insert(face);
        let existing: Vec<FaceKey> = self.faces.keys().filter(|&k| k != key && !covered.contains(&k)).collect();
        for k in existing {
            let face = &mut self.faces[k];
            let line = face.plane().intersection_line(&plane).with_neighbor(key);
            face.add_lines([line]);
        }
        let mut gone = covered;
        gone.extend(self.faces.iter().filter(|(_, f)| f.is_empty()).map(|(k, _)| k));
        if !gone.is_empty() {
            self.forget_faces(&gone);
        }
    }

    fn make_infeasible(&mut self) {
        self.faces.clear();
        self.set_state(HullState::Infeasible);
    }

    /// A point of the current region.
    fn witness(&self) -> Option<Point> {
        let samples: Vec<Point> = self.faces.values().filter_map(ConvexPoly::sample_point).collect();
        if samples.is_empty() {
            return None;
        }
        Some(samples.iter().fold(Point::ZERO, |acc, &p| acc + p) / samples.len() as f64)
    }

    fn refresh_state(&mut self) {
        if self.mode != HullMode::Planes || self.state == HullState::Infeasible {
            return;
        }
        let bounded = !self.faces.is_empty() && self.faces.values().all(ConvexPoly::is_bounded);
        self.set_state(if bounded { HullState::Bounded } else { HullState::Unbounded });
    }

    fn refresh_bounds(&mut self) {
        let (b, s) = match self.state {
            HullState::Empty | HullState::Infeasible => (BoundingBox::empty(), BoundingSphere::empty()),
            HullState::Unbounded => (BoundingBox::infinite(), BoundingSphere::infinite()),
            _ => {
                let verts = self.vertices();
                (BoundingBox::from_points(&verts), BoundingSphere::from_points(&verts))
            }
        };
        self.bounding_box = b;
        self.bounding_sphere = s;
    }

    // --- Queries ---

    /// The face whose filled polygon is nearest to `p`; ties prefer a face
    /// whose plane projection of `p` lies inside it.
    fn nearest_face(&self, p: Point) -> Option<(FaceKey, FaceQuery)> {
        let mut best: Option<(FaceKey, FaceQuery)> = None;
        for (key, face) in &self.faces {
            let Some(q) = face.face_query(p) else {
                continue;
            };
            let better = match &best {
                None => true,
                Some((_, b)) => q.distance < b.distance || (q.distance == b.distance && q.inside && !b.inside),
            };
            if better {
                best = Some((key, q));
            }
        }
        best
    }

    fn is_void(&self) -> bool {
        matches!(self.state, HullState::Empty | HullState::Infeasible)
    }

    /// Signed distance, negative inside. Flat hulls report the unsigned
    /// distance, the whole space reports negative infinity.
    pub fn signed_distance(&self, p: Point) -> f64 {
        if self.is_void() {
            return f64::INFINITY;
        }
        if self.faces.is_empty() {
            return f64::NEG_INFINITY;
        }
        let Some((_, q)) = self.nearest_face(p) else {
            return f64::INFINITY;
        };
        if self.state.is_degenerate() || !q.inside {
            q.distance
        } else {
            q.w
        }
    }

    /// Outward direction at `p`, or the fallback gradient without faces.
    pub fn normal_at(&self, p: Point) -> Point {
        if self.is_void() || self.faces.is_empty() {
            return self.fallback_gradient;
        }
        let Some((key, q)) = self.nearest_face(p) else {
            return self.fallback_gradient;
        };
        let face = &self.faces[key];
        if self.state.is_degenerate() {
            return face.local_gradient(p);
        }
        if q.inside || q.distance <= self.config.epsilon() {
            face.plane().normal()
        } else {
            (p - q.foot).normalize()
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        if self.is_void() {
            return false;
        }
        if self.state.is_degenerate() {
            return self.signed_distance(p) <= 0.0;
        }
        self.faces.values().all(|f| f.plane().eval(p) <= 0.0)
    }

    /// Nearest point of the solid hull.
    pub fn closest_point(&self, p: Point) -> Option<Point> {
        if self.is_void() {
            return None;
        }
        if self.faces.is_empty() || (!self.state.is_degenerate() && self.contains(p)) {
            return Some(p);
        }
        self.nearest_face(p).map(|(_, q)| q.foot)
    }

    /// Largest `dir·v` over the hull; infinite for unbounded regions.
    pub fn support(&self, dir: Point) -> f64 {
        if self.is_void() {
            return f64::NEG_INFINITY;
        }
        if self.state == HullState::Unbounded {
            return f64::INFINITY;
        }
        self.vertices()
            .iter()
            .map(|v| v.dot(dir))
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Distinct corners of all faces.
    pub fn vertices(&self) -> Vec<Point> {
        let eps = self.config.epsilon();
        let mut out: Vec<Point> = Vec::new();
        for face in self.faces.values() {
            for v in face.vertices_3d() {
                if !out.iter().any(|o| o.dist(v) <= eps) {
                    out.push(v);
                }
            }
        }
        out
    }

    /// Fan triangulation of every bounded face, wound counter-clockwise when
    /// seen from outside.
    pub fn triangles(&self) -> Vec<[Point; 3]> {
        let mut out = Vec::new();
        for face in self.faces.values().filter(|f| f.is_bounded()) {
            let v = face.vertices_3d();
            for i in 1..v.len().saturating_sub(1) {
                out.push([v[0], v[i], v[i + 1]]);
            }
        }
        out
    }

    pub fn volume(&self) -> f64 {
        match self.state {
            HullState::Volumetric | HullState::Bounded => self
                .triangles()
                .iter()
                .map(|[a, b, c]| a.dot(b.cross(*c)) / 6.0)
                .sum(),
            HullState::Unbounded => f64::INFINITY,
            _ => 0.0,
        }
    }

    /// Center of mass of a solid hull, or the mean vertex of a flat one.
    pub fn centroid(&self) -> Option<Point> {
        let verts = self.vertices();
        if verts.is_empty() || self.state == HullState::Unbounded {
            return None;
        }
        let mean = verts.iter().fold(Point::ZERO, |acc, &v| acc + v) / verts.len() as f64;
        if self.state.is_degenerate() {
            return Some(mean);
        }
        let mut volume = 0.0;
        let mut moment = Point::ZERO;
        for [a, b, c] in self.triangles() {
            let v = (a - mean).dot((b - mean).cross(c - mean)) / 6.0;
            volume += v;
            moment += (a + b + c + mean) * (v / 4.0);
        }
        if volume == 0.0 {
            return Some(mean);
        }
        Some(moment / volume)
    }
}

impl DistanceFunction for ConvexHull {
    fn local_eval(&self, p: Point, radius: f64) -> f64 {
        if radius.is_finite() && self.bounding_sphere.distance(p) > radius {
            return f64::INFINITY;
        }
        self.signed_distance(p)
    }

    fn local_gradient(&self, p: Point) -> Point {
        self.normal_at(p)
    }

    fn local_closest(&self, p: Point) -> Point {
        self.closest_point(p).unwrap_or(p)
    }

    fn bounding_box(&self) -> BoundingBox {
        self.bounding_box
    }

    fn bounding_sphere(&self) -> BoundingSphere {
        self.bounding_sphere
    }

    fn epsilon(&self) -> f64 {
        self.config.epsilon()
    }

    fn refine_iterations(&self) -> usize {
        self.config.refine_iterations()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube_planes(h: f64) -> Vec<Plane> {
        [Point::X, -Point::X, Point::Y, -Point::Y, Point::Z, -Point::Z]
            .into_iter()
            .map(|n| Plane::new(n, h))
            .collect()
    }

    #[test]
    fn test_half_space_states() {
        let mut hull = ConvexHull::new(HullMode::Planes);
        assert_eq!(hull.state(), HullState::Unbounded);
        assert_eq!(hull.signed_distance(Point::new(1e9, 0.0, 0.0)), f64::NEG_INFINITY);
        assert!(hull.contains(Point::splat(3.0)));

        hull.add_plane(Plane::new(Point::X, 1.0));
        assert_eq!(hull.face_count(), 1);
        assert!((hull.signed_distance(Point::new(3.0, 5.0, -2.0)) - 2.0).abs() < 1e-12);
        assert!((hull.signed_distance(Point::new(-3.0, 5.0, -2.0)) + 4.0).abs() < 1e-12);

        hull.add_planes(&cube_planes(1.0)[1..]);
        assert_eq!(hull.state(), HullState::Bounded);
        assert!((hull.volume() - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_opposing_planes_are_infeasible() {
        let mut hull = ConvexHull::new(HullMode::Planes);
        hull.add_planes(&[Plane::new(Point::Z, -1.0), Plane::new(-Point::Z, -1.0)]);
        assert_eq!(hull.state(), HullState::Infeasible);
        assert_eq!(hull.face_count(), 0);
        assert_eq!(hull.signed_distance(Point::ZERO), f64::INFINITY);
        assert!(!hull.contains(Point::ZERO));
        assert_eq!(hull.normal_at(Point::ZERO), Point::X);
    }

    #[test]
    fn test_plane_beyond_region_empties_it() {
        let mut hull = ConvexHull::from_planes(&cube_planes(1.0));
        hull.add_plane(Plane::new(Point::new(1.0, 1.0, 1.0), -5.0));
        assert_eq!(hull.state(), HullState::Infeasible);
    }

    #[test]
    fn test_tighter_parallel_plane_replaces_face() {
        let mut hull = ConvexHull::from_planes(&cube_planes(1.0));
        hull.add_plane(Plane::new(Point::X, 0.5));
        assert_eq!(hull.face_count(), 6);
        assert!((hull.volume() - 6.0).abs() < 1e-9);
        assert!((hull.support(Point::X) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_mode_mismatch_is_ignored() {
        let mut hull = ConvexHull::new(HullMode::Points);
        hull.add_plane(Plane::new(Point::X, 1.0));
        assert_eq!(hull.face_count(), 0);
        assert_eq!(hull.state(), HullState::Empty);
    }

    #[test]
    fn test_point_seed_states() {
        let mut hull = ConvexHull::new(HullMode::Points);
        hull.add_point(Point::ZERO);
        assert_eq!(hull.state(), HullState::Point);
        assert!((hull.signed_distance(Point::new(0.0, 3.0, 4.0)) - 5.0).abs() < 1e-12);

        hull.add_point(Point::new(2.0, 0.0, 0.0));
        assert_eq!(hull.state(), HullState::Segment);
        assert_eq!(hull.face_count(), 2);
        assert!((hull.signed_distance(Point::new(1.0, 1.0, 0.0)) - 1.0).abs() < 1e-9);

        hull.add_point(Point::new(3.0, 0.0, 0.0));
        assert_eq!(hull.state(), HullState::Segment);
        assert!((hull.support(Point::X) - 3.0).abs() < 1e-9);

        hull.add_point(Point::new(0.0, 2.0, 0.0));
        assert_eq!(hull.state(), HullState::Planar);
        assert!((hull.signed_distance(Point::new(0.5, 0.5, -2.0)) - 2.0).abs() < 1e-9);

        hull.add_point(Point::new(0.0, 0.0, 1.0));
        assert_eq!(hull.state(), HullState::Volumetric);
        assert_eq!(hull.face_count(), 4);
        assert!((hull.volume() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_cube_corners_give_linked_square_faces() {
        // A unit cube from its corners has one face per side.
        let mut pts = Vec::new();
        for i in 0..8 {
            pts.push(Point::new((i & 1) as f64, ((i >> 1) & 1) as f64, ((i >> 2) & 1) as f64));
        }
        let hull = ConvexHull::from_points(&pts);
        assert_eq!(hull.state(), HullState::Volumetric);
        assert_eq!(hull.face_count(), 6);
        for (key, face) in hull.faces() {
            assert_eq!(face.vertices_3d().len(), 4);
            let mut neighbors: Vec<FaceKey> = face.lines().iter().filter_map(|l| l.neighbor()).collect();
            neighbors.sort();
            neighbors.dedup();
            assert_eq!(neighbors.len(), 4);
            assert!(neighbors.iter().all(|&n| n != key && hull.face(n).is_some()));
            for v in face.vertices_3d() {
                assert!(pts.iter().any(|p| p.dist(v) < 1e-12), "Corner {:?} is not an input point", v);
            }
        }
        assert!((hull.volume() - 1.0).abs() < 1e-9);
        let c = hull.centroid().unwrap();
        assert!((c - Point::splat(0.5)).mag() < 1e-9);
    }
}
