use super::hull::{ConvexHull, HullState};
use super::mesh::TriangleMesh;
use super::poly::ConvexPoly;
use crate::plane::Plane;
use crate::vector::Point;
use log::trace;

// Degenerate states of a point-driven hull: a point, a segment, a flat
// polygon. Each is stored as one or two point-driven faces until the first
// point off the common plane promotes the hull to a volume.
impl ConvexHull {
    pub(super) fn seed_point(&mut self, p: Point) {
        let eps = self.config.epsilon();
        match self.state {
            HullState::Empty => {
                let mut face = ConvexPoly::point_driven(Plane::from_point_normal(p, Point::Z), self.config);
                face.add_points_3d(&[p]);
                self.faces.insert(face);
                self.seeds.push(p);
                self.set_state(HullState::Point);
            }
            HullState::Point => {
                let Some(a) = self.seed_vertices().first().copied() else {
                    return;
                };
                if a.dist(p) <= eps {
                    trace!("skipping point {:?} coincident with the hull", p);
                    return;
                }
                self.seeds.push(p);
                self.make_flat((p - a).perpendicular(), &[a, p]);
                self.set_state(HullState::Segment);
            }
            HullState::Segment => {
                let ends = self.seed_vertices();
                let &[a, b] = ends.as_slice() else {
                    return;
                };
                self.seeds.push(p);
                let offset = (p - a).remove_component(b - a);
                if offset.mag() <= eps {
                    for face in self.faces.values_mut() {
                        face.add_points_3d(&[p]);
                    }
                    return;
                }
                self.make_flat((b - a).cross(p - a), &[a, b, p]);
                self.set_state(HullState::Planar);
            }
            HullState::Planar => {
                let on_plane = self
                    .faces
                    .values()
                    .next()
                    .is_some_and(|f| f.plane().eval(p).abs() <= eps);
                if on_plane {
                    self.seeds.push(p);
                    for face in self.faces.values_mut() {
                        face.add_points_3d(&[p]);
                    }
                } else {
                    self.promote(p);
                }
            }
            HullState::Volumetric => self.expand(vec![p]),
            HullState::Unbounded | HullState::Bounded | HullState::Infeasible => {}
        }
    }

    fn seed_vertices(&self) -> Vec<Point> {
        self.faces
            .values()
            .next()
            .map(ConvexPoly::vertices_3d)
            .unwrap_or_default()
    }

    /// The kept input point nearest to `v`.
    fn nearest_seed(&self, v: Point) -> Option<Point> {
        self.seeds
            .iter()
            .copied()
            .min_by(|a, b| a.dist2(v).total_cmp(&b.dist2(v)))
    }

    /// Replaces the faces by two opposite point-driven faces through `points`.
    fn make_flat(&mut self, normal: Point, points: &[Point]) {
        self.faces.clear();
        for n in [normal, -normal] {
            let mut face = ConvexPoly::point_driven(Plane::from_point_normal(points[0], n), self.config);
            face.add_points_3d(points);
            self.faces.insert(face);
        }
    }

    /// Turns the flat polygon into a pyramid with apex `apex`. The base
    /// corners are the input points the polygon was grown from.
    fn promote(&mut self, apex: Point) {
        let Some(base) = self.faces.values().find(|f| f.plane().eval(apex) < 0.0) else {
            return;
        };
        let mut corners: Vec<Point> = base
            .vertices_3d()
            .into_iter()
            .filter_map(|v| self.nearest_seed(v))
            .collect();
        corners.dedup();
        if corners.len() > 1 && corners.first() == corners.last() {
            corners.pop();
        }
        if corners.len() < 3 {
            return;
        }

        self.mesh = Some(TriangleMesh::pyramid(&corners, apex));
        self.seeds.clear();
        self.set_state(HullState::Volumetric);
        self.rebuild_faces();
    }
}
