use crate::plane::Plane;
use crate::vector::Point;
use log::trace;
use slotmap::{SecondaryMap, SlotMap};
use std::collections::HashMap;

slotmap::new_key_type! {
    struct FacetKey;
}

/// A boundary triangle over three input points, wound counter-clockwise when
/// seen from outside.
#[derive(Clone, Debug)]
struct Facet {
    corners: [usize; 3],
    plane: Plane,
}

/// Facets that share a plane within tolerance, ready to become one face.
#[derive(Clone, Debug)]
pub(super) struct Patch {
    pub plane: Plane,
    /// Input points on the patch.
    pub corners: Vec<Point>,
    /// Boundary edges with the index of the patch across them.
    pub borders: Vec<(Point, Point, usize)>,
}

/// Closed triangulated boundary of a volumetric point-driven hull.
///
/// Corners index the inserted points, so the boundary is always spanned by
/// input points and never by intersections of face planes. Facet planes face
/// away from an interior point fixed at construction.
#[derive(Clone, Debug)]
pub(super) struct TriangleMesh {
    points: Vec<Point>,
    facets: SlotMap<FacetKey, Facet>,
    // Directed edge (a, b) to the facet that runs from a to b.
    edges: HashMap<(usize, usize), FacetKey>,
    interior: Point,
}

fn edges_of([a, b, c]: [usize; 3]) -> [(usize, usize); 3] {
    [(a, b), (b, c), (c, a)]
}

impl TriangleMesh {
    /// Joins `apex` to the convex polygon `base`, which is wound
    /// counter-clockwise when seen from the side away from `apex`.
    pub fn pyramid(base: &[Point], apex: Point) -> Self {
        let n = base.len();
        let center = base.iter().fold(Point::ZERO, |acc, &p| acc + p) / n as f64;
        let mut points = base.to_vec();
        points.push(apex);
        let mut mesh = Self {
            points,
            facets: SlotMap::with_key(),
            edges: HashMap::new(),
            interior: (center + apex) * 0.5,
        };
        for i in 1..n.saturating_sub(1) {
            mesh.add_facet([0, i, i + 1]);
        }
        for i in 0..n {
            mesh.add_facet([(i + 1) % n, i, n]);
        }
        mesh
    }

    pub fn facet_count(&self) -> usize {
        self.facets.len()
    }

    fn add_facet(&mut self, corners: [usize; 3]) {
        let [a, b, c] = corners.map(|i| self.points[i]);
        let mut plane = Plane::from_points(a, b, c);
        if plane.eval(self.interior) > 0.0 {
            plane = plane.flipped();
        }
        let key = self.facets.insert(Facet { corners, plane });
        for edge in edges_of(corners) {
            self.edges.insert(edge, key);
        }
    }

    fn remove_facet(&mut self, key: FacetKey) {
        let Some(facet) = self.facets.remove(key) else {
            return;
        };
        for edge in edges_of(facet.corners) {
            if self.edges.get(&edge) == Some(&key) {
                self.edges.remove(&edge);
            }
        }
    }

    /// The facet on the other side of the directed edge `(a, b)`.
    fn twin(&self, (a, b): (usize, usize)) -> Option<FacetKey> {
        self.edges.get(&(b, a)).copied()
    }

    fn neighbors(&self, key: FacetKey) -> impl Iterator<Item = FacetKey> + '_ {
        edges_of(self.facets[key].corners)
            .into_iter()
            .filter_map(move |edge| self.twin(edge))
    }

    /// Largest signed distance from `p` to a facet plane.
    pub fn max_eval(&self, p: Point) -> f64 {
        self.facets
            .values()
            .map(|f| f.plane.eval(p))
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Adds `p` as a new corner. Returns false when no facet sees `p` from
    /// farther than `eps`.
    pub fn insert(&mut self, p: Point, eps: f64) -> bool {
        let Some(first) = self
            .facets
            .iter()
            .map(|(k, f)| (k, f.plane.eval(p)))
            .filter(|&(_, d)| d > eps)
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(k, _)| k)
        else {
            return false;
        };

        // Only facets connected to the one that sees `p` best are replaced.
        let mut visible = vec![first];
        let mut i = 0;
        while i < visible.len() {
            let seen: Vec<FacetKey> = self
                .neighbors(visible[i])
                .filter(|&n| self.facets[n].plane.eval(p) > eps)
                .collect();
            for n in seen {
                if !visible.contains(&n) {
                    visible.push(n);
                }
            }
            i += 1;
        }

        let mut horizon = Vec::new();
        for &key in &visible {
            for edge in edges_of(self.facets[key].corners) {
                if self.twin(edge).is_some_and(|t| !visible.contains(&t)) {
                    horizon.push(edge);
                }
            }
        }
        if horizon.is_empty() {
            return false;
        }

        trace!("point {:?} replaces {} facets", p, visible.len());
        let apex = self.points.len();
        self.points.push(p);
        for key in visible {
            self.remove_facet(key);
        }
        for (a, b) in horizon {
            self.add_facet([a, b, apex]);
        }
        true
    }

    fn double_area(&self, key: FacetKey) -> f64 {
        let [a, b, c] = self.facets[key].corners.map(|i| self.points[i]);
        (b - a).cross(c - a).mag()
    }

    fn is_flush(&self, key: FacetKey, plane: &Plane, eps: f64) -> bool {
        let facet = &self.facets[key];
        facet.plane.normal().dot(plane.normal()) > 0.0
            && facet
                .corners
                .iter()
                .all(|&c| plane.eval(self.points[c]).abs() <= eps)
    }

    /// Groups connected facets whose corners all lie within `eps` of the plane
    /// of the group's largest facet. Larger facets seed groups first.
    pub fn patches(&self, eps: f64) -> Vec<Patch> {
        let mut order: Vec<FacetKey> = self.facets.keys().collect();
        order.sort_by(|&a, &b| self.double_area(b).total_cmp(&self.double_area(a)));

        let mut owner: SecondaryMap<FacetKey, usize> = SecondaryMap::new();
        let mut groups: Vec<(Plane, Vec<FacetKey>)> = Vec::new();
        for seed in order {
            if owner.contains_key(seed) {
                continue;
            }
            let id = groups.len();
            let plane = self.facets[seed].plane;
            owner.insert(seed, id);
            let mut members = vec![seed];
            let mut i = 0;
            while i < members.len() {
                let flush: Vec<FacetKey> = self
                    .neighbors(members[i])
                    .filter(|&n| !owner.contains_key(n) && self.is_flush(n, &plane, eps))
                    .collect();
                for n in flush {
                    if !owner.contains_key(n) {
                        owner.insert(n, id);
                        members.push(n);
                    }
                }
                i += 1;
            }
            groups.push((plane, members));
        }

        groups
            .iter()
            .enumerate()
            .map(|(id, (plane, members))| {
                let mut corners: Vec<usize> = members.iter().flat_map(|&k| self.facets[k].corners).collect();
                corners.sort_unstable();
                corners.dedup();
                let mut borders = Vec::new();
                for &key in members {
                    for (a, b) in edges_of(self.facets[key].corners) {
                        let Some(&other) = self.twin((a, b)).and_then(|t| owner.get(t)) else {
                            continue;
                        };
                        if other != id {
                            borders.push((self.points[a], self.points[b], other));
                        }
                    }
                }
                Patch {
                    plane: *plane,
                    corners: corners.into_iter().map(|i| self.points[i]).collect(),
                    borders,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_closed(mesh: &TriangleMesh) -> bool {
        mesh.edges.keys().all(|&(a, b)| mesh.edges.contains_key(&(b, a)))
    }

    // Unit square in z = 0, counter-clockwise seen from below.
    fn square() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0, 0.0),
            Point::new(0.0, 1.0, 0.0),
            Point::new(1.0, 1.0, 0.0),
            Point::new(1.0, 0.0, 0.0),
        ]
    }

    #[test]
    fn test_pyramid_is_closed_and_outward() {
        let mesh = TriangleMesh::pyramid(&square(), Point::new(0.5, 0.5, 1.0));
        assert_eq!(mesh.facet_count(), 6);
        assert!(is_closed(&mesh));
        for facet in mesh.facets.values() {
            let [a, b, c] = facet.corners.map(|i| mesh.points[i]);
            let winding = (b - a).cross(c - a);
            assert!(winding.dot(facet.plane.normal()) > 0.0, "Facet {:?} is wound inwards", facet.corners);
        }
        assert!(mesh.max_eval(Point::new(0.5, 0.5, 0.2)) < 0.0);
    }

    #[test]
    fn test_insert_keeps_corners_exact() {
        let mut mesh = TriangleMesh::pyramid(&square(), Point::new(0.5, 0.5, 1.0));
        assert!(!mesh.insert(Point::new(0.5, 0.5, 0.5), 1e-9));
        assert!(mesh.insert(Point::new(0.5, 0.5, -1.0), 1e-9));
        assert!(is_closed(&mesh));
        assert_eq!(mesh.facet_count(), 8);
        assert_eq!(mesh.points.len(), 6);
        for p in &mesh.points {
            assert!(mesh.max_eval(*p) <= 1e-12);
        }
    }

    #[test]
    fn test_patches_merge_coplanar_facets() {
        let mut mesh = TriangleMesh::pyramid(&square(), Point::new(0.0, 0.0, 1.0));
        for p in [
            Point::new(1.0, 0.0, 1.0),
            Point::new(0.0, 1.0, 1.0),
            Point::new(1.0, 1.0, 1.0),
        ] {
            assert!(mesh.insert(p, 1e-9));
        }
        let patches = mesh.patches(1e-9);
        assert_eq!(patches.len(), 6);
        for patch in &patches {
            assert_eq!(patch.corners.len(), 4);
            assert_eq!(patch.borders.len(), 4);
            assert!(patch.borders.iter().all(|&(a, b, _)| (a - b).mag() == 1.0));
        }
    }
}
