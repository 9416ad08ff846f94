mod utils;

use crate::bounds::BoundingBox;
use crate::plane::Plane;
use crate::polytope::ConvexHull;
use crate::shape::DistanceFunction;
use crate::vector::Point;
use utils::{flatten_triangles, parse_js_point, point_to_vec};
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen_rayon::init_thread_pool;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn init_threads(n: usize) -> js_sys::Promise {
    init_thread_pool(n)
}

// --- Bounding Box ---

/// Represents an axis-aligned bounding box in 3D space.
#[wasm_bindgen]
#[derive(Clone, Copy, Debug)]
pub struct BoundingBox3D {
    pub min_x: f64,
    pub min_y: f64,
    pub min_z: f64,
    pub max_x: f64,
    pub max_y: f64,
    pub max_z: f64,
}

impl From<BoundingBox> for BoundingBox3D {
    fn from(b: BoundingBox) -> Self {
        Self {
            min_x: b.min.x,
            min_y: b.min.y,
            min_z: b.min.z,
            max_x: b.max.x,
            max_y: b.max.y,
            max_z: b.max.z,
        }
    }
}

// --- Hull ---

/// WASM wrapper for [`ConvexHull`]. Points and planes cross the boundary as
/// flat arrays: `[x, y, z, ..]` and `[nx, ny, nz, d, ..]`.
#[wasm_bindgen(js_name = Hull)]
pub struct HullWASM {
    inner: ConvexHull,
}

#[wasm_bindgen(js_class = Hull)]
impl HullWASM {
    #[wasm_bindgen(js_name = newFromPoints)]
    pub fn new_from_points(points: &[f64]) -> Result<HullWASM, JsError> {
        Ok(HullWASM {
            inner: ConvexHull::from_points(&Point::from_flat(points)?),
        })
    }

    #[wasm_bindgen(js_name = newFromPlanes)]
    pub fn new_from_planes(planes: &[f64]) -> Result<HullWASM, JsError> {
        Ok(HullWASM {
            inner: ConvexHull::from_planes(&Plane::from_flat(planes)?),
        })
    }

    #[wasm_bindgen(js_name = addPoints)]
    pub fn add_points(&mut self, points: &[f64]) -> Result<(), JsError> {
        self.inner.add_points(&Point::from_flat(points)?);
        Ok(())
    }

    #[wasm_bindgen(js_name = addPlanes)]
    pub fn add_planes(&mut self, planes: &[f64]) -> Result<(), JsError> {
        self.inner.add_planes(&Plane::from_flat(planes)?);
        Ok(())
    }

    pub fn eval(&self, x: f64, y: f64, z: f64) -> f64 {
        self.inner.signed_distance(Point::new(x, y, z))
    }

    /// Signed distances of a flat point array.
    #[wasm_bindgen(js_name = evalMany)]
    pub fn eval_many(&self, points: &[f64]) -> Result<Vec<f64>, JsError> {
        let points = Point::from_flat(points)?;
        Ok(crate::batch::eval_batch(&self.inner, &points, f64::INFINITY, None))
    }

    pub fn gradient(&self, x: f64, y: f64, z: f64) -> Vec<f64> {
        point_to_vec(self.inner.normal_at(Point::new(x, y, z)))
    }

    pub fn contains(&self, x: f64, y: f64, z: f64) -> bool {
        self.inner.contains(Point::new(x, y, z))
    }

    /// Nearest point of the hull to a `[x, y, z]` array.
    #[wasm_bindgen(js_name = closestPoint)]
    pub fn closest_point(&self, point: JsValue) -> Option<Vec<f64>> {
        let p = parse_js_point(&point)?;
        self.inner.closest_point(p).map(point_to_vec)
    }

    pub fn triangles(&self) -> Vec<f64> {
        flatten_triangles(&self.inner.triangles())
    }

    #[wasm_bindgen(getter, js_name = faceCount)]
    pub fn face_count(&self) -> usize {
        self.inner.face_count()
    }

    pub fn volume(&self) -> f64 {
        self.inner.volume()
    }

    #[wasm_bindgen(js_name = boundingBox)]
    pub fn bounding_box(&self) -> BoundingBox3D {
        self.inner.bounding_box().into()
    }
}

/// Contact of a sphere of `radius` at `(x, y, z)` with the hull, as
/// `[nx, ny, nz, depth]`, or `undefined` when they do not touch.
#[wasm_bindgen]
pub fn contact(hull: &HullWASM, x: f64, y: f64, z: f64, radius: f64) -> Option<Vec<f64>> {
    let p = Point::new(x, y, z);
    let d = hull.inner.local_eval(p, radius);
    if d > radius {
        return None;
    }
    let n = hull.inner.normal_at(p);
    Some(vec![n.x, n.y, n.z, radius - d])
}
