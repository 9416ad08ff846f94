use crate::vector::Point;
use js_sys::Array;
use wasm_bindgen::prelude::*;

/// Reads `[x, y, z]` from a JS array.
pub fn parse_js_point(val: &JsValue) -> Option<Point> {
    let arr = val.dyn_ref::<Array>()?;
    if arr.length() < 3 {
        return None;
    }
    Some(Point::new(
        arr.get(0).as_f64()?,
        arr.get(1).as_f64()?,
        arr.get(2).as_f64()?,
    ))
}

pub fn point_to_vec(p: Point) -> Vec<f64> {
    p.to_array().to_vec()
}

/// Flattens triangles to `[ax, ay, az, bx, ..]`, nine values per triangle.
pub fn flatten_triangles(triangles: &[[Point; 3]]) -> Vec<f64> {
    triangles
        .iter()
        .flat_map(|t| t.iter().flat_map(|p| p.to_array()))
        .collect()
}
