//! Convex faces and the polytopes assembled from them.
//!
//! A [`ConvexHull`] stores its faces in an arena; every edge of a face names
//! the face on its other side by [`FaceKey`], so the face graph carries no
//! owning references.

mod hull;
mod mesh;
mod poly;
mod seed;

pub use hull::{ConvexHull, HullMode, HullState};
pub use poly::{ConvexPoly, FaceQuery, PolyMode};

slotmap::new_key_type! {
    /// Stable handle of a face inside its hull.
    pub struct FaceKey;
}
