//! # convexity
//!
//! `convexity` is an incremental convex-polytope kernel for collision and
//! proximity queries, usable from Rust and compiled to WebAssembly (WASM).
//!
//! ## Features
//!
//! - **Two ways to build a hull**: grow a [`ConvexHull`] from points
//!   (quickhull with a horizon) or from half-spaces (plane clipping). Every
//!   insertion leaves the hull ready to query.
//! - **Signed distance**: one [`DistanceFunction`] trait for planes, spheres,
//!   boxes, triangles, faces and hulls, with optional affine placement.
//! - **Vector algebra**: [`Point`], [`Point2D`], [`Quaternion`] and
//!   [`AffineTransform`] with a cached inverse.
//! - **Parallel batches**: rayon-backed queries and hull construction in
//!   [`batch`].
//!
//! ## Main Interface
//!
//! The primary entry point is [`ConvexHull`], built with
//! [`ConvexHull::from_points`] or [`ConvexHull::from_planes`].

pub mod batch;
mod bounds;
mod config;
mod error;
mod line;
mod plane;
mod polytope;
pub mod shape;
pub mod vector;
pub mod wasm;

pub use bounds::{BoundingBox, BoundingSphere};
pub use config::{KernelConfig, DEFAULT_EPSILON, DEFAULT_REFINE_ITERATIONS};
pub use error::{KernelError, Result};
pub use line::Line2D;
pub use plane::Plane;
pub use polytope::{ConvexHull, ConvexPoly, FaceKey, FaceQuery, HullMode, HullState, PolyMode};
pub use shape::{Cuboid, DistanceFunction, EmptyShape, Invert, Sphere, Transformed, Triangle, Union};
pub use vector::{AffineTransform, Point, Point2D, Quaternion, ROOT_INFINITY, ROOT_ZERO};
