//! Pooled shape geometry
//!
//! Shape instances are expensive to build and cheap to hide, so property
//! meshes are recycled across frames instead of being rebuilt.

pub mod geometry_pool;
pub mod shape_pools;
pub mod signature;

pub use crate::recording::ShapeKind;
pub use geometry_pool::{GeometryPool, PoolEntry, PoolStats};
pub use shape_pools::ShapePools;
pub use signature::{ShapeSignature, ShapeSpec};
