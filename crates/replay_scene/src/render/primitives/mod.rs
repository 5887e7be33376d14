//! Core primitive types for rendering
//!
//! Geometry buffers and the procedural capsule generator. Every other shape
//! is built by the host framework from a [`MeshDescriptor`](crate::render::MeshDescriptor).

pub mod capsule;
pub mod mesh;

// Re-export commonly used types
pub use capsule::CapsuleBuilder;
pub use mesh::{Mesh, Vertex};
