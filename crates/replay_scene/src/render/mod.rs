//! Rendering seam
//!
//! The host framework abstraction, the headless host, procedural geometry,
//! the color material cache and camera framing.

pub mod backend;
pub mod camera;
pub mod headless;
pub mod material_cache;
pub mod primitives;

pub use backend::{
    BackendError, BackendResult, CameraPose, MaterialDescriptor, MaterialHandle, MeshDescriptor, MeshHandle,
    OutlineStyle, PickRay, SceneBackend,
};
pub use camera::{CameraRig, FramingAnimation};
pub use headless::{HeadlessBackend, HeadlessNode, NodeGeometry};
pub use material_cache::{ColorKey, MaterialCache};
pub use primitives::{CapsuleBuilder, Mesh, Vertex};
