//! Scene management
//!
//! Binding of recorded entities and properties to pooled host meshes, layer
//! visibility, hover/selection overlays and the session controller tying
//! them together.

pub mod binder;
pub mod controller;
pub mod layers;
pub mod selection;

#[cfg(test)]
mod tests;

pub use binder::{BoundMesh, EntityBinding, SceneBinder};
pub use controller::{EntitySelectedCallback, ReplayScene};
pub use layers::LayerVisibilityManager;
pub use selection::{OverlayState, SelectionOverlayManager};
