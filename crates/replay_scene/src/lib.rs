//! # Replay Scene
//!
//! Scene binding core of a recorded-simulation replay viewer.
//!
//! ## Features
//!
//! - **Pooled Geometry**: Shape instances recycled across frames, keyed by size
//! - **Procedural Capsules**: Capsule meshes built on the CPU
//! - **Layer Visibility**: Shapes filtered by recorded layer
//! - **Selection Overlays**: Hover and selection outlines with camera framing
//! - **Host Agnostic**: Everything goes through the [`render::SceneBackend`] seam
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use replay_scene::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let recording = Recording::load("session.json")?;
//!     let mut scene = ReplayScene::new(HeadlessBackend::new(), ViewerSettings::default());
//!     scene.initialize(None)?;
//!
//!     for layer in recording.layers() {
//!         scene.update_layer_status(&layer, true);
//!     }
//!     for frame in recording.frames() {
//!         scene.present_frame(frame);
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod foundation;
pub mod pool;
pub mod recording;
pub mod render;
pub mod scene;

/// Common imports for viewer users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, ViewerSettings},
        foundation::math::Vec3,
        recording::{Entity, EntityId, FrameData, Property, PropertyValue, Recording},
        render::{HeadlessBackend, OutlineStyle, PickRay, SceneBackend},
        scene::{LayerVisibilityManager, ReplayScene, SelectionOverlayManager},
    };
}
