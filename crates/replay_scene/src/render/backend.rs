//! Host framework abstraction
//!
//! The replay scene never talks to a renderer directly. Everything it needs
//! from the host 3D framework (primitive meshes, scene graph node state,
//! materials, the camera, outline highlighting and pointer picking) goes
//! through [`SceneBackend`].

use raw_window_handle::RawWindowHandle;
use thiserror::Error;

use super::primitives::Mesh;
use crate::foundation::math::{Quat, Vec3};
use crate::recording::ColorData;

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Handle to a mesh node stored in the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshHandle(pub u64);

/// Handle to a material resource stored in the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialHandle(pub u64);

/// Errors reported by the host framework
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BackendError {
    /// Host initialization failed
    #[error("Backend initialization failed: {0}")]
    InitializationFailed(String),

    /// The host could not build a mesh
    #[error("Mesh creation failed: {0}")]
    MeshCreationFailed(String),

    /// The host could not build a material
    #[error("Material creation failed: {0}")]
    MaterialCreationFailed(String),
}

/// Geometry the host should build
#[derive(Debug, Clone, PartialEq)]
pub enum MeshDescriptor {
    /// UV sphere centered on the origin
    Sphere {
        /// Diameter
        diameter: f32,
        /// Tessellation segments
        segments: u32,
    },
    /// Box centered on the origin
    Box {
        /// Extent along X
        width: f32,
        /// Extent along Y
        height: f32,
        /// Extent along Z
        depth: f32,
    },
    /// Plane centered on the origin facing `normal`
    Plane {
        /// Width
        width: f32,
        /// Height
        height: f32,
        /// Facing direction of the source plane
        normal: Vec3,
        /// Render both faces
        double_sided: bool,
    },
    /// Line batch that can be rewritten in place
    Lines {
        /// Points, two per segment
        points: Vec<Vec3>,
        /// One color per point
        colors: Vec<ColorData>,
    },
    /// Procedurally generated buffers
    Custom(Mesh),
}

impl MeshDescriptor {
    /// Radius of an origin-centered sphere enclosing the geometry
    pub fn bounding_radius(&self) -> f32 {
        match self {
            Self::Sphere { diameter, .. } => diameter / 2.0,
            Self::Box { width, height, depth } => Vec3::new(*width, *height, *depth).norm() / 2.0,
            Self::Plane { width, height, .. } => width.hypot(*height) / 2.0,
            Self::Lines { points, .. } => points.iter().map(|p| p.norm()).fold(0.0, f32::max),
            Self::Custom(mesh) => mesh.bounding_radius(),
        }
    }
}

/// Material the host should build
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialDescriptor {
    /// Diffuse color, alpha included
    pub color: ColorData,
}

impl MaterialDescriptor {
    /// Plain colored material
    pub const fn new(color: ColorData) -> Self {
        Self { color }
    }
}

/// Outline highlight drawn around a mesh
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlineStyle {
    /// Outline color
    pub color: ColorData,
    /// Outline width in world units
    pub width: f32,
}

impl OutlineStyle {
    /// Outline of selected entities (#6DE080)
    pub fn selected() -> Self {
        Self { color: rgb(0x6D, 0xE0, 0x80), width: 0.03 }
    }

    /// Outline of hovered entities (#8442B9)
    pub fn hovered() -> Self {
        Self { color: rgb(0x84, 0x42, 0xB9), width: 0.03 }
    }
}

fn rgb(r: u8, g: u8, b: u8) -> ColorData {
    ColorData::new(f32::from(r) / 255.0, f32::from(g) / 255.0, f32::from(b) / 255.0, 1.0)
}

/// Camera placement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    /// Eye position
    pub position: Vec3,
    /// Look-at target
    pub target: Vec3,
}

impl CameraPose {
    /// Create a camera pose
    pub const fn new(position: Vec3, target: Vec3) -> Self {
        Self { position, target }
    }
}

/// World-space ray used for pointer picking
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickRay {
    /// Ray origin
    pub origin: Vec3,
    /// Unit direction
    pub direction: Vec3,
}

impl PickRay {
    /// Create a ray, normalizing `direction` (zero directions stay zero)
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        let direction = direction.try_normalize(f32::EPSILON).unwrap_or_else(Vec3::zeros);
        Self { origin, direction }
    }

    /// Ray from `origin` through `point`
    pub fn towards(origin: Vec3, point: Vec3) -> Self {
        Self::new(origin, point - origin)
    }

    /// Point at distance `t` along the ray
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Host 3D framework seam
///
/// Operations on unknown handles are ignored by implementations.
pub trait SceneBackend {
    /// Attach to the host canvas (headless hosts accept `None`)
    fn initialize(&mut self, canvas: Option<RawWindowHandle>) -> BackendResult<()>;

    /// Build a mesh node; new nodes are enabled, not pickable, at the origin
    fn create_mesh(&mut self, descriptor: &MeshDescriptor) -> BackendResult<MeshHandle>;

    /// Dispose of a mesh node
    fn destroy_mesh(&mut self, handle: MeshHandle);

    /// Show or hide a node
    fn set_enabled(&mut self, handle: MeshHandle, enabled: bool);

    /// Include or exclude a node from pointer picking
    fn set_pickable(&mut self, handle: MeshHandle, pickable: bool);

    /// Place a node in world space
    fn set_transform(&mut self, handle: MeshHandle, position: Vec3, rotation: Quat);

    /// Assign a material to a node
    fn set_material(&mut self, handle: MeshHandle, material: MaterialHandle);

    /// Rewrite the points of a line node in place
    fn update_lines(&mut self, handle: MeshHandle, points: &[Vec3], colors: &[ColorData]);

    /// Set or clear the outline highlight of a node
    fn set_outline(&mut self, handle: MeshHandle, outline: Option<OutlineStyle>);

    /// Attach the orientation gizmo to a node, or detach it with `None`
    fn attach_axis_gizmo(&mut self, handle: Option<MeshHandle>);

    /// Build a material
    fn create_material(&mut self, descriptor: &MaterialDescriptor) -> BackendResult<MaterialHandle>;

    /// Current camera placement
    fn camera(&self) -> CameraPose;

    /// Move the camera; `locked_target` keeps it looking at `pose.target`
    fn set_camera(&mut self, pose: CameraPose, locked_target: bool);

    /// Nearest enabled and pickable node hit by `ray`
    fn pick(&self, ray: &PickRay) -> Option<MeshHandle>;
}
