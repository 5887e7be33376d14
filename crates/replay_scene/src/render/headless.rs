//! In-memory scene graph
//!
//! [`HeadlessBackend`] implements [`SceneBackend`] without a GPU. It keeps
//! every node in a slot map, answers pointer picks against per-node bounding
//! spheres and records outline writes so highlight transitions can be
//! inspected. The replay shell and the test suite run against it.

use raw_window_handle::RawWindowHandle;
use slotmap::{new_key_type, Key, KeyData, SlotMap};

use super::backend::{
    BackendError, BackendResult, CameraPose, MaterialDescriptor, MaterialHandle, MeshDescriptor, MeshHandle,
    OutlineStyle, PickRay, SceneBackend,
};
use crate::foundation::math::{Quat, Vec3};
use crate::recording::ColorData;

new_key_type! {
    struct NodeKey;
    struct MaterialKey;
}

/// Kind of geometry a node was built from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeGeometry {
    /// Primitive sphere
    Sphere,
    /// Primitive box
    Box,
    /// Primitive plane
    Plane,
    /// Line batch
    Lines,
    /// Procedural buffers
    Custom,
}

/// State of one scene graph node
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessNode {
    /// Geometry kind
    pub geometry: NodeGeometry,
    /// Visible
    pub enabled: bool,
    /// Considered by pointer picking
    pub pickable: bool,
    /// World position
    pub position: Vec3,
    /// World rotation
    pub rotation: Quat,
    /// Assigned material
    pub material: Option<MaterialHandle>,
    /// Current outline
    pub outline: Option<OutlineStyle>,
    /// Radius of the bounding sphere around `position`
    pub bounding_radius: f32,
    /// Line points (line batches only)
    pub line_points: Vec<Vec3>,
    /// Line colors (line batches only)
    pub line_colors: Vec<ColorData>,
}

impl HeadlessNode {
    fn new(descriptor: &MeshDescriptor) -> Self {
        let (geometry, line_points, line_colors) = match descriptor {
            MeshDescriptor::Sphere { .. } => (NodeGeometry::Sphere, Vec::new(), Vec::new()),
            MeshDescriptor::Box { .. } => (NodeGeometry::Box, Vec::new(), Vec::new()),
            MeshDescriptor::Plane { .. } => (NodeGeometry::Plane, Vec::new(), Vec::new()),
            MeshDescriptor::Lines { points, colors } => (NodeGeometry::Lines, points.clone(), colors.clone()),
            MeshDescriptor::Custom(_) => (NodeGeometry::Custom, Vec::new(), Vec::new()),
        };

        Self {
            geometry,
            enabled: true,
            pickable: false,
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            material: None,
            outline: None,
            bounding_radius: descriptor.bounding_radius(),
            line_points,
            line_colors,
        }
    }

    /// Distance along `ray` to the node's bounding sphere, if hit
    fn intersect(&self, ray: &PickRay) -> Option<f32> {
        let offset = ray.origin - self.position;
        let b = offset.dot(&ray.direction);
        let c = offset.norm_squared() - self.bounding_radius * self.bounding_radius;
        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }

        let root = discriminant.sqrt();
        [-b - root, -b + root].into_iter().find(|t| *t >= 0.0)
    }
}

/// GPU-less [`SceneBackend`]
#[derive(Debug)]
pub struct HeadlessBackend {
    nodes: SlotMap<NodeKey, HeadlessNode>,
    materials: SlotMap<MaterialKey, MaterialDescriptor>,
    camera: CameraPose,
    camera_locked: bool,
    gizmo: Option<MeshHandle>,
    outline_log: Vec<(MeshHandle, Option<OutlineStyle>)>,
    meshes_created: usize,
    mesh_limit: Option<usize>,
    initialized: bool,
}

impl Default for HeadlessBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessBackend {
    /// Create an empty scene
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            materials: SlotMap::with_key(),
            camera: CameraPose::new(Vec3::new(0.0, 0.0, -10.0), Vec3::zeros()),
            camera_locked: false,
            gizmo: None,
            outline_log: Vec::new(),
            meshes_created: 0,
            mesh_limit: None,
            initialized: false,
        }
    }

    /// Refuse mesh creation once `limit` nodes are alive
    pub fn with_mesh_limit(mut self, limit: usize) -> Self {
        self.mesh_limit = Some(limit);
        self
    }

    /// Node state by handle
    pub fn node(&self, handle: MeshHandle) -> Option<&HeadlessNode> {
        self.nodes.get(node_key(handle))
    }

    /// Number of live nodes
    pub fn mesh_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of nodes ever created
    pub fn meshes_created(&self) -> usize {
        self.meshes_created
    }

    /// Number of live materials
    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    /// Material description by handle
    pub fn material(&self, handle: MaterialHandle) -> Option<&MaterialDescriptor> {
        self.materials.get(MaterialKey::from(KeyData::from_ffi(handle.0)))
    }

    /// Every outline write since the last [`clear_outline_log`](Self::clear_outline_log)
    pub fn outline_log(&self) -> &[(MeshHandle, Option<OutlineStyle>)] {
        &self.outline_log
    }

    /// Forget recorded outline writes
    pub fn clear_outline_log(&mut self) {
        self.outline_log.clear();
    }

    /// Node the orientation gizmo is attached to
    pub fn gizmo_target(&self) -> Option<MeshHandle> {
        self.gizmo
    }

    /// Whether the camera is locked onto its target
    pub fn camera_locked(&self) -> bool {
        self.camera_locked
    }

    /// Whether [`initialize`](SceneBackend::initialize) has run
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }
}

fn node_key(handle: MeshHandle) -> NodeKey {
    NodeKey::from(KeyData::from_ffi(handle.0))
}

fn mesh_handle(key: NodeKey) -> MeshHandle {
    MeshHandle(key.data().as_ffi())
}

impl SceneBackend for HeadlessBackend {
    fn initialize(&mut self, canvas: Option<RawWindowHandle>) -> BackendResult<()> {
        if self.initialized {
            return Err(BackendError::InitializationFailed("scene already initialized".to_string()));
        }
        log::info!("Headless scene initialized (canvas attached: {})", canvas.is_some());
        self.initialized = true;
        Ok(())
    }

    fn create_mesh(&mut self, descriptor: &MeshDescriptor) -> BackendResult<MeshHandle> {
        if let Some(limit) = self.mesh_limit {
            if self.nodes.len() >= limit {
                return Err(BackendError::MeshCreationFailed(format!("node limit of {limit} reached")));
            }
        }

        let key = self.nodes.insert(HeadlessNode::new(descriptor));
        self.meshes_created += 1;
        Ok(mesh_handle(key))
    }

    fn destroy_mesh(&mut self, handle: MeshHandle) {
        if self.nodes.remove(node_key(handle)).is_some() && self.gizmo == Some(handle) {
            self.gizmo = None;
        }
    }

    fn set_enabled(&mut self, handle: MeshHandle, enabled: bool) {
        if let Some(node) = self.nodes.get_mut(node_key(handle)) {
            node.enabled = enabled;
        }
    }

    fn set_pickable(&mut self, handle: MeshHandle, pickable: bool) {
        if let Some(node) = self.nodes.get_mut(node_key(handle)) {
            node.pickable = pickable;
        }
    }

    fn set_transform(&mut self, handle: MeshHandle, position: Vec3, rotation: Quat) {
        if let Some(node) = self.nodes.get_mut(node_key(handle)) {
            node.position = position;
            node.rotation = rotation;
        }
    }

    fn set_material(&mut self, handle: MeshHandle, material: MaterialHandle) {
        if let Some(node) = self.nodes.get_mut(node_key(handle)) {
            node.material = Some(material);
        }
    }

    fn update_lines(&mut self, handle: MeshHandle, points: &[Vec3], colors: &[ColorData]) {
        if let Some(node) = self.nodes.get_mut(node_key(handle)) {
            node.line_points = points.to_vec();
            node.line_colors = colors.to_vec();
            node.bounding_radius = points.iter().map(|p| (p - node.position).norm()).fold(0.0, f32::max);
        }
    }

    fn set_outline(&mut self, handle: MeshHandle, outline: Option<OutlineStyle>) {
        if let Some(node) = self.nodes.get_mut(node_key(handle)) {
            node.outline = outline;
            self.outline_log.push((handle, outline));
        }
    }

    fn attach_axis_gizmo(&mut self, handle: Option<MeshHandle>) {
        self.gizmo = handle.filter(|h| self.nodes.contains_key(node_key(*h)));
    }

    fn create_material(&mut self, descriptor: &MaterialDescriptor) -> BackendResult<MaterialHandle> {
        let key = self.materials.insert(*descriptor);
        Ok(MaterialHandle(key.data().as_ffi()))
    }

    fn camera(&self) -> CameraPose {
        self.camera
    }

    fn set_camera(&mut self, pose: CameraPose, locked_target: bool) {
        self.camera = pose;
        self.camera_locked = locked_target;
    }

    fn pick(&self, ray: &PickRay) -> Option<MeshHandle> {
        self.nodes
            .iter()
            .filter(|(_, node)| node.enabled && node.pickable)
            .filter_map(|(key, node)| node.intersect(ray).map(|t| (key, t)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(key, _)| mesh_handle(key))
    }
}
