//! Entity and property bindings
//!
//! Every entity seen during a session owns a small marker mesh that lives
//! until the session ends; it is hidden while the entity is absent from the
//! displayed frame. Shape properties are bound to pooled instances that are
//! handed back to the pools at the start of every frame.
//!
//! Per displayed frame the caller runs, in order:
//!
//! 1. [`SceneBinder::remove_all_properties`]
//! 2. [`SceneBinder::hide_all_entities`] when entities may have disappeared
//! 3. [`SceneBinder::set_entity`] for each entity of the frame
//! 4. [`SceneBinder::add_property`] for each property of those entities

use std::collections::{BTreeMap, HashMap};

use super::layers::LayerVisibilityManager;
use crate::config::GeometrySettings;
use crate::foundation::math::{self, Quat, Vec3};
use crate::pool::{ShapePools, ShapeSpec};
use crate::recording::{ColorData, Entity, EntityId, Property, PropertyId, ShapeGeometry, ShapeKind};
use crate::render::{MaterialCache, MeshDescriptor, MeshHandle, OutlineStyle, SceneBackend};

/// Color of entity marker meshes
const MARKER_COLOR: ColorData = ColorData::new(1.0, 1.0, 1.0, 0.8);

/// A property mesh and the pool it came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundMesh {
    /// Host mesh
    pub mesh: MeshHandle,
    /// Owning pool
    pub kind: ShapeKind,
}

/// Meshes bound to one entity
#[derive(Debug, Clone)]
pub struct EntityBinding {
    base_mesh: MeshHandle,
    position: Vec3,
    outline: Option<OutlineStyle>,
    properties: HashMap<PropertyId, BoundMesh>,
}

impl EntityBinding {
    /// Permanent marker mesh
    pub fn base_mesh(&self) -> MeshHandle {
        self.base_mesh
    }

    /// Position of the entity in the last frame it was set
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Outline currently applied to the entity's meshes
    pub fn outline(&self) -> Option<OutlineStyle> {
        self.outline
    }

    /// Mesh bound to a property this frame
    pub fn property_mesh(&self, property: PropertyId) -> Option<BoundMesh> {
        self.properties.get(&property).copied()
    }

    /// Base mesh followed by every property mesh
    pub fn meshes(&self) -> impl Iterator<Item = MeshHandle> + '_ {
        std::iter::once(self.base_mesh).chain(self.properties.values().map(|bound| bound.mesh))
    }
}

/// Owner of all entity and property bindings
#[derive(Debug)]
pub struct SceneBinder {
    entities: BTreeMap<EntityId, EntityBinding>,
    mesh_owners: HashMap<MeshHandle, EntityId>,
    pools: ShapePools,
    materials: MaterialCache,
    geometry: GeometrySettings,
}

impl SceneBinder {
    /// Create a binder with empty pools
    pub fn new(geometry: &GeometrySettings) -> Self {
        Self {
            entities: BTreeMap::new(),
            mesh_owners: HashMap::new(),
            pools: ShapePools::new(geometry),
            materials: MaterialCache::new(),
            geometry: geometry.clone(),
        }
    }

    /// Release every property mesh back to its pool.
    ///
    /// Meshes no pool claims are destroyed. Entity marker meshes are kept.
    pub fn remove_all_properties<B: SceneBackend + ?Sized>(&mut self, backend: &mut B) {
        for binding in self.entities.values_mut() {
            for (_, bound) in binding.properties.drain() {
                if binding.outline.is_some() {
                    backend.set_outline(bound.mesh, None);
                }
                self.mesh_owners.remove(&bound.mesh);
                if !self.pools.release(backend, bound.mesh, Some(bound.kind)) {
                    log::debug!("Destroying unpooled property mesh {:?}", bound.mesh);
                    backend.destroy_mesh(bound.mesh);
                }
            }
        }
        self.pools.log_debug_data();
    }

    /// Show the entity's marker at its current position, creating it on first sight
    pub fn set_entity<B: SceneBackend + ?Sized>(&mut self, backend: &mut B, entity: &Entity) {
        if !self.entities.contains_key(&entity.id) {
            let Some(binding) = self.create_binding(backend, entity.id) else {
                return;
            };
            self.entities.insert(entity.id, binding);
        }

        let Some(binding) = self.entities.get_mut(&entity.id) else {
            return;
        };
        binding.position = entity.position();
        backend.set_transform(binding.base_mesh, binding.position, Quat::identity());
        backend.set_enabled(binding.base_mesh, true);
    }

    fn create_binding<B: SceneBackend + ?Sized>(&mut self, backend: &mut B, id: EntityId) -> Option<EntityBinding> {
        let descriptor = MeshDescriptor::Sphere {
            diameter: self.geometry.marker_diameter,
            segments: self.geometry.marker_segments,
        };
        let base_mesh = match backend.create_mesh(&descriptor) {
            Ok(mesh) => mesh,
            Err(err) => {
                log::warn!("Skipping entity {}: {}", id, err);
                return None;
            }
        };

        match self.materials.get_material(backend, MARKER_COLOR) {
            Ok(material) => backend.set_material(base_mesh, material),
            Err(err) => log::warn!("Entity {} marker has no material: {}", id, err),
        }
        backend.set_pickable(base_mesh, true);
        self.mesh_owners.insert(base_mesh, id);
        log::debug!("Created binding for entity {}", id);

        Some(EntityBinding { base_mesh, position: Vec3::zeros(), outline: None, properties: HashMap::new() })
    }

    /// Bind a shape property to a pooled instance.
    ///
    /// Ignored for non-shape properties, shapes on inactive layers and
    /// entities without a binding.
    pub fn add_property<B: SceneBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        entity: &Entity,
        property: &Property,
        layers: &LayerVisibilityManager,
    ) {
        let Some(shape) = property.shape() else {
            return;
        };
        if !layers.is_layer_active(shape.layer) {
            return;
        }
        let Some(binding) = self.entities.get_mut(&entity.id) else {
            return;
        };

        let kind = shape.kind();
        let mesh = match self.pools.acquire(backend, &ShapeSpec::from_shape(&shape)) {
            Ok(mesh) => mesh,
            Err(err) => {
                log::warn!("Skipping {} property {} of entity {}: {}", kind, property.id, entity.id, err);
                return;
            }
        };

        let rotation = match shape.geometry {
            ShapeGeometry::Capsule { direction, .. } => Some(math::capsule_rotation(direction)),
            ShapeGeometry::Oobb { forward, up, .. } => Some(math::oriented_box_rotation(forward, up)),
            ShapeGeometry::Plane { normal, up, .. } => Some(math::plane_rotation(normal, up)),
            ShapeGeometry::Sphere { .. } | ShapeGeometry::Aabb { .. } => Some(Quat::identity()),
            // Line points are already in world space
            ShapeGeometry::Line { .. } => None,
        };
        if let Some(rotation) = rotation {
            backend.set_transform(mesh, shape.position, rotation);
            match self.materials.get_material(backend, shape.color) {
                Ok(material) => backend.set_material(mesh, material),
                Err(err) => log::warn!("Property {} has no material: {}", property.id, err),
            }
        }
        backend.set_pickable(mesh, kind.is_pickable());

        if binding.outline.is_some() {
            backend.set_outline(mesh, binding.outline);
        }

        let bound = BoundMesh { mesh, kind };
        if let Some(previous) = binding.properties.insert(property.id, bound) {
            // Same property id twice in one frame: keep the latest
            self.mesh_owners.remove(&previous.mesh);
            if binding.outline.is_some() {
                backend.set_outline(previous.mesh, None);
            }
            if !self.pools.release(backend, previous.mesh, Some(previous.kind)) {
                backend.destroy_mesh(previous.mesh);
            }
        }
        self.mesh_owners.insert(mesh, entity.id);
    }

    /// Hide every entity marker
    pub fn hide_all_entities<B: SceneBackend + ?Sized>(&mut self, backend: &mut B) {
        for binding in self.entities.values() {
            backend.set_enabled(binding.base_mesh, false);
        }
    }

    /// Apply `outline` to every mesh of an entity and remember it for meshes bound later.
    ///
    /// Returns `false` when the entity has no binding.
    pub fn set_outline<B: SceneBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        id: EntityId,
        outline: Option<OutlineStyle>,
    ) -> bool {
        let Some(binding) = self.entities.get_mut(&id) else {
            return false;
        };
        binding.outline = outline;
        for mesh in binding.meshes() {
            backend.set_outline(mesh, outline);
        }
        true
    }

    /// Binding of an entity
    pub fn entity(&self, id: EntityId) -> Option<&EntityBinding> {
        self.entities.get(&id)
    }

    /// Whether the entity has been seen this session
    pub fn has_entity(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// Entity owning a base or property mesh
    pub fn entity_for_mesh(&self, mesh: MeshHandle) -> Option<EntityId> {
        self.mesh_owners.get(&mesh).copied()
    }

    /// Number of properties bound to an entity this frame
    pub fn bound_property_count(&self, id: EntityId) -> usize {
        self.entities.get(&id).map_or(0, |binding| binding.properties.len())
    }

    /// Ids of every bound entity, ascending
    pub fn entity_ids(&self) -> Vec<EntityId> {
        self.entities.keys().copied().collect()
    }

    /// Shape pools
    pub fn pools(&self) -> &ShapePools {
        &self.pools
    }

    /// Material cache
    pub fn materials(&self) -> &MaterialCache {
        &self.materials
    }

    /// Release properties and destroy every mesh the binder created
    pub fn clear<B: SceneBackend + ?Sized>(&mut self, backend: &mut B) {
        self.remove_all_properties(backend);
        for binding in self.entities.values() {
            backend.destroy_mesh(binding.base_mesh);
        }
        self.entities.clear();
        self.mesh_owners.clear();
        self.pools.clear(backend);
        self.materials.clear();
    }
}
