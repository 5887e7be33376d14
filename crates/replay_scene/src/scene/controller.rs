//! Replay session
//!
//! [`ReplayScene`] is the context object of one viewing session. It owns the
//! host backend, the bindings and pools, layer visibility and the overlay
//! state, and exposes the surface the surrounding application drives:
//! frame presentation, selection and hover, layer toggles and pointer input.

use raw_window_handle::RawWindowHandle;

use super::binder::SceneBinder;
use super::layers::LayerVisibilityManager;
use super::selection::SelectionOverlayManager;
use crate::config::ViewerSettings;
use crate::foundation::math::Vec3;
use crate::recording::{visit_properties, Entity, EntityId, FrameData, Property};
use crate::render::{BackendResult, CameraPose, CameraRig, PickRay, SceneBackend};

/// Callback fired when the pointer selects an entity
pub type EntitySelectedCallback = Box<dyn FnMut(EntityId)>;

/// One replay viewing session
pub struct ReplayScene<B: SceneBackend> {
    backend: B,
    settings: ViewerSettings,
    binder: SceneBinder,
    layers: LayerVisibilityManager,
    selection: SelectionOverlayManager,
    on_entity_selected: Option<EntitySelectedCallback>,
}

impl<B: SceneBackend> ReplayScene<B> {
    /// Create a session; the layers listed in `settings` start active
    pub fn new(backend: B, settings: ViewerSettings) -> Self {
        let mut layers = LayerVisibilityManager::new();
        for layer in &settings.active_layers {
            layers.set_layer_active(layer, true);
        }

        log::info!("Created replay scene ({} active layers)", settings.active_layers.len());
        Self {
            backend,
            binder: SceneBinder::new(&settings.geometry),
            selection: SelectionOverlayManager::new(CameraRig::new(&settings.camera)),
            layers,
            settings,
            on_entity_selected: None,
        }
    }

    /// Attach to the host canvas and place the camera at its initial position
    pub fn initialize(&mut self, canvas: Option<RawWindowHandle>) -> BackendResult<()> {
        self.backend.initialize(canvas)?;
        let pose = CameraPose::new(self.settings.camera.initial_position(), Vec3::zeros());
        self.backend.set_camera(pose, false);
        log::info!("Replay scene initialized");
        Ok(())
    }

    /// Register the pointer selection callback
    pub fn set_on_entity_selected<F>(&mut self, callback: F)
    where
        F: FnMut(EntityId) + 'static,
    {
        self.on_entity_selected = Some(Box::new(callback));
    }

    /// Show an entity's marker at its current position
    pub fn set_entity(&mut self, entity: &Entity) {
        self.binder.set_entity(&mut self.backend, entity);
    }

    /// Bind one property of an entity
    pub fn add_property(&mut self, entity: &Entity, property: &Property) {
        self.binder.add_property(&mut self.backend, entity, property, &self.layers);
    }

    /// Release every property mesh back to the pools
    pub fn remove_all_properties(&mut self) {
        self.binder.remove_all_properties(&mut self.backend);
    }

    /// Hide every entity marker
    pub fn hide_all_entities(&mut self) {
        self.binder.hide_all_entities(&mut self.backend);
    }

    /// Rebuild the scene for one frame
    pub fn present_frame(&mut self, frame: &FrameData) {
        log::debug!("Presenting frame {} ({} entities)", frame.frame_id, frame.entities.len());

        self.remove_all_properties();
        self.hide_all_entities();
        for entity in frame.entities.values() {
            self.set_entity(entity);
        }

        for entity in frame.entities.values() {
            visit_properties(entity, |property| {
                self.binder.add_property(&mut self.backend, entity, property, &self.layers);
            });
        }

        if self.settings.follow_current_selection {
            self.move_camera_to_selection();
        }
    }

    /// Select an entity and frame the camera on it
    pub fn mark_entity_as_selected(&mut self, id: EntityId) {
        self.selection.mark_selected(&mut self.binder, &mut self.backend, id);
    }

    /// Select an entity, framing the camera when the settings ask for it
    pub fn select_entity(&mut self, id: EntityId) {
        if self.settings.move_to_entity_on_selection {
            self.selection.mark_selected(&mut self.binder, &mut self.backend, id);
        } else {
            self.selection.mark_selected_in_place(&mut self.binder, &mut self.backend, id);
        }
    }

    /// Hover an entity
    pub fn mark_entity_as_hovered(&mut self, id: EntityId) {
        self.selection.mark_hovered(&mut self.binder, &mut self.backend, id);
    }

    /// Clear the hover state (the current hover holder is cleared whatever `id` is)
    pub fn unmark_entity_as_hovered(&mut self, id: EntityId) {
        log::trace!("Unhover requested for entity {}", id);
        self.selection.unmark_hovered(&mut self.binder, &mut self.backend);
    }

    /// Frame the camera on the selected entity
    pub fn move_camera_to_selection(&mut self) {
        self.selection.move_camera_to_selection(&self.binder, &mut self.backend);
    }

    /// Activate or deactivate a layer; takes effect on the next frame
    pub fn update_layer_status(&mut self, layer: &str, active: bool) {
        self.layers.set_layer_active(layer, active);
    }

    /// Pointer press: returns the entity under the pointer and notifies the callback
    pub fn pointer_down(&mut self, ray: &PickRay) -> Option<EntityId> {
        let id = self.pick_entity(ray)?;
        if let Some(callback) = self.on_entity_selected.as_mut() {
            callback(id);
        }
        Some(id)
    }

    /// Pointer motion: hovers the entity under the pointer or clears the hover
    pub fn pointer_move(&mut self, ray: &PickRay) -> Option<EntityId> {
        match self.pick_entity(ray) {
            Some(id) => {
                if self.selection.selected() != Some(id) {
                    self.mark_entity_as_hovered(id);
                }
                Some(id)
            }
            None => {
                if self.selection.hovered().is_some() && self.selection.hovered() != self.selection.selected() {
                    self.selection.unmark_hovered(&mut self.binder, &mut self.backend);
                }
                None
            }
        }
    }

    fn pick_entity(&self, ray: &PickRay) -> Option<EntityId> {
        let mesh = self.backend.pick(ray)?;
        self.binder.entity_for_mesh(mesh)
    }

    /// Advance the camera framing animation by `dt` seconds.
    ///
    /// Returns `true` while the animation is running.
    pub fn update(&mut self, dt: f32) -> bool {
        self.selection.camera_mut().update(&mut self.backend, dt)
    }

    /// Tear the session down: every mesh and material the scene created is released
    pub fn shutdown(&mut self) {
        self.selection.reset(&mut self.backend);
        self.binder.clear(&mut self.backend);
        self.layers.clear();
        log::info!("Replay scene shut down");
    }

    /// Host backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Host backend
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Entity and property bindings
    pub fn binder(&self) -> &SceneBinder {
        &self.binder
    }

    /// Layer visibility
    pub fn layers(&self) -> &LayerVisibilityManager {
        &self.layers
    }

    /// Overlay state
    pub fn selection(&self) -> &SelectionOverlayManager {
        &self.selection
    }

    /// Viewer settings
    pub fn settings(&self) -> &ViewerSettings {
        &self.settings
    }

    /// Viewer settings
    pub fn settings_mut(&mut self) -> &mut ViewerSettings {
        &mut self.settings
    }
}
