//! Hover and selection overlay
//!
//! At most one entity is selected and at most one is hovered. Selection
//! styling always wins: a selected entity that is also hovered keeps its
//! selection outline. Whenever the holder of a state changes, the previous
//! holder is restored before the new one is styled: to plain styling, or to the
//! hover outline when a deselected entity is still hovered.
//! Selecting also attaches the orientation gizmo and frames the camera on the
//! entity.

use super::binder::SceneBinder;
use crate::recording::EntityId;
use crate::render::{CameraRig, OutlineStyle, SceneBackend};

/// Overlay state of one entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayState {
    /// No highlight
    Plain,
    /// Hover outline
    Hovered,
    /// Selection outline
    Selected,
}

impl OverlayState {
    /// Outline drawn for this state
    pub fn outline(self) -> Option<OutlineStyle> {
        match self {
            Self::Plain => None,
            Self::Hovered => Some(OutlineStyle::hovered()),
            Self::Selected => Some(OutlineStyle::selected()),
        }
    }
}

/// Hover/selection state machine
#[derive(Debug, Clone)]
pub struct SelectionOverlayManager {
    selected: Option<EntityId>,
    hovered: Option<EntityId>,
    camera: CameraRig,
}

impl SelectionOverlayManager {
    /// Create a manager with nothing selected or hovered
    pub fn new(camera: CameraRig) -> Self {
        Self { selected: None, hovered: None, camera }
    }

    /// Selected entity
    pub fn selected(&self) -> Option<EntityId> {
        self.selected
    }

    /// Hovered entity
    pub fn hovered(&self) -> Option<EntityId> {
        self.hovered
    }

    /// Effective overlay state of an entity
    pub fn state(&self, id: EntityId) -> OverlayState {
        if self.selected == Some(id) {
            OverlayState::Selected
        } else if self.hovered == Some(id) {
            OverlayState::Hovered
        } else {
            OverlayState::Plain
        }
    }

    /// Camera framing driver
    pub fn camera(&self) -> &CameraRig {
        &self.camera
    }

    /// Camera framing driver
    pub fn camera_mut(&mut self) -> &mut CameraRig {
        &mut self.camera
    }

    /// Hover an entity. Ignored for entities without a binding.
    pub fn mark_hovered<B: SceneBackend + ?Sized>(&mut self, binder: &mut SceneBinder, backend: &mut B, id: EntityId) {
        if !binder.has_entity(id) {
            return;
        }

        if let Some(previous) = self.hovered {
            if previous != id && self.selected != Some(previous) {
                binder.set_outline(backend, previous, None);
            }
        }

        self.hovered = Some(id);
        if self.selected != Some(id) {
            binder.set_outline(backend, id, OverlayState::Hovered.outline());
        }
        log::debug!("Hovered entity {}", id);
    }

    /// Clear the hover state
    pub fn unmark_hovered<B: SceneBackend + ?Sized>(&mut self, binder: &mut SceneBinder, backend: &mut B) {
        if let Some(previous) = self.hovered.take() {
            if self.selected != Some(previous) {
                binder.set_outline(backend, previous, None);
            }
        }
    }

    /// Select an entity, attach the gizmo and frame the camera on it.
    ///
    /// Ignored for entities without a binding.
    pub fn mark_selected<B: SceneBackend + ?Sized>(&mut self, binder: &mut SceneBinder, backend: &mut B, id: EntityId) {
        self.select(binder, backend, id, true);
    }

    /// Select an entity and attach the gizmo, leaving the camera where it is
    pub fn mark_selected_in_place<B: SceneBackend + ?Sized>(
        &mut self,
        binder: &mut SceneBinder,
        backend: &mut B,
        id: EntityId,
    ) {
        self.select(binder, backend, id, false);
    }

    fn select<B: SceneBackend + ?Sized>(&mut self, binder: &mut SceneBinder, backend: &mut B, id: EntityId, frame: bool) {
        let Some(binding) = binder.entity(id) else {
            return;
        };
        let (base_mesh, position) = (binding.base_mesh(), binding.position());

        if let Some(previous) = self.selected {
            if previous != id {
                // A deselected entity that still holds the hover goes back to the hover outline
                let restored = if self.hovered == Some(previous) { OverlayState::Hovered } else { OverlayState::Plain };
                binder.set_outline(backend, previous, restored.outline());
            }
        }

        self.selected = Some(id);
        binder.set_outline(backend, id, OverlayState::Selected.outline());
        backend.attach_axis_gizmo(Some(base_mesh));
        log::debug!("Selected entity {}", id);

        if frame {
            self.camera.frame(backend, position);
        }
    }

    /// Frame the camera on the selected entity, if any
    pub fn move_camera_to_selection<B: SceneBackend + ?Sized>(&mut self, binder: &SceneBinder, backend: &mut B) {
        let Some(binding) = self.selected.and_then(|id| binder.entity(id)) else {
            return;
        };
        self.camera.frame(backend, binding.position());
    }

    /// Forget selection and hover state and detach the gizmo
    pub fn reset<B: SceneBackend + ?Sized>(&mut self, backend: &mut B) {
        self.selected = None;
        self.hovered = None;
        self.camera.stop();
        backend.attach_axis_gizmo(None);
    }
}
