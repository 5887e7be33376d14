//! Layer visibility
//!
//! Shapes are tagged with a layer name. Only shapes on an active layer are
//! instantiated; layers never mentioned are inactive.

use std::collections::HashMap;

/// Layer name to visibility
#[derive(Debug, Clone, Default)]
pub struct LayerVisibilityManager {
    layers: HashMap<String, bool>,
}

impl LayerVisibilityManager {
    /// Create a manager with every layer inactive
    pub fn new() -> Self {
        Self::default()
    }

    /// Activate or deactivate a layer
    pub fn set_layer_active(&mut self, name: &str, active: bool) {
        self.layers.insert(name.to_string(), active);
    }

    /// Whether a layer is active (unknown layers are not)
    pub fn is_layer_active(&self, name: &str) -> bool {
        self.layers.get(name).copied().unwrap_or(false)
    }

    /// Names of the active layers, sorted
    pub fn active_layers(&self) -> Vec<&str> {
        let mut active: Vec<&str> =
            self.layers.iter().filter(|(_, active)| **active).map(|(name, _)| name.as_str()).collect();
        active.sort_unstable();
        active
    }

    /// Forget every layer
    pub fn clear(&mut self) {
        self.layers.clear();
    }
}
