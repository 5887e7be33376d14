//! Viewer settings
//!
//! Persisted user preferences for the replay viewer. Every field has a
//! default so partial files load cleanly.

use serde::{Deserialize, Serialize};

use super::Config;
use crate::foundation::math::Vec3;

/// Top-level viewer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerSettings {
    /// Start camera framing whenever an entity is selected through the pointer
    pub move_to_entity_on_selection: bool,
    /// Re-frame the selected entity after every presented frame
    pub follow_current_selection: bool,
    /// Layers activated when a session starts
    pub active_layers: Vec<String>,
    /// Camera behaviour
    pub camera: CameraSettings,
    /// Tessellation of pooled and procedural geometry
    pub geometry: GeometrySettings,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            move_to_entity_on_selection: true,
            follow_current_selection: false,
            active_layers: Vec::new(),
            camera: CameraSettings::default(),
            geometry: GeometrySettings::default(),
        }
    }
}

impl Config for ViewerSettings {}

/// Camera placement and framing animation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Camera position when the session starts (looking at the origin)
    pub initial_position: [f32; 3],
    /// Distance kept from the framed entity
    pub framing_distance: f32,
    /// Length of the framing animation in animation frames
    pub framing_frames: u32,
    /// Animation frames per second
    pub framing_fps: f32,
}

impl CameraSettings {
    /// Initial camera position as a vector
    pub fn initial_position(&self) -> Vec3 {
        Vec3::from(self.initial_position)
    }

    /// Framing animation duration in seconds
    pub fn framing_duration(&self) -> f32 {
        if self.framing_fps > 0.0 {
            self.framing_frames as f32 / self.framing_fps
        } else {
            0.0
        }
    }
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            initial_position: [10.0, 10.0, -10.0],
            framing_distance: 4.0,
            framing_frames: 20,
            framing_fps: 60.0,
        }
    }
}

/// Tessellation used when building shape geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometrySettings {
    /// Radial segments of pooled capsules
    pub capsule_tessellation: u32,
    /// Cap segments (top and bottom) of pooled capsules
    pub capsule_cap_detail: u32,
    /// Height segments of the cylindrical capsule body
    pub capsule_subdivisions: u32,
    /// Segments of pooled spheres
    pub sphere_segments: u32,
    /// Diameter of the per-entity marker sphere
    pub marker_diameter: f32,
    /// Segments of the per-entity marker sphere
    pub marker_segments: u32,
}

impl Default for GeometrySettings {
    fn default() -> Self {
        Self {
            capsule_tessellation: 9,
            capsule_cap_detail: 5,
            capsule_subdivisions: 2,
            sphere_segments: 8,
            marker_diameter: 0.1,
            marker_segments: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;
    use approx::assert_relative_eq;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = ViewerSettings::default();
        assert!(settings.move_to_entity_on_selection);
        assert!(!settings.follow_current_selection);
        assert!(settings.active_layers.is_empty());
        assert_relative_eq!(settings.camera.framing_duration(), 20.0 / 60.0);
        assert_eq!(settings.geometry.capsule_tessellation, 9);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(
            file,
            "follow_current_selection = true\nactive_layers = [\"physics\"]\n\n[camera]\nframing_distance = 6.5\n"
        )
        .unwrap();

        let settings = ViewerSettings::load_from_file(file.path()).unwrap();
        assert!(settings.follow_current_selection);
        assert!(settings.move_to_entity_on_selection);
        assert_eq!(settings.active_layers, vec!["physics".to_string()]);
        assert_relative_eq!(settings.camera.framing_distance, 6.5);
        assert_eq!(settings.camera.framing_frames, 20);
    }

    #[test]
    fn test_ron_round_trip() {
        let file = tempfile::Builder::new().suffix(".ron").tempfile().unwrap();
        let mut settings = ViewerSettings::default();
        settings.move_to_entity_on_selection = false;
        settings.geometry.sphere_segments = 12;

        settings.save_to_file(file.path()).unwrap();
        let loaded = ViewerSettings::load_from_file(file.path()).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_unsupported_extension() {
        let file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        let result = ViewerSettings::load_from_file(file.path());
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = ViewerSettings::load_or_default(dir.path().join("viewer.toml")).unwrap();
        assert_eq!(settings, ViewerSettings::default());
    }
}
