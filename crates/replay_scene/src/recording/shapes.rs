//! Renderable view of shape properties

use serde::{Deserialize, Serialize};

use super::PropertyValue;
use crate::foundation::math::Vec3;

/// Recorded vector as stored in recording files
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3Data {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
    /// Z component
    pub z: f32,
}

impl Vec3Data {
    /// Create a recorded vector
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

impl From<Vec3Data> for Vec3 {
    fn from(v: Vec3Data) -> Self {
        Vec3::new(v.x, v.y, v.z)
    }
}

impl From<Vec3> for Vec3Data {
    fn from(v: Vec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

/// Recorded RGBA color, components in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorData {
    /// Red
    pub r: f32,
    /// Green
    pub g: f32,
    /// Blue
    pub b: f32,
    /// Alpha
    #[serde(default = "opaque")]
    pub a: f32,
}

const fn opaque() -> f32 {
    1.0
}

impl ColorData {
    /// Create a color
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque white
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
}

impl Default for ColorData {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Geometry pool a shape is drawn from
///
/// Axis-aligned and oriented boxes share the box pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShapeKind {
    /// Procedural capsule
    Capsule,
    /// Sphere
    Sphere,
    /// Box (axis-aligned or oriented)
    Box,
    /// Plane
    Plane,
    /// Line segment
    Line,
}

impl ShapeKind {
    /// Pools in the order release is attempted for untagged handles
    pub const RELEASE_ORDER: [Self; 5] = [Self::Capsule, Self::Sphere, Self::Box, Self::Plane, Self::Line];

    /// Lowercase name used in logs
    pub const fn name(self) -> &'static str {
        match self {
            Self::Capsule => "capsule",
            Self::Sphere => "sphere",
            Self::Box => "box",
            Self::Plane => "plane",
            Self::Line => "line",
        }
    }

    /// Whether instances of this kind take part in pointer picking
    pub const fn is_pickable(self) -> bool {
        !matches!(self, Self::Line)
    }
}

impl std::fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Size and orientation parameters of a shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeGeometry {
    /// Sphere of `radius`
    Sphere {
        /// Radius
        radius: f32,
    },
    /// Capsule along `direction`
    Capsule {
        /// Long axis
        direction: Vec3,
        /// Cap radius
        radius: f32,
        /// Total height, caps included
        height: f32,
    },
    /// Axis-aligned box
    Aabb {
        /// Full extents
        size: Vec3,
    },
    /// Oriented box
    Oobb {
        /// Full extents
        size: Vec3,
        /// Local forward axis
        forward: Vec3,
        /// Local up axis
        up: Vec3,
    },
    /// Finite plane
    Plane {
        /// Surface normal
        normal: Vec3,
        /// In-plane up vector
        up: Vec3,
        /// Width
        width: f32,
        /// Length
        length: f32,
    },
    /// Line segment ending at `destination`
    Line {
        /// End point
        destination: Vec3,
    },
}

/// A shape property resolved for binding
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeProperty<'a> {
    /// World position (line origin for lines)
    pub position: Vec3,
    /// Color
    pub color: ColorData,
    /// Visibility layer
    pub layer: &'a str,
    /// Size and orientation
    pub geometry: ShapeGeometry,
}

impl<'a> ShapeProperty<'a> {
    /// Resolve a property value, `None` for non-shape values
    pub fn from_value(value: &'a PropertyValue) -> Option<Self> {
        let (position, color, layer, geometry) = match value {
            PropertyValue::Sphere { position, radius, color, layer } => {
                (position, color, layer, ShapeGeometry::Sphere { radius: *radius })
            }
            PropertyValue::Capsule { position, direction, radius, height, color, layer } => (
                position,
                color,
                layer,
                ShapeGeometry::Capsule { direction: (*direction).into(), radius: *radius, height: *height },
            ),
            PropertyValue::Aabb { position, size, color, layer } => {
                (position, color, layer, ShapeGeometry::Aabb { size: (*size).into() })
            }
            PropertyValue::Oobb { position, size, forward, up, color, layer } => (
                position,
                color,
                layer,
                ShapeGeometry::Oobb { size: (*size).into(), forward: (*forward).into(), up: (*up).into() },
            ),
            PropertyValue::Plane { position, normal, up, width, length, color, layer } => (
                position,
                color,
                layer,
                ShapeGeometry::Plane { normal: (*normal).into(), up: (*up).into(), width: *width, length: *length },
            ),
            PropertyValue::Line { origin, destination, color, layer } => {
                (origin, color, layer, ShapeGeometry::Line { destination: (*destination).into() })
            }
            PropertyValue::Group { .. }
            | PropertyValue::Number { .. }
            | PropertyValue::String { .. }
            | PropertyValue::Boolean { .. }
            | PropertyValue::Vec3 { .. } => return None,
        };

        Some(Self { position: (*position).into(), color: *color, layer: layer.as_str(), geometry })
    }

    /// Pool this shape is drawn from
    pub const fn kind(&self) -> ShapeKind {
        match self.geometry {
            ShapeGeometry::Sphere { .. } => ShapeKind::Sphere,
            ShapeGeometry::Capsule { .. } => ShapeKind::Capsule,
            ShapeGeometry::Aabb { .. } | ShapeGeometry::Oobb { .. } => ShapeKind::Box,
            ShapeGeometry::Plane { .. } => ShapeKind::Plane,
            ShapeGeometry::Line { .. } => ShapeKind::Line,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_shape_values_resolve_to_none() {
        assert!(ShapeProperty::from_value(&PropertyValue::Number { value: 1.0 }).is_none());
        assert!(ShapeProperty::from_value(&PropertyValue::Group { value: Vec::new() }).is_none());
    }

    #[test]
    fn test_boxes_share_box_pool() {
        let aabb = PropertyValue::Aabb {
            position: Vec3Data::default(),
            size: Vec3Data::new(1.0, 2.0, 3.0),
            color: ColorData::WHITE,
            layer: "bounds".to_string(),
        };
        let oobb = PropertyValue::Oobb {
            position: Vec3Data::default(),
            size: Vec3Data::new(1.0, 2.0, 3.0),
            forward: Vec3Data::new(0.0, 0.0, 1.0),
            up: Vec3Data::new(0.0, 1.0, 0.0),
            color: ColorData::WHITE,
            layer: "bounds".to_string(),
        };

        let aabb = ShapeProperty::from_value(&aabb).unwrap();
        let oobb = ShapeProperty::from_value(&oobb).unwrap();
        assert_eq!(aabb.kind(), ShapeKind::Box);
        assert_eq!(oobb.kind(), ShapeKind::Box);
        assert_eq!(aabb.layer, "bounds");
    }

    #[test]
    fn test_line_uses_origin_as_position() {
        let line = PropertyValue::Line {
            origin: Vec3Data::new(1.0, 0.0, 0.0),
            destination: Vec3Data::new(2.0, 0.0, 0.0),
            color: ColorData::WHITE,
            layer: String::new(),
        };
        let shape = ShapeProperty::from_value(&line).unwrap();
        assert_eq!(shape.position, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(shape.kind(), ShapeKind::Line);
        assert!(!shape.kind().is_pickable());
    }

    #[test]
    fn test_color_alpha_defaults_to_opaque() {
        let color: ColorData = serde_json::from_str(r#"{ "r": 0.5, "g": 0.25, "b": 0.0 }"#).unwrap();
        assert_eq!(color, ColorData::new(0.5, 0.25, 0.0, 1.0));
    }
}
