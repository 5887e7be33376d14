//! Shape signatures and build arguments
//!
//! A [`ShapeSpec`] carries the size-determining parameters of a shape: what a
//! pool needs to build an instance and to decide which bucket it belongs to.
//! Position, orientation and color are applied after acquisition and never
//! influence the signature.
//!
//! Signatures print each parameter with three fractional digits, so shapes
//! whose parameters round identically share a bucket. Formatting keeps the
//! sign of negative zero: `-0.0004` and `0.0004` land in different buckets.

use std::fmt;

use crate::config::GeometrySettings;
use crate::foundation::math::Vec3;
use crate::recording::{ColorData, ShapeGeometry, ShapeKind, ShapeProperty};
use crate::render::{CapsuleBuilder, MeshDescriptor};

/// Bucket key of a pooled shape
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeSignature(String);

impl ShapeSignature {
    /// Key shared by every line
    pub const LINE: &'static str = "line";

    fn from_fields(fields: &[f32]) -> Self {
        let parts: Vec<String> = fields.iter().map(|f| format!("{f:.3}")).collect();
        Self(parts.join("|"))
    }

    /// Signature text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShapeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Build arguments of a pooled shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeSpec {
    /// Capsule of total `height` (caps included) and cap `radius`
    Capsule {
        /// Total height
        height: f32,
        /// Cap radius
        radius: f32,
    },
    /// Sphere of `radius`
    Sphere {
        /// Radius
        radius: f32,
    },
    /// Box with full extents `size`
    Box {
        /// Full extents
        size: Vec3,
    },
    /// Plane facing `normal`
    Plane {
        /// Surface normal
        normal: Vec3,
        /// Width
        width: f32,
        /// Length
        length: f32,
    },
    /// Line segment (rewritten in place on every acquisition)
    Line {
        /// Start point
        origin: Vec3,
        /// End point
        destination: Vec3,
        /// Color of both endpoints
        color: ColorData,
    },
}

impl ShapeSpec {
    /// Build arguments for a recorded shape
    pub fn from_shape(shape: &ShapeProperty<'_>) -> Self {
        match shape.geometry {
            ShapeGeometry::Sphere { radius } => Self::Sphere { radius },
            ShapeGeometry::Capsule { radius, height, .. } => Self::Capsule { height, radius },
            ShapeGeometry::Aabb { size } | ShapeGeometry::Oobb { size, .. } => Self::Box { size },
            ShapeGeometry::Plane { normal, width, length, .. } => Self::Plane { normal, width, length },
            ShapeGeometry::Line { destination } => {
                Self::Line { origin: shape.position, destination, color: shape.color }
            }
        }
    }

    /// Pool the shape is drawn from
    pub const fn kind(&self) -> ShapeKind {
        match self {
            Self::Capsule { .. } => ShapeKind::Capsule,
            Self::Sphere { .. } => ShapeKind::Sphere,
            Self::Box { .. } => ShapeKind::Box,
            Self::Plane { .. } => ShapeKind::Plane,
            Self::Line { .. } => ShapeKind::Line,
        }
    }

    /// Bucket key
    pub fn signature(&self) -> ShapeSignature {
        match *self {
            Self::Capsule { height, radius } => ShapeSignature::from_fields(&[height, radius]),
            Self::Sphere { radius } => ShapeSignature::from_fields(&[radius]),
            Self::Box { size } => ShapeSignature::from_fields(&[size.x, size.y, size.z]),
            Self::Plane { normal, width, length } => {
                ShapeSignature::from_fields(&[normal.x, normal.y, normal.z, length, width])
            }
            Self::Line { .. } => ShapeSignature(ShapeSignature::LINE.to_string()),
        }
    }

    /// Geometry the host builds for a new instance
    pub fn descriptor(&self, geometry: &GeometrySettings) -> MeshDescriptor {
        match *self {
            Self::Capsule { height, radius } => {
                let mesh = CapsuleBuilder::new(radius, height - radius * 2.0)
                    .radial_segments(geometry.capsule_tessellation)
                    .height_segments(geometry.capsule_subdivisions)
                    .cap_segments(geometry.capsule_cap_detail)
                    .build();
                MeshDescriptor::Custom(mesh)
            }
            Self::Sphere { radius } => {
                MeshDescriptor::Sphere { diameter: radius * 2.0, segments: geometry.sphere_segments }
            }
            Self::Box { size } => MeshDescriptor::Box { width: size.x, height: size.y, depth: size.z },
            Self::Plane { normal, width, length } => {
                MeshDescriptor::Plane { width, height: length, normal, double_sided: true }
            }
            Self::Line { .. } => {
                let (points, colors) = self.line_buffers().unwrap_or_default();
                MeshDescriptor::Lines { points, colors }
            }
        }
    }

    /// Points and colors of a line, `None` for other shapes
    pub fn line_buffers(&self) -> Option<(Vec<Vec3>, Vec<ColorData>)> {
        match *self {
            Self::Line { origin, destination, color } => Some((vec![origin, destination], vec![color, color])),
            _ => None,
        }
    }
}
