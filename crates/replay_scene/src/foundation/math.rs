//! Math utilities and types
//!
//! Provides the math aliases used by the scene binder plus the few helpers
//! it needs on top of nalgebra: building a rotation from recorded axis
//! vectors and easing curves for camera framing.

pub use nalgebra::{Matrix3, Quaternion, Rotation3, Unit, UnitQuaternion, Vector3};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// Quaternion type for rotations
pub type Quat = UnitQuaternion<f32>;

/// Vectors shorter than this are treated as zero when building bases
pub const AXIS_EPSILON: f32 = 1e-6;

/// Reference axis crossed against a capsule direction to derive its forward axis
pub fn capsule_reference_axis() -> Vec3 {
    Vec3::new(1.0, 2.0, 3.0).normalize()
}

/// Build a rotation whose local X, Y and Z axes map onto `right`, `up` and `forward`.
///
/// The three vectors are the rows of the recorded orientation. They do not
/// need to be exactly orthonormal; the nearest proper rotation is used.
/// Degenerate input (zero length or non-finite axes) yields the identity.
pub fn rotation_from_basis(right: Vec3, up: Vec3, forward: Vec3) -> Quat {
    let axes = [right, up, forward];
    if axes
        .iter()
        .any(|axis| !axis.iter().all(|c| c.is_finite()) || axis.norm() < AXIS_EPSILON)
    {
        return Quat::identity();
    }

    let basis = Mat3::from_columns(&[right.normalize(), up.normalize(), forward.normalize()]);
    if basis.determinant().abs() < AXIS_EPSILON {
        return Quat::identity();
    }

    let rotation = Rotation3::from_matrix(&basis);
    Quat::from_rotation_matrix(&rotation)
}

/// Orientation of a capsule whose long axis (local +Y) points along `direction`.
///
/// Forward is `direction × reference`, right is `direction × forward`. When the
/// direction is parallel to the reference axis, world +Y (or +X) is used instead.
pub fn capsule_rotation(direction: Vec3) -> Quat {
    if direction.norm() < AXIS_EPSILON || !direction.iter().all(|c| c.is_finite()) {
        return Quat::identity();
    }
    let up = direction.normalize();

    let mut forward = up.cross(&capsule_reference_axis());
    if forward.norm() < AXIS_EPSILON {
        forward = up.cross(&Vec3::y());
    }
    if forward.norm() < AXIS_EPSILON {
        forward = up.cross(&Vec3::x());
    }
    let forward = forward.normalize();
    let right = up.cross(&forward).normalize();

    rotation_from_basis(right, up, forward)
}

/// Orientation of an oriented box from its recorded `forward` and `up` axes.
///
/// Right is derived as `up × forward`.
pub fn oriented_box_rotation(forward: Vec3, up: Vec3) -> Quat {
    let right = up.cross(&forward);
    rotation_from_basis(right, up, forward)
}

/// Orientation of a plane from its recorded `normal` and `up` vectors.
///
/// The plane's recorded up vector becomes local right, the normal becomes
/// forward, and local up is `forward × right`.
pub fn plane_rotation(normal: Vec3, up: Vec3) -> Quat {
    let right = up;
    let forward = normal;
    let local_up = forward.cross(&right);
    rotation_from_basis(right, local_up, forward)
}

/// Easing functions
pub mod easing {
    /// Cubic ease-in/ease-out over `t` in `[0, 1]` (input is clamped)
    pub fn cubic_in_out(t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        if t < 0.5 {
            4.0 * t * t * t
        } else {
            let f = -2.0 * t + 2.0;
            1.0 - f * f * f / 2.0
        }
    }
}
