//! Camera framing animation
//!
//! Selecting an entity glides the camera towards it: the look-target and the
//! eye position are both eased (cubic in/out) from their current values to
//! the entity over a fixed duration. The eye keeps its bearing from the
//! entity but never drops below it, and ends `distance` units away. While the
//! animation runs the camera is locked onto the target; the lock is released
//! when it completes. Starting a new framing supersedes the running one.

use super::backend::{CameraPose, SceneBackend};
use crate::config::CameraSettings;
use crate::foundation::math::{easing, Vec3};

/// One camera glide between two poses
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FramingAnimation {
    from: CameraPose,
    to: CameraPose,
    duration: f32,
    elapsed: f32,
}

impl FramingAnimation {
    /// Glide from `current` to frame `target` at `distance`
    pub fn towards(current: CameraPose, target: Vec3, distance: f32, duration: f32) -> Self {
        let mut offset = current.position - target;
        offset.y = offset.y.max(0.0);
        let direction = offset
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(|| Vec3::new(0.0, 1.0, -1.0).normalize());

        Self {
            from: current,
            to: CameraPose::new(target + direction * distance, target),
            duration: duration.max(0.0),
            elapsed: 0.0,
        }
    }

    /// Pose at the end of the glide
    pub fn destination(&self) -> CameraPose {
        self.to
    }

    /// Pose at the current point of the glide
    pub fn sample(&self) -> CameraPose {
        let t = if self.duration > 0.0 { self.elapsed / self.duration } else { 1.0 };
        let k = easing::cubic_in_out(t);
        CameraPose::new(
            self.from.position.lerp(&self.to.position, k),
            self.from.target.lerp(&self.to.target, k),
        )
    }

    /// Advance by `dt` seconds
    pub fn advance(&mut self, dt: f32) {
        self.elapsed = (self.elapsed + dt.max(0.0)).min(self.duration);
    }

    /// Whether the glide reached its destination
    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// Drives framing animations against the host camera
#[derive(Debug, Clone)]
pub struct CameraRig {
    distance: f32,
    duration: f32,
    active: Option<FramingAnimation>,
}

impl CameraRig {
    /// Create a rig from camera settings
    pub fn new(settings: &CameraSettings) -> Self {
        Self { distance: settings.framing_distance, duration: settings.framing_duration(), active: None }
    }

    /// Start framing `target`, replacing any glide in progress
    pub fn frame<B: SceneBackend + ?Sized>(&mut self, backend: &mut B, target: Vec3) {
        let animation = FramingAnimation::towards(backend.camera(), target, self.distance, self.duration);
        log::debug!("Framing camera on ({:.3}, {:.3}, {:.3})", target.x, target.y, target.z);
        self.active = Some(animation);
        backend.set_camera(animation.sample(), true);
    }

    /// Advance the running glide and push the camera pose to the host.
    ///
    /// Returns `true` while an animation is still running.
    pub fn update<B: SceneBackend + ?Sized>(&mut self, backend: &mut B, dt: f32) -> bool {
        let Some(animation) = self.active.as_mut() else {
            return false;
        };

        animation.advance(dt);
        let pose = animation.sample();
        if animation.is_finished() {
            self.active = None;
            backend.set_camera(pose, false);
            false
        } else {
            backend.set_camera(pose, true);
            true
        }
    }

    /// Running glide, if any
    pub fn active(&self) -> Option<&FramingAnimation> {
        self.active.as_ref()
    }

    /// Whether a glide is running
    pub fn is_animating(&self) -> bool {
        self.active.is_some()
    }

    /// Drop the running glide without moving the camera
    pub fn stop(&mut self) {
        self.active = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::HeadlessBackend;
    use approx::assert_relative_eq;

    #[test]
    fn test_destination_keeps_bearing() {
        let current = CameraPose::new(Vec3::new(10.0, 10.0, -10.0), Vec3::zeros());
        let animation = FramingAnimation::towards(current, Vec3::new(1.0, 0.0, 0.0), 4.0, 1.0);

        let destination = animation.destination();
        assert_relative_eq!(destination.target, Vec3::new(1.0, 0.0, 0.0));
        assert_relative_eq!((destination.position - destination.target).norm(), 4.0, epsilon = 1e-5);
        let expected = Vec3::new(9.0, 10.0, -10.0).normalize() * 4.0 + Vec3::new(1.0, 0.0, 0.0);
        assert_relative_eq!(destination.position, expected, epsilon = 1e-5);
    }

    #[test]
    fn test_camera_never_below_target() {
        let current = CameraPose::new(Vec3::new(0.0, -5.0, -5.0), Vec3::zeros());
        let animation = FramingAnimation::towards(current, Vec3::zeros(), 4.0, 1.0);
        assert_relative_eq!(animation.destination().position, Vec3::new(0.0, 0.0, -4.0), epsilon = 1e-5);
    }

    #[test]
    fn test_sample_eases() {
        let current = CameraPose::new(Vec3::new(0.0, 0.0, -10.0), Vec3::zeros());
        let mut animation = FramingAnimation::towards(current, Vec3::new(0.0, 0.0, 2.0), 4.0, 1.0);
        assert_relative_eq!(animation.sample().target, Vec3::zeros());

        animation.advance(0.5);
        assert_relative_eq!(animation.sample().target, Vec3::new(0.0, 0.0, 1.0), epsilon = 1e-5);
        assert!(!animation.is_finished());

        animation.advance(10.0);
        assert!(animation.is_finished());
        assert_relative_eq!(animation.sample().target, Vec3::new(0.0, 0.0, 2.0));
    }

    #[test]
    fn test_rig_releases_lock_on_completion() {
        let mut backend = HeadlessBackend::new();
        let mut rig = CameraRig::new(&CameraSettings::default());

        rig.frame(&mut backend, Vec3::new(0.0, 0.0, 3.0));
        assert!(backend.camera_locked());
        assert!(rig.is_animating());

        assert!(rig.update(&mut backend, 0.1));
        assert!(backend.camera_locked());

        assert!(!rig.update(&mut backend, 1.0));
        assert!(!backend.camera_locked());
        assert!(!rig.is_animating());
        assert_relative_eq!(backend.camera().target, Vec3::new(0.0, 0.0, 3.0));
    }

    #[test]
    fn test_new_framing_supersedes() {
        let mut backend = HeadlessBackend::new();
        let mut rig = CameraRig::new(&CameraSettings::default());

        rig.frame(&mut backend, Vec3::new(5.0, 0.0, 0.0));
        rig.update(&mut backend, 0.1);
        rig.frame(&mut backend, Vec3::new(-5.0, 0.0, 0.0));
        rig.update(&mut backend, 1.0);

        assert_relative_eq!(backend.camera().target, Vec3::new(-5.0, 0.0, 0.0));
    }

    #[test]
    fn test_zero_duration_completes_immediately() {
        let mut backend = HeadlessBackend::new();
        let settings = CameraSettings { framing_fps: 0.0, ..CameraSettings::default() };
        let mut rig = CameraRig::new(&settings);

        rig.frame(&mut backend, Vec3::new(1.0, 2.0, 3.0));
        assert!(!rig.update(&mut backend, 0.0));
        assert_relative_eq!(backend.camera().target, Vec3::new(1.0, 2.0, 3.0));
    }
}
