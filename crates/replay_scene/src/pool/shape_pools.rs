//! The five shape pools of a session

use super::geometry_pool::{GeometryPool, PoolStats};
use super::signature::ShapeSpec;
use crate::config::GeometrySettings;
use crate::recording::ShapeKind;
use crate::render::{BackendResult, MeshHandle, SceneBackend};

/// One [`GeometryPool`] per shape kind
#[derive(Debug)]
pub struct ShapePools {
    capsules: GeometryPool,
    spheres: GeometryPool,
    boxes: GeometryPool,
    planes: GeometryPool,
    lines: GeometryPool,
}

impl ShapePools {
    /// Create empty pools
    pub fn new(geometry: &GeometrySettings) -> Self {
        Self {
            capsules: GeometryPool::new(ShapeKind::Capsule, geometry.clone()),
            spheres: GeometryPool::new(ShapeKind::Sphere, geometry.clone()),
            boxes: GeometryPool::new(ShapeKind::Box, geometry.clone()),
            planes: GeometryPool::new(ShapeKind::Plane, geometry.clone()),
            lines: GeometryPool::new(ShapeKind::Line, geometry.clone()),
        }
    }

    /// Pool serving `kind`
    pub fn pool(&self, kind: ShapeKind) -> &GeometryPool {
        match kind {
            ShapeKind::Capsule => &self.capsules,
            ShapeKind::Sphere => &self.spheres,
            ShapeKind::Box => &self.boxes,
            ShapeKind::Plane => &self.planes,
            ShapeKind::Line => &self.lines,
        }
    }

    fn pool_mut(&mut self, kind: ShapeKind) -> &mut GeometryPool {
        match kind {
            ShapeKind::Capsule => &mut self.capsules,
            ShapeKind::Sphere => &mut self.spheres,
            ShapeKind::Box => &mut self.boxes,
            ShapeKind::Plane => &mut self.planes,
            ShapeKind::Line => &mut self.lines,
        }
    }

    /// Acquire an instance from the pool matching `spec`
    pub fn acquire<B: SceneBackend + ?Sized>(&mut self, backend: &mut B, spec: &ShapeSpec) -> BackendResult<MeshHandle> {
        self.pool_mut(spec.kind()).acquire(backend, spec)
    }

    /// Release `mesh` back to its pool.
    ///
    /// With a known `kind` only that pool is consulted. Untagged handles are
    /// offered to every pool in [`ShapeKind::RELEASE_ORDER`]. Returns `false`
    /// when no pool owns the handle.
    pub fn release<B: SceneBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        mesh: MeshHandle,
        kind: Option<ShapeKind>,
    ) -> bool {
        match kind {
            Some(kind) => self.pool_mut(kind).release(backend, mesh),
            None => ShapeKind::RELEASE_ORDER.iter().any(|&kind| self.pool_mut(kind).release(backend, mesh)),
        }
    }

    /// Statistics of every pool in release order
    pub fn stats(&self) -> Vec<(ShapeKind, PoolStats)> {
        ShapeKind::RELEASE_ORDER.iter().map(|&kind| (kind, self.pool(kind).stats())).collect()
    }

    /// Log bucket and instance counts of every pool
    pub fn log_debug_data(&self) {
        for (kind, stats) in self.stats() {
            log::debug!(
                "{} pool: {} buckets, {} instances, {} used (peak {})",
                kind,
                stats.buckets,
                stats.instances,
                stats.used,
                stats.peak_used
            );
        }
    }

    /// Destroy every pooled instance
    pub fn clear<B: SceneBackend + ?Sized>(&mut self, backend: &mut B) {
        for kind in ShapeKind::RELEASE_ORDER {
            self.pool_mut(kind).clear(backend);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use crate::render::HeadlessBackend;

    #[test]
    fn test_acquire_routes_by_kind() {
        let mut backend = HeadlessBackend::new();
        let mut pools = ShapePools::new(&GeometrySettings::default());

        let sphere = pools.acquire(&mut backend, &ShapeSpec::Sphere { radius: 1.0 }).unwrap();
        let cube = pools.acquire(&mut backend, &ShapeSpec::Box { size: Vec3::new(1.0, 1.0, 1.0) }).unwrap();

        assert!(pools.pool(ShapeKind::Sphere).contains(sphere));
        assert!(pools.pool(ShapeKind::Box).contains(cube));
        assert!(!pools.pool(ShapeKind::Sphere).contains(cube));
    }

    #[test]
    fn test_untagged_release_finds_owner() {
        let mut backend = HeadlessBackend::new();
        let mut pools = ShapePools::new(&GeometrySettings::default());
        let plane = pools
            .acquire(&mut backend, &ShapeSpec::Plane { normal: Vec3::y(), width: 1.0, length: 2.0 })
            .unwrap();

        assert!(pools.release(&mut backend, plane, None));
        assert_eq!(pools.pool(ShapeKind::Plane).stats().used, 0);
    }

    #[test]
    fn test_tagged_release_checks_only_that_pool() {
        let mut backend = HeadlessBackend::new();
        let mut pools = ShapePools::new(&GeometrySettings::default());
        let sphere = pools.acquire(&mut backend, &ShapeSpec::Sphere { radius: 1.0 }).unwrap();

        assert!(!pools.release(&mut backend, sphere, Some(ShapeKind::Capsule)));
        assert!(pools.release(&mut backend, sphere, Some(ShapeKind::Sphere)));
    }

    #[test]
    fn test_release_foreign_handle() {
        let mut backend = HeadlessBackend::new();
        let mut pools = ShapePools::new(&GeometrySettings::default());
        assert!(!pools.release(&mut backend, MeshHandle(7), None));
    }

    #[test]
    fn test_stats_cover_every_pool() {
        let pools = ShapePools::new(&GeometrySettings::default());
        let kinds: Vec<_> = pools.stats().into_iter().map(|(kind, _)| kind).collect();
        assert_eq!(kinds, ShapeKind::RELEASE_ORDER.to_vec());
        pools.log_debug_data();
    }
}
