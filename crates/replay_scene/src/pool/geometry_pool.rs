//! Generic acquire/release cache of shape instances
//!
//! Buckets are keyed by [`ShapeSignature`]. Acquiring reuses the first free
//! entry of the bucket or builds a new instance; releasing marks the entry
//! free and hides it from rendering and picking. Instances are never
//! destroyed by release, so a bucket only grows to the largest number of
//! instances of that signature used at once.

use std::collections::HashMap;

use super::signature::{ShapeSignature, ShapeSpec};
use crate::config::GeometrySettings;
use crate::recording::ShapeKind;
use crate::render::{BackendResult, MeshHandle, SceneBackend};

/// One pooled instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolEntry {
    /// Host mesh
    pub mesh: MeshHandle,
    /// Bound to a property this frame
    pub used: bool,
}

/// Statistics for pool usage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Number of distinct signatures
    pub buckets: usize,
    /// Number of instances across all buckets
    pub instances: usize,
    /// Number of instances currently in use
    pub used: usize,
    /// Maximum number of instances in use at once
    pub peak_used: usize,
}

/// Pool of one shape kind
#[derive(Debug)]
pub struct GeometryPool {
    kind: ShapeKind,
    geometry: GeometrySettings,
    buckets: HashMap<ShapeSignature, Vec<PoolEntry>>,
    owners: HashMap<MeshHandle, ShapeSignature>,
    stats: PoolStats,
}

impl GeometryPool {
    /// Create an empty pool building instances with `geometry` tessellation
    pub fn new(kind: ShapeKind, geometry: GeometrySettings) -> Self {
        log::info!("Created {} pool", kind);
        Self { kind, geometry, buckets: HashMap::new(), owners: HashMap::new(), stats: PoolStats::default() }
    }

    /// Shape kind served by this pool
    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    /// Hand out an instance for `spec`, reusing a free one when possible
    pub fn acquire<B: SceneBackend + ?Sized>(&mut self, backend: &mut B, spec: &ShapeSpec) -> BackendResult<MeshHandle> {
        debug_assert_eq!(spec.kind(), self.kind, "shape routed to the wrong pool");
        let signature = spec.signature();

        let reused = self
            .buckets
            .get_mut(&signature)
            .and_then(|bucket| bucket.iter_mut().find(|entry| !entry.used))
            .map(|entry| {
                entry.used = true;
                entry.mesh
            });

        let mesh = match reused {
            Some(mesh) => {
                backend.set_enabled(mesh, true);
                log::trace!("Reused {} instance {:?} for [{}]", self.kind, mesh, signature);
                mesh
            }
            None => {
                let mesh = backend.create_mesh(&spec.descriptor(&self.geometry))?;
                log::trace!("Built {} instance {:?} for [{}]", self.kind, mesh, signature);
                self.owners.insert(mesh, signature.clone());
                self.buckets.entry(signature).or_default().push(PoolEntry { mesh, used: true });
                self.stats.instances += 1;
                mesh
            }
        };

        if let Some((points, colors)) = spec.line_buffers() {
            backend.update_lines(mesh, &points, &colors);
        }

        self.stats.used += 1;
        self.stats.peak_used = self.stats.peak_used.max(self.stats.used);
        Ok(mesh)
    }

    /// Return an instance to the pool.
    ///
    /// Returns `false` when the handle was not built by this pool.
    pub fn release<B: SceneBackend + ?Sized>(&mut self, backend: &mut B, mesh: MeshHandle) -> bool {
        let Some(signature) = self.owners.get(&mesh) else {
            return false;
        };
        let Some(entry) = self
            .buckets
            .get_mut(signature)
            .and_then(|bucket| bucket.iter_mut().find(|entry| entry.mesh == mesh))
        else {
            return false;
        };

        if entry.used {
            entry.used = false;
            self.stats.used = self.stats.used.saturating_sub(1);
        }
        backend.set_enabled(mesh, false);
        backend.set_pickable(mesh, false);
        log::trace!("Released {} instance {:?}", self.kind, mesh);
        true
    }

    /// Whether `mesh` was built by this pool
    pub fn contains(&self, mesh: MeshHandle) -> bool {
        self.owners.contains_key(&mesh)
    }

    /// Entries of one bucket
    pub fn bucket(&self, signature: &ShapeSignature) -> &[PoolEntry] {
        self.buckets.get(signature).map(Vec::as_slice).unwrap_or_default()
    }

    /// Pool statistics
    pub fn stats(&self) -> PoolStats {
        PoolStats { buckets: self.buckets.len(), ..self.stats }
    }

    /// Destroy every instance and forget all buckets
    pub fn clear<B: SceneBackend + ?Sized>(&mut self, backend: &mut B) {
        for entry in self.buckets.values().flatten() {
            backend.destroy_mesh(entry.mesh);
        }
        self.buckets.clear();
        self.owners.clear();
        self.stats = PoolStats::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use crate::recording::ColorData;
    use crate::render::HeadlessBackend;

    fn sphere_pool() -> GeometryPool {
        GeometryPool::new(ShapeKind::Sphere, GeometrySettings::default())
    }

    #[test]
    fn test_release_then_acquire_reuses_instance() {
        let mut backend = HeadlessBackend::new();
        let mut pool = sphere_pool();
        let spec = ShapeSpec::Sphere { radius: 0.5 };

        let first = pool.acquire(&mut backend, &spec).unwrap();
        assert!(pool.release(&mut backend, first));
        assert!(!backend.node(first).unwrap().enabled);
        assert!(!backend.node(first).unwrap().pickable);

        let second = pool.acquire(&mut backend, &spec).unwrap();
        assert_eq!(first, second);
        assert!(backend.node(second).unwrap().enabled);
        assert_eq!(backend.meshes_created(), 1);
    }

    #[test]
    fn test_concurrent_use_grows_bucket() {
        let mut backend = HeadlessBackend::new();
        let mut pool = sphere_pool();
        let spec = ShapeSpec::Sphere { radius: 1.0 };

        let a = pool.acquire(&mut backend, &spec).unwrap();
        let b = pool.acquire(&mut backend, &spec).unwrap();
        assert_ne!(a, b);
        assert_eq!(pool.bucket(&spec.signature()).len(), 2);

        // Steady state: two at a time never builds a third
        for _ in 0..5 {
            pool.release(&mut backend, a);
            pool.release(&mut backend, b);
            pool.acquire(&mut backend, &spec).unwrap();
            pool.acquire(&mut backend, &spec).unwrap();
        }
        assert_eq!(pool.bucket(&spec.signature()).len(), 2);
        assert_eq!(pool.stats().peak_used, 2);
    }

    #[test]
    fn test_signatures_use_separate_buckets() {
        let mut backend = HeadlessBackend::new();
        let mut pool = sphere_pool();

        let small = pool.acquire(&mut backend, &ShapeSpec::Sphere { radius: 0.5 }).unwrap();
        pool.release(&mut backend, small);
        let large = pool.acquire(&mut backend, &ShapeSpec::Sphere { radius: 2.0 }).unwrap();

        assert_ne!(small, large);
        let stats = pool.stats();
        assert_eq!(stats, PoolStats { buckets: 2, instances: 2, used: 1, peak_used: 1 });
    }

    #[test]
    fn test_release_unknown_handle() {
        let mut backend = HeadlessBackend::new();
        let mut pool = sphere_pool();
        assert!(!pool.release(&mut backend, MeshHandle(42)));
        assert!(!pool.contains(MeshHandle(42)));
    }

    #[test]
    fn test_line_instances_are_rewritten() {
        let mut backend = HeadlessBackend::new();
        let mut pool = GeometryPool::new(ShapeKind::Line, GeometrySettings::default());

        let first = ShapeSpec::Line { origin: Vec3::zeros(), destination: Vec3::x(), color: ColorData::WHITE };
        let line = pool.acquire(&mut backend, &first).unwrap();
        pool.release(&mut backend, line);

        let second = ShapeSpec::Line { origin: Vec3::y(), destination: Vec3::z(), color: ColorData::WHITE };
        let again = pool.acquire(&mut backend, &second).unwrap();
        assert_eq!(line, again);
        assert_eq!(backend.node(again).unwrap().line_points, vec![Vec3::y(), Vec3::z()]);
    }

    #[test]
    fn test_failed_build_leaves_pool_untouched() {
        let mut backend = HeadlessBackend::new().with_mesh_limit(0);
        let mut pool = sphere_pool();
        assert!(pool.acquire(&mut backend, &ShapeSpec::Sphere { radius: 1.0 }).is_err());
        assert_eq!(pool.stats(), PoolStats::default());
    }

    #[test]
    fn test_clear_destroys_instances() {
        let mut backend = HeadlessBackend::new();
        let mut pool = sphere_pool();
        pool.acquire(&mut backend, &ShapeSpec::Sphere { radius: 1.0 }).unwrap();
        pool.clear(&mut backend);
        assert_eq!(backend.mesh_count(), 0);
        assert_eq!(pool.stats(), PoolStats::default());
    }
}
