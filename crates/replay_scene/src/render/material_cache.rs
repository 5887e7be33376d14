//! Material cache for deduplicating color materials
//!
//! Every shape of the same color shares one host material. Colors are
//! quantized to 8 bits per channel so float noise in recordings does not
//! multiply materials. Entries live for the whole session.

use std::collections::HashMap;

use super::backend::{BackendResult, MaterialDescriptor, MaterialHandle, SceneBackend};
use crate::recording::ColorData;

/// Quantized RGBA cache key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorKey(pub [u8; 4]);

impl ColorKey {
    /// Quantize a color, clamping each channel to `[0, 1]`
    pub fn from_color(color: ColorData) -> Self {
        let quantize = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self([quantize(color.r), quantize(color.g), quantize(color.b), quantize(color.a)])
    }

    /// Color the key stands for
    pub fn color(self) -> ColorData {
        let [r, g, b, a] = self.0.map(|c| f32::from(c) / 255.0);
        ColorData::new(r, g, b, a)
    }
}

/// Session-lifetime cache of color materials
#[derive(Debug, Default)]
pub struct MaterialCache {
    /// Cache storage: quantized color -> material
    materials: HashMap<ColorKey, MaterialHandle>,
}

impl MaterialCache {
    /// Create a new empty material cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Material for `color`, creating it on first use
    pub fn get_material<B: SceneBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        color: ColorData,
    ) -> BackendResult<MaterialHandle> {
        let key = ColorKey::from_color(color);
        if let Some(&material) = self.materials.get(&key) {
            return Ok(material);
        }

        let material = backend.create_material(&MaterialDescriptor::new(key.color()))?;
        log::trace!("Created material for color {:?}", key.0);
        self.materials.insert(key, material);
        Ok(material)
    }

    /// Number of cached materials
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    /// Whether no material has been created yet
    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    /// Forget every cached material
    pub fn clear(&mut self) {
        self.materials.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::HeadlessBackend;

    #[test]
    fn test_same_color_shares_material() {
        let mut backend = HeadlessBackend::new();
        let mut cache = MaterialCache::new();

        let red = cache.get_material(&mut backend, ColorData::new(1.0, 0.0, 0.0, 1.0)).unwrap();
        let again = cache.get_material(&mut backend, ColorData::new(1.0, 0.0, 0.0, 1.0)).unwrap();
        let blue = cache.get_material(&mut backend, ColorData::new(0.0, 0.0, 1.0, 1.0)).unwrap();

        assert_eq!(red, again);
        assert_ne!(red, blue);
        assert_eq!(cache.len(), 2);
        assert_eq!(backend.material_count(), 2);
    }

    #[test]
    fn test_quantization() {
        assert_eq!(ColorKey::from_color(ColorData::new(0.5, 0.0, 1.0, 1.0)), ColorKey([128, 0, 255, 255]));
        assert_eq!(
            ColorKey::from_color(ColorData::new(0.2001, 0.0, 1.0, 1.0)),
            ColorKey::from_color(ColorData::new(0.1999, 0.0, 1.0, 1.0))
        );
        // 127.5 is the rounding boundary between 127 and 128
        assert_ne!(
            ColorKey::from_color(ColorData::new(0.5001, 0.0, 1.0, 1.0)),
            ColorKey::from_color(ColorData::new(0.4999, 0.0, 1.0, 1.0))
        );
        assert_eq!(ColorKey::from_color(ColorData::new(-1.0, 2.0, f32::NAN, 1.0)).0[..2], [0, 255]);
    }

    #[test]
    fn test_empty_cache() {
        let cache = MaterialCache::new();
        assert!(cache.is_empty());
        assert_eq!(cache.len(), 0);
    }
}
