//! Preview strips and their cache.
//!
//! A preview is a small RGBA8 strip sampled once per column. The cache is
//! keyed by the owner's identity plus a version number the editing layer
//! bumps whenever it changes the gradient.

use std::collections::HashMap;

use crate::config::{PreviewConfig, PREVIEW_CACHE_LIMIT};
use crate::model::Gradient;

/// Rasterized gradient, row-major RGBA8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewStrip {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<[u8; 4]>,
}

impl PreviewStrip {
    /// Pixel at column `x`, row `y`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get((y * self.width + x) as usize).copied()
    }

    /// Flattened bytes, four per pixel.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flatten().copied().collect()
    }
}

/// Sample `gradient` at `x / width` for each column and repeat the column on
/// every row.
pub fn rasterize(gradient: &Gradient, config: PreviewConfig) -> PreviewStrip {
    let row: Vec<[u8; 4]> = (0..config.width)
        .map(|x| gradient.evaluate(x as f32 / config.width as f32).to_rgba8())
        .collect();

    let mut pixels = Vec::with_capacity(config.pixel_count());
    for _ in 0..config.height {
        pixels.extend_from_slice(&row);
    }

    PreviewStrip {
        width: config.width,
        height: config.height,
        pixels,
    }
}

/// Identity of a previewed gradient: owning object plus property path.
///
/// Free-standing gradients use an empty property.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PreviewKey {
    pub target: u64,
    pub property: String,
}

impl PreviewKey {
    pub fn new(target: u64, property: impl Into<String>) -> Self {
        Self {
            target,
            property: property.into(),
        }
    }

    /// Key for a gradient that is not owned by a property.
    pub fn standalone(target: u64) -> Self {
        Self::new(target, String::new())
    }
}

#[derive(Debug)]
struct CacheEntry {
    version: u64,
    strip: PreviewStrip,
}

/// Cache of preview strips.
#[derive(Debug, Default)]
pub struct PreviewCache {
    config: PreviewConfig,
    entries: HashMap<PreviewKey, CacheEntry>,
}

impl PreviewCache {
    pub fn new(config: PreviewConfig) -> Self {
        Self {
            config,
            entries: HashMap::new(),
        }
    }

    pub fn config(&self) -> PreviewConfig {
        self.config
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cached strip for `key` at `version`, if one exists.
    pub fn get(&self, key: &PreviewKey, version: u64) -> Option<&PreviewStrip> {
        self.entries
            .get(key)
            .filter(|entry| entry.version == version)
            .map(|entry| &entry.strip)
    }

    /// Return the cached strip, rasterizing when missing or stale.
    pub fn get_or_insert(
        &mut self,
        key: PreviewKey,
        version: u64,
        gradient: &Gradient,
    ) -> &PreviewStrip {
        let fresh = self
            .entries
            .get(&key)
            .is_some_and(|entry| entry.version == version);

        if !fresh {
            if !self.entries.contains_key(&key) && self.entries.len() > PREVIEW_CACHE_LIMIT {
                tracing::debug!(
                    "Preview cache holds {} entries, clearing",
                    self.entries.len()
                );
                self.entries.clear();
            }
            let strip = rasterize(gradient, self.config);
            self.entries.insert(key.clone(), CacheEntry { version, strip });
        }

        &self.entries[&key].strip
    }

    /// Drop the strip for one gradient.
    pub fn invalidate(&mut self, key: &PreviewKey) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Drop every strip.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
