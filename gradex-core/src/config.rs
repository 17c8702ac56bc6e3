//! Configuration constants and settings for gradients and their previews.

use serde::{Deserialize, Serialize};

/// Largest quantized key time; maps to normalized time 1.0.
pub const QUANTIZED_MAX: u16 = u16::MAX;

/// Width in pixels of a preview strip.
pub const PREVIEW_WIDTH: u32 = 256;

/// Height in pixels of a preview strip.
pub const PREVIEW_HEIGHT: u32 = 2;

/// Preview cache is cleared once it holds more entries than this.
pub const PREVIEW_CACHE_LIMIT: usize = 50;

/// Type name written in front of clipboard payloads.
pub const CLIPBOARD_TYPE_NAME: &str = "GradientEx";

/// Any color component above this marks a gradient as HDR.
pub const HDR_THRESHOLD: f32 = 1.0;

/// Preview rasterization settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewConfig {
    /// Strip width in pixels (one gradient sample per column).
    pub width: u32,
    /// Strip height in pixels (each column repeated on every row).
    pub height: u32,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            width: PREVIEW_WIDTH,
            height: PREVIEW_HEIGHT,
        }
    }
}

impl PreviewConfig {
    /// Create a preview configuration with the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of pixels in a strip of this size.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Utility functions for floating-point comparisons.
pub mod float_cmp {
    /// Check if a is in range [min, max].
    #[inline]
    pub fn in_range(a: f32, min: f32, max: f32) -> bool {
        a >= min && a <= max
    }
}
