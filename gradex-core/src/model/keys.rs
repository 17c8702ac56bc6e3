//! Color and alpha keyframes.

use serde::{Deserialize, Serialize};

use crate::color::Rgba;
use crate::quantize::{normalized_to_quantized, quantized_to_normalized};

/// Anything positioned on the gradient by a quantized time.
pub trait Keyframe: Copy {
    /// Quantized position in [0, 65535].
    fn time(&self) -> u16;

    /// Move the key to a new quantized position.
    fn set_time(&mut self, time: u16);

    /// Position as a normalized value in [0, 1].
    fn normalized_time(&self) -> f32 {
        quantized_to_normalized(self.time())
    }

    /// Move the key to a normalized position (clamped, truncated).
    fn set_normalized_time(&mut self, t: f32) {
        self.set_time(normalized_to_quantized(t));
    }
}

/// A color anchored at a quantized time.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ColorKey {
    /// Key color; may carry HDR values above 1.
    pub color: Rgba,
    /// Quantized position.
    pub time: u16,
}

impl ColorKey {
    /// Create a key from a color and an already quantized time.
    pub const fn new(color: Rgba, time: u16) -> Self {
        Self { color, time }
    }

    /// Create a key at a normalized time.
    pub fn at(t: f32, color: Rgba) -> Self {
        Self::new(color, normalized_to_quantized(t))
    }
}

impl Keyframe for ColorKey {
    fn time(&self) -> u16 {
        self.time
    }

    fn set_time(&mut self, time: u16) {
        self.time = time;
    }
}

/// An opacity anchored at a quantized time.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AlphaKey {
    /// Opacity in [0, 1].
    pub alpha: f32,
    /// Quantized position.
    pub time: u16,
}

impl AlphaKey {
    /// Create a key from an alpha and an already quantized time.
    pub const fn new(alpha: f32, time: u16) -> Self {
        Self { alpha, time }
    }

    /// Create a key at a normalized time.
    pub fn at(t: f32, alpha: f32) -> Self {
        Self::new(alpha, normalized_to_quantized(t))
    }
}

impl Keyframe for AlphaKey {
    fn time(&self) -> u16 {
        self.time
    }

    fn set_time(&mut self, time: u16) {
        self.time = time;
    }
}

/// Sort keys ascending by quantized time, in place.
///
/// Adjacent-swap insertion sort: only strictly out-of-order neighbours are
/// swapped, so keys sharing a time keep their relative order.
pub fn sort_by_time<K: Keyframe>(keys: &mut [K]) {
    let mut i = 0;
    while i + 1 < keys.len() {
        if keys[i].time() > keys[i + 1].time() {
            keys.swap(i, i + 1);
            if i > 0 {
                i -= 1;
                continue;
            }
        }
        i += 1;
    }
}

/// Check that keys are non-decreasing by quantized time.
pub fn is_sorted_by_time<K: Keyframe>(keys: &[K]) -> bool {
    keys.windows(2).all(|w| w[0].time() <= w[1].time())
}
