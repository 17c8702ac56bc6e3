//! Fixed-point key time encoding.
//!
//! Key times are stored as `u16` where 0 is the start of the gradient and
//! 65535 is the end. The forward mapping truncates, so stored data must go
//! through exactly these functions to round-trip.

use crate::config::QUANTIZED_MAX;

/// Clamp a normalized time to [0, 1]. `NaN` maps to 0.
#[inline]
pub fn clamp01(f: f32) -> f32 {
    if f.is_nan() {
        0.0
    } else {
        f.clamp(0.0, 1.0)
    }
}

/// Convert a normalized time to its quantized form.
///
/// The input is clamped to [0, 1] and the scaled product is truncated toward
/// zero. `NaN` maps to 0.
#[inline]
pub fn normalized_to_quantized(f: f32) -> u16 {
    (clamp01(f) * QUANTIZED_MAX as f32) as u16
}

/// Convert a quantized time back to [0, 1].
#[inline]
pub fn quantized_to_normalized(q: u16) -> f32 {
    q as f32 / QUANTIZED_MAX as f32
}

/// Blend fraction of `v` between two quantized key times.
///
/// Returns 0 when the keys coincide and exactly 1 when `v` sits on the upper
/// key, so segment endpoints reproduce the key values bit for bit.
#[inline]
pub fn lerp_fraction(from: u16, to: u16, v: u16) -> f32 {
    if from == to {
        return 0.0;
    }
    if to == v {
        return 1.0;
    }
    (v as f32 - from as f32) / (to as f32 - from as f32)
}
