//! Data model for gradients and their keys.

mod gradient;
mod keys;

pub use gradient::{Gradient, GradientMode};
pub use keys::{is_sorted_by_time, sort_by_time, AlphaKey, ColorKey, Keyframe};
