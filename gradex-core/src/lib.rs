//! gradex-core - Core library for quantized multi-key color/alpha gradients.
//!
//! A [`Gradient`] holds two independently sorted key lists (color and alpha),
//! each key positioned by a 16-bit quantized time, plus a blend mode. The
//! crate also carries the host-independent parts of a gradient editor:
//! key editing, clipboard text, and preview rasterization with caching.
//!
//! # Example
//!
//! ```
//! use gradex_core::{ColorKey, Gradient, GradientMode, Rgba};
//!
//! let gradient = Gradient::from_keys(
//!     &[ColorKey::at(1.0, Rgba::BLUE), ColorKey::at(0.0, Rgba::RED)],
//!     &[],
//!     GradientMode::Blend,
//! );
//! assert_eq!(gradient.evaluate(0.0), Rgba::RED);
//! assert_eq!(gradient.evaluate(1.0), Rgba::BLUE);
//! ```

pub mod clipboard;
pub mod color;
pub mod config;
pub mod editing;
pub mod error;
pub mod io;
pub mod model;
pub mod preview;
pub mod quantize;
pub mod validation;

// Re-exports for convenience
pub use color::Rgba;
pub use config::PreviewConfig;
pub use editing::{KeyEditor, KeyKind, KeyRef};
pub use error::{GradientError, Result};
pub use io::{load_gradient, save_gradient};
pub use model::{AlphaKey, ColorKey, Gradient, GradientMode, Keyframe};
pub use preview::{rasterize, PreviewCache, PreviewKey, PreviewStrip};
pub use quantize::{clamp01, normalized_to_quantized, quantized_to_normalized};
pub use validation::{validate_gradient, ValidationResult};

/// Load a gradient file and sample it at `steps` evenly spaced times.
///
/// Samples run from 0 to 1 inclusive; a single step samples t = 0. Validation
/// warnings are logged.
pub fn sample_gradient_file(path: &std::path::Path, steps: usize) -> Result<Vec<(f32, Rgba)>> {
    let gradient = load_gradient(path)?;

    let validation = validate_gradient(&gradient);
    for warning in &validation.warnings {
        tracing::warn!("{}", warning);
    }

    Ok(sample_evenly(&gradient, steps))
}

/// Sample a gradient at `steps` evenly spaced times from 0 to 1 inclusive.
pub fn sample_evenly(gradient: &Gradient, steps: usize) -> Vec<(f32, Rgba)> {
    let last = steps.saturating_sub(1).max(1) as f32;
    (0..steps)
        .map(|i| {
            let t = i as f32 / last;
            (t, gradient.evaluate(t))
        })
        .collect()
}
