//! Validation logic for gradients loaded from files or the clipboard.

use crate::config::float_cmp;
use crate::error::{GradientError, Result};
use crate::model::{Gradient, Keyframe};

/// Validation result with warnings.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Whether validation passed.
    pub passed: bool,
    /// Warning messages.
    pub warnings: Vec<String>,
    /// Error messages.
    pub errors: Vec<String>,
}

impl ValidationResult {
    /// Create a passing result.
    pub fn ok() -> Self {
        Self {
            passed: true,
            ..Default::default()
        }
    }

    /// Add a warning.
    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Add an error.
    pub fn add_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
        self.passed = false;
    }

    /// Merge another result into this one.
    pub fn merge(&mut self, other: ValidationResult) {
        self.warnings.extend(other.warnings);
        self.errors.extend(other.errors);
        if !other.passed {
            self.passed = false;
        }
    }
}

/// Validate several gradients, numbering messages from 1.
pub fn validate_gradients(gradients: &[Gradient]) -> ValidationResult {
    let mut result = ValidationResult::ok();
    for (idx, gradient) in gradients.iter().enumerate() {
        let mut single = validate_gradient(gradient);
        for msg in single.warnings.iter_mut().chain(single.errors.iter_mut()) {
            *msg = format!("Gradient {}: {}", idx + 1, msg);
        }
        result.merge(single);
    }
    result
}

/// Validate a single gradient.
pub fn validate_gradient(gradient: &Gradient) -> ValidationResult {
    let mut result = ValidationResult::ok();

    if gradient.color_key_count() == 0 {
        result.add_warning("No color keys; evaluates to white");
    }
    if gradient.alpha_key_count() == 0 {
        result.add_warning("No alpha keys");
    }

    for (idx, key) in gradient.color_key_slice().iter().enumerate() {
        if !key.color.is_finite() {
            result.add_error(format!(
                "Color key {}: non-finite color {}",
                idx + 1,
                key.color
            ));
        }
    }

    for (idx, key) in gradient.alpha_key_slice().iter().enumerate() {
        if !key.alpha.is_finite() {
            result.add_error(format!("Alpha key {}: non-finite alpha", idx + 1));
        } else if !float_cmp::in_range(key.alpha, 0.0, 1.0) {
            result.add_error(format!(
                "Alpha key {}: alpha {} is outside [0, 1]",
                idx + 1,
                key.alpha
            ));
        }
    }

    if let Some(time) = first_duplicate_time(gradient.color_key_slice()) {
        result.add_warning(format!("Several color keys share time {}", time));
    }
    if let Some(time) = first_duplicate_time(gradient.alpha_key_slice()) {
        result.add_warning(format!("Several alpha keys share time {}", time));
    }

    if gradient.is_hdr() {
        result.add_warning(format!(
            "HDR content: max color component {}",
            gradient.max_color_component()
        ));
    }

    result
}

/// First quantized time held by more than one key of a sorted list.
fn first_duplicate_time<K: Keyframe>(keys: &[K]) -> Option<u16> {
    keys.windows(2)
        .find(|w| w[0].time() == w[1].time())
        .map(|w| w[0].time())
}

/// Validate and turn any errors into a single `Err`.
pub fn quick_validate(gradient: &Gradient) -> Result<ValidationResult> {
    let result = validate_gradient(gradient);
    if !result.passed {
        return Err(GradientError::InvalidGradient {
            message: result.errors.join("; "),
        });
    }
    Ok(result)
}
