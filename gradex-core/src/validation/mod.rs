//! Gradient validation.

mod validate;

pub use validate::{quick_validate, validate_gradient, validate_gradients, ValidationResult};
