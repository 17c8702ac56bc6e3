//! Reading and writing gradient files.
//!
//! Files hold the gradient's JSON form. Clipboard text (the JSON behind the
//! `GradientExJSON:` prefix) is accepted on load as well.

use std::fs;
use std::path::Path;

use crate::clipboard;
use crate::error::{GradientError, Result};
use crate::model::Gradient;

/// Parse gradient text: plain JSON or clipboard text.
pub fn parse_gradient(text: &str) -> Result<Gradient> {
    let trimmed = text.trim();
    if trimmed.starts_with('{') {
        Ok(serde_json::from_str(trimmed)?)
    } else {
        clipboard::decode(trimmed)
    }
}

/// Load a gradient from a file.
pub fn load_gradient(path: &Path) -> Result<Gradient> {
    if !path.exists() {
        return Err(GradientError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Err(GradientError::EmptyFile {
            path: path.to_path_buf(),
        });
    }

    let gradient = parse_gradient(&content)?;
    tracing::debug!(
        "Loaded {} color key(s) and {} alpha key(s) from {}",
        gradient.color_key_count(),
        gradient.alpha_key_count(),
        path.display()
    );
    Ok(gradient)
}

/// Write a gradient to a file as pretty-printed JSON.
pub fn save_gradient(path: &Path, gradient: &Gradient) -> Result<()> {
    let json = serde_json::to_string_pretty(gradient)?;
    fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;
    use crate::model::{ColorKey, GradientMode};

    #[test]
    fn test_parse_plain_json() {
        let gradient = parse_gradient(r#" {"m_Mode":1} "#).unwrap();
        assert_eq!(gradient.mode(), GradientMode::Fixed);
    }

    #[test]
    fn test_parse_clipboard_text() {
        let source = Gradient::from_keys(&[ColorKey::new(Rgba::GREEN, 4)], &[], GradientMode::Blend);
        let text = clipboard::encode(&source).unwrap();
        assert_eq!(parse_gradient(&text).unwrap(), source);
    }

    #[test]
    fn test_parse_garbage() {
        assert!(parse_gradient("not a gradient").is_err());
    }
}
