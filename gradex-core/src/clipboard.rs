//! Clipboard text form for copy/paste of gradients.
//!
//! A gradient travels through the system clipboard as `GradientExJSON:`
//! followed by its JSON serialization. The prefix is matched ignoring ASCII
//! case.

use crate::config::CLIPBOARD_TYPE_NAME;
use crate::error::{GradientError, Result};
use crate::model::Gradient;

/// Prefix identifying gradient clipboard payloads.
pub fn clipboard_prefix() -> String {
    format!("{}JSON:", CLIPBOARD_TYPE_NAME)
}

/// Encode a gradient as clipboard text.
pub fn encode(gradient: &Gradient) -> Result<String> {
    Ok(clipboard_prefix() + &serde_json::to_string(gradient)?)
}

/// Decode clipboard text produced by [`encode`].
pub fn decode(text: &str) -> Result<Gradient> {
    let prefix = clipboard_prefix();
    let has_prefix = text
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(&prefix));
    if !has_prefix {
        return Err(GradientError::MissingClipboardPrefix { prefix });
    }
    Ok(serde_json::from_str(&text[prefix.len()..])?)
}

/// Access to a text clipboard.
pub trait ClipboardBackend {
    /// Current clipboard text, if any.
    fn read(&self) -> Option<String>;

    /// Replace the clipboard text.
    fn write(&mut self, text: String);
}

/// In-process clipboard.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    contents: Option<String>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            contents: Some(text.into()),
        }
    }
}

impl ClipboardBackend for MemoryClipboard {
    fn read(&self) -> Option<String> {
        self.contents.clone()
    }

    fn write(&mut self, text: String) {
        self.contents = Some(text);
    }
}

/// Parsed view of the clipboard, recomputed only when its text changes.
#[derive(Debug, Default)]
pub struct ClipboardState {
    raw: Option<String>,
    /// `None` until the current text has been parsed.
    parsed: Option<Option<Gradient>>,
}

impl ClipboardState {
    pub fn new() -> Self {
        Self::default()
    }

    fn fetch(&mut self, backend: &dyn ClipboardBackend) {
        let current = backend.read();
        if current != self.raw {
            self.raw = current;
            self.parsed = None;
        }
    }

    fn parse(&mut self) -> Option<&Gradient> {
        let raw = &self.raw;
        self.parsed
            .get_or_insert_with(|| match raw.as_deref().map(decode) {
                Some(Ok(gradient)) => Some(gradient),
                Some(Err(e)) => {
                    tracing::debug!("Clipboard text is not a gradient: {}", e);
                    None
                }
                None => None,
            })
            .as_ref()
    }

    /// Whether the clipboard holds any non-empty text.
    pub fn has_text(&mut self, backend: &dyn ClipboardBackend) -> bool {
        self.fetch(backend);
        self.raw.as_deref().is_some_and(|s| !s.is_empty())
    }

    /// Whether the clipboard holds a decodable gradient.
    pub fn has_gradient(&mut self, backend: &dyn ClipboardBackend) -> bool {
        self.fetch(backend);
        self.parse().is_some()
    }

    /// The gradient on the clipboard, if any.
    pub fn gradient(&mut self, backend: &dyn ClipboardBackend) -> Option<Gradient> {
        self.fetch(backend);
        self.parse().cloned()
    }
}

/// Put a gradient on the clipboard.
pub fn copy(gradient: &Gradient, backend: &mut dyn ClipboardBackend) -> Result<()> {
    backend.write(encode(gradient)?);
    Ok(())
}

/// Overwrite `target` with the clipboard gradient. Returns false and leaves
/// `target` untouched when the clipboard holds no gradient.
pub fn paste(
    state: &mut ClipboardState,
    backend: &dyn ClipboardBackend,
    target: &mut Gradient,
) -> bool {
    match state.gradient(backend) {
        Some(gradient) => {
            gradient.copy_to(target);
            true
        }
        None => {
            tracing::warn!("Paste ignored: clipboard does not hold a gradient");
            false
        }
    }
}
