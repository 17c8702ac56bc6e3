//! Gradient definition: two independently sorted key lists and a blend mode.

use serde::{Deserialize, Serialize};

use super::keys::{sort_by_time, AlphaKey, ColorKey, Keyframe};
use crate::color::{lerp, Rgba};
use crate::config::HDR_THRESHOLD;
use crate::error::{GradientError, Result};
use crate::quantize::{lerp_fraction, normalized_to_quantized};

/// How keys are combined when the gradient is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum GradientMode {
    /// Keys blend linearly into each other.
    #[default]
    Blend = 0,
    /// The key at or after the evaluated time is returned unmodified.
    Fixed = 1,
}

impl From<GradientMode> for u8 {
    fn from(mode: GradientMode) -> Self {
        mode as u8
    }
}

impl TryFrom<u8> for GradientMode {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            0 => Ok(GradientMode::Blend),
            1 => Ok(GradientMode::Fixed),
            other => Err(format!("unknown gradient mode {}", other)),
        }
    }
}

impl std::fmt::Display for GradientMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GradientMode::Blend => write!(f, "blend"),
            GradientMode::Fixed => write!(f, "fixed"),
        }
    }
}

/// Multi-key color/alpha gradient.
///
/// Both key lists are kept sorted by quantized time. Keys sharing a time are
/// allowed; removing them is up to the editing layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "GradientRepr")]
pub struct Gradient {
    #[serde(rename = "m_ColorKeys")]
    color_keys: Vec<ColorKey>,
    #[serde(rename = "m_AlphaKeys")]
    alpha_keys: Vec<AlphaKey>,
    #[serde(rename = "m_Mode")]
    mode: GradientMode,
}

/// Persisted layout. Absent or `null` key lists read as empty.
#[derive(Deserialize)]
struct GradientRepr {
    #[serde(rename = "m_ColorKeys", default)]
    color_keys: Option<Vec<ColorKey>>,
    #[serde(rename = "m_AlphaKeys", default)]
    alpha_keys: Option<Vec<AlphaKey>>,
    #[serde(rename = "m_Mode", default)]
    mode: GradientMode,
}

impl From<GradientRepr> for Gradient {
    fn from(repr: GradientRepr) -> Self {
        let mut gradient = Gradient::with_mode(repr.mode);
        gradient.set_keys(
            repr.color_keys.as_deref().unwrap_or_default(),
            repr.alpha_keys.as_deref().unwrap_or_default(),
        );
        gradient
    }
}

/// Where a query time falls within a key list.
enum Segment<'a, K> {
    Empty,
    Single(&'a K),
    Span {
        lower: &'a K,
        upper: &'a K,
        /// Query time clamped to the key range.
        time: u16,
    },
}

/// Find the segment governing `time`.
///
/// The time is clamped to the first/last key, then the first key at index
/// 1 or above with `key.time >= time` is the upper end of the segment.
fn locate<K: Keyframe>(keys: &[K], time: u16) -> Segment<'_, K> {
    match keys {
        [] => Segment::Empty,
        [only] => Segment::Single(only),
        [first, .., last] => {
            let time = time.max(first.time()).min(last.time());
            let upper = keys[1..]
                .iter()
                .position(|k| time <= k.time())
                .map_or(keys.len() - 1, |p| p + 1);
            Segment::Span {
                lower: &keys[upper - 1],
                upper: &keys[upper],
                time,
            }
        }
    }
}

impl Gradient {
    /// Create an empty gradient in blend mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty gradient with the given mode.
    pub fn with_mode(mode: GradientMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    /// Create a gradient from key lists. Keys are sorted.
    pub fn from_keys(color_keys: &[ColorKey], alpha_keys: &[AlphaKey], mode: GradientMode) -> Self {
        let mut gradient = Self::with_mode(mode);
        gradient.set_keys(color_keys, alpha_keys);
        gradient
    }

    pub fn mode(&self) -> GradientMode {
        self.mode
    }

    /// Change the blend mode. Keys are left as they are.
    pub fn set_mode(&mut self, mode: GradientMode) {
        self.mode = mode;
    }

    pub fn color_key_count(&self) -> usize {
        self.color_keys.len()
    }

    pub fn alpha_key_count(&self) -> usize {
        self.alpha_keys.len()
    }

    /// Copy of the color keys, sorted by time.
    pub fn color_keys(&self) -> Vec<ColorKey> {
        self.color_keys.clone()
    }

    /// Copy of the alpha keys, sorted by time.
    pub fn alpha_keys(&self) -> Vec<AlphaKey> {
        self.alpha_keys.clone()
    }

    /// Borrowed view of the color keys.
    pub fn color_key_slice(&self) -> &[ColorKey] {
        &self.color_keys
    }

    /// Borrowed view of the alpha keys.
    pub fn alpha_key_slice(&self) -> &[AlphaKey] {
        &self.alpha_keys
    }

    /// Replace the color keys and sort them by time. Duplicates are kept.
    pub fn set_color_keys(&mut self, keys: &[ColorKey]) {
        self.color_keys.clear();
        self.color_keys.extend_from_slice(keys);
        sort_by_time(&mut self.color_keys);
    }

    /// Replace the alpha keys and sort them by time. Duplicates are kept.
    pub fn set_alpha_keys(&mut self, keys: &[AlphaKey]) {
        self.alpha_keys.clear();
        self.alpha_keys.extend_from_slice(keys);
        sort_by_time(&mut self.alpha_keys);
    }

    /// Replace both key lists.
    pub fn set_keys(&mut self, color_keys: &[ColorKey], alpha_keys: &[AlphaKey]) {
        self.set_color_keys(color_keys);
        self.set_alpha_keys(alpha_keys);
    }

    /// Overwrite `other` with this gradient's keys and mode.
    pub fn copy_to(&self, other: &mut Gradient) {
        other.color_keys.clone_from(&self.color_keys);
        other.alpha_keys.clone_from(&self.alpha_keys);
        other.mode = self.mode;
    }

    /// Evaluate at a normalized time.
    ///
    /// `t` must lie in [0, 1]: debug builds assert it, release builds clamp.
    /// Use [`Gradient::try_evaluate`] for unchecked input.
    pub fn evaluate(&self, t: f32) -> Rgba {
        debug_assert!(
            (0.0..=1.0).contains(&t),
            "gradient time {} outside [0, 1]",
            t
        );
        self.evaluate_quantized(normalized_to_quantized(t))
    }

    /// Evaluate at a normalized time, rejecting anything outside [0, 1].
    pub fn try_evaluate(&self, t: f32) -> Result<Rgba> {
        if !(0.0..=1.0).contains(&t) {
            return Err(GradientError::TimeOutOfRange { time: t });
        }
        Ok(self.evaluate(t))
    }

    /// Evaluate at a quantized time.
    ///
    /// RGB comes from the color keys (white when there are none) and alpha
    /// from the alpha keys. Without alpha keys the alpha of the color result
    /// is kept.
    pub fn evaluate_quantized(&self, time: u16) -> Rgba {
        let mut color = self.evaluate_color_keys(time);
        if let Some(alpha) = self.evaluate_alpha_keys(time) {
            color.a = alpha;
        }
        color
    }

    fn evaluate_color_keys(&self, time: u16) -> Rgba {
        match locate(&self.color_keys, time) {
            Segment::Empty => Rgba::WHITE,
            Segment::Single(key) => key.color,
            Segment::Span { lower, upper, time } => match self.mode {
                GradientMode::Blend => Rgba::lerp_unclamped(
                    lower.color,
                    upper.color,
                    lerp_fraction(lower.time, upper.time, time),
                ),
                GradientMode::Fixed => fixed_key(lower, upper, time).color,
            },
        }
    }

    fn evaluate_alpha_keys(&self, time: u16) -> Option<f32> {
        match locate(&self.alpha_keys, time) {
            Segment::Empty => None,
            Segment::Single(key) => Some(key.alpha),
            Segment::Span { lower, upper, time } => Some(match self.mode {
                GradientMode::Blend => lerp(
                    lower.alpha,
                    upper.alpha,
                    lerp_fraction(lower.time, upper.time, time),
                ),
                GradientMode::Fixed => fixed_key(lower, upper, time).alpha,
            }),
        }
    }

    /// Color at the start of the gradient.
    pub fn constant_color(&self) -> Rgba {
        self.evaluate(0.0)
    }

    /// Largest component over all color keys; 0 when there are none.
    pub fn max_color_component(&self) -> f32 {
        self.color_keys
            .iter()
            .fold(0.0, |acc, key| acc.max(key.color.max_component()))
    }

    /// Whether any color key carries components above 1.
    pub fn is_hdr(&self) -> bool {
        self.max_color_component() > HDR_THRESHOLD
    }
}

/// Key returned in fixed mode: the first key at or after `time`.
///
/// `lower` only qualifies when the query lands exactly on the first key.
fn fixed_key<'a, K: Keyframe>(lower: &'a K, upper: &'a K, time: u16) -> &'a K {
    if lower.time() >= time {
        lower
    } else {
        upper
    }
}
