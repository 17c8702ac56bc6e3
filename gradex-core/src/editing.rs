//! Key editing operations used by interactive editors.
//!
//! Every operation rebuilds the affected key list and assigns it back through
//! the gradient's setters, so the sort invariant is maintained in one place.
//! Rebuilt color keys are always opaque; transparency belongs to alpha keys.
//! Selection lives in [`KeyEditor`], never in the gradient itself.

use serde::{Deserialize, Serialize};

use crate::color::Rgba;
use crate::model::{AlphaKey, ColorKey, Gradient, Keyframe};
use crate::quantize::{clamp01, normalized_to_quantized};

/// Which key list a key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyKind {
    Color,
    Alpha,
}

/// Reference to a key by list and index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyRef {
    pub kind: KeyKind,
    pub index: usize,
}

impl KeyRef {
    pub fn new(kind: KeyKind, index: usize) -> Self {
        Self { kind, index }
    }
}

/// Clamp `t` to [0, 1] and, with more than one step, snap it to the nearest
/// of `num_steps` evenly spaced positions.
pub fn snap_time(t: f32, num_steps: u32) -> f32 {
    let t = clamp01(t);
    if num_steps > 1 {
        let last = (num_steps - 1) as f32;
        let step = (t * last).round();
        return step / last;
    }
    t
}

/// Color keys rebuilt for editing, each forced opaque.
fn opaque_color_keys(gradient: &Gradient) -> Vec<ColorKey> {
    gradient
        .color_key_slice()
        .iter()
        .map(|key| ColorKey::new(key.color.with_alpha(1.0), key.time))
        .collect()
}

/// Index of the last key at `time`; the slot a freshly appended key sorts into.
fn last_index_at<K: Keyframe>(keys: &[K], time: u16) -> usize {
    keys.iter()
        .rposition(|k| k.time() == time)
        .unwrap_or(keys.len().saturating_sub(1))
}

/// Add a key at `t` whose value matches the gradient's current value there.
///
/// `t` is clamped to [0, 1]. Returns where the key landed after sorting.
pub fn add_key(gradient: &mut Gradient, kind: KeyKind, t: f32) -> KeyRef {
    let t = clamp01(t);
    let current = gradient.evaluate(t);
    let time = normalized_to_quantized(t);
    let index = match kind {
        KeyKind::Color => {
            let mut keys = opaque_color_keys(gradient);
            keys.push(ColorKey::new(current.with_alpha(1.0), time));
            gradient.set_color_keys(&keys);
            last_index_at(gradient.color_key_slice(), time)
        }
        KeyKind::Alpha => {
            let mut keys = gradient.alpha_keys();
            keys.push(AlphaKey::new(current.a, time));
            gradient.set_alpha_keys(&keys);
            last_index_at(gradient.alpha_key_slice(), time)
        }
    };
    KeyRef::new(kind, index)
}

/// Remove a key. The last remaining key of a list is never removed.
pub fn remove_key(gradient: &mut Gradient, key: KeyRef) -> bool {
    match key.kind {
        KeyKind::Color => {
            let mut keys = opaque_color_keys(gradient);
            if keys.len() <= 1 || key.index >= keys.len() {
                return false;
            }
            keys.remove(key.index);
            gradient.set_color_keys(&keys);
        }
        KeyKind::Alpha => {
            let mut keys = gradient.alpha_keys();
            if keys.len() <= 1 || key.index >= keys.len() {
                return false;
            }
            keys.remove(key.index);
            gradient.set_alpha_keys(&keys);
        }
    }
    true
}

/// Pull the key out, retime it and append it so it sorts after any keys
/// already at the new time.
fn retime<K: Keyframe>(keys: &mut Vec<K>, index: usize, time: u16) {
    let mut key = keys.remove(index);
    key.set_time(time);
    keys.push(key);
}

/// Move a key to normalized time `t`. Returns its index after sorting, or
/// `None` when the reference is out of range.
pub fn move_key(gradient: &mut Gradient, key: KeyRef, t: f32) -> Option<KeyRef> {
    let time = normalized_to_quantized(t);
    let index = match key.kind {
        KeyKind::Color => {
            let mut keys = opaque_color_keys(gradient);
            if key.index >= keys.len() {
                return None;
            }
            retime(&mut keys, key.index, time);
            gradient.set_color_keys(&keys);
            last_index_at(gradient.color_key_slice(), time)
        }
        KeyKind::Alpha => {
            let mut keys = gradient.alpha_keys();
            if key.index >= keys.len() {
                return None;
            }
            retime(&mut keys, key.index, time);
            gradient.set_alpha_keys(&keys);
            last_index_at(gradient.alpha_key_slice(), time)
        }
    };
    Some(KeyRef::new(key.kind, index))
}

/// Replace the color of a color key. The stored key is opaque.
pub fn set_key_color(gradient: &mut Gradient, index: usize, color: Rgba) -> bool {
    let mut keys = opaque_color_keys(gradient);
    match keys.get_mut(index) {
        Some(key) => key.color = color.with_alpha(1.0),
        None => return false,
    }
    gradient.set_color_keys(&keys);
    true
}

/// Replace the alpha of an alpha key. The value is clamped to [0, 1].
pub fn set_key_alpha(gradient: &mut Gradient, index: usize, alpha: f32) -> bool {
    let mut keys = gradient.alpha_keys();
    match keys.get_mut(index) {
        Some(key) => key.alpha = alpha.clamp(0.0, 1.0),
        None => return false,
    }
    gradient.set_alpha_keys(&keys);
    true
}

/// Drop keys that share a quantized time with the key before them.
///
/// The first key at a given time survives. Returns whether anything changed.
pub fn remove_duplicate_keys(gradient: &mut Gradient) -> bool {
    let mut color_keys = opaque_color_keys(gradient);
    let mut alpha_keys = gradient.alpha_keys();
    let before = (color_keys.len(), alpha_keys.len());

    color_keys.dedup_by_key(|k| k.time);
    alpha_keys.dedup_by_key(|k| k.time);

    if (color_keys.len(), alpha_keys.len()) == before {
        return false;
    }
    tracing::debug!(
        "Removed {} overlapping key(s)",
        before.0 + before.1 - color_keys.len() - alpha_keys.len()
    );
    gradient.set_keys(&color_keys, &alpha_keys);
    true
}

/// Editing session state: current selection and optional fixed stepping.
#[derive(Debug, Clone, Default)]
pub struct KeyEditor {
    selected: Option<KeyRef>,
    /// Snap positions when greater than 1.
    num_steps: u32,
}

impl KeyEditor {
    /// Start a session selecting the first color key, if any.
    pub fn new(gradient: &Gradient, num_steps: u32) -> Self {
        let selected = (gradient.color_key_count() > 0).then(|| KeyRef::new(KeyKind::Color, 0));
        Self {
            selected,
            num_steps,
        }
    }

    pub fn selected(&self) -> Option<KeyRef> {
        self.selected
    }

    pub fn select(&mut self, key: KeyRef) {
        self.selected = Some(key);
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Snap a normalized time according to the session's step count.
    pub fn snap(&self, t: f32) -> f32 {
        snap_time(t, self.num_steps)
    }

    /// Add a key at the snapped time and select it.
    pub fn add(&mut self, gradient: &mut Gradient, kind: KeyKind, t: f32) -> KeyRef {
        let key = add_key(gradient, kind, self.snap(t));
        self.selected = Some(key);
        key
    }

    /// Drag the selected key to the snapped time.
    pub fn drag_selected(&mut self, gradient: &mut Gradient, t: f32) -> Option<KeyRef> {
        let key = self.selected?;
        let moved = move_key(gradient, key, self.snap(t))?;
        self.selected = Some(moved);
        Some(moved)
    }

    /// Delete the selected key, keeping at least one key per list.
    pub fn delete_selected(&mut self, gradient: &mut Gradient) -> bool {
        let Some(key) = self.selected else {
            return false;
        };
        let removed = remove_key(gradient, key);
        if removed {
            self.selected = None;
        }
        removed
    }

    /// Finish a drag: remove overlapping keys and keep the selection on the
    /// surviving key at the selected time.
    pub fn finish_drag(&mut self, gradient: &mut Gradient) -> bool {
        let selected_time = self.selected.and_then(|key| match key.kind {
            KeyKind::Color => gradient.color_key_slice().get(key.index).map(|k| k.time),
            KeyKind::Alpha => gradient.alpha_key_slice().get(key.index).map(|k| k.time),
        });

        let changed = remove_duplicate_keys(gradient);

        if let (Some(key), Some(time)) = (self.selected, selected_time) {
            let index = match key.kind {
                KeyKind::Color => gradient.color_key_slice().iter().position(|k| k.time == time),
                KeyKind::Alpha => gradient.alpha_key_slice().iter().position(|k| k.time == time),
            };
            self.selected = index.map(|index| KeyRef::new(key.kind, index));
        }
        changed
    }

    /// Set the selected key's value from a picked color.
    ///
    /// Color keys take the RGB (opaque); alpha keys take the alpha channel.
    pub fn set_selected_value(&mut self, gradient: &mut Gradient, picked: Rgba) -> bool {
        match self.selected {
            Some(KeyRef {
                kind: KeyKind::Color,
                index,
            }) => set_key_color(gradient, index, picked),
            Some(KeyRef {
                kind: KeyKind::Alpha,
                index,
            }) => set_key_alpha(gradient, index, picked.a),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::GradientMode;
    use pretty_assertions::assert_eq;

    fn two_key_gradient() -> Gradient {
        Gradient::from_keys(
            &[ColorKey::new(Rgba::RED, 0), ColorKey::new(Rgba::BLUE, 65535)],
            &[AlphaKey::new(1.0, 0), AlphaKey::new(0.0, 65535)],
            GradientMode::Blend,
        )
    }

    fn translucent_gradient() -> Gradient {
        Gradient::from_keys(
            &[
                ColorKey::new(Rgba::new(1.0, 0.0, 0.0, 0.3), 0),
                ColorKey::new(Rgba::new(0.0, 0.0, 1.0, 0.6), 65535),
            ],
            &[],
            GradientMode::Blend,
        )
    }

    fn all_opaque(gradient: &Gradient) -> bool {
        gradient.color_key_slice().iter().all(|k| k.color.a == 1.0)
    }

    #[test]
    fn test_snap_time() {
        assert_eq!(snap_time(0.3, 0), 0.3);
        assert_eq!(snap_time(1.7, 0), 1.0);
        assert_eq!(snap_time(0.3, 5), 0.25);
        assert_eq!(snap_time(0.9, 5), 1.0);
        assert_eq!(snap_time(-1.0, 5), 0.0);
        assert_eq!(snap_time(0.6, 2), 1.0);
        assert_eq!(snap_time(f32::NAN, 5), 0.0);
    }

    #[test]
    fn test_add_color_key_takes_current_color() {
        let mut gradient = two_key_gradient();
        let key = add_key(&mut gradient, KeyKind::Color, 1.0);
        assert_eq!(key, KeyRef::new(KeyKind::Color, 2));
        assert_eq!(gradient.color_key_count(), 3);
        assert_eq!(gradient.color_keys()[2].color, Rgba::BLUE);
    }

    #[test]
    fn test_add_color_key_is_opaque() {
        let mut gradient = two_key_gradient();
        let key = add_key(&mut gradient, KeyKind::Color, 0.0);
        // Alpha at t=0 is 1, but even a translucent sample would be forced opaque.
        assert_eq!(gradient.color_keys()[key.index].color.a, 1.0);
        assert_eq!(key.index, 1);
    }

    #[test]
    fn test_add_key_clamps_time() {
        let mut gradient = two_key_gradient();
        let key = add_key(&mut gradient, KeyKind::Color, 1.8);
        assert_eq!(gradient.color_keys()[key.index].time, 65535);
        assert_eq!(gradient.color_keys()[key.index].color, Rgba::BLUE);

        let key = add_key(&mut gradient, KeyKind::Alpha, f32::NAN);
        assert_eq!(gradient.alpha_keys()[key.index].time, 0);
        assert_eq!(gradient.alpha_keys()[key.index].alpha, 1.0);
    }

    #[test]
    fn test_edits_rebuild_opaque_color_keys() {
        let mut gradient = translucent_gradient();
        add_key(&mut gradient, KeyKind::Alpha, 0.5);
        assert!(!all_opaque(&gradient));

        let mut added = translucent_gradient();
        add_key(&mut added, KeyKind::Color, 0.5);
        assert!(all_opaque(&added));

        let mut moved = translucent_gradient();
        move_key(&mut moved, KeyRef::new(KeyKind::Color, 0), 0.2).unwrap();
        assert!(all_opaque(&moved));

        let mut removed = translucent_gradient();
        assert!(remove_key(&mut removed, KeyRef::new(KeyKind::Color, 0)));
        assert_eq!(removed.color_keys()[0].color, Rgba::BLUE);

        let mut recolored = translucent_gradient();
        assert!(set_key_color(&mut recolored, 0, Rgba::new(0.0, 1.0, 0.0, 0.1)));
        assert_eq!(recolored.color_keys()[0].color, Rgba::GREEN);
        assert!(all_opaque(&recolored));

        let mut deduped = translucent_gradient();
        assert!(!remove_duplicate_keys(&mut deduped));
        assert!(!all_opaque(&deduped));
    }

    #[test]
    fn test_add_alpha_key_takes_current_alpha() {
        let mut gradient = Gradient::from_keys(
            &[],
            &[AlphaKey::new(1.0, 0), AlphaKey::new(0.0, 200)],
            GradientMode::Blend,
        );
        let t = crate::quantize::quantized_to_normalized(100);
        let key = add_key(&mut gradient, KeyKind::Alpha, t);
        assert_eq!(key.index, 1);
        let added = gradient.alpha_keys()[1];
        assert_eq!(added.time, normalized_to_quantized(t));
    }

    #[test]
    fn test_add_to_empty_gradient() {
        let mut gradient = Gradient::new();
        let key = add_key(&mut gradient, KeyKind::Color, 0.5);
        assert_eq!(key.index, 0);
        assert_eq!(gradient.color_keys()[0].color, Rgba::WHITE);
    }

    #[test]
    fn test_remove_key_keeps_last() {
        let mut gradient = two_key_gradient();
        assert!(remove_key(&mut gradient, KeyRef::new(KeyKind::Color, 0)));
        assert_eq!(gradient.color_keys()[0].color, Rgba::BLUE);
        assert!(!remove_key(&mut gradient, KeyRef::new(KeyKind::Color, 0)));
        assert_eq!(gradient.color_key_count(), 1);
    }

    #[test]
    fn test_remove_key_out_of_range() {
        let mut gradient = two_key_gradient();
        assert!(!remove_key(&mut gradient, KeyRef::new(KeyKind::Alpha, 5)));
        assert_eq!(gradient.alpha_key_count(), 2);
    }

    #[test]
    fn test_move_key_resorts() {
        let mut gradient = two_key_gradient();
        let moved = move_key(&mut gradient, KeyRef::new(KeyKind::Color, 0), 1.0).unwrap();
        assert_eq!(moved, KeyRef::new(KeyKind::Color, 1));
        let keys = gradient.color_keys();
        assert_eq!(keys[0].color, Rgba::BLUE);
        assert_eq!(keys[1].color, Rgba::RED);
        assert_eq!(keys[1].time, 65535);
    }

    #[test]
    fn test_move_key_out_of_range() {
        let mut gradient = two_key_gradient();
        assert_eq!(move_key(&mut gradient, KeyRef::new(KeyKind::Color, 9), 0.5), None);
    }

    #[test]
    fn test_set_key_values() {
        let mut gradient = two_key_gradient();
        assert!(set_key_color(&mut gradient, 1, Rgba::GREEN));
        assert_eq!(gradient.color_keys()[1].color, Rgba::GREEN);
        assert!(set_key_alpha(&mut gradient, 0, 3.0));
        assert_eq!(gradient.alpha_keys()[0].alpha, 1.0);
        assert!(!set_key_color(&mut gradient, 2, Rgba::GREEN));
    }

    #[test]
    fn test_remove_duplicate_keys_keeps_first() {
        let mut gradient = Gradient::from_keys(
            &[
                ColorKey::new(Rgba::RED, 10),
                ColorKey::new(Rgba::GREEN, 10),
                ColorKey::new(Rgba::BLUE, 20),
            ],
            &[AlphaKey::new(1.0, 0)],
            GradientMode::Blend,
        );
        assert!(remove_duplicate_keys(&mut gradient));
        assert_eq!(
            gradient.color_keys(),
            vec![ColorKey::new(Rgba::RED, 10), ColorKey::new(Rgba::BLUE, 20)]
        );
        assert!(!remove_duplicate_keys(&mut gradient));
    }

    #[test]
    fn test_editor_selects_first_color_key() {
        let gradient = two_key_gradient();
        let editor = KeyEditor::new(&gradient, 0);
        assert_eq!(editor.selected(), Some(KeyRef::new(KeyKind::Color, 0)));
        assert_eq!(KeyEditor::new(&Gradient::new(), 0).selected(), None);
    }

    #[test]
    fn test_editor_drag_and_finish_merges_overlap() {
        let mut gradient = Gradient::from_keys(
            &[
                ColorKey::new(Rgba::RED, 0),
                ColorKey::new(Rgba::GREEN, 32767),
                ColorKey::new(Rgba::BLUE, 65535),
            ],
            &[],
            GradientMode::Blend,
        );
        let mut editor = KeyEditor::new(&gradient, 0);
        editor.select(KeyRef::new(KeyKind::Color, 1));

        // Drag green on top of blue; both survive during the drag.
        let moved = editor.drag_selected(&mut gradient, 1.0).unwrap();
        assert_eq!(moved, KeyRef::new(KeyKind::Color, 2));
        assert_eq!(gradient.color_key_count(), 3);

        assert!(editor.finish_drag(&mut gradient));
        assert_eq!(gradient.color_key_count(), 2);
        assert_eq!(gradient.color_keys()[1].color, Rgba::BLUE);
        assert_eq!(editor.selected(), Some(KeyRef::new(KeyKind::Color, 1)));
    }

    #[test]
    fn test_editor_add_snaps_and_selects() {
        let mut gradient = two_key_gradient();
        let mut editor = KeyEditor::new(&gradient, 3);
        let key = editor.add(&mut gradient, KeyKind::Alpha, 0.4);
        assert_eq!(editor.selected(), Some(key));
        assert_eq!(gradient.alpha_keys()[key.index].time, 32767);
    }

    #[test]
    fn test_editor_delete_selected() {
        let mut gradient = two_key_gradient();
        let mut editor = KeyEditor::new(&gradient, 0);
        assert!(editor.delete_selected(&mut gradient));
        assert_eq!(editor.selected(), None);
        assert!(!editor.delete_selected(&mut gradient));
    }

    #[test]
    fn test_editor_set_selected_value() {
        let mut gradient = two_key_gradient();
        let mut editor = KeyEditor::new(&gradient, 0);
        assert!(editor.set_selected_value(&mut gradient, Rgba::new(0.0, 1.0, 0.0, 0.2)));
        assert_eq!(gradient.color_keys()[0].color, Rgba::GREEN);

        editor.select(KeyRef::new(KeyKind::Alpha, 1));
        assert!(editor.set_selected_value(&mut gradient, Rgba::new(0.0, 0.0, 0.0, 0.2)));
        assert_eq!(gradient.alpha_keys()[1].alpha, 0.2);
    }
}
