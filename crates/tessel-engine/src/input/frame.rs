use std::collections::HashSet;

use super::types::Key;

/// Key transitions collected between two frames.
///
/// `InputState` holds what is currently down; `InputFrame` holds the fresh
/// presses since the last [`clear`](Self::clear).
#[derive(Debug, Default)]
pub struct InputFrame {
    keys_pressed: HashSet<Key>,
}

impl InputFrame {
    pub fn clear(&mut self) {
        self.keys_pressed.clear();
    }

    pub(crate) fn record_press(&mut self, key: Key) {
        self.keys_pressed.insert(key);
    }

    /// True if `key` was freshly pressed (not held, not auto-repeated).
    pub fn was_pressed(&self, key: Key) -> bool {
        self.keys_pressed.contains(&key)
    }
}
