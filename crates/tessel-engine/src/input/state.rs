use std::collections::HashSet;

use super::frame::InputFrame;
use super::types::{InputEvent, Key, KeyState};

/// Keys currently held in the window.
#[derive(Debug, Default)]
pub struct InputState {
    keys_down: HashSet<Key>,
}

impl InputState {
    /// Applies an event to the held-key set and records fresh presses in
    /// `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match ev {
            // Releases are not delivered while unfocused.
            InputEvent::Focused(false) => self.keys_down.clear(),
            InputEvent::Focused(true) => {}

            InputEvent::Key { key, state, repeat } => match state {
                KeyState::Pressed => {
                    if self.keys_down.insert(key) && !repeat {
                        frame.record_press(key);
                    }
                }
                KeyState::Released => {
                    self.keys_down.remove(&key);
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(key: Key, state: KeyState, repeat: bool) -> InputEvent {
        InputEvent::Key { key, state, repeat }
    }

    #[test]
    fn press_is_recorded_once() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, key(Key::Q, KeyState::Pressed, false));
        assert!(frame.was_pressed(Key::Q));
    }

    #[test]
    fn held_key_is_not_fresh_next_frame() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, key(Key::Q, KeyState::Pressed, false));
        frame.clear();

        state.apply_event(&mut frame, key(Key::Q, KeyState::Pressed, true));
        assert!(!frame.was_pressed(Key::Q));
    }

    #[test]
    fn repeat_without_prior_press_is_not_fresh() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        // Focus arrived while the key was already held.
        state.apply_event(&mut frame, key(Key::Q, KeyState::Pressed, true));
        assert!(!frame.was_pressed(Key::Q));
    }

    #[test]
    fn release_then_press_is_fresh_again() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, key(Key::Q, KeyState::Pressed, false));
        state.apply_event(&mut frame, key(Key::Q, KeyState::Released, false));
        frame.clear();

        state.apply_event(&mut frame, key(Key::Q, KeyState::Pressed, false));
        assert!(frame.was_pressed(Key::Q));
    }

    #[test]
    fn focus_loss_forgets_held_keys() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, key(Key::Q, KeyState::Pressed, false));
        state.apply_event(&mut frame, InputEvent::Focused(false));
        frame.clear();

        // The release was lost while unfocused; the next press counts.
        state.apply_event(&mut frame, key(Key::Q, KeyState::Pressed, false));
        assert!(frame.was_pressed(Key::Q));
    }

    #[test]
    fn other_keys_do_not_count_as_quit() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, key(Key::Other(7), KeyState::Pressed, false));
        assert!(!frame.was_pressed(Key::Q));
    }
}
