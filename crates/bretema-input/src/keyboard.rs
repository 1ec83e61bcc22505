//! Keyboard state.

use hashbrown::HashMap;
use winit::keyboard::KeyCode;

use crate::button_state::ButtonState;

/// Per-key state, keyed by physical key code.
#[derive(Debug, Default, Clone)]
pub struct KeyboardState {
    keys: HashMap<KeyCode, ButtonState>,
}

impl KeyboardState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key transition. Returns `true` if the key state changed.
    pub fn set(&mut self, key: KeyCode, pressed: bool) -> bool {
        self.keys.entry(key).or_default().set(pressed)
    }

    #[must_use]
    pub fn state(&self, key: KeyCode) -> ButtonState {
        self.keys.get(&key).copied().unwrap_or_default()
    }

    #[must_use]
    pub fn is_pressed(&self, key: KeyCode) -> bool {
        self.state(key).is_pressed()
    }

    #[must_use]
    pub fn is_just_pressed(&self, key: KeyCode) -> bool {
        self.state(key).is_just_pressed()
    }

    #[must_use]
    pub fn is_just_released(&self, key: KeyCode) -> bool {
        self.state(key).is_just_released()
    }

    /// Release every held key. Returns `true` if any key was held.
    pub fn release_all(&mut self) -> bool {
        let mut changed = false;
        for state in self.keys.values_mut() {
            changed |= state.set(false);
        }
        changed
    }

    pub fn end_frame(&mut self) {
        self.keys.values_mut().for_each(ButtonState::end_frame);
        self.keys.retain(|_, state| *state != ButtonState::Released);
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_press_and_release() {
        let mut keyboard = KeyboardState::new();
        assert!(!keyboard.is_pressed(KeyCode::KeyW));

        assert!(keyboard.set(KeyCode::KeyW, true));
        assert!(keyboard.is_just_pressed(KeyCode::KeyW));
        assert!(!keyboard.set(KeyCode::KeyW, true));

        keyboard.end_frame();
        assert!(keyboard.is_pressed(KeyCode::KeyW));
        assert!(!keyboard.is_just_pressed(KeyCode::KeyW));

        assert!(keyboard.set(KeyCode::KeyW, false));
        assert!(keyboard.is_just_released(KeyCode::KeyW));

        keyboard.end_frame();
        assert!(!keyboard.is_pressed(KeyCode::KeyW));
        assert!(keyboard.keys.is_empty());
    }

    #[test]
    fn release_all_reports_change_once() {
        let mut keyboard = KeyboardState::new();
        keyboard.set(KeyCode::KeyA, true);
        keyboard.set(KeyCode::KeyD, true);

        assert!(keyboard.release_all());
        assert!(!keyboard.is_pressed(KeyCode::KeyA));
        assert!(!keyboard.release_all());
    }
}
