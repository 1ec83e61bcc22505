//! Press/release state shared by keys and mouse buttons.

/// State of a key or mouse button within the current frame.
///
/// ```text
/// Released ─press()─> JustPressed ─end_frame()─> Pressed
///     ^                                             │
///     │                                          release()
///     │                                             v
///     └────────────end_frame()───────────── JustReleased
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonState {
    JustPressed,
    Pressed,
    JustReleased,
    #[default]
    Released,
}

impl ButtonState {
    #[inline]
    #[must_use]
    pub const fn is_pressed(self) -> bool {
        matches!(self, Self::JustPressed | Self::Pressed)
    }

    #[inline]
    #[must_use]
    pub const fn is_just_pressed(self) -> bool {
        matches!(self, Self::JustPressed)
    }

    #[inline]
    #[must_use]
    pub const fn is_just_released(self) -> bool {
        matches!(self, Self::JustReleased)
    }

    /// Apply a press or release. Returns `true` if the held state flipped;
    /// OS key repeat (press while held) is not a change.
    #[inline]
    pub fn set(&mut self, pressed: bool) -> bool {
        if pressed == self.is_pressed() {
            return false;
        }
        *self = if pressed {
            Self::JustPressed
        } else {
            Self::JustReleased
        };
        true
    }

    /// Settle the single-frame edge states.
    #[inline]
    pub fn end_frame(&mut self) {
        *self = match *self {
            Self::JustPressed => Self::Pressed,
            Self::JustReleased => Self::Released,
            held => held,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_hold_release_cycle() {
        let mut state = ButtonState::default();
        assert!(!state.is_pressed());

        assert!(state.set(true));
        assert!(state.is_just_pressed());

        state.end_frame();
        assert_eq!(state, ButtonState::Pressed);

        assert!(state.set(false));
        assert!(state.is_just_released());
        assert!(!state.is_pressed());

        state.end_frame();
        assert_eq!(state, ButtonState::Released);
    }

    #[test]
    fn repeats_are_not_changes() {
        let mut state = ButtonState::Pressed;
        assert!(!state.set(true));
        assert_eq!(state, ButtonState::Pressed);

        let mut state = ButtonState::Released;
        assert!(!state.set(false));
        assert_eq!(state, ButtonState::Released);
    }
}
