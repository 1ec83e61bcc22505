//! Mouse state.

use glam::Vec2;
use winit::event::MouseButton as WinitMouseButton;

use crate::button_state::ButtonState;

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Back,
    Forward,
}

impl MouseButton {
    const COUNT: usize = 5;

    /// Map a winit button; `Other(_)` buttons are not tracked.
    #[must_use]
    pub const fn from_winit(button: WinitMouseButton) -> Option<Self> {
        match button {
            WinitMouseButton::Left => Some(Self::Left),
            WinitMouseButton::Right => Some(Self::Right),
            WinitMouseButton::Middle => Some(Self::Middle),
            WinitMouseButton::Back => Some(Self::Back),
            WinitMouseButton::Forward => Some(Self::Forward),
            WinitMouseButton::Other(_) => None,
        }
    }
}

/// Cursor position, per-frame deltas and button states.
#[derive(Debug, Default, Clone)]
pub struct MouseState {
    position: Vec2,
    /// Cursor movement accumulated this frame.
    cursor_delta: Vec2,
    /// Raw device motion accumulated this frame.
    motion: Vec2,
    scroll: Vec2,
    buttons: [ButtonState; MouseButton::COUNT],
}

impl MouseState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the cursor. Returns `true` if the position changed.
    pub fn set_position(&mut self, position: Vec2) -> bool {
        if position == self.position {
            return false;
        }
        self.cursor_delta += position - self.position;
        self.position = position;
        true
    }

    /// Accumulate raw device motion. Returns `true` for non-zero motion.
    pub fn add_motion(&mut self, delta: Vec2) -> bool {
        self.motion += delta;
        delta != Vec2::ZERO
    }

    /// Accumulate scroll in lines. Returns `true` for non-zero scroll.
    pub fn add_scroll(&mut self, delta: Vec2) -> bool {
        self.scroll += delta;
        delta != Vec2::ZERO
    }

    /// Record a button transition. Returns `true` if the button state changed.
    pub fn set_button(&mut self, button: MouseButton, pressed: bool) -> bool {
        self.buttons[button as usize].set(pressed)
    }

    /// Release every held button. Returns `true` if any button was held.
    pub fn release_all(&mut self) -> bool {
        let mut changed = false;
        for state in &mut self.buttons {
            changed |= state.set(false);
        }
        changed
    }

    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    #[must_use]
    pub const fn cursor_delta(&self) -> Vec2 {
        self.cursor_delta
    }

    #[must_use]
    pub const fn motion(&self) -> Vec2 {
        self.motion
    }

    #[must_use]
    pub const fn scroll(&self) -> Vec2 {
        self.scroll
    }

    #[must_use]
    pub const fn button(&self, button: MouseButton) -> ButtonState {
        self.buttons[button as usize]
    }

    #[must_use]
    pub const fn is_pressed(&self, button: MouseButton) -> bool {
        self.buttons[button as usize].is_pressed()
    }

    pub fn end_frame(&mut self) {
        self.buttons.iter_mut().for_each(ButtonState::end_frame);
        self.cursor_delta = Vec2::ZERO;
        self.motion = Vec2::ZERO;
        self.scroll = Vec2::ZERO;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_delta_accumulates_until_end_frame() {
        let mut mouse = MouseState::new();

        assert!(mouse.set_position(Vec2::new(100.0, 200.0)));
        assert!(mouse.set_position(Vec2::new(150.0, 220.0)));
        assert!(!mouse.set_position(Vec2::new(150.0, 220.0)));
        assert_eq!(mouse.cursor_delta(), Vec2::new(150.0, 220.0));

        mouse.end_frame();
        assert_eq!(mouse.cursor_delta(), Vec2::ZERO);
        assert_eq!(mouse.position(), Vec2::new(150.0, 220.0));
    }

    #[test]
    fn buttons() {
        let mut mouse = MouseState::new();

        assert!(mouse.set_button(MouseButton::Right, true));
        assert!(mouse.button(MouseButton::Right).is_just_pressed());
        assert!(!mouse.is_pressed(MouseButton::Left));

        mouse.end_frame();
        assert_eq!(mouse.button(MouseButton::Right), ButtonState::Pressed);

        assert!(mouse.release_all());
        assert!(!mouse.is_pressed(MouseButton::Right));
    }

    #[test]
    fn motion_and_scroll_reset_each_frame() {
        let mut mouse = MouseState::new();

        assert!(mouse.add_motion(Vec2::new(10.0, 20.0)));
        assert!(mouse.add_motion(Vec2::new(5.0, 5.0)));
        assert!(!mouse.add_motion(Vec2::ZERO));
        assert_eq!(mouse.motion(), Vec2::new(15.0, 25.0));

        assert!(mouse.add_scroll(Vec2::new(0.0, 1.0)));
        assert_eq!(mouse.scroll(), Vec2::Y);

        mouse.end_frame();
        assert_eq!(mouse.motion(), Vec2::ZERO);
        assert_eq!(mouse.scroll(), Vec2::ZERO);
    }

    #[test]
    fn other_buttons_are_ignored() {
        assert_eq!(MouseButton::from_winit(WinitMouseButton::Other(7)), None);
        assert_eq!(
            MouseButton::from_winit(WinitMouseButton::Middle),
            Some(MouseButton::Middle)
        );
    }
}
