//! Platform-neutral input events.

use glam::Vec2;
use winit::event::{DeviceEvent, ElementState, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::modifiers::Modifiers;
use crate::mouse::MouseButton;

/// Pixels per scroll line when a device reports pixel deltas.
const PIXELS_PER_LINE: f32 = 100.0;

/// One input change reported by a window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Key { code: KeyCode, pressed: bool },
    Modifiers(Modifiers),
    /// Cursor position in window coordinates.
    CursorMoved(Vec2),
    /// Raw device motion, independent of the cursor.
    MouseMotion(Vec2),
    MouseButton { button: MouseButton, pressed: bool },
    /// Scroll in lines (x = horizontal, y = vertical).
    Scroll(Vec2),
    /// The window lost keyboard focus; held buttons are released.
    FocusLost,
}

impl InputEvent {
    /// Translate a winit window event, if it carries input.
    #[allow(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn from_window_event(event: &WindowEvent) -> Option<Self> {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                let PhysicalKey::Code(code) = event.physical_key else {
                    return None;
                };
                Some(Self::Key {
                    code,
                    pressed: event.state == ElementState::Pressed,
                })
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                Some(Self::Modifiers(Modifiers::from(modifiers.state())))
            }
            WindowEvent::CursorMoved { position, .. } => Some(Self::CursorMoved(Vec2::new(
                position.x as f32,
                position.y as f32,
            ))),
            WindowEvent::MouseInput { state, button, .. } => {
                MouseButton::from_winit(*button).map(|button| Self::MouseButton {
                    button,
                    pressed: *state == ElementState::Pressed,
                })
            }
            WindowEvent::MouseWheel { delta, .. } => Some(Self::Scroll(match delta {
                MouseScrollDelta::LineDelta(x, y) => Vec2::new(*x, *y),
                MouseScrollDelta::PixelDelta(pos) => {
                    Vec2::new(pos.x as f32, pos.y as f32) / PIXELS_PER_LINE
                }
            })),
            WindowEvent::Focused(false) => Some(Self::FocusLost),
            _ => None,
        }
    }

    /// Translate a winit device event, if it carries input.
    #[allow(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn from_device_event(event: &DeviceEvent) -> Option<Self> {
        match event {
            DeviceEvent::MouseMotion { delta } => {
                Some(Self::MouseMotion(Vec2::new(delta.0 as f32, delta.1 as f32)))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_motion() {
        let event = DeviceEvent::MouseMotion { delta: (3.0, -4.0) };
        assert_eq!(
            InputEvent::from_device_event(&event),
            Some(InputEvent::MouseMotion(Vec2::new(3.0, -4.0)))
        );
    }

    #[test]
    fn focus_loss_and_unrelated_events() {
        assert_eq!(
            InputEvent::from_window_event(&WindowEvent::Focused(false)),
            Some(InputEvent::FocusLost)
        );
        assert_eq!(
            InputEvent::from_window_event(&WindowEvent::Focused(true)),
            None
        );
        assert_eq!(
            InputEvent::from_window_event(&WindowEvent::CloseRequested),
            None
        );
    }
}
