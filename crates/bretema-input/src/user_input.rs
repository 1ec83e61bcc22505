//! Input snapshot handed to cameras and other receivers.

use glam::Vec2;
use winit::keyboard::KeyCode;

use crate::event::InputEvent;
use crate::keyboard::KeyboardState;
use crate::modifiers::Modifiers;
use crate::mouse::{MouseButton, MouseState};

/// Current keyboard and mouse state.
///
/// Every event that changes the state bumps [`UserInput::revision`], so a
/// receiver can tell two snapshots apart without comparing contents.
/// [`UserInput::event_motion`] carries the raw motion of the most recent
/// event only, so receivers that react per change never double count.
#[derive(Debug, Default, Clone)]
pub struct UserInput {
    keyboard: KeyboardState,
    mouse: MouseState,
    modifiers: Modifiers,
    event_motion: Vec2,
    revision: u64,
}

impl UserInput {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one event. Returns `true` if the snapshot changed.
    pub fn process(&mut self, event: &InputEvent) -> bool {
        self.event_motion = Vec2::ZERO;

        let changed = match *event {
            InputEvent::Key { code, pressed } => self.keyboard.set(code, pressed),
            InputEvent::Modifiers(modifiers) => {
                let changed = modifiers != self.modifiers;
                self.modifiers = modifiers;
                changed
            }
            InputEvent::CursorMoved(position) => self.mouse.set_position(position),
            InputEvent::MouseMotion(delta) => {
                self.event_motion = delta;
                self.mouse.add_motion(delta)
            }
            InputEvent::MouseButton { button, pressed } => self.mouse.set_button(button, pressed),
            InputEvent::Scroll(delta) => self.mouse.add_scroll(delta),
            InputEvent::FocusLost => {
                let keys = self.keyboard.release_all();
                let buttons = self.mouse.release_all();
                let modifiers = !self.modifiers.is_empty();
                self.modifiers = Modifiers::empty();
                keys || buttons || modifiers
            }
        };

        if changed {
            self.revision += 1;
        }
        changed
    }

    /// Monotonic counter of state changes.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    #[must_use]
    pub const fn keyboard(&self) -> &KeyboardState {
        &self.keyboard
    }

    #[must_use]
    pub const fn mouse(&self) -> &MouseState {
        &self.mouse
    }

    #[must_use]
    pub const fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    #[must_use]
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keyboard.is_pressed(key)
    }

    #[must_use]
    pub const fn is_mouse_pressed(&self, button: MouseButton) -> bool {
        self.mouse.is_pressed(button)
    }

    /// Raw motion carried by the latest processed event.
    #[must_use]
    pub const fn event_motion(&self) -> Vec2 {
        self.event_motion
    }

    /// Settle edge states and per-frame deltas. Call once per frame, after
    /// all receivers have seen the frame's input.
    pub fn end_frame(&mut self) {
        self.keyboard.end_frame();
        self.mouse.end_frame();
        self.event_motion = Vec2::ZERO;
    }

    /// Forget all state, revision included.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Something that reacts to input snapshots.
pub trait InputReceiver {
    fn on_input_change(&mut self, input: &UserInput);
}

/// Hand one snapshot to every receiver, in slice order.
pub fn dispatch_input<R: InputReceiver>(receivers: &mut [R], input: &UserInput) {
    tracing::trace!(
        revision = input.revision(),
        receivers = receivers.len(),
        "dispatching input"
    );
    for receiver in receivers {
        receiver.on_input_change(input);
    }
}
