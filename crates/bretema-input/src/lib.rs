//! Input handling for the Bretema engine.
//!
//! Windows translate their native events into [`InputEvent`]s, the app folds
//! them into a [`UserInput`] snapshot, and every event that changes the
//! snapshot is dispatched to the registered [`InputReceiver`]s (cameras).
//!
//! ```ignore
//! use bretema_input::{dispatch_input, InputEvent, UserInput};
//!
//! let mut input = UserInput::new();
//! for event in window_events {
//!     if input.process(&event) {
//!         dispatch_input(&mut cameras, &input);
//!     }
//! }
//! // once per frame, after rendering
//! input.end_frame();
//! ```

mod button_state;
mod event;
mod keyboard;
mod modifiers;
mod mouse;
mod user_input;

pub use button_state::ButtonState;
pub use event::InputEvent;
pub use keyboard::KeyboardState;
pub use modifiers::Modifiers;
pub use mouse::{MouseButton, MouseState};
pub use user_input::{dispatch_input, InputReceiver, UserInput};

// Re-export winit's key codes so callers don't need a direct winit dependency
pub use winit::keyboard::KeyCode;
