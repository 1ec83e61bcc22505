//! The window collaborator contract.

use bretema_input::InputEvent;
use glam::UVec2;
use raw_window_handle::{RawDisplayHandle, RawWindowHandle};

/// Event surfaced by a window poll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WindowEvent {
    /// The user or the OS asked the window to close.
    CloseRequested,
    /// The drawable size changed. Renderers re-read [`Window::size`] on their
    /// own; this is informational.
    Resized(UVec2),
    Input(InputEvent),
}

/// Native handles for GPU surface creation.
#[derive(Debug, Clone, Copy)]
pub struct RawHandles {
    pub display: RawDisplayHandle,
    pub window: RawWindowHandle,
}

/// An OS surface the engine renders into.
///
/// Windows are shared through `Rc`: the app owns it, renderers keep a `Weak`
/// handle for size queries. All methods take `&self`.
pub trait Window {
    fn title(&self) -> &str;

    /// Current drawable size in physical pixels.
    fn size(&self) -> UVec2;

    /// Append pending events to `events`. Never blocks.
    fn poll_events(&self, events: &mut Vec<WindowEvent>);

    /// Handles for surface creation; `None` for windows without an OS surface.
    fn raw_handles(&self) -> Option<RawHandles> {
        None
    }
}
