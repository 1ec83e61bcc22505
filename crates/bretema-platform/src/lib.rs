//! Platform abstraction for the Bretema engine.
//!
//! The engine only needs three things from a window: its current size, a
//! non-blocking stream of events, and (for GPU backends) the raw handles to
//! build a surface from. [`Window`] captures exactly that; [`WinitWindow`] is
//! the desktop implementation and [`HeadlessWindow`] a scripted stand-in for
//! tests and off-screen runs.

mod headless;
mod window;
mod winit_window;

pub use headless::{HeadlessStep, HeadlessWindow};
pub use window::{RawHandles, Window, WindowEvent};
pub use winit_window::WinitWindow;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlatformError {
    #[error("Window creation failed: {0}")]
    WindowCreation(String),
    #[error("Event loop error: {0}")]
    EventLoop(String),
}

pub type Result<T> = std::result::Result<T, PlatformError>;

/// Window configuration.
#[derive(Debug, Clone)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub resizable: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Bretema".to_string(),
            width: 1280,
            height: 720,
            resizable: true,
        }
    }
}

impl WindowConfig {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub const fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    #[must_use]
    pub const fn with_resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }
}
