//! Application shell for the Bretema engine.
//!
//! [`App`] owns the window, one renderer, the cameras and the input
//! snapshot, and drives them from [`App::run_loop`]:
//!
//! ```no_run
//! use bretema_app::{init_logging, App, RenderApi};
//!
//! fn main() -> Result<(), bretema_app::AppError> {
//!     init_logging();
//!     let mut app = App::new("Viewer", RenderApi::Vulkan);
//!     app.run_loop()
//! }
//! ```

mod app;
mod config;
mod error;
mod logging;
mod timer;

pub use app::{App, WindowFactory};
pub use config::AppConfig;
pub use error::{AppError, Result};
pub use logging::init_logging;
pub use timer::{FrameTimer, FpsStats};

// Re-export commonly used types for convenience
pub use bretema_input::{InputEvent, UserInput};
pub use bretema_platform::{HeadlessStep, HeadlessWindow, Window, WindowConfig, WindowEvent};
pub use bretema_render::{Camera, RenderApi, Renderer};
