//! Test harness for the Bretema engine.
//!
//! Drives an [`App`](bretema_app::App) on the headless backend with a
//! scripted window, so run-loop behavior can be asserted without a display
//! or a GPU.

pub mod harness;

pub use harness::{create_test_camera, key_event, HeadlessHarness};

use bretema_app::AppError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TestError {
    #[error("App error: {0}")]
    App(#[from] AppError),
    #[error("App has no renderer yet")]
    NoRenderer,
    #[error("Renderer is not the headless backend")]
    WrongBackend,
}

pub type Result<T> = std::result::Result<T, TestError>;
