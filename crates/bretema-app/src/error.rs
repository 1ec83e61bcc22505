//! App error types.

use bretema_platform::PlatformError;
use bretema_render::RenderError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("App is already initialized; call reset() first")]
    AlreadyInitialized,

    #[error("App is not initialized")]
    NotInitialized,

    #[error("Window error: {0}")]
    Window(#[from] PlatformError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),
}

pub type Result<T> = std::result::Result<T, AppError>;
