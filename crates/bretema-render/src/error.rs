//! Renderer error types.

use bretema_gpu::GpuError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Window is gone")]
    InvalidWindow,

    #[error("Backend initialization failed: {0}")]
    BackendInit(String),

    #[error("Renderer is not initialized")]
    NotInitialized,

    #[error("Renderer was cleaned up")]
    CleanedUp,

    #[error("Device lost")]
    DeviceLost,

    #[error("GPU error: {0}")]
    Gpu(#[source] GpuError),
}

impl From<GpuError> for RenderError {
    fn from(e: GpuError) -> Self {
        if e.is_device_lost() {
            Self::DeviceLost
        } else {
            Self::Gpu(e)
        }
    }
}

pub type Result<T> = std::result::Result<T, RenderError>;
