//! GPU error types.

use ash::vk;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GpuError {
    #[error("Vulkan error: {0}")]
    Vulkan(#[from] vk::Result),

    #[error("Failed to load Vulkan: {0}")]
    Loading(String),

    #[error("No suitable GPU found")]
    NoSuitableDevice,

    #[error("Surface creation failed: {0}")]
    SurfaceCreation(String),

    #[error("Swapchain creation failed: {0}")]
    SwapchainCreation(String),

    #[error("Invalid name: {0}")]
    InvalidName(String),
}

impl GpuError {
    /// Whether the device was lost; nothing on it can be recovered.
    #[must_use]
    pub const fn is_device_lost(&self) -> bool {
        matches!(self, Self::Vulkan(vk::Result::ERROR_DEVICE_LOST))
    }
}

pub type Result<T> = std::result::Result<T, GpuError>;
