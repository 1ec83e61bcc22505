//! Vulkan plumbing for the Bretema engine.
//!
//! Thin wrappers over `ash` for the handful of objects a presenting renderer
//! needs: instance and device ([`GpuContext`]), a window surface
//! ([`SurfaceContext`]), its [`Swapchain`], a [`CommandPool`] and the
//! per-frame [`FrameSync`] primitives. Resource ownership and frame pacing
//! live in `bretema-render`.

pub mod command;
pub mod context;
pub mod error;
pub mod instance;
pub mod surface;
pub mod swapchain;
pub mod sync;

pub use command::CommandPool;
pub use context::{GpuContext, GpuContextBuilder};
pub use error::{GpuError, Result};
pub use surface::SurfaceContext;
pub use swapchain::{AcquiredImage, Swapchain};
pub use sync::{create_fence, create_semaphore, FrameSync};
