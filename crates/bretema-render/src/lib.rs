//! Renderer lifecycle and frame orchestration for the Bretema engine.
//!
//! Every backend implements [`Renderer`] on top of an embedded
//! [`RendererState`], which owns the bookkeeping shared by all of them:
//! lifecycle, frame counter, viewport size and resize detection. GPU frame
//! slots are recycled through [`InFlightFrames`], which bounds outstanding
//! submissions to [`IN_FLIGHT`].
//!
//! Backends are picked at runtime with [`RenderApi`]:
//! - [`VulkanRenderer`] presents to a native window through `bretema-gpu`.
//! - [`HeadlessRenderer`] simulates a device queue on a worker thread.

mod api;
mod camera;
mod error;
mod headless;
mod in_flight;
mod renderer;
mod vulkan;

pub use api::{RenderApi, RendererConfig};
pub use camera::Camera;
pub use error::{RenderError, Result};
pub use headless::{DrawRecord, HeadlessConfig, HeadlessRenderer};
pub use in_flight::{FrameStats, InFlightFrames};
pub use renderer::{Lifecycle, Renderer, RendererState, IN_FLIGHT};
pub use vulkan::VulkanRenderer;
