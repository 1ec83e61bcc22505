//! Vulkan backend: clears each frame to the camera's clear color and presents.

use std::any::Any;
use std::rc::Rc;

use ash::vk;
use bretema_gpu::command::{record_clear, submit};
use bretema_gpu::{
    create_semaphore, CommandPool, FrameSync, GpuContext, GpuContextBuilder, GpuError, Swapchain,
    SurfaceContext,
};
use bretema_platform::Window;
use glam::UVec2;
use tracing::{debug, info, trace, warn};

use crate::api::{RenderApi, RendererConfig};
use crate::camera::Camera;
use crate::error::{RenderError, Result};
use crate::in_flight::{FrameStats, InFlightFrames};
use crate::renderer::{Renderer, RendererState, IN_FLIGHT};

type GpuResult<T> = bretema_gpu::Result<T>;

struct VulkanFrame {
    sync: FrameSync,
    command_buffer: vk::CommandBuffer,
}

/// Everything that lives on the device. Destroyed explicitly, in reverse
/// creation order, by [`Gpu::destroy`]; the context drops last.
struct Gpu {
    surface: SurfaceContext,
    pool: CommandPool,
    frames: InFlightFrames<VulkanFrame>,
    swapchain: Option<Swapchain>,
    /// One per swapchain image; an image is never presented twice at once.
    render_finished: Vec<vk::Semaphore>,
    /// Swapchain no longer matches the surface.
    stale: bool,
    context: GpuContext,
}

impl Gpu {
    /// # Safety
    /// `surface` must belong to `context`.
    unsafe fn new(
        context: GpuContext,
        surface: SurfaceContext,
        size: UVec2,
        vsync: bool,
    ) -> GpuResult<Self> {
        let device = context.device();
        let pool = match CommandPool::new(device, context.graphics_queue_family()) {
            Ok(pool) => pool,
            Err(e) => {
                surface.destroy();
                return Err(e);
            }
        };
        let slots = match create_frames(device, &pool) {
            Ok(slots) => slots,
            Err(e) => {
                pool.destroy(device);
                surface.destroy();
                return Err(e);
            }
        };

        let mut gpu = Self {
            surface,
            pool,
            frames: InFlightFrames::new(slots),
            swapchain: None,
            render_finished: Vec::new(),
            stale: true,
            context,
        };
        if let Err(e) = gpu.rebuild_swapchain(size, vsync) {
            gpu.destroy();
            return Err(e);
        }
        Ok(gpu)
    }

    /// Drain in-flight frames and build a swapchain for `size`.
    /// A zero-area size leaves no swapchain until the next rebuild.
    unsafe fn rebuild_swapchain(&mut self, size: UVec2, vsync: bool) -> GpuResult<()> {
        {
            let device = self.context.device();
            self.frames.retire_all(|frame, _| frame.sync.wait(device))?;
        }
        // The presentation engine may still hold the old images.
        self.context.wait_idle()?;

        self.destroy_render_finished();
        let device = self.context.device();

        if size.x == 0 || size.y == 0 {
            if let Some(old) = self.swapchain.take() {
                old.destroy(self.surface.swapchain_loader());
            }
            debug!("Surface has no area, swapchain released");
            return Ok(());
        }

        let swapchain = self.surface.create_swapchain(
            &self.context,
            size.x,
            size.y,
            vsync,
            self.swapchain.as_ref(),
        )?;
        if let Some(old) = self.swapchain.replace(swapchain) {
            old.destroy(self.surface.swapchain_loader());
        }

        let image_count = self.swapchain.as_ref().map_or(0, Swapchain::image_count);
        for _ in 0..image_count {
            self.render_finished.push(create_semaphore(device)?);
        }

        self.stale = false;
        debug!(
            "Swapchain rebuilt at {}x{} with {} images",
            size.x, size.y, image_count
        );
        Ok(())
    }

    /// Record, submit and present one cleared frame.
    ///
    /// Returns without submitting when there is no usable swapchain image.
    unsafe fn render_frame(&mut self, frame: u64, color: [f32; 4]) -> GpuResult<()> {
        let Some(swapchain) = self.swapchain.as_ref() else {
            return Ok(());
        };
        let device = self.context.device();
        let loader = self.surface.swapchain_loader();

        let slot = self.frames.acquire(|frame, _| frame.sync.wait(device))?;
        let resources = self.frames.resources(slot);

        let Some(image) = swapchain.acquire_next_image(loader, resources.sync.image_available)?
        else {
            trace!(frame, "swapchain out of date at acquire");
            self.stale = true;
            return Ok(());
        };
        if image.suboptimal {
            self.stale = true;
        }

        // Only reset once work is certain to be submitted.
        resources.sync.reset(device)?;
        record_clear(device, resources.command_buffer, image.image, color)?;

        let render_finished = self.render_finished[image.index as usize];
        submit(
            device,
            self.context.graphics_queue(),
            resources.command_buffer,
            resources.sync.image_available,
            vk::PipelineStageFlags::TRANSFER,
            render_finished,
            resources.sync.in_flight,
        )?;
        self.frames.mark_submitted(slot, frame);

        if swapchain.present(loader, self.context.graphics_queue(), image.index, render_finished)? {
            self.stale = true;
        }
        Ok(())
    }

    unsafe fn destroy_render_finished(&mut self) {
        let device = self.context.device();
        for semaphore in self.render_finished.drain(..) {
            device.destroy_semaphore(semaphore, None);
        }
    }

    /// Release everything except the context.
    unsafe fn destroy(mut self) {
        if let Err(e) = self.context.wait_idle() {
            warn!("Failed to wait idle before teardown: {e}");
        }
        self.destroy_render_finished();

        let device = self.context.device();
        if let Some(swapchain) = self.swapchain.take() {
            swapchain.destroy(self.surface.swapchain_loader());
        }
        for frame in self.frames.into_resources() {
            frame.sync.destroy(device);
        }
        self.pool.destroy(device);
        self.surface.destroy();
    }
}

unsafe fn create_frames(device: &ash::Device, pool: &CommandPool) -> GpuResult<Vec<VulkanFrame>> {
    #[allow(clippy::cast_possible_truncation)]
    let buffers = pool.allocate(device, IN_FLIGHT as u32)?;
    let mut frames = Vec::with_capacity(IN_FLIGHT);
    for command_buffer in buffers {
        match FrameSync::new(device) {
            Ok(sync) => frames.push(VulkanFrame {
                sync,
                command_buffer,
            }),
            Err(e) => {
                for frame in &frames {
                    frame.sync.destroy(device);
                }
                return Err(e);
            }
        }
    }
    Ok(frames)
}

fn init_error(e: GpuError) -> RenderError {
    RenderError::BackendInit(e.to_string())
}

/// Presents to a native window.
pub struct VulkanRenderer {
    state: RendererState,
    vsync: bool,
    gpu: Option<Gpu>,
    /// Stats frozen at cleanup.
    final_stats: FrameStats,
}

impl VulkanRenderer {
    pub fn new(window: &Rc<dyn Window>, config: &RendererConfig) -> Result<Self> {
        let mut state = RendererState::new(&Rc::downgrade(window))?;
        let handles = window
            .raw_handles()
            .ok_or_else(|| RenderError::BackendInit("window has no native handles".to_string()))?;

        let context = GpuContextBuilder::new(handles.display)
            .app_name(config.app_name.as_str())
            .validation(config.validation)
            .build()
            .map_err(init_error)?;
        let device_name = context.device_name().to_string();

        let gpu = unsafe {
            let surface =
                SurfaceContext::from_raw_handles(&context, handles.display, handles.window)
                    .map_err(init_error)?;
            Gpu::new(context, surface, state.size(), config.vsync).map_err(init_error)?
        };

        state.mark_initialized();
        info!("Vulkan renderer ready on {device_name}");

        Ok(Self {
            state,
            vsync: config.vsync,
            gpu: Some(gpu),
            final_stats: FrameStats::default(),
        })
    }
}

impl Renderer for VulkanRenderer {
    fn api(&self) -> RenderApi {
        RenderApi::Vulkan
    }

    fn state(&self) -> &RendererState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut RendererState {
        &mut self.state
    }

    fn update(&mut self) -> Result<()> {
        self.state.ensure_alive()?;
        let changed = self.state.sync_window_size()?;
        let Some(gpu) = self.gpu.as_mut() else {
            return Ok(());
        };
        if changed || (gpu.stale && gpu.swapchain.is_some()) {
            unsafe { gpu.rebuild_swapchain(self.state.size(), self.vsync)? };
        }
        Ok(())
    }

    fn draw(&mut self, camera: &Camera) -> Result<()> {
        self.state.ensure_drawable()?;
        let gpu = self.gpu.as_mut().ok_or(RenderError::CleanedUp)?;

        let frame = self.state.frame_number();
        unsafe { gpu.render_frame(frame, camera.clear_color.to_array())? };

        self.state.advance_frame();
        Ok(())
    }

    fn cleanup(&mut self) {
        if !self.state.begin_cleanup() {
            return;
        }
        if let Some(gpu) = self.gpu.take() {
            self.final_stats = gpu.frames.stats();
            unsafe { gpu.destroy() };
            info!(
                "Vulkan renderer cleaned up after {} frames",
                self.state.frame_number()
            );
        }
    }

    fn frame_stats(&self) -> FrameStats {
        self.gpu
            .as_ref()
            .map_or(self.final_stats, |gpu| gpu.frames.stats())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Drop for VulkanRenderer {
    fn drop(&mut self) {
        self.cleanup();
    }
}
