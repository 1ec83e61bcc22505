//! Window surface and swapchain loader.

use ash::vk;
use raw_window_handle::{RawDisplayHandle, RawWindowHandle};

use crate::context::GpuContext;
use crate::error::{GpuError, Result};
use crate::swapchain::{calculate_extent, select_present_mode, select_surface_format, Swapchain};

/// A presentable surface plus the extension loaders that talk to it.
pub struct SurfaceContext {
    surface: vk::SurfaceKHR,
    surface_loader: ash::khr::surface::Instance,
    swapchain_loader: ash::khr::swapchain::Device,
}

impl SurfaceContext {
    /// Create a surface for a native window.
    ///
    /// Fails if the context's graphics queue cannot present to it.
    ///
    /// # Safety
    /// The handles must stay valid until [`SurfaceContext::destroy`].
    pub unsafe fn from_raw_handles(
        gpu: &GpuContext,
        display: RawDisplayHandle,
        window: RawWindowHandle,
    ) -> Result<Self> {
        let surface = ash_window::create_surface(gpu.entry(), gpu.instance(), display, window, None)
            .map_err(|e| GpuError::SurfaceCreation(e.to_string()))?;

        let surface_loader = ash::khr::surface::Instance::new(gpu.entry(), gpu.instance());

        let supported = surface_loader
            .get_physical_device_surface_support(
                gpu.physical_device(),
                gpu.graphics_queue_family(),
                surface,
            )
            .unwrap_or(false);
        if !supported {
            surface_loader.destroy_surface(surface, None);
            return Err(GpuError::SurfaceCreation(
                "graphics queue cannot present to this surface".to_string(),
            ));
        }

        let swapchain_loader = ash::khr::swapchain::Device::new(gpu.instance(), gpu.device());

        Ok(Self {
            surface,
            surface_loader,
            swapchain_loader,
        })
    }

    pub const fn swapchain_loader(&self) -> &ash::khr::swapchain::Device {
        &self.swapchain_loader
    }

    /// Build a swapchain sized as close to `width`x`height` as the surface allows.
    ///
    /// # Safety
    /// `old` must not be in use by the device; it is retired by this call.
    pub unsafe fn create_swapchain(
        &self,
        gpu: &GpuContext,
        width: u32,
        height: u32,
        vsync: bool,
        old: Option<&Swapchain>,
    ) -> Result<Swapchain> {
        let physical = gpu.physical_device();
        let capabilities = self
            .surface_loader
            .get_physical_device_surface_capabilities(physical, self.surface)?;
        let formats = self
            .surface_loader
            .get_physical_device_surface_formats(physical, self.surface)?;
        let present_modes = self
            .surface_loader
            .get_physical_device_surface_present_modes(physical, self.surface)?;

        let format = select_surface_format(&formats)?;
        let present_mode = select_present_mode(&present_modes, vsync);
        let extent = calculate_extent(&capabilities, width, height);

        tracing::debug!(
            "Creating swapchain {}x{} ({:?}, {:?})",
            extent.width,
            extent.height,
            format.format,
            present_mode
        );

        Swapchain::new(
            &self.swapchain_loader,
            self.surface,
            &capabilities,
            format,
            present_mode,
            extent,
            old.map(Swapchain::handle),
        )
    }

    /// # Safety
    /// Every swapchain built from this surface must already be destroyed.
    pub unsafe fn destroy(&self) {
        self.surface_loader.destroy_surface(self.surface, None);
    }
}
