//! Swapchain creation, acquire and present.

use ash::vk;

use crate::error::{GpuError, Result};

/// Image handed out by [`Swapchain::acquire_next_image`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcquiredImage {
    pub index: u32,
    pub image: vk::Image,
    /// The swapchain still works but no longer matches the surface exactly.
    pub suboptimal: bool,
}

pub struct Swapchain {
    handle: vk::SwapchainKHR,
    images: Vec<vk::Image>,
    format: vk::Format,
    extent: vk::Extent2D,
}

impl Swapchain {
    /// # Safety
    /// All handles must be valid. `old` is retired, not destroyed.
    pub unsafe fn new(
        loader: &ash::khr::swapchain::Device,
        surface: vk::SurfaceKHR,
        capabilities: &vk::SurfaceCapabilitiesKHR,
        format: vk::SurfaceFormatKHR,
        present_mode: vk::PresentModeKHR,
        extent: vk::Extent2D,
        old: Option<vk::SwapchainKHR>,
    ) -> Result<Self> {
        // Frames are cleared with a transfer command.
        if !capabilities
            .supported_usage_flags
            .contains(vk::ImageUsageFlags::TRANSFER_DST)
        {
            return Err(GpuError::SwapchainCreation(
                "surface images do not support TRANSFER_DST".to_string(),
            ));
        }

        let mut image_count = capabilities.min_image_count + 1;
        if capabilities.max_image_count > 0 {
            image_count = image_count.min(capabilities.max_image_count);
        }

        let create_info = vk::SwapchainCreateInfoKHR::default()
            .surface(surface)
            .min_image_count(image_count)
            .image_format(format.format)
            .image_color_space(format.color_space)
            .image_extent(extent)
            .image_array_layers(1)
            .image_usage(vk::ImageUsageFlags::COLOR_ATTACHMENT | vk::ImageUsageFlags::TRANSFER_DST)
            .image_sharing_mode(vk::SharingMode::EXCLUSIVE)
            .pre_transform(capabilities.current_transform)
            .composite_alpha(vk::CompositeAlphaFlagsKHR::OPAQUE)
            .present_mode(present_mode)
            .clipped(true)
            .old_swapchain(old.unwrap_or_default());

        let handle = loader
            .create_swapchain(&create_info, None)
            .map_err(|e| GpuError::SwapchainCreation(e.to_string()))?;

        let images = match loader.get_swapchain_images(handle) {
            Ok(images) => images,
            Err(e) => {
                loader.destroy_swapchain(handle, None);
                return Err(e.into());
            }
        };

        Ok(Self {
            handle,
            images,
            format: format.format,
            extent,
        })
    }

    pub const fn handle(&self) -> vk::SwapchainKHR {
        self.handle
    }

    pub const fn extent(&self) -> vk::Extent2D {
        self.extent
    }

    pub const fn format(&self) -> vk::Format {
        self.format
    }

    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    /// Acquire the next image, signalling `semaphore` when it is ready.
    ///
    /// `Ok(None)` means the swapchain is out of date and nothing was acquired.
    ///
    /// # Safety
    /// All handles must be valid.
    pub unsafe fn acquire_next_image(
        &self,
        loader: &ash::khr::swapchain::Device,
        semaphore: vk::Semaphore,
    ) -> Result<Option<AcquiredImage>> {
        match loader.acquire_next_image(self.handle, u64::MAX, semaphore, vk::Fence::null()) {
            Ok((index, suboptimal)) => Ok(Some(AcquiredImage {
                index,
                image: self.images[index as usize],
                suboptimal,
            })),
            Err(vk::Result::ERROR_OUT_OF_DATE_KHR) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Present `index`. Returns `true` when the swapchain should be rebuilt.
    ///
    /// # Safety
    /// All handles must be valid.
    pub unsafe fn present(
        &self,
        loader: &ash::khr::swapchain::Device,
        queue: vk::Queue,
        index: u32,
        wait: vk::Semaphore,
    ) -> Result<bool> {
        let swapchains = [self.handle];
        let indices = [index];
        let waits = [wait];

        let present_info = vk::PresentInfoKHR::default()
            .wait_semaphores(&waits)
            .swapchains(&swapchains)
            .image_indices(&indices);

        match loader.queue_present(queue, &present_info) {
            Ok(suboptimal) => Ok(suboptimal),
            Err(vk::Result::ERROR_OUT_OF_DATE_KHR) => Ok(true),
            Err(e) => Err(e.into()),
        }
    }

    /// # Safety
    /// The swapchain must not be in use.
    pub unsafe fn destroy(&self, loader: &ash::khr::swapchain::Device) {
        loader.destroy_swapchain(self.handle, None);
    }
}

/// Prefer 8-bit sRGB, otherwise take what the surface lists first.
pub fn select_surface_format(available: &[vk::SurfaceFormatKHR]) -> Result<vk::SurfaceFormatKHR> {
    available
        .iter()
        .find(|f| {
            f.format == vk::Format::B8G8R8A8_SRGB
                && f.color_space == vk::ColorSpaceKHR::SRGB_NONLINEAR
        })
        .or_else(|| available.first())
        .copied()
        .ok_or_else(|| GpuError::SwapchainCreation("surface reports no formats".to_string()))
}

/// FIFO with vsync; otherwise mailbox, then immediate, then FIFO.
pub fn select_present_mode(available: &[vk::PresentModeKHR], vsync: bool) -> vk::PresentModeKHR {
    if vsync {
        return vk::PresentModeKHR::FIFO;
    }
    [vk::PresentModeKHR::MAILBOX, vk::PresentModeKHR::IMMEDIATE]
        .into_iter()
        .find(|mode| available.contains(mode))
        .unwrap_or(vk::PresentModeKHR::FIFO)
}

/// The surface's fixed extent, or the desired one clamped to its limits.
pub fn calculate_extent(
    capabilities: &vk::SurfaceCapabilitiesKHR,
    width: u32,
    height: u32,
) -> vk::Extent2D {
    if capabilities.current_extent.width != u32::MAX {
        return capabilities.current_extent;
    }
    vk::Extent2D {
        width: width.clamp(
            capabilities.min_image_extent.width,
            capabilities.max_image_extent.width,
        ),
        height: height.clamp(
            capabilities.min_image_extent.height,
            capabilities.max_image_extent.height,
        ),
    }
}
