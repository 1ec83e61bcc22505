//! Instance, device and graphics queue.

use ash::vk;
use raw_window_handle::RawDisplayHandle;

use crate::error::{GpuError, Result};
use crate::instance::{create_instance, device_name, graphics_queue_family, select_physical_device};

/// Owns the Vulkan instance and logical device.
pub struct GpuContext {
    entry: ash::Entry,
    instance: ash::Instance,
    physical_device: vk::PhysicalDevice,
    device: ash::Device,
    graphics_queue_family: u32,
    graphics_queue: vk::Queue,
    device_name: String,
}

impl GpuContext {
    pub const fn entry(&self) -> &ash::Entry {
        &self.entry
    }

    pub const fn instance(&self) -> &ash::Instance {
        &self.instance
    }

    pub const fn physical_device(&self) -> vk::PhysicalDevice {
        self.physical_device
    }

    pub const fn device(&self) -> &ash::Device {
        &self.device
    }

    pub const fn graphics_queue(&self) -> vk::Queue {
        self.graphics_queue
    }

    pub const fn graphics_queue_family(&self) -> u32 {
        self.graphics_queue_family
    }

    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    pub fn wait_idle(&self) -> Result<()> {
        unsafe { self.device.device_wait_idle()? };
        Ok(())
    }
}

impl Drop for GpuContext {
    fn drop(&mut self) {
        unsafe {
            if let Err(e) = self.device.device_wait_idle() {
                tracing::warn!("device_wait_idle failed during teardown: {e}");
            }
            self.device.destroy_device(None);
            self.instance.destroy_instance(None);
        }
    }
}

/// Builder for [`GpuContext`].
pub struct GpuContextBuilder {
    app_name: String,
    enable_validation: bool,
    display: RawDisplayHandle,
}

impl GpuContextBuilder {
    /// The display decides which surface extensions the instance enables.
    pub fn new(display: RawDisplayHandle) -> Self {
        Self {
            app_name: "Bretema".to_string(),
            enable_validation: cfg!(debug_assertions),
            display,
        }
    }

    #[must_use]
    pub fn app_name(mut self, name: impl Into<String>) -> Self {
        self.app_name = name.into();
        self
    }

    #[must_use]
    pub const fn validation(mut self, enable: bool) -> Self {
        self.enable_validation = enable;
        self
    }

    pub fn build(self) -> Result<GpuContext> {
        let entry = unsafe { ash::Entry::load() }.map_err(|e| GpuError::Loading(e.to_string()))?;

        let instance = unsafe {
            create_instance(&entry, &self.app_name, self.display, self.enable_validation)
        }?;

        // The instance is not owned by anything yet.
        let device_parts = unsafe { create_device(&instance) };
        let (physical_device, device, graphics_queue_family) = match device_parts {
            Ok(parts) => parts,
            Err(e) => {
                unsafe { instance.destroy_instance(None) };
                return Err(e);
            }
        };

        let graphics_queue = unsafe { device.get_device_queue(graphics_queue_family, 0) };
        let device_name = unsafe { device_name(&instance, physical_device) };
        tracing::info!("Selected GPU: {device_name}");

        Ok(GpuContext {
            entry,
            instance,
            physical_device,
            device,
            graphics_queue_family,
            graphics_queue,
            device_name,
        })
    }
}

/// Select a physical device and create a logical device with one graphics
/// queue and the swapchain extension.
unsafe fn create_device(
    instance: &ash::Instance,
) -> Result<(vk::PhysicalDevice, ash::Device, u32)> {
    let physical_device = select_physical_device(instance)?;
    let queue_family =
        graphics_queue_family(instance, physical_device).ok_or(GpuError::NoSuitableDevice)?;

    let priorities = [1.0_f32];
    let queue_infos = [vk::DeviceQueueCreateInfo::default()
        .queue_family_index(queue_family)
        .queue_priorities(&priorities)];

    let extensions = [ash::khr::swapchain::NAME.as_ptr()];

    let create_info = vk::DeviceCreateInfo::default()
        .queue_create_infos(&queue_infos)
        .enabled_extension_names(&extensions);

    let device = instance.create_device(physical_device, &create_info, None)?;

    Ok((physical_device, device, queue_family))
}
