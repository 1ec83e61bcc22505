//! Fences and semaphores.

use ash::vk;

use crate::error::Result;

/// # Safety
/// The device must be valid.
pub unsafe fn create_semaphore(device: &ash::Device) -> Result<vk::Semaphore> {
    Ok(device.create_semaphore(&vk::SemaphoreCreateInfo::default(), None)?)
}

/// # Safety
/// The device must be valid.
pub unsafe fn create_fence(device: &ash::Device, signaled: bool) -> Result<vk::Fence> {
    let flags = if signaled {
        vk::FenceCreateFlags::SIGNALED
    } else {
        vk::FenceCreateFlags::empty()
    };
    Ok(device.create_fence(&vk::FenceCreateInfo::default().flags(flags), None)?)
}

/// Per-frame-slot synchronization.
///
/// The fence starts signaled so the first wait on a fresh slot returns
/// immediately.
pub struct FrameSync {
    /// Signaled when the acquired swapchain image can be written.
    pub image_available: vk::Semaphore,
    /// Signaled when the slot's last submission retires.
    pub in_flight: vk::Fence,
}

impl FrameSync {
    /// # Safety
    /// The device must be valid.
    pub unsafe fn new(device: &ash::Device) -> Result<Self> {
        let image_available = create_semaphore(device)?;
        let in_flight = match create_fence(device, true) {
            Ok(fence) => fence,
            Err(e) => {
                device.destroy_semaphore(image_available, None);
                return Err(e);
            }
        };
        Ok(Self {
            image_available,
            in_flight,
        })
    }

    /// Block until the slot's previous submission has retired.
    ///
    /// # Safety
    /// The device must be valid.
    pub unsafe fn wait(&self, device: &ash::Device) -> Result<()> {
        device.wait_for_fences(&[self.in_flight], true, u64::MAX)?;
        Ok(())
    }

    /// # Safety
    /// The fence must not be pending.
    pub unsafe fn reset(&self, device: &ash::Device) -> Result<()> {
        device.reset_fences(&[self.in_flight])?;
        Ok(())
    }

    /// # Safety
    /// The primitives must not be in use.
    pub unsafe fn destroy(&self, device: &ash::Device) {
        device.destroy_semaphore(self.image_available, None);
        device.destroy_fence(self.in_flight, None);
    }
}
