//! Vulkan instance creation and physical device selection.

use std::ffi::{c_char, CStr, CString};

use ash::vk;
use raw_window_handle::RawDisplayHandle;

use crate::error::{GpuError, Result};

const ENGINE_NAME: &CStr = c"Bretema";
const VALIDATION_LAYER: &CStr = c"VK_LAYER_KHRONOS_validation";

/// Instance extensions needed to present to `display`.
pub fn required_extensions(display: RawDisplayHandle) -> Result<Vec<*const c_char>> {
    let mut extensions = ash_window::enumerate_required_extensions(display)?.to_vec();

    #[cfg(target_os = "macos")]
    extensions.push(ash::khr::portability_enumeration::NAME.as_ptr());

    Ok(extensions)
}

/// Create a Vulkan 1.3 instance able to present to `display`.
///
/// # Safety
/// `entry` must be a loaded Vulkan entry point.
pub unsafe fn create_instance(
    entry: &ash::Entry,
    app_name: &str,
    display: RawDisplayHandle,
    enable_validation: bool,
) -> Result<ash::Instance> {
    let app_name = CString::new(app_name).map_err(|e| GpuError::InvalidName(e.to_string()))?;

    let app_info = vk::ApplicationInfo::default()
        .application_name(&app_name)
        .application_version(vk::make_api_version(0, 0, 1, 0))
        .engine_name(ENGINE_NAME)
        .engine_version(vk::make_api_version(0, 0, 1, 0))
        .api_version(vk::API_VERSION_1_3);

    let extensions = required_extensions(display)?;

    let mut layers = Vec::new();
    if enable_validation {
        let available = entry.enumerate_instance_layer_properties()?;
        let found = available
            .iter()
            .any(|props| CStr::from_ptr(props.layer_name.as_ptr()) == VALIDATION_LAYER);
        if found {
            layers.push(VALIDATION_LAYER.as_ptr());
        } else {
            tracing::warn!("Validation layer {:?} not available", VALIDATION_LAYER);
        }
    }

    #[cfg(target_os = "macos")]
    let flags = vk::InstanceCreateFlags::ENUMERATE_PORTABILITY_KHR;
    #[cfg(not(target_os = "macos"))]
    let flags = vk::InstanceCreateFlags::empty();

    let create_info = vk::InstanceCreateInfo::default()
        .application_info(&app_info)
        .enabled_extension_names(&extensions)
        .enabled_layer_names(&layers)
        .flags(flags);

    Ok(entry.create_instance(&create_info, None)?)
}

/// Pick the highest scoring device that supports Vulkan 1.3 and has a
/// graphics queue.
///
/// # Safety
/// The instance must be valid.
pub unsafe fn select_physical_device(instance: &ash::Instance) -> Result<vk::PhysicalDevice> {
    instance
        .enumerate_physical_devices()?
        .into_iter()
        .filter_map(|device| score_physical_device(instance, device).map(|score| (score, device)))
        .max_by_key(|&(score, _)| score)
        .map(|(_, device)| device)
        .ok_or(GpuError::NoSuitableDevice)
}

/// `None` when the device cannot be used at all.
unsafe fn score_physical_device(
    instance: &ash::Instance,
    device: vk::PhysicalDevice,
) -> Option<u32> {
    let properties = instance.get_physical_device_properties(device);

    if properties.api_version < vk::API_VERSION_1_3 {
        return None;
    }
    graphics_queue_family(instance, device)?;

    let mut score = match properties.device_type {
        vk::PhysicalDeviceType::DISCRETE_GPU => 1000,
        vk::PhysicalDeviceType::INTEGRATED_GPU => 100,
        vk::PhysicalDeviceType::VIRTUAL_GPU => 50,
        _ => 1,
    };

    let memory = instance.get_physical_device_memory_properties(device);
    let vram_gb: u64 = memory
        .memory_heaps
        .iter()
        .take(memory.memory_heap_count as usize)
        .filter(|heap| heap.flags.contains(vk::MemoryHeapFlags::DEVICE_LOCAL))
        .map(|heap| heap.size >> 30)
        .sum();
    score += u32::try_from(vram_gb).unwrap_or(u32::MAX / 2).min(64);

    Some(score)
}

/// First queue family with graphics support.
///
/// # Safety
/// The instance and device must be valid.
pub unsafe fn graphics_queue_family(
    instance: &ash::Instance,
    device: vk::PhysicalDevice,
) -> Option<u32> {
    instance
        .get_physical_device_queue_family_properties(device)
        .iter()
        .position(|family| family.queue_flags.contains(vk::QueueFlags::GRAPHICS))
        .and_then(|index| u32::try_from(index).ok())
}

/// Human-readable device name for logs.
///
/// # Safety
/// The instance and device must be valid.
pub unsafe fn device_name(instance: &ash::Instance, device: vk::PhysicalDevice) -> String {
    let properties = instance.get_physical_device_properties(device);
    CStr::from_ptr(properties.device_name.as_ptr())
        .to_string_lossy()
        .into_owned()
}
