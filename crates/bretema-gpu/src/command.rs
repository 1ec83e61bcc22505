//! Command pool and recording helpers.

use ash::vk;

use crate::error::Result;

pub struct CommandPool {
    pool: vk::CommandPool,
}

impl CommandPool {
    /// Pool whose buffers can be reset and re-recorded every frame.
    ///
    /// # Safety
    /// The device must be valid and the queue family must exist.
    pub unsafe fn new(device: &ash::Device, queue_family: u32) -> Result<Self> {
        let create_info = vk::CommandPoolCreateInfo::default()
            .queue_family_index(queue_family)
            .flags(vk::CommandPoolCreateFlags::RESET_COMMAND_BUFFER);
        let pool = device.create_command_pool(&create_info, None)?;
        Ok(Self { pool })
    }

    /// # Safety
    /// The device must be valid.
    pub unsafe fn allocate(
        &self,
        device: &ash::Device,
        count: u32,
    ) -> Result<Vec<vk::CommandBuffer>> {
        let alloc_info = vk::CommandBufferAllocateInfo::default()
            .command_pool(self.pool)
            .level(vk::CommandBufferLevel::PRIMARY)
            .command_buffer_count(count);
        Ok(device.allocate_command_buffers(&alloc_info)?)
    }

    /// Frees every buffer allocated from the pool.
    ///
    /// # Safety
    /// No buffer from this pool may be pending.
    pub unsafe fn destroy(&self, device: &ash::Device) {
        device.destroy_command_pool(self.pool, None);
    }
}

/// Record a full-image clear of a swapchain image, leaving it ready to present.
///
/// # Safety
/// `cmd` must not be pending and `image` must belong to the current swapchain.
pub unsafe fn record_clear(
    device: &ash::Device,
    cmd: vk::CommandBuffer,
    image: vk::Image,
    color: [f32; 4],
) -> Result<()> {
    device.reset_command_buffer(cmd, vk::CommandBufferResetFlags::empty())?;
    let begin_info =
        vk::CommandBufferBeginInfo::default().flags(vk::CommandBufferUsageFlags::ONE_TIME_SUBMIT);
    device.begin_command_buffer(cmd, &begin_info)?;

    let range = vk::ImageSubresourceRange::default()
        .aspect_mask(vk::ImageAspectFlags::COLOR)
        .level_count(1)
        .layer_count(1);

    let to_transfer = vk::ImageMemoryBarrier::default()
        .src_access_mask(vk::AccessFlags::empty())
        .dst_access_mask(vk::AccessFlags::TRANSFER_WRITE)
        .old_layout(vk::ImageLayout::UNDEFINED)
        .new_layout(vk::ImageLayout::TRANSFER_DST_OPTIMAL)
        .src_queue_family_index(vk::QUEUE_FAMILY_IGNORED)
        .dst_queue_family_index(vk::QUEUE_FAMILY_IGNORED)
        .image(image)
        .subresource_range(range);
    device.cmd_pipeline_barrier(
        cmd,
        vk::PipelineStageFlags::TRANSFER,
        vk::PipelineStageFlags::TRANSFER,
        vk::DependencyFlags::empty(),
        &[],
        &[],
        &[to_transfer],
    );

    let clear = vk::ClearColorValue { float32: color };
    device.cmd_clear_color_image(
        cmd,
        image,
        vk::ImageLayout::TRANSFER_DST_OPTIMAL,
        &clear,
        &[range],
    );

    let to_present = vk::ImageMemoryBarrier::default()
        .src_access_mask(vk::AccessFlags::TRANSFER_WRITE)
        .dst_access_mask(vk::AccessFlags::empty())
        .old_layout(vk::ImageLayout::TRANSFER_DST_OPTIMAL)
        .new_layout(vk::ImageLayout::PRESENT_SRC_KHR)
        .src_queue_family_index(vk::QUEUE_FAMILY_IGNORED)
        .dst_queue_family_index(vk::QUEUE_FAMILY_IGNORED)
        .image(image)
        .subresource_range(range);
    device.cmd_pipeline_barrier(
        cmd,
        vk::PipelineStageFlags::TRANSFER,
        vk::PipelineStageFlags::BOTTOM_OF_PIPE,
        vk::DependencyFlags::empty(),
        &[],
        &[],
        &[to_present],
    );

    device.end_command_buffer(cmd)?;
    Ok(())
}

/// Submit one command buffer.
///
/// # Safety
/// All handles must be valid.
pub unsafe fn submit(
    device: &ash::Device,
    queue: vk::Queue,
    cmd: vk::CommandBuffer,
    wait: vk::Semaphore,
    wait_stage: vk::PipelineStageFlags,
    signal: vk::Semaphore,
    fence: vk::Fence,
) -> Result<()> {
    let command_buffers = [cmd];
    let waits = [wait];
    let stages = [wait_stage];
    let signals = [signal];
    let submit_info = vk::SubmitInfo::default()
        .command_buffers(&command_buffers)
        .wait_semaphores(&waits)
        .wait_dst_stage_mask(&stages)
        .signal_semaphores(&signals);
    device.queue_submit(queue, &[submit_info], fence)?;
    Ok(())
}
