//! Application configuration.

use std::time::Duration;

use bretema_platform::WindowConfig;
use bretema_render::{HeadlessConfig, RendererConfig};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Window title.
    pub title: String,
    /// Initial window width.
    pub width: u32,
    /// Initial window height.
    pub height: u32,
    /// Target frames per second (None for unlimited).
    pub target_fps: Option<u32>,
    /// Stop after this many loop iterations (None to run until closed).
    pub max_frames: Option<u64>,
    /// Enable vsync.
    pub vsync: bool,
    /// Enable Vulkan validation layers (default: debug builds only).
    pub validation: bool,
    pub resizable: bool,
    /// Simulated GPU time per frame for the headless backend.
    pub headless_gpu_latency: Duration,
    /// Make the headless backend lose its device after this many frames.
    pub headless_lose_device_after: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Bretema".to_string(),
            width: 1280,
            height: 720,
            target_fps: None,
            max_frames: None,
            vsync: true,
            validation: cfg!(debug_assertions),
            resizable: true,
            headless_gpu_latency: HeadlessConfig::default().gpu_latency,
            headless_lose_device_after: None,
        }
    }
}

impl AppConfig {
    /// Create a new config with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Set the window dimensions.
    #[must_use]
    pub const fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the target FPS.
    #[must_use]
    pub const fn with_target_fps(mut self, fps: u32) -> Self {
        self.target_fps = Some(fps);
        self
    }

    #[must_use]
    pub const fn with_max_frames(mut self, frames: u64) -> Self {
        self.max_frames = Some(frames);
        self
    }

    /// Enable or disable vsync.
    #[must_use]
    pub const fn with_vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }

    /// Enable or disable validation layers.
    #[must_use]
    pub const fn with_validation(mut self, validation: bool) -> Self {
        self.validation = validation;
        self
    }

    #[must_use]
    pub const fn with_resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }

    #[must_use]
    pub const fn with_headless_latency(mut self, latency: Duration) -> Self {
        self.headless_gpu_latency = latency;
        self
    }

    #[must_use]
    pub const fn with_headless_device_loss(mut self, after_frames: u64) -> Self {
        self.headless_lose_device_after = Some(after_frames);
        self
    }

    /// Minimum duration of one loop iteration, if pacing is enabled.
    /// A target of zero FPS disables pacing.
    pub fn target_frame_time(&self) -> Option<Duration> {
        self.target_fps
            .filter(|&fps| fps > 0)
            .map(|fps| Duration::from_nanos(1_000_000_000 / u64::from(fps)))
    }

    pub fn window_config(&self) -> WindowConfig {
        WindowConfig::new(self.title.as_str())
            .with_size(self.width, self.height)
            .with_resizable(self.resizable)
    }

    pub fn renderer_config(&self, app_name: &str) -> RendererConfig {
        RendererConfig {
            app_name: app_name.to_string(),
            vsync: self.vsync,
            validation: self.validation,
            headless: HeadlessConfig {
                gpu_latency: self.headless_gpu_latency,
                lose_device_after: self.headless_lose_device_after,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_fields() {
        let config = AppConfig::new("Test")
            .with_size(640, 480)
            .with_target_fps(60)
            .with_vsync(false)
            .with_resizable(false);

        let window = config.window_config();
        assert_eq!(window.title, "Test");
        assert_eq!((window.width, window.height), (640, 480));
        assert!(!window.resizable);

        let renderer = config.renderer_config("Viewer");
        assert_eq!(renderer.app_name, "Viewer");
        assert!(!renderer.vsync);
        assert_eq!(renderer.headless.lose_device_after, None);
        assert_eq!(
            config
                .with_headless_device_loss(3)
                .renderer_config("Viewer")
                .headless
                .lose_device_after,
            Some(3)
        );
    }

    #[test]
    fn frame_time_from_fps() {
        assert_eq!(AppConfig::default().target_frame_time(), None);
        assert_eq!(
            AppConfig::default().with_target_fps(50).target_frame_time(),
            Some(Duration::from_millis(20))
        );
        assert_eq!(AppConfig::default().with_target_fps(0).target_frame_time(), None);
    }
}
