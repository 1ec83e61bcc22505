//! Backend selection.

use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use bretema_platform::Window;

use crate::error::Result;
use crate::headless::{HeadlessConfig, HeadlessRenderer};
use crate::renderer::Renderer;
use crate::vulkan::VulkanRenderer;

/// Which backend an app renders with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RenderApi {
    #[default]
    Vulkan,
    Headless,
}

impl RenderApi {
    /// Construct the backend bound to `window`.
    ///
    /// Failures are returned as-is; falling back to another backend is the
    /// caller's decision.
    pub fn create(
        self,
        window: &Rc<dyn Window>,
        config: &RendererConfig,
    ) -> Result<Box<dyn Renderer>> {
        Ok(match self {
            Self::Vulkan => Box::new(VulkanRenderer::new(window, config)?),
            Self::Headless => Box::new(HeadlessRenderer::new(window, &config.headless)?),
        })
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Vulkan => "vulkan",
            Self::Headless => "headless",
        }
    }
}

impl fmt::Display for RenderApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RenderApi {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "vulkan" | "vk" => Ok(Self::Vulkan),
            "headless" | "none" => Ok(Self::Headless),
            other => Err(format!("unknown render api '{other}'")),
        }
    }
}

/// Backend construction options.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    pub app_name: String,
    pub vsync: bool,
    /// Vulkan validation layers (default: debug builds only).
    pub validation: bool,
    pub headless: HeadlessConfig,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            app_name: "Bretema".to_string(),
            vsync: true,
            validation: cfg!(debug_assertions),
            headless: HeadlessConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bretema_platform::{HeadlessWindow, WindowConfig};

    #[test]
    fn parses_names() {
        assert_eq!("Vulkan".parse::<RenderApi>(), Ok(RenderApi::Vulkan));
        assert_eq!("headless".parse::<RenderApi>(), Ok(RenderApi::Headless));
        assert!("metal".parse::<RenderApi>().is_err());
        assert_eq!(RenderApi::Headless.to_string(), "headless");
    }

    #[test]
    fn creates_headless_backend() {
        let window: Rc<dyn Window> = Rc::new(HeadlessWindow::new(&WindowConfig::default()));
        let renderer = RenderApi::Headless
            .create(&window, &RendererConfig::default())
            .unwrap();
        assert_eq!(renderer.api(), RenderApi::Headless);
        assert!(renderer.is_initialized());
        assert_eq!(renderer.viewport_width(), 1280);
    }

    #[test]
    fn vulkan_needs_a_native_window() {
        let window: Rc<dyn Window> = Rc::new(HeadlessWindow::new(&WindowConfig::default()));
        let result = RenderApi::Vulkan.create(&window, &RendererConfig::default());
        assert!(matches!(result, Err(crate::RenderError::BackendInit(_))));
    }
}
