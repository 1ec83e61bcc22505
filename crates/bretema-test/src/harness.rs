//! Headless app harness.

use std::rc::Rc;
use std::time::Duration;

use bretema_app::{App, AppConfig};
use bretema_input::{InputEvent, KeyCode};
use bretema_platform::{HeadlessStep, HeadlessWindow, Window, WindowEvent};
use bretema_render::{Camera, DrawRecord, HeadlessRenderer, RenderApi, Renderer};
use glam::{UVec2, Vec3};
use tracing::debug;

use crate::{Result, TestError};

/// An [`App`] on the headless backend whose window stays reachable from the test.
///
/// The harness keeps its own handle to the window, so steps and events can be
/// queued before or between runs.
pub struct HeadlessHarness {
    app: App,
    window: Rc<HeadlessWindow>,
}

impl HeadlessHarness {
    /// A 320x240 app with no simulated GPU latency.
    pub fn new(name: &str) -> Self {
        Self::with_config(
            name,
            AppConfig::new(name)
                .with_size(320, 240)
                .with_headless_latency(Duration::ZERO),
        )
    }

    pub fn with_config(name: &str, config: AppConfig) -> Self {
        let window = Rc::new(HeadlessWindow::new(&config.window_config()));
        let shared = Rc::clone(&window);
        let app = App::new(name, RenderApi::Headless)
            .with_config(config)
            .with_window_factory(move |_| Ok(Rc::clone(&shared) as Rc<dyn Window>));
        debug!("Harness for '{name}' created");
        Self { app, window }
    }

    /// Queue script steps, one consumed per loop iteration.
    #[must_use]
    pub fn with_steps(self, steps: impl IntoIterator<Item = HeadlessStep>) -> Self {
        for step in steps {
            self.window.push_step(step);
        }
        self
    }

    /// Close the window on the `iterations`-th poll.
    #[must_use]
    pub fn closing_after(self, iterations: u64) -> Self {
        self.window.close_after(iterations);
        self
    }

    pub const fn app(&self) -> &App {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }

    pub fn window(&self) -> &HeadlessWindow {
        &self.window
    }

    /// Handles to the window held by anyone other than the harness.
    pub fn window_refs(&self) -> usize {
        Rc::strong_count(&self.window) - 1
    }

    pub fn run(&mut self) -> Result<()> {
        Ok(self.app.run_loop()?)
    }

    /// Loop iterations so far; each one polls the window exactly once.
    pub fn iterations(&self) -> u64 {
        self.window.poll_count()
    }

    pub fn renderer(&self) -> Result<&HeadlessRenderer> {
        self.app
            .renderer()
            .ok_or(TestError::NoRenderer)?
            .as_any()
            .downcast_ref::<HeadlessRenderer>()
            .ok_or(TestError::WrongBackend)
    }

    pub fn draws(&self) -> Result<&[DrawRecord]> {
        Ok(self.renderer()?.draws())
    }

    pub fn frame_number(&self) -> Result<u64> {
        Ok(self.renderer()?.frame_number())
    }

    pub fn viewport(&self) -> Result<UVec2> {
        Ok(self.renderer()?.viewport())
    }
}

/// Create a camera at `position` looking down -Z.
pub fn create_test_camera(name: &str, position: Vec3) -> Camera {
    Camera::new(name).with_position(position)
}

pub const fn key_event(code: KeyCode, pressed: bool) -> WindowEvent {
    WindowEvent::Input(InputEvent::Key { code, pressed })
}
