//! The application shell and its run loop.

use std::rc::Rc;
use std::thread;
use std::time::Instant;

use bretema_input::{dispatch_input, UserInput};
use bretema_platform::{
    HeadlessWindow, PlatformError, Window, WindowConfig, WindowEvent, WinitWindow,
};
use bretema_render::{Camera, RenderApi, Renderer};
use tracing::{debug, error, info, trace_span};

use crate::config::AppConfig;
use crate::error::{AppError, Result};
use crate::timer::FrameTimer;

type WindowResult = std::result::Result<Rc<dyn Window>, PlatformError>;

/// Builds the window an [`App`] renders into.
pub type WindowFactory = Box<dyn Fn(&WindowConfig) -> WindowResult>;

fn native_window(config: &WindowConfig) -> WindowResult {
    Ok(Rc::new(WinitWindow::new(config)?))
}

fn headless_window(config: &WindowConfig) -> WindowResult {
    Ok(Rc::new(HeadlessWindow::new(config)))
}

fn default_factory(api: RenderApi) -> WindowFactory {
    match api {
        RenderApi::Vulkan => Box::new(native_window),
        RenderApi::Headless => Box::new(headless_window),
    }
}

/// Owns a window, one renderer and the cameras drawn each frame.
///
/// Construction is cheap; the window and renderer are created on the first
/// [`App::run_loop`]. After the loop ends, [`App::reset`] makes the app
/// runnable again with the same cameras.
pub struct App {
    name: String,
    api: RenderApi,
    config: AppConfig,
    window_factory: WindowFactory,
    window: Option<Rc<dyn Window>>,
    renderer: Option<Box<dyn Renderer>>,
    cameras: Vec<Camera>,
    input: UserInput,
    timer: FrameTimer,
    /// Reused across polls.
    events: Vec<WindowEvent>,
    initialized: bool,
    close_requested: bool,
    cleaned_up: bool,
}

impl App {
    pub fn new(name: impl Into<String>, api: RenderApi) -> Self {
        let name = name.into();
        Self {
            config: AppConfig::new(name.as_str()),
            name,
            api,
            window_factory: default_factory(api),
            window: None,
            renderer: None,
            cameras: vec![Camera::main()],
            input: UserInput::new(),
            timer: FrameTimer::new(),
            events: Vec::new(),
            initialized: false,
            close_requested: false,
            cleaned_up: false,
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace how the window is created.
    #[must_use]
    pub fn with_window_factory(
        mut self,
        factory: impl Fn(&WindowConfig) -> WindowResult + 'static,
    ) -> Self {
        self.window_factory = Box::new(factory);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn api(&self) -> RenderApi {
        self.api
    }

    pub const fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Cameras in draw order.
    pub fn cameras(&self) -> &[Camera] {
        &self.cameras
    }

    pub fn cameras_mut(&mut self) -> &mut [Camera] {
        &mut self.cameras
    }

    /// Append a camera; it is drawn after the existing ones.
    pub fn add_camera(&mut self, mut camera: Camera) {
        if let Some(renderer) = &self.renderer {
            camera.fit_viewport(renderer.viewport_width(), renderer.viewport_height());
        }
        self.cameras.push(camera);
    }

    /// The active renderer. Kept after [`App::cleanup`] for inspection.
    pub fn renderer(&self) -> Option<&dyn Renderer> {
        self.renderer.as_deref()
    }

    pub const fn input(&self) -> &UserInput {
        &self.input
    }

    pub const fn timer(&self) -> &FrameTimer {
        &self.timer
    }

    pub const fn is_marked_to_close(&self) -> bool {
        self.close_requested
    }

    pub const fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub const fn is_cleaned_up(&self) -> bool {
        self.cleaned_up
    }

    /// Create the window and renderer.
    fn run(&mut self) -> Result<()> {
        if self.initialized {
            return Err(AppError::AlreadyInitialized);
        }
        info!("{} starting with {} backend", self.name, self.api);

        let window = (self.window_factory)(&self.config.window_config())?;
        let renderer = self
            .api
            .create(&window, &self.config.renderer_config(&self.name))?;

        for camera in &mut self.cameras {
            camera.fit_viewport(renderer.viewport_width(), renderer.viewport_height());
        }

        self.window = Some(window);
        self.renderer = Some(renderer);
        self.initialized = true;
        self.close_requested = false;
        self.cleaned_up = false;
        info!("{} ready", self.name);
        Ok(())
    }

    fn mark_to_close(&mut self) {
        if !self.close_requested {
            info!("Close requested");
            self.close_requested = true;
        }
    }

    /// Run until the window asks to close, then clean up.
    ///
    /// A renderer error ends the loop early; cleanup still runs and the error
    /// is returned.
    pub fn run_loop(&mut self) -> Result<()> {
        if !self.initialized || self.cleaned_up {
            self.run()?;
        }

        let result = self.iterate();
        if let Err(e) = &result {
            error!("{} stopped: {e}", self.name);
        }
        self.cleanup();
        result
    }

    fn iterate(&mut self) -> Result<()> {
        let target_frame_time = self.config.target_frame_time();

        loop {
            let _span = trace_span!("frame", iteration = self.timer.frames()).entered();
            let frame_start = Instant::now();

            self.poll_window()?;

            let renderer = self.renderer.as_mut().ok_or(AppError::NotInitialized)?;
            renderer.update()?;
            if renderer.size_changed() {
                let (width, height) = (renderer.viewport_width(), renderer.viewport_height());
                debug!("Viewport is now {width}x{height}");
                for camera in &mut self.cameras {
                    camera.fit_viewport(width, height);
                }
            }

            let dt = self.timer.tick();
            for camera in &mut self.cameras {
                camera.advance(dt);
                renderer.draw(camera)?;
            }
            self.input.end_frame();

            if let Some(target) = target_frame_time {
                let elapsed = frame_start.elapsed();
                if elapsed < target {
                    thread::sleep(target - elapsed);
                }
            }

            if self
                .config
                .max_frames
                .is_some_and(|max| self.timer.frames() >= max)
            {
                self.mark_to_close();
            }
            if self.close_requested {
                return Ok(());
            }
        }
    }

    fn poll_window(&mut self) -> Result<()> {
        let window = self.window.as_ref().ok_or(AppError::NotInitialized)?;
        let mut events = std::mem::take(&mut self.events);
        window.poll_events(&mut events);

        for event in events.drain(..) {
            match event {
                WindowEvent::CloseRequested => self.mark_to_close(),
                WindowEvent::Resized(size) => debug!("Window resized to {}x{}", size.x, size.y),
                WindowEvent::Input(input) => {
                    if self.input.process(&input) {
                        dispatch_input(&mut self.cameras, &self.input);
                    }
                }
            }
        }

        self.events = events;
        Ok(())
    }

    /// Clean up, drop the renderer and make the app runnable again.
    pub fn reset(&mut self) {
        self.cleanup();
        self.renderer = None;
        self.window = None;
        self.initialized = false;
        self.close_requested = false;
        self.cleaned_up = false;
        self.input.clear();
        self.timer.reset();
        debug!("{} reset", self.name);
    }

    /// Release the renderer's resources, then the window. Runs once per run.
    pub fn cleanup(&mut self) {
        if !self.initialized || self.cleaned_up {
            return;
        }
        self.cleaned_up = true;

        self.timer.log_stats();
        info!("Starting cleanup...");
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.cleanup();
        }
        self.window = None;
        info!("Cleanup complete");
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.cleanup();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bretema_platform::HeadlessStep;
    use bretema_render::Lifecycle;
    use glam::UVec2;

    fn headless(frames: u64) -> App {
        App::new("Test", RenderApi::Headless)
            .with_config(AppConfig::new("Test").with_size(320, 200).with_max_frames(frames))
    }

    #[test]
    fn starts_with_main_camera() {
        let app = App::new("Test", RenderApi::Headless);
        assert_eq!(app.name(), "Test");
        assert_eq!(app.cameras().len(), 1);
        assert_eq!(app.cameras()[0].name(), "Main");
        assert!(app.renderer().is_none());
        assert!(!app.is_initialized());
    }

    #[test]
    fn second_run_is_rejected() {
        let mut app = headless(1);
        app.run().unwrap();
        assert!(matches!(app.run(), Err(AppError::AlreadyInitialized)));
    }

    #[test]
    fn runs_for_max_frames() {
        let mut app = headless(4);
        app.run_loop().unwrap();

        let renderer = app.renderer().unwrap();
        assert_eq!(renderer.frame_number(), 4);
        assert_eq!(renderer.state().lifecycle(), Lifecycle::CleanedUp);
        assert!(app.is_cleaned_up());
    }

    #[test]
    fn close_event_stops_loop() {
        let mut app = headless(100).with_window_factory(|config| {
            let window = HeadlessWindow::new(config)
                .with_script([HeadlessStep::Idle, HeadlessStep::Close]);
            Ok(Rc::new(window) as Rc<dyn Window>)
        });
        app.run_loop().unwrap();
        assert!(app.is_marked_to_close());
        assert_eq!(app.renderer().unwrap().frame_number(), 2);
    }

    #[test]
    fn resize_refits_cameras() {
        let mut app = headless(2).with_window_factory(|config| {
            let window = HeadlessWindow::new(config)
                .with_script([HeadlessStep::Resize(UVec2::new(400, 100))]);
            Ok(Rc::new(window) as Rc<dyn Window>)
        });
        app.run_loop().unwrap();
        assert!((app.cameras()[0].aspect - 4.0).abs() < f32::EPSILON);
    }

    #[test]
    fn reset_keeps_cameras() {
        let mut app = headless(1);
        app.add_camera(Camera::new("Second"));
        app.run_loop().unwrap();

        app.reset();
        assert!(!app.is_initialized());
        assert!(app.renderer().is_none());
        assert_eq!(app.cameras().len(), 2);

        app.run_loop().unwrap();
        assert_eq!(app.renderer().unwrap().frame_number(), 2);
    }

    #[test]
    fn run_loop_after_finish_needs_reset() {
        let mut app = headless(1);
        app.run_loop().unwrap();
        assert!(matches!(app.run_loop(), Err(AppError::AlreadyInitialized)));
    }

    #[test]
    fn window_failure_is_reported() {
        let mut app = headless(1)
            .with_window_factory(|_| Err(PlatformError::WindowCreation("no display".into())));
        assert!(matches!(app.run_loop(), Err(AppError::Window(_))));
        assert!(!app.is_initialized());
    }
}
