//! Desktop window backed by winit.
//!
//! winit 0.30 wants to own the event loop (`run_app`), but the engine drives
//! its own loop. We keep the event loop inside the window and pump it with a
//! zero timeout on every poll, which never blocks.

use std::cell::RefCell;
use std::time::Duration;

use bretema_input::InputEvent;
use glam::UVec2;
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use tracing::{debug, info};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, DeviceId, WindowEvent as WinitEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window as NativeWindow, WindowAttributes, WindowId};

use crate::window::{RawHandles, Window, WindowEvent};
use crate::{PlatformError, Result, WindowConfig};

/// Upper bound on startup pumps while waiting for the platform to resume us.
const STARTUP_PUMP_LIMIT: usize = 200;
const STARTUP_PUMP_TIMEOUT: Duration = Duration::from_millis(10);

/// A native window plus the event loop that feeds it.
pub struct WinitWindow {
    title: String,
    // Dropped before the event loop.
    window: NativeWindow,
    event_loop: RefCell<EventLoop<()>>,
    /// Events received while the window was being created.
    pending: RefCell<Vec<WindowEvent>>,
}

impl WinitWindow {
    /// Create the event loop and open a window.
    ///
    /// Must be called from the main thread on platforms that require it.
    pub fn new(config: &WindowConfig) -> Result<Self> {
        let mut event_loop =
            EventLoop::new().map_err(|e| PlatformError::EventLoop(e.to_string()))?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let attributes = NativeWindow::default_attributes()
            .with_title(&config.title)
            .with_inner_size(PhysicalSize::new(config.width, config.height))
            .with_resizable(config.resizable);

        let mut startup_events = Vec::new();
        let mut pump = Pump {
            attributes: Some(attributes),
            created: None,
            events: &mut startup_events,
        };

        for _ in 0..STARTUP_PUMP_LIMIT {
            if let PumpStatus::Exit(code) =
                event_loop.pump_app_events(Some(STARTUP_PUMP_TIMEOUT), &mut pump)
            {
                return Err(PlatformError::EventLoop(format!(
                    "event loop exited during startup (code {code})"
                )));
            }
            if pump.created.is_some() {
                break;
            }
        }

        let window = match pump.created.take() {
            Some(Ok(window)) => window,
            Some(Err(e)) => return Err(PlatformError::WindowCreation(e)),
            None => {
                return Err(PlatformError::WindowCreation(
                    "platform never resumed the application".to_string(),
                ))
            }
        };

        let size = window.inner_size();
        info!(
            "Window '{}' created: {}x{}",
            config.title, size.width, size.height
        );

        Ok(Self {
            title: config.title.clone(),
            window,
            event_loop: RefCell::new(event_loop),
            pending: RefCell::new(startup_events),
        })
    }

    /// The underlying winit window.
    #[must_use]
    pub const fn native(&self) -> &NativeWindow {
        &self.window
    }
}

impl Window for WinitWindow {
    fn title(&self) -> &str {
        &self.title
    }

    fn size(&self) -> UVec2 {
        let size = self.window.inner_size();
        UVec2::new(size.width, size.height)
    }

    fn poll_events(&self, events: &mut Vec<WindowEvent>) {
        events.append(&mut self.pending.borrow_mut());

        let mut pump = Pump {
            attributes: None,
            created: None,
            events: &mut *events,
        };
        let status = self
            .event_loop
            .borrow_mut()
            .pump_app_events(Some(Duration::ZERO), &mut pump);

        if let PumpStatus::Exit(code) = status {
            debug!("Event loop exited (code {code})");
            events.push(WindowEvent::CloseRequested);
        }
    }

    fn raw_handles(&self) -> Option<RawHandles> {
        let display = self.window.display_handle().ok()?.as_raw();
        let window = self.window.window_handle().ok()?.as_raw();
        Some(RawHandles { display, window })
    }
}

/// Short-lived handler passed to one `pump_app_events` call.
struct Pump<'a> {
    /// Set only during startup; consumed on the first `resumed`.
    attributes: Option<WindowAttributes>,
    created: Option<std::result::Result<NativeWindow, String>>,
    events: &'a mut Vec<WindowEvent>,
}

impl ApplicationHandler for Pump<'_> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(attributes) = self.attributes.take() {
            self.created = Some(
                event_loop
                    .create_window(attributes)
                    .map_err(|e| e.to_string()),
            );
        }
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _id: WindowId, event: WinitEvent) {
        match event {
            WinitEvent::CloseRequested | WinitEvent::Destroyed => {
                self.events.push(WindowEvent::CloseRequested);
            }
            WinitEvent::Resized(size) => {
                self.events
                    .push(WindowEvent::Resized(UVec2::new(size.width, size.height)));
            }
            other => {
                if let Some(input) = InputEvent::from_window_event(&other) {
                    self.events.push(WindowEvent::Input(input));
                }
            }
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _id: DeviceId, event: DeviceEvent) {
        if let Some(input) = InputEvent::from_device_event(&event) {
            self.events.push(WindowEvent::Input(input));
        }
    }
}
