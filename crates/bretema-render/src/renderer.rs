//! The backend-agnostic renderer contract.

use std::any::Any;
use std::rc::{Rc, Weak};

use bretema_platform::Window;
use glam::UVec2;
use tracing::{debug, info};

use crate::api::RenderApi;
use crate::camera::Camera;
use crate::error::{RenderError, Result};
use crate::in_flight::FrameStats;

/// Maximum number of frames whose GPU work may be outstanding at once.
pub const IN_FLIGHT: usize = 3;

/// Renderer lifecycle. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    #[default]
    Uninitialized,
    Initialized,
    CleanedUp,
}

/// Bookkeeping shared by every backend.
///
/// Holds a `Weak` handle to the window: the app owns it, the renderer only
/// reads its size.
#[derive(Debug)]
pub struct RendererState {
    window: Weak<dyn Window>,
    size: UVec2,
    size_changed: bool,
    frame_number: u64,
    lifecycle: Lifecycle,
}

impl RendererState {
    /// Bind to `window` and record its current size.
    pub fn new(window: &Weak<dyn Window>) -> Result<Self> {
        let size = window.upgrade().ok_or(RenderError::InvalidWindow)?.size();
        Ok(Self {
            window: Weak::clone(window),
            size,
            size_changed: false,
            frame_number: 0,
            lifecycle: Lifecycle::Uninitialized,
        })
    }

    pub fn window(&self) -> Result<Rc<dyn Window>> {
        self.window.upgrade().ok_or(RenderError::InvalidWindow)
    }

    /// Adopt the window's current size.
    ///
    /// Returns whether it differed from the stored size. The result is also
    /// kept in [`RendererState::size_changed`] until the next call.
    pub fn sync_window_size(&mut self) -> Result<bool> {
        let size = self.window()?.size();
        self.size_changed = size != self.size;
        if self.size_changed {
            debug!(
                "Viewport {}x{} -> {}x{}",
                self.size.x, self.size.y, size.x, size.y
            );
            self.size = size;
        }
        Ok(self.size_changed)
    }

    pub const fn size(&self) -> UVec2 {
        self.size
    }

    /// Whether the last [`RendererState::sync_window_size`] saw a new size.
    pub const fn size_changed(&self) -> bool {
        self.size_changed
    }

    pub const fn frame_number(&self) -> u64 {
        self.frame_number
    }

    pub const fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_initialized(&self) -> bool {
        self.lifecycle == Lifecycle::Initialized
    }

    /// Called by a backend once its setup succeeded.
    pub fn mark_initialized(&mut self) {
        if self.lifecycle == Lifecycle::Uninitialized {
            self.lifecycle = Lifecycle::Initialized;
            info!("Renderer initialized ({}x{})", self.size.x, self.size.y);
        }
    }

    /// Guard for `draw`.
    pub fn ensure_drawable(&self) -> Result<()> {
        match self.lifecycle {
            Lifecycle::Initialized => Ok(()),
            Lifecycle::Uninitialized => Err(RenderError::NotInitialized),
            Lifecycle::CleanedUp => Err(RenderError::CleanedUp),
        }
    }

    /// Guard for `update`.
    pub fn ensure_alive(&self) -> Result<()> {
        if self.lifecycle == Lifecycle::CleanedUp {
            return Err(RenderError::CleanedUp);
        }
        Ok(())
    }

    /// Count one finished `draw`.
    pub fn advance_frame(&mut self) {
        self.frame_number = self.frame_number.wrapping_add(1);
    }

    /// Enter `CleanedUp`. Returns `false` if already there, so callers can
    /// skip releasing resources twice.
    pub fn begin_cleanup(&mut self) -> bool {
        if self.lifecycle == Lifecycle::CleanedUp {
            return false;
        }
        self.lifecycle = Lifecycle::CleanedUp;
        true
    }
}

/// A rendering backend.
///
/// `Uninitialized -> Initialized -> [update* draw*] -> CleanedUp`.
/// Backends are created already initialized (construction fails otherwise)
/// and never leave `CleanedUp`.
pub trait Renderer {
    fn api(&self) -> RenderApi;

    fn state(&self) -> &RendererState;

    fn state_mut(&mut self) -> &mut RendererState;

    fn is_initialized(&self) -> bool {
        self.state().is_initialized()
    }

    fn viewport_width(&self) -> u32 {
        self.state().size().x
    }

    fn viewport_height(&self) -> u32 {
        self.state().size().y
    }

    fn viewport(&self) -> UVec2 {
        self.state().size()
    }

    fn frame_number(&self) -> u64 {
        self.state().frame_number()
    }

    fn size_changed(&self) -> bool {
        self.state().size_changed()
    }

    /// Sync the viewport with the window. Backends that own size-dependent
    /// resources override this and rebuild them when the size changed.
    fn update(&mut self) -> Result<()> {
        self.state().ensure_alive()?;
        self.state_mut().sync_window_size()?;
        Ok(())
    }

    /// Submit one frame seen through `camera`.
    ///
    /// Blocks while [`IN_FLIGHT`] frames are outstanding. Advances the frame
    /// number by one on success, even when the frame had nothing to present.
    fn draw(&mut self, camera: &Camera) -> Result<()>;

    /// Release all GPU resources. Safe to call any number of times.
    fn cleanup(&mut self);

    fn frame_stats(&self) -> FrameStats;

    fn as_any(&self) -> &dyn Any;
}

#[cfg(test)]
mod tests {
    use super::*;
    use bretema_platform::{HeadlessWindow, WindowConfig};

    fn window(width: u32, height: u32) -> Rc<HeadlessWindow> {
        Rc::new(HeadlessWindow::new(
            &WindowConfig::new("state").with_size(width, height),
        ))
    }

    fn state_for(window: &Rc<HeadlessWindow>) -> RendererState {
        let window: Rc<dyn Window> = window.clone();
        RendererState::new(&Rc::downgrade(&window)).unwrap()
    }

    #[test]
    fn construction_reads_window_size() {
        let window = window(640, 360);
        let state = state_for(&window);
        assert_eq!(state.size(), UVec2::new(640, 360));
        assert_eq!(state.frame_number(), 0);
        assert_eq!(state.lifecycle(), Lifecycle::Uninitialized);
        assert!(!state.size_changed());
    }

    #[test]
    fn dead_window_is_rejected() {
        let window: Rc<dyn Window> = window(1, 1);
        let weak = Rc::downgrade(&window);
        drop(window);
        assert!(matches!(
            RendererState::new(&weak),
            Err(RenderError::InvalidWindow)
        ));
    }

    #[test]
    fn size_changed_is_an_edge_signal() {
        let window = window(100, 100);
        let mut state = state_for(&window);

        let sizes = [(100, 100), (200, 100), (200, 100), (0, 0), (0, 0), (300, 300)];
        let mut previous = UVec2::new(100, 100);
        for (w, h) in sizes {
            let size = UVec2::new(w, h);
            window.set_size(size);
            let changed = state.sync_window_size().unwrap();
            assert_eq!(state.size(), size);
            assert_eq!(changed, size != previous);
            assert_eq!(state.size_changed(), changed);
            previous = size;
        }
    }

    #[test]
    fn lifecycle_only_moves_forward() {
        let window = window(1, 1);
        let mut state = state_for(&window);
        assert!(matches!(state.ensure_drawable(), Err(RenderError::NotInitialized)));

        state.mark_initialized();
        assert!(state.is_initialized());
        assert!(state.ensure_drawable().is_ok());

        assert!(state.begin_cleanup());
        assert!(!state.begin_cleanup());
        state.mark_initialized();
        assert_eq!(state.lifecycle(), Lifecycle::CleanedUp);
        assert!(matches!(state.ensure_drawable(), Err(RenderError::CleanedUp)));
        assert!(state.ensure_alive().is_err());
    }
}
