//! Renderer without a GPU.
//!
//! Submissions go to a simulated device queue: a worker thread that "executes"
//! each frame after a configurable latency and then signals the frame slot's
//! fence. Frame pacing therefore behaves like a real backend, which is what
//! tests and `--headless` runs rely on.

use std::any::Any;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use bretema_platform::Window;
use crossbeam::channel::{self, Sender};
use glam::{Mat4, UVec2};
use parking_lot::{Condvar, Mutex};
use tracing::{debug, info, trace, warn};

use crate::api::RenderApi;
use crate::camera::Camera;
use crate::error::{RenderError, Result};
use crate::in_flight::{FrameStats, InFlightFrames};
use crate::renderer::{Renderer, RendererState, IN_FLIGHT};

/// Slack on top of the worst legitimate fence wait before the simulated
/// device counts as gone.
const FENCE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Default)]
pub struct HeadlessConfig {
    /// Time the simulated queue spends on each frame.
    pub gpu_latency: Duration,
    /// Lose the simulated device once this many frames have completed.
    pub lose_device_after: Option<u64>,
}

/// Longest a fence wait may take: every in-flight frame ahead of it, plus slack.
#[allow(clippy::cast_possible_truncation)]
fn fence_timeout(latency: Duration) -> Duration {
    latency.saturating_mul(IN_FLIGHT as u32 + 1) + FENCE_TIMEOUT
}

/// What one submitted frame looked like.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawRecord {
    pub frame: u64,
    pub camera: String,
    pub view_projection: Mat4,
    pub viewport: UVec2,
    /// Submissions not yet waited on, this one included.
    pub outstanding: usize,
    /// Frames the simulated queue had finished when this one was submitted.
    pub completed_at_submit: u64,
}

#[derive(Debug, Default)]
struct Fence {
    signaled: Mutex<bool>,
    condvar: Condvar,
}

impl Fence {
    fn reset(&self) {
        *self.signaled.lock() = false;
    }

    fn signal(&self) {
        *self.signaled.lock() = true;
        self.condvar.notify_all();
    }

    /// `false` on timeout.
    fn wait(&self, timeout: Duration) -> bool {
        let mut signaled = self.signaled.lock();
        while !*signaled {
            if self.condvar.wait_for(&mut signaled, timeout).timed_out() {
                return *signaled;
            }
        }
        true
    }
}

struct Submission {
    frame: u64,
    fence: Arc<Fence>,
}

/// Worker thread standing in for a device queue. Executes in order.
struct SimulatedQueue {
    sender: Option<Sender<Submission>>,
    worker: Option<JoinHandle<()>>,
    completed: Arc<AtomicU64>,
    lost: Arc<AtomicBool>,
}

impl SimulatedQueue {
    fn spawn(config: &HeadlessConfig) -> Result<Self> {
        let (sender, receiver) = channel::unbounded::<Submission>();
        let completed = Arc::new(AtomicU64::new(0));
        let lost = Arc::new(AtomicBool::new(false));
        let counter = Arc::clone(&completed);
        let lost_flag = Arc::clone(&lost);
        let latency = config.gpu_latency;
        let lose_after = config.lose_device_after;

        let worker = thread::Builder::new()
            .name("bretema-headless-queue".to_string())
            .spawn(move || {
                for submission in receiver {
                    // A lost device still signals, so waiters never hang.
                    if !lost_flag.load(Ordering::Acquire) {
                        if !latency.is_zero() {
                            thread::sleep(latency);
                        }
                        let done = counter.fetch_add(1, Ordering::AcqRel) + 1;
                        if lose_after.is_some_and(|limit| done >= limit) {
                            warn!(frame = submission.frame, "Simulated device lost");
                            lost_flag.store(true, Ordering::Release);
                        }
                        trace!(frame = submission.frame, "simulated frame complete");
                    }
                    submission.fence.signal();
                }
            })
            .map_err(|e| RenderError::BackendInit(format!("queue thread: {e}")))?;

        Ok(Self {
            sender: Some(sender),
            worker: Some(worker),
            completed,
            lost,
        })
    }

    fn submit(&self, frame: u64, fence: Arc<Fence>) -> Result<()> {
        if self.lost.load(Ordering::Acquire) {
            return Err(RenderError::DeviceLost);
        }
        self.sender
            .as_ref()
            .ok_or(RenderError::DeviceLost)?
            .send(Submission { frame, fence })
            .map_err(|_| RenderError::DeviceLost)
    }

    fn completed(&self) -> u64 {
        self.completed.load(Ordering::Acquire)
    }

    /// Finish queued work and stop the worker.
    fn shutdown(&mut self) {
        drop(self.sender.take());
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("Simulated queue thread panicked");
            }
        }
    }
}

impl Drop for SimulatedQueue {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn wait_fence(fence: &Fence, frame: u64, timeout: Duration) -> Result<()> {
    if fence.wait(timeout) {
        Ok(())
    } else {
        warn!(frame, "Timed out waiting for simulated frame");
        Err(RenderError::DeviceLost)
    }
}

/// GPU-less backend. See the module docs.
pub struct HeadlessRenderer {
    state: RendererState,
    queue: Option<SimulatedQueue>,
    frames: InFlightFrames<Arc<Fence>>,
    draws: Vec<DrawRecord>,
    skipped_frames: u64,
    rebuilds: u64,
    fence_timeout: Duration,
}

impl HeadlessRenderer {
    pub fn new(window: &Rc<dyn Window>, config: &HeadlessConfig) -> Result<Self> {
        let mut state = RendererState::new(&Rc::downgrade(window))?;
        let queue = SimulatedQueue::spawn(config)?;
        let frames = InFlightFrames::new((0..IN_FLIGHT).map(|_| Arc::new(Fence::default())));

        state.mark_initialized();
        info!(
            "Headless renderer ready (simulated latency {:?})",
            config.gpu_latency
        );

        Ok(Self {
            state,
            queue: Some(queue),
            frames,
            draws: Vec::new(),
            skipped_frames: 0,
            rebuilds: 0,
            fence_timeout: fence_timeout(config.gpu_latency),
        })
    }

    /// Every submitted frame, oldest first. Kept after cleanup.
    pub fn draws(&self) -> &[DrawRecord] {
        &self.draws
    }

    /// Frames counted but not submitted because the viewport had no area.
    pub const fn skipped_frames(&self) -> u64 {
        self.skipped_frames
    }

    /// How many times size-dependent resources were rebuilt.
    pub const fn rebuilds(&self) -> u64 {
        self.rebuilds
    }

    /// Frames the simulated queue has finished.
    pub fn completed_frames(&self) -> u64 {
        self.queue.as_ref().map_or(0, SimulatedQueue::completed)
    }
}

impl Renderer for HeadlessRenderer {
    fn api(&self) -> RenderApi {
        RenderApi::Headless
    }

    fn state(&self) -> &RendererState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut RendererState {
        &mut self.state
    }

    fn update(&mut self) -> Result<()> {
        self.state.ensure_alive()?;
        if self.state.sync_window_size()? {
            // Same ordering a swapchain rebuild needs: drain, then rebuild.
            let timeout = self.fence_timeout;
            self.frames
                .retire_all(|fence, frame| wait_fence(fence, frame, timeout))?;
            self.rebuilds += 1;
            let size = self.state.size();
            debug!("Headless targets rebuilt at {}x{}", size.x, size.y);
        }
        Ok(())
    }

    fn draw(&mut self, camera: &Camera) -> Result<()> {
        self.state.ensure_drawable()?;
        let queue = self.queue.as_ref().ok_or(RenderError::CleanedUp)?;

        let frame = self.state.frame_number();
        let viewport = self.state.size();

        if viewport.x == 0 || viewport.y == 0 {
            trace!(frame, "viewport has no area, skipping submission");
            self.skipped_frames += 1;
            self.state.advance_frame();
            return Ok(());
        }

        let timeout = self.fence_timeout;
        let slot = self
            .frames
            .acquire(|fence, frame| wait_fence(fence, frame, timeout))?;
        let completed_at_submit = queue.completed();

        let fence = self.frames.resources(slot);
        fence.reset();
        queue.submit(frame, Arc::clone(fence))?;
        self.frames.mark_submitted(slot, frame);

        self.draws.push(DrawRecord {
            frame,
            camera: camera.name().to_string(),
            view_projection: camera.view_projection(),
            viewport,
            outstanding: self.frames.outstanding(),
            completed_at_submit,
        });
        trace!(frame, slot, camera = camera.name(), "headless frame submitted");

        self.state.advance_frame();
        Ok(())
    }

    fn cleanup(&mut self) {
        if !self.state.begin_cleanup() {
            return;
        }
        let timeout = self.fence_timeout;
        if let Err(e) = self
            .frames
            .retire_all(|fence, frame| wait_fence(fence, frame, timeout))
        {
            warn!("Frames still in flight at cleanup: {e}");
        }
        if let Some(mut queue) = self.queue.take() {
            queue.shutdown();
        }
        info!(
            "Headless renderer cleaned up after {} frames",
            self.state.frame_number()
        );
    }

    fn frame_stats(&self) -> FrameStats {
        self.frames.stats()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Drop for HeadlessRenderer {
    fn drop(&mut self) {
        self.cleanup();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::Lifecycle;
    use bretema_platform::{HeadlessWindow, WindowConfig};

    fn setup(latency_ms: u64) -> (Rc<HeadlessWindow>, HeadlessRenderer) {
        let window = Rc::new(HeadlessWindow::new(
            &WindowConfig::new("headless").with_size(320, 200),
        ));
        let dyn_window: Rc<dyn Window> = window.clone();
        let config = HeadlessConfig {
            gpu_latency: Duration::from_millis(latency_ms),
            ..HeadlessConfig::default()
        };
        let renderer = HeadlessRenderer::new(&dyn_window, &config).unwrap();
        (window, renderer)
    }

    #[test]
    fn starts_initialized() {
        let (_window, renderer) = setup(0);
        assert!(renderer.is_initialized());
        assert_eq!(renderer.viewport_width(), 320);
        assert_eq!(renderer.viewport_height(), 200);
        assert_eq!(renderer.frame_number(), 0);
    }

    #[test]
    fn update_tracks_window_size() {
        let (window, mut renderer) = setup(0);

        renderer.update().unwrap();
        assert!(!renderer.size_changed());

        window.set_size(UVec2::new(800, 600));
        renderer.update().unwrap();
        assert!(renderer.size_changed());
        assert_eq!(renderer.viewport(), UVec2::new(800, 600));

        renderer.update().unwrap();
        assert!(!renderer.size_changed());
        assert_eq!(renderer.rebuilds(), 1);
    }

    #[test]
    fn draw_counts_frames_regardless_of_cameras() {
        let (_window, mut renderer) = setup(0);
        let cameras = [Camera::main(), Camera::new("Left"), Camera::new("Right")];

        for _ in 0..4 {
            for camera in &cameras {
                renderer.draw(camera).unwrap();
            }
        }

        assert_eq!(renderer.frame_number(), 12);
        assert_eq!(renderer.draws().len(), 12);
        assert_eq!(renderer.draws()[1].camera, "Left");
    }

    #[test]
    fn never_more_than_in_flight_outstanding() {
        let (_window, mut renderer) = setup(2);
        let camera = Camera::main();

        for _ in 0..12 {
            renderer.draw(&camera).unwrap();
        }

        let draws = renderer.draws();
        for (k, draw) in draws.iter().enumerate() {
            assert!(draw.outstanding <= IN_FLIGHT);
            if k >= IN_FLIGHT {
                // Frame k - IN_FLIGHT had retired before frame k went out.
                assert!(draw.completed_at_submit >= (k - IN_FLIGHT + 1) as u64);
            }
        }
        assert!(renderer.frame_stats().peak_in_flight <= IN_FLIGHT);
    }

    #[test]
    fn zero_area_frames_are_counted_not_submitted() {
        let (window, mut renderer) = setup(0);
        window.set_size(UVec2::ZERO);
        renderer.update().unwrap();

        renderer.draw(&Camera::main()).unwrap();
        assert_eq!(renderer.frame_number(), 1);
        assert_eq!(renderer.skipped_frames(), 1);
        assert!(renderer.draws().is_empty());
    }

    #[test]
    fn cleanup_is_idempotent() {
        let (_window, mut renderer) = setup(1);
        renderer.draw(&Camera::main()).unwrap();

        renderer.cleanup();
        let stats = renderer.frame_stats();
        let frames = renderer.frame_number();

        renderer.cleanup();
        assert_eq!(renderer.state().lifecycle(), Lifecycle::CleanedUp);
        assert_eq!(renderer.frame_stats(), stats);
        assert_eq!(renderer.frame_number(), frames);
        assert_eq!(stats.outstanding(), 0);
        assert_eq!(renderer.completed_frames(), 0);

        assert!(matches!(
            renderer.draw(&Camera::main()),
            Err(RenderError::CleanedUp)
        ));
        assert!(matches!(renderer.update(), Err(RenderError::CleanedUp)));
    }

    #[test]
    fn fence_wait_outlasts_slow_frames() {
        let latency = Duration::from_secs(6);
        assert!(fence_timeout(latency) > latency * (IN_FLIGHT as u32));

        let (_window, renderer) = setup(6_000);
        assert_eq!(renderer.fence_timeout, fence_timeout(latency));
    }

    #[test]
    fn lost_device_fails_draws() {
        let window: Rc<dyn Window> = Rc::new(HeadlessWindow::new(&WindowConfig::default()));
        let config = HeadlessConfig {
            lose_device_after: Some(2),
            ..HeadlessConfig::default()
        };
        let mut renderer = HeadlessRenderer::new(&window, &config).unwrap();
        let camera = Camera::main();

        let failed_at = (0..10).find(|_| renderer.draw(&camera).is_err());
        // Frame 1's fence is waited on before frame 4 is submitted.
        assert!(matches!(failed_at, Some(frame) if (2..=4).contains(&frame)));
        assert!(matches!(renderer.draw(&camera), Err(RenderError::DeviceLost)));

        renderer.cleanup();
        assert_eq!(renderer.state().lifecycle(), Lifecycle::CleanedUp);
    }

    #[test]
    fn window_dropped_under_renderer() {
        let (window, mut renderer) = setup(0);
        drop(window);
        assert!(matches!(renderer.update(), Err(RenderError::InvalidWindow)));
    }
}
