//! Frame timing and FPS statistics.

use std::time::{Duration, Instant};

use tracing::info;

/// Aggregate FPS over a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FpsStats {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    pub frames: u64,
}

/// Measures delta time between loop iterations.
#[derive(Debug)]
pub struct FrameTimer {
    last_tick: Option<Instant>,
    last_frame_time: Duration,
    frames: u64,
    min_fps: f64,
    max_fps: f64,
    fps_sum: f64,
    /// Ticks that produced an FPS sample.
    samples: u64,
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameTimer {
    pub const fn new() -> Self {
        Self {
            last_tick: None,
            last_frame_time: Duration::ZERO,
            frames: 0,
            min_fps: f64::MAX,
            max_fps: 0.0,
            fps_sum: 0.0,
            samples: 0,
        }
    }

    /// Start a new frame and return seconds since the previous one.
    ///
    /// The first tick returns zero.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let dt = self
            .last_tick
            .replace(now)
            .map_or(Duration::ZERO, |last| now.duration_since(last));
        self.last_frame_time = dt;
        self.frames += 1;

        let secs = dt.as_secs_f64();
        if secs > 0.0 {
            let fps = 1.0 / secs;
            self.min_fps = self.min_fps.min(fps);
            self.max_fps = self.max_fps.max(fps);
            self.fps_sum += fps;
            self.samples += 1;
        }
        dt.as_secs_f32()
    }

    pub const fn frames(&self) -> u64 {
        self.frames
    }

    /// Duration between the last two ticks.
    pub const fn last_frame_time(&self) -> Duration {
        self.last_frame_time
    }

    #[allow(clippy::cast_precision_loss)]
    pub fn stats(&self) -> Option<FpsStats> {
        (self.samples > 0).then(|| FpsStats {
            min: self.min_fps,
            max: self.max_fps,
            avg: self.fps_sum / self.samples as f64,
            frames: self.frames,
        })
    }

    pub fn log_stats(&self) {
        if let Some(stats) = self.stats() {
            info!("FPS Statistics:");
            info!("  Min: {:.1}", stats.min);
            info!("  Max: {:.1}", stats.max);
            info!("  Avg: {:.1}", stats.avg);
            info!("  Total frames: {}", stats.frames);
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn first_tick_is_zero() {
        let mut timer = FrameTimer::new();
        assert_eq!(timer.tick(), 0.0);
        assert_eq!(timer.frames(), 1);
        assert!(timer.stats().is_none());
    }

    #[test]
    fn tracks_fps_range() {
        let mut timer = FrameTimer::new();
        timer.tick();
        thread::sleep(Duration::from_millis(2));
        let dt = timer.tick();
        assert!(dt > 0.0);

        let stats = timer.stats().unwrap();
        assert_eq!(stats.frames, 2);
        assert!(stats.min <= stats.avg && stats.avg <= stats.max);

        timer.reset();
        assert_eq!(timer.frames(), 0);
    }
}
