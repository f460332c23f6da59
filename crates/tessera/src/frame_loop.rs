//! # Host Frame Loop
//!
//! ```text
//! loop {
//!     clock.tick(ctx.input_mut())    // delta_time, clamped
//!     ctx.new_frame()
//!     ... widgets ...
//!     let data = ctx.render()
//!     stats.record(clock.last_delta(), &data)
//!     backend.draw(&data)
//! }
//! ```

use std::time::{Duration, Instant};

use tessera_draw::DrawData;
use tessera_ui::InputState;
use tracing::debug;

/// Target frame time for 60 FPS.
pub const TARGET_FRAME_TIME: Duration = Duration::from_micros(16_666);

/// Longest delta handed to the context. Stalls (debugger, window drag) are
/// clamped so key repeat and the settings timer do not jump.
pub const MAX_DELTA_TIME: f32 = 0.1;

/// Shortest delta handed to the context; `new_frame` rejects zero.
pub const MIN_DELTA_TIME: f32 = 1.0e-4;

/// Measures wall time between frames.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    last_delta: f32,
}

impl FrameClock {
    /// Starts the clock now.
    #[must_use]
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
            last_delta: 1.0 / 60.0,
        }
    }

    /// Stores the time since the previous tick in `input.delta_time` and
    /// returns it.
    pub fn tick(&mut self, input: &mut InputState) -> f32 {
        let now = Instant::now();
        let delta = Self::clamp_delta(now.duration_since(self.last));
        self.last = now;
        self.last_delta = delta;
        input.delta_time = delta;
        delta
    }

    /// Delta produced by the last tick.
    #[must_use]
    pub fn last_delta(&self) -> f32 {
        self.last_delta
    }

    fn clamp_delta(elapsed: Duration) -> f32 {
        elapsed.as_secs_f32().clamp(MIN_DELTA_TIME, MAX_DELTA_TIME)
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Running totals over rendered frames.
#[derive(Debug, Clone)]
pub struct FrameStats {
    /// Frames recorded.
    pub frames: u64,
    /// Frames slower than [`TARGET_FRAME_TIME`].
    pub frames_over_budget: u64,
    /// Sum of frame deltas in seconds.
    pub total_time: f64,
    /// Shortest delta seen.
    pub min_delta: f32,
    /// Longest delta seen.
    pub max_delta: f32,
    /// Vertices in the last frame.
    pub last_vtx_count: usize,
    /// Indices in the last frame.
    pub last_idx_count: usize,
    /// Largest vertex count seen in one frame.
    pub peak_vtx_count: usize,
}

impl FrameStats {
    /// Creates an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self {
            frames: 0,
            frames_over_budget: 0,
            total_time: 0.0,
            min_delta: f32::MAX,
            max_delta: 0.0,
            last_vtx_count: 0,
            last_idx_count: 0,
            peak_vtx_count: 0,
        }
    }

    /// Records one frame.
    pub fn record(&mut self, delta: f32, data: &DrawData<'_>) {
        self.frames += 1;
        self.total_time += f64::from(delta);
        self.min_delta = self.min_delta.min(delta);
        self.max_delta = self.max_delta.max(delta);
        self.last_vtx_count = data.total_vtx_count;
        self.last_idx_count = data.total_idx_count;
        self.peak_vtx_count = self.peak_vtx_count.max(data.total_vtx_count);

        if delta > TARGET_FRAME_TIME.as_secs_f32() {
            self.frames_over_budget += 1;
            debug!(
                frame = self.frames,
                ms = f64::from(delta) * 1000.0,
                vertices = data.total_vtx_count,
                "frame over budget"
            );
        }
    }

    /// Mean frame time in milliseconds.
    #[must_use]
    pub fn avg_frame_ms(&self) -> f64 {
        if self.frames == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let frames = self.frames as f64;
        self.total_time / frames * 1000.0
    }
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_core::Vec2;

    #[test]
    fn test_delta_is_clamped() {
        assert_eq!(FrameClock::clamp_delta(Duration::ZERO), MIN_DELTA_TIME);
        assert_eq!(FrameClock::clamp_delta(Duration::from_secs(5)), MAX_DELTA_TIME);
        let d = FrameClock::clamp_delta(Duration::from_millis(20));
        assert!((d - 0.02).abs() < 1e-6);
    }

    #[test]
    fn test_tick_feeds_input() {
        let mut clock = FrameClock::new();
        let mut input = InputState::new();
        let delta = clock.tick(&mut input);
        assert_eq!(input.delta_time, delta);
        assert!(delta >= MIN_DELTA_TIME);
    }

    #[test]
    fn test_stats_accumulate() {
        let data = DrawData::new(Vec2::ZERO, Vec2::new(640.0, 480.0), Vec2::ONE);
        let mut stats = FrameStats::new();
        stats.record(0.010, &data);
        stats.record(0.030, &data);

        assert_eq!(stats.frames, 2);
        assert_eq!(stats.frames_over_budget, 1);
        assert!((stats.avg_frame_ms() - 20.0).abs() < 1e-3);
        assert_eq!(stats.max_delta, 0.030);
    }
}
