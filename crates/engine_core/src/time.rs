//! Frame timing for the simulation loop.
//!
//! Two time bases are kept apart on purpose: the normalized per-tick delta that
//! drives movement, and the wall-clock millisecond stamp used for cooldowns.

use std::time::{Duration, Instant};

/// Frame milliseconds are scaled by this to get the simulation delta (1.0 ≈ one 60 Hz frame).
pub const DT_SCALE: f32 = 0.06;

/// Convert a frame duration into the normalized simulation delta.
pub fn sim_delta(frame: Duration) -> f32 {
    frame.as_secs_f32() * 1000.0 * DT_SCALE
}

/// Tracks frame delta and wall-clock time since start.
#[derive(Debug)]
pub struct FrameClock {
    /// Time of the last real-time update (None when driven manually).
    last_frame: Option<Instant>,
    /// Duration of the last frame.
    delta: Duration,
    /// Total elapsed time since start.
    elapsed: Duration,
    /// Frame count since start.
    frame_count: u64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last_frame: None,
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            frame_count: 0,
        }
    }

    /// Update from the real clock at the start of a new frame.
    pub fn update(&mut self) {
        let now = Instant::now();
        let delta = self.last_frame.map(|last| now - last).unwrap_or(Duration::ZERO);
        self.last_frame = Some(now);
        self.step(delta);
    }

    /// Advance by a fixed frame duration (headless runs, tests).
    pub fn advance(&mut self, frame: Duration) {
        self.step(frame);
    }

    fn step(&mut self, delta: Duration) {
        self.delta = delta;
        self.elapsed += delta;
        self.frame_count += 1;
    }

    /// Normalized simulation delta for this frame.
    pub fn dt(&self) -> f32 {
        sim_delta(self.delta)
    }

    /// Wall-clock milliseconds since the clock started.
    pub fn now_ms(&self) -> u64 {
        self.elapsed.as_millis() as u64
    }

    pub fn delta(&self) -> Duration {
        self.delta
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}
