//! Tick timing.

use std::time::Instant;

/// Source of the time elapsed between two ticks.
pub trait Clock {
    /// Seconds since the previous call (or since construction).
    fn elapsed(&mut self) -> f32;

    /// Restarts measurement so the next [`elapsed`](Self::elapsed) excludes
    /// everything before this call.
    fn reset(&mut self) {}
}

/// Measures real elapsed time.
#[derive(Debug, Clone)]
pub struct WallClock {
    last: Instant,
}

impl WallClock {
    /// Starts measuring from now.
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
        }
    }
}

impl Default for WallClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for WallClock {
    fn elapsed(&mut self) -> f32 {
        let now = Instant::now();
        let dt = now.duration_since(self.last).as_secs_f32();
        self.last = now;
        dt
    }

    fn reset(&mut self) {
        self.last = Instant::now();
    }
}

/// Reports the same step every tick; used for headless and reproducible runs.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub f32);

impl Clock for FixedClock {
    fn elapsed(&mut self) -> f32 {
        self.0
    }
}

/// Floors a raw tick delta at `min_dt`; non-finite deltas also read as `min_dt`.
pub fn clamp_dt(raw: f32, min_dt: f32) -> f32 {
    if raw.is_finite() { raw.max(min_dt) } else { min_dt }
}
