/// Frame clock driven by host timestamps (seconds).
/// Yields the per-frame delta and the total time since the clock started.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    /// Timestamp of `start`, or `None` before the clock runs.
    start: Option<f64>,
    /// Timestamp of the previous tick (or of `start` before the first tick).
    last: f64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) the clock at `now`.
    pub fn start(&mut self, now: f64) {
        self.start = Some(now);
        self.last = now;
    }

    pub fn is_running(&self) -> bool {
        self.start.is_some()
    }

    /// Advance to `now` and return the seconds since the previous tick.
    /// The first tick measures from `start`. A clock that was never started
    /// starts itself and returns 0. Timestamps going backwards yield 0.
    pub fn tick(&mut self, now: f64) -> f32 {
        if self.start.is_none() {
            self.start(now);
            return 0.0;
        }
        let delta = (now - self.last).max(0.0);
        self.last = now.max(self.last);
        delta as f32
    }

    /// Seconds from `start` to the most recent tick.
    pub fn elapsed(&self) -> f32 {
        match self.start {
            Some(start) => (self.last - start) as f32,
            None => 0.0,
        }
    }
}
