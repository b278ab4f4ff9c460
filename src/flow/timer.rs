//! Countdown timer advanced by external frame deltas
//!
//! Used for question rounds, minigames and the optional auto-advance
//! delay. The timer never reads a clock.

/// Presentation band for the remaining time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerBand {
    Normal,
    /// At most half the limit left
    Warning,
    /// At most a quarter of the limit left
    Critical,
}

impl TimerBand {
    /// Classify remaining time against the limit
    pub fn classify(remaining: f32, limit: f32) -> Self {
        if remaining <= limit / 4.0 {
            TimerBand::Critical
        } else if remaining <= limit / 2.0 {
            TimerBand::Warning
        } else {
            TimerBand::Normal
        }
    }
}

/// Countdown with a single expiry
#[derive(Debug, Clone, Default)]
pub struct RoundTimer {
    limit: f32,
    remaining: f32,
    running: bool,
}

impl RoundTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) counting down from `limit` seconds.
    /// A non-positive limit expires on the next tick.
    pub fn start(&mut self, limit: f32) {
        let limit = limit.max(0.0);
        self.limit = limit;
        self.remaining = limit;
        self.running = true;
    }

    /// Advance by `dt` seconds. Returns true exactly once, on the tick
    /// that reaches zero.
    pub fn tick(&mut self, dt: f32) -> bool {
        if !self.running {
            return false;
        }
        self.remaining = (self.remaining - dt.max(0.0)).max(0.0);
        if self.remaining <= 0.0 {
            self.running = false;
            return true;
        }
        false
    }

    /// Stop without expiring (manual accept)
    pub fn stop_early(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    pub fn limit(&self) -> f32 {
        self.limit
    }

    pub fn band(&self) -> TimerBand {
        TimerBand::classify(self.remaining, self.limit)
    }
}
