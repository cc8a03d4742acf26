/// Result of advancing a countdown by one second.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tick {
    /// Still counting; `remaining` seconds left.
    Running { remaining: u32 },
    /// Reached zero on this tick. Reported exactly once.
    Expired,
    /// Already stopped; the tick had no effect.
    Stopped,
}

/// Whole-second countdown for timed quizzes.
///
/// Pure state: something else decides when a second has passed and calls `tick`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Countdown {
    total: u32,
    remaining: u32,
    stopped: bool,
}

impl Countdown {
    /// Countdown for a time limit in whole minutes. `None` for a zero limit.
    #[must_use]
    pub fn from_minutes(minutes: u32) -> Option<Self> {
        Self::from_seconds(minutes.saturating_mul(60))
    }

    /// Countdown of `seconds`. `None` for zero.
    #[must_use]
    pub fn from_seconds(seconds: u32) -> Option<Self> {
        (seconds > 0).then_some(Self {
            total: seconds,
            remaining: seconds,
            stopped: false,
        })
    }

    pub fn tick(&mut self) -> Tick {
        if self.stopped {
            return Tick::Stopped;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.stopped = true;
            return Tick::Expired;
        }
        Tick::Running {
            remaining: self.remaining,
        }
    }

    /// Freeze the countdown; later ticks report `Stopped`.
    pub fn stop(&mut self) {
        self.stopped = true;
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.stopped
    }

    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn elapsed(&self) -> u32 {
        self.total - self.remaining
    }

    /// Under a minute left.
    #[must_use]
    pub fn is_low(&self) -> bool {
        self.remaining < 60
    }

    /// `m:ss`
    #[must_use]
    pub fn format_clock(&self) -> String {
        format_clock(self.remaining)
    }
}

#[must_use]
pub fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
