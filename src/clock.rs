use std::time::{Duration, Instant};

/// Paces a loop at a fixed frame rate.
#[derive(Clone, Copy, Debug)]
pub struct FrameClock {
    interval: Duration,
    last: Option<Instant>,
}

impl FrameClock {
    /// A clock for `frame_rate` frames per second. A rate of 0 is treated as 1.
    #[must_use]
    pub fn new(frame_rate: u32) -> Self {
        Self {
            interval: Duration::from_secs_f64(1. / f64::from(frame_rate.max(1))),
            last: None,
        }
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Whether the next frame is due at `now`. The first call always is.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.last {
            Some(last) if now.saturating_duration_since(last) < self.interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }

    /// How long to wait at `now` for a frame that started at `start` to fill its interval.
    #[must_use]
    pub fn remaining(&self, start: Instant, now: Instant) -> Duration {
        self.interval.saturating_sub(now.saturating_duration_since(start))
    }
}
