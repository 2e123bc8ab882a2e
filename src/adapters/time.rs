//! Monotonic clock adapter.
//!
//! Timestamps sensor deliveries for the debounce window.  Backed by
//! `std::time::Instant`, so it never goes backwards even if the wall clock
//! is adjusted.

use std::time::Instant;

use crate::app::ports::ClockPort;

pub struct MonotonicClock {
    start: Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Seconds since construction.
    pub fn uptime_secs(&self) -> u64 {
        self.start.elapsed().as_secs()
    }
}

impl ClockPort for MonotonicClock {
    /// Milliseconds since construction.
    fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}
