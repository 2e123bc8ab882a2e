//! Visual pulse animator.
//!
//! Produces a time-varying scale factor for the reading view while the
//! detector is alerting.  The host calls [`PulseAnimator::tick`] from its
//! frame callback and applies the returned scale to the view.
//!
//! ## Shape
//!
//! ```text
//!  scale
//!  max ┤     ╭─╮           ╭─╮
//!      │   ╭╯   ╰╮       ╭╯   ╰╮
//!  1.0 ┼──╯       ╰─────╯       ╰── ...
//!      0   half   2·half
//! ```
//!
//! Grows from 1.0 to `max_scale` over `half_period_ms`, then reverses,
//! repeating indefinitely.  Each half uses an accelerate/decelerate
//! (cosine) ease.  When not running the scale is exactly [`NEUTRAL_SCALE`].

use core::f32::consts::PI;

use crate::config::{DetectorConfig, MAX_PULSE_HALF_PERIOD_MS};

/// Resting scale of the reading view.
pub const NEUTRAL_SCALE: f32 = 1.0;

pub struct PulseAnimator {
    phase_ms: u32,
    running: bool,
    max_scale: f32,
    half_period_ms: u32,
}

impl PulseAnimator {
    /// `half_period_ms` is clamped to `1..=MAX_PULSE_HALF_PERIOD_MS`.
    pub fn new(max_scale: f32, half_period_ms: u32) -> Self {
        Self {
            phase_ms: 0,
            running: false,
            max_scale,
            half_period_ms: clamp_half_period(half_period_ms),
        }
    }

    pub fn from_config(config: &DetectorConfig) -> Self {
        Self::new(config.pulse_scale_max, config.pulse_half_period_ms)
    }

    /// Begin oscillating from the neutral scale.  No-op if already running.
    pub fn start(&mut self) {
        if !self.running {
            self.running = true;
            self.phase_ms = 0;
        }
    }

    /// Stop oscillating; the scale snaps back to neutral.
    pub fn cancel(&mut self) {
        self.running = false;
        self.phase_ms = 0;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Change the oscillation shape.  The phase restarts so the next frame
    /// does not jump.
    pub fn set_shape(&mut self, max_scale: f32, half_period_ms: u32) {
        self.max_scale = max_scale;
        self.half_period_ms = clamp_half_period(half_period_ms);
        self.phase_ms = 0;
    }

    /// Advance the phase by `delta_ms` and return the scale to apply.
    pub fn tick(&mut self, delta_ms: u32) -> f32 {
        if self.running {
            let cycle = u64::from(self.half_period_ms) * 2;
            self.phase_ms = ((u64::from(self.phase_ms) + u64::from(delta_ms)) % cycle) as u32;
        }
        self.scale()
    }

    /// Scale at the current phase.
    pub fn scale(&self) -> f32 {
        if !self.running {
            return NEUTRAL_SCALE;
        }
        let half = self.half_period_ms;
        let pos = self.phase_ms % (half * 2);
        let fraction = if pos < half {
            pos as f32 / half as f32
        } else {
            (half - (pos - half)) as f32 / half as f32
        };
        let eased = 0.5 - 0.5 * (PI * fraction).cos();
        NEUTRAL_SCALE + (self.max_scale - NEUTRAL_SCALE) * eased
    }
}

fn clamp_half_period(ms: u32) -> u32 {
    ms.clamp(1, MAX_PULSE_HALF_PERIOD_MS)
}
