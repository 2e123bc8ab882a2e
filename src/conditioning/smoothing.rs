//! Exponential low-pass smoothing of the magnetic field.
//!
//! Two strategies are supported:
//!
//! | Strategy   | Filter state        | Output                          |
//! |------------|---------------------|---------------------------------|
//! | `PerAxis`  | smoothed (x, y, z)  | norm of the smoothed vector     |
//! | `Scalar`   | smoothed magnitude  | the smoothed magnitude itself   |
//!
//! Both use the incremental form `s += α·(raw − s)`, which is the textbook
//! `α·raw + (1−α)·s` rearranged so a steady input is approached from one
//! side and never overshot.

use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_SMOOTHING_ALPHA, DetectorConfig};
use crate::sensors::Sample;

/// Where the smoothing happens relative to the square root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SmoothingStrategy {
    /// Smooth each axis, then take the norm.  Noise is removed before the
    /// non-linear step.
    #[default]
    PerAxis,
    /// Take the norm of the raw sample, then smooth the scalar.
    Scalar,
}

/// Initial filter state after a reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FilterSeed {
    /// Start at zero; the first readings ramp up from 0 µT.
    #[default]
    Zero,
    /// Adopt the first observed sample verbatim.
    FirstSample,
}

/// Filter memory, shaped by the strategy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterState {
    Axes(Sample),
    Magnitude(f32),
}

impl FilterState {
    fn zeroed(strategy: SmoothingStrategy) -> Self {
        match strategy {
            SmoothingStrategy::PerAxis => Self::Axes(Sample::ZERO),
            SmoothingStrategy::Scalar => Self::Magnitude(0.0),
        }
    }

    fn seeded(strategy: SmoothingStrategy, raw: Sample) -> Self {
        match strategy {
            SmoothingStrategy::PerAxis => Self::Axes(raw),
            SmoothingStrategy::Scalar => Self::Magnitude(raw.magnitude()),
        }
    }
}

/// Smallest smoothing factor the conditioner will run with.
pub const MIN_ALPHA: f32 = 0.001;

/// Exponential smoother over magnetometer samples.
pub struct SignalConditioner {
    alpha: f32,
    strategy: SmoothingStrategy,
    seed: FilterSeed,
    state: FilterState,
    samples: u64,
}

impl SignalConditioner {
    /// Smaller `alpha` is smoother and slower.  Values are clamped to
    /// `MIN_ALPHA..=1.0`; a non-finite `alpha` falls back to the default.
    pub fn new(alpha: f32, strategy: SmoothingStrategy, seed: FilterSeed) -> Self {
        let alpha = if alpha.is_finite() {
            alpha.clamp(MIN_ALPHA, 1.0)
        } else {
            DEFAULT_SMOOTHING_ALPHA
        };
        Self {
            alpha,
            strategy,
            seed,
            state: FilterState::zeroed(strategy),
            samples: 0,
        }
    }

    pub fn from_config(config: &DetectorConfig) -> Self {
        Self::new(config.smoothing_alpha, config.smoothing, config.filter_seed)
    }

    /// Fold one raw sample into the filter and return the smoothed magnitude.
    pub fn update(&mut self, raw: Sample) -> f32 {
        self.samples = self.samples.saturating_add(1);

        if self.samples == 1 && self.seed == FilterSeed::FirstSample {
            self.state = FilterState::seeded(self.strategy, raw);
            return self.magnitude();
        }

        let a = self.alpha;
        match &mut self.state {
            FilterState::Axes(s) => {
                s.x += a * (raw.x - s.x);
                s.y += a * (raw.y - s.y);
                s.z += a * (raw.z - s.z);
            }
            FilterState::Magnitude(m) => {
                *m += a * (raw.magnitude() - *m);
            }
        }
        self.magnitude()
    }

    /// Current smoothed magnitude in µT.
    pub fn magnitude(&self) -> f32 {
        match self.state {
            FilterState::Axes(s) => s.magnitude(),
            FilterState::Magnitude(m) => m,
        }
    }

    pub fn state(&self) -> FilterState {
        self.state
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn strategy(&self) -> SmoothingStrategy {
        self.strategy
    }

    /// Samples folded in since construction or the last reset.
    pub fn samples_seen(&self) -> u64 {
        self.samples
    }

    /// Forget all history.  The next sample is treated as the first.
    pub fn reset(&mut self) {
        self.state = FilterState::zeroed(self.strategy);
        self.samples = 0;
    }
}
