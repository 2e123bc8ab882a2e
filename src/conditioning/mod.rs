//! Signal conditioning: raw magnetometer samples in, smoothed scalar
//! magnitude out.

pub mod smoothing;

pub use smoothing::{FilterSeed, FilterState, MIN_ALPHA, SignalConditioner, SmoothingStrategy};
