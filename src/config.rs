//! Detector configuration parameters
//!
//! All tunable parameters for the detector.  Defaults are the named
//! constants below; a host can override any subset from a JSON document.

use serde::{Deserialize, Serialize};

use crate::conditioning::{FilterSeed, SmoothingStrategy};
use crate::error::ConfigError;
use crate::sensors::SensorRate;

/// Low-pass coefficient.  Observed range 0.1–0.15.
pub const DEFAULT_SMOOTHING_ALPHA: f32 = 0.15;
/// Alert threshold on the smoothed magnitude.  80 µT is the other
/// commonly used value.
pub const DEFAULT_THRESHOLD_UT: f32 = 60.0;
/// Minimum spacing between discrete haptic/audio pulses.
pub const DEFAULT_DEBOUNCE_MS: u32 = 300;
/// Vibration pulse length.  Observed range 40–120 ms.
pub const DEFAULT_HAPTIC_PULSE_MS: u32 = 40;
/// Alert tone length.
pub const DEFAULT_TONE_MS: u32 = 120;
/// Alert tone volume (0–100).
pub const DEFAULT_TONE_VOLUME_PERCENT: u8 = 80;
/// Peak scale factor of the visual pulse.
pub const DEFAULT_PULSE_SCALE_MAX: f32 = 1.12;
/// Time for the visual pulse to grow from 1.0 to its peak.
pub const DEFAULT_PULSE_HALF_PERIOD_MS: u32 = 350;
/// Longest accepted visual half period (ms).
pub const MAX_PULSE_HALF_PERIOD_MS: u32 = 60_000;

/// Core detector configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    // --- Conditioning ---
    /// Exponential smoothing coefficient, exclusive range (0, 1)
    pub smoothing_alpha: f32,
    pub smoothing: SmoothingStrategy,
    pub filter_seed: FilterSeed,

    // --- Alerting ---
    /// Smoothed magnitude (µT) at or above which the detector alerts
    pub threshold_ut: f32,
    /// Minimum spacing (ms) between discrete pulses; 0 pulses every sample
    pub debounce_ms: u32,

    // --- Haptic ---
    pub haptic_enabled: bool,
    pub haptic_pulse_ms: u32,

    // --- Audio ---
    pub tone_enabled: bool,
    pub tone_ms: u32,
    pub tone_volume_percent: u8,

    // --- Visual ---
    pub visual_pulse_enabled: bool,
    pub pulse_scale_max: f32,
    pub pulse_half_period_ms: u32,

    // --- Sensor ---
    pub sensor_rate: SensorRate,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            smoothing_alpha: DEFAULT_SMOOTHING_ALPHA,
            smoothing: SmoothingStrategy::PerAxis,
            filter_seed: FilterSeed::Zero,

            threshold_ut: DEFAULT_THRESHOLD_UT,
            debounce_ms: DEFAULT_DEBOUNCE_MS,

            haptic_enabled: true,
            haptic_pulse_ms: DEFAULT_HAPTIC_PULSE_MS,

            tone_enabled: true,
            tone_ms: DEFAULT_TONE_MS,
            tone_volume_percent: DEFAULT_TONE_VOLUME_PERCENT,

            visual_pulse_enabled: true,
            pulse_scale_max: DEFAULT_PULSE_SCALE_MAX,
            pulse_half_period_ms: DEFAULT_PULSE_HALF_PERIOD_MS,

            sensor_rate: SensorRate::Game,
        }
    }
}

impl DetectorConfig {
    /// Range-check every field.  Invalid values are rejected, never clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let alpha = self.smoothing_alpha;
        if !alpha.is_finite() || alpha <= 0.0 || alpha >= 1.0 {
            return Err(ConfigError::ValidationFailed(
                "smoothing_alpha must be in (0, 1)",
            ));
        }
        if !self.threshold_ut.is_finite() || self.threshold_ut <= 0.0 {
            return Err(ConfigError::ValidationFailed(
                "threshold_ut must be positive",
            ));
        }
        if self.haptic_enabled && self.haptic_pulse_ms == 0 {
            return Err(ConfigError::ValidationFailed(
                "haptic_pulse_ms must be non-zero",
            ));
        }
        if self.tone_enabled && self.tone_ms == 0 {
            return Err(ConfigError::ValidationFailed("tone_ms must be non-zero"));
        }
        if self.tone_volume_percent > 100 {
            return Err(ConfigError::ValidationFailed(
                "tone_volume_percent must be 0-100",
            ));
        }
        if !self.pulse_scale_max.is_finite() || self.pulse_scale_max < 1.0 {
            return Err(ConfigError::ValidationFailed(
                "pulse_scale_max must be >= 1.0",
            ));
        }
        if !(1..=MAX_PULSE_HALF_PERIOD_MS).contains(&self.pulse_half_period_ms) {
            return Err(ConfigError::ValidationFailed(
                "pulse_half_period_ms must be 1-60000",
            ));
        }
        Ok(())
    }

    /// Parse a (possibly partial) JSON override on top of the defaults and
    /// validate the result.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text).map_err(|e| {
            log::warn!("config parse error: {}", e);
            ConfigError::Malformed
        })?;
        config.validate()?;
        Ok(config)
    }
}
