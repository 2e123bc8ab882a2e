//! Outbound application events.
//!
//! The [`DetectorService`](super::service::DetectorService) emits these
//! through the [`EventSink`](super::ports::EventSink) port.  Adapters on
//! the other side decide what to do with them.

use crate::error::ConfigError;
use crate::fsm::StateId;
use crate::lifecycle::DetectionState;
use crate::sensors::SensorRate;

/// Structured events emitted by the detector core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// The host has no magnetometer; detection is disabled.
    SensorUnavailable,

    /// Detection started (the subscription may be deferred while in background).
    DetectionStarted { rate: SensorRate },

    /// Detection stopped and the subscription was dropped.
    DetectionStopped,

    /// The host went to the background.
    Suspended,

    /// The host returned; `resubscribed` is true if deliveries restart.
    Resumed { resubscribed: bool },

    /// The smoothed magnitude crossed the threshold upwards.
    AlertEntered { magnitude_ut: f32 },

    /// The smoothed magnitude dropped back below the threshold.
    AlertCleared {
        magnitude_ut: f32,
        samples_alerting: u64,
    },

    /// A discrete haptic/audio pulse was dispatched.
    Pulse { magnitude_ut: f32 },

    /// A new configuration is in effect.
    ConfigUpdated,

    /// A configuration update failed validation and was discarded.
    ConfigRejected(ConfigError),
}

/// Point-in-time counters suitable for logging.
#[derive(Debug, Clone, Copy)]
pub struct DetectorStats {
    pub detection: DetectionState,
    pub alert: StateId,
    pub magnitude_ut: f32,
    pub samples: u64,
    pub pulses: u64,
    /// Haptic/audio requests the host refused.
    pub feedback_suppressed: u64,
}
