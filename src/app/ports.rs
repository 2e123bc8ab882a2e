//! Port traits: the hexagonal boundary between domain logic and the host.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ DetectorService (domain)
//! ```
//!
//! The host platform (sensor framework, vibrator, tone generator, view)
//! implements these traits.  The [`DetectorService`](super::service::DetectorService)
//! consumes them via generics, so the domain core never touches the
//! platform directly.
//!
//! ## Threading
//!
//! Every port method is called from the sample-delivery callback or a UI
//! callback, never concurrently.  Feedback methods must not block: they
//! start the pulse/tone and return.

use crate::error::{FeedbackError, SensorError};
use crate::sensors::SensorRate;

// ───────────────────────────────────────────────────────────────
// Magnetometer port (driven adapter: sensor framework ↔ domain)
// ───────────────────────────────────────────────────────────────

/// Subscription control for the magnetometer stream.
///
/// Samples themselves flow the other way: the host calls
/// [`DetectorService::on_sample`](super::service::DetectorService::on_sample)
/// for every delivery while subscribed.
pub trait MagnetometerPort {
    /// Whether the host has a magnetometer at all.
    fn is_available(&self) -> bool;

    /// Register for deliveries at the given cadence.
    fn subscribe(&mut self, rate: SensorRate) -> Result<(), SensorError>;

    /// Stop deliveries.  Idempotent.
    fn unsubscribe(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Feedback port (driven adapter: domain → view / vibrator / tone)
// ───────────────────────────────────────────────────────────────

/// All user-facing output sinks.
pub trait FeedbackPort {
    /// Display sink: replace the reading text.
    fn render_text(&mut self, text: &str);

    /// Visual sink: scale the reading view (1.0 = neutral).
    fn set_scale(&mut self, scale: f32);

    /// Update the start/stop affordance.
    fn set_toggle(&mut self, label: &str, enabled: bool);

    /// Haptic sink: fire one vibration of `duration_ms` at default amplitude.
    fn vibrate(&mut self, duration_ms: u32) -> Result<(), FeedbackError>;

    /// Audio sink: play one tone of `duration_ms` at `volume_percent`.
    fn play_tone(&mut self, duration_ms: u32, volume_percent: u8) -> Result<(), FeedbackError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond clock used to timestamp samples.
pub trait ClockPort {
    fn now_ms(&self) -> u64;
}
