//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the `log` facade.  A telemetry or UI-overlay adapter would implement
//! the same trait.

use log::{info, warn};

use crate::app::events::{AppEvent, DetectorStats};
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] as a one-line tagged record.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }

    /// Log a stats snapshot in the same tagged format.
    pub fn log_stats(&self, s: &DetectorStats) {
        info!(
            "STATS | detection={:?} alert={:?} | B={:.1}\u{00b5}T | samples={} pulses={} \
             suppressed={}",
            s.detection, s.alert, s.magnitude_ut, s.samples, s.pulses, s.feedback_suppressed,
        );
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::SensorUnavailable => {
                warn!("SENSOR | magnetometer not available");
            }
            AppEvent::DetectionStarted { rate } => {
                info!("START | rate={:?}", rate);
            }
            AppEvent::DetectionStopped => {
                info!("STOP | detection stopped");
            }
            AppEvent::Suspended => {
                info!("HOST | suspended");
            }
            AppEvent::Resumed { resubscribed } => {
                info!("HOST | resumed, resubscribed={}", resubscribed);
            }
            AppEvent::AlertEntered { magnitude_ut } => {
                info!("ALERT | entered at {:.1}\u{00b5}T", magnitude_ut);
            }
            AppEvent::AlertCleared {
                magnitude_ut,
                samples_alerting,
            } => {
                info!(
                    "ALERT | cleared at {:.1}\u{00b5}T after {} samples",
                    magnitude_ut, samples_alerting
                );
            }
            AppEvent::Pulse { magnitude_ut } => {
                info!("PULSE | {:.1}\u{00b5}T", magnitude_ut);
            }
            AppEvent::ConfigUpdated => {
                info!("CONFIG | updated");
            }
            AppEvent::ConfigRejected(e) => {
                warn!("CONFIG | rejected: {}", e);
            }
        }
    }
}
