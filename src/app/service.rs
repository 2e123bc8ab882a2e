//! Detector service: the hexagonal core.
//!
//! [`DetectorService`] owns the conditioner, alert trigger, pulse animator
//! and lifecycle controller.  It exposes a host-agnostic API; all I/O
//! flows through port traits injected at call sites, so the entire
//! service is testable with mock adapters.
//!
//! ```text
//!  MagnetometerPort ──▶ ┌──────────────────────────────┐ ──▶ EventSink
//!                       │       DetectorService         │
//!     FeedbackPort ◀────│ Conditioner · Trigger · Pulse │
//!                       └──────────────────────────────┘
//! ```
//!
//! Host wiring, in callback order:
//!
//! 1. [`attach`](DetectorService::attach) once the view exists.
//! 2. [`handle_command`](DetectorService::handle_command) for button
//!    presses and foreground/background callbacks.
//! 3. [`on_sample`](DetectorService::on_sample) for every sensor delivery.
//! 4. [`advance_animation`](DetectorService::advance_animation) from the
//!    frame callback.

use log::{debug, info, trace, warn};

use crate::alert::{AlertDecision, AlertTrigger};
use crate::conditioning::SignalConditioner;
use crate::config::DetectorConfig;
use crate::error::Result;
use crate::feedback::display::{SENSOR_UNAVAILABLE_MSG, START_LABEL, STOP_LABEL};
use crate::feedback::{NEUTRAL_SCALE, PulseAnimator, format_reading};
use crate::fsm::StateId;
use crate::fsm::context::VisualCommand;
use crate::lifecycle::{DetectionLifecycle, DetectionState, SubscriptionAction};
use crate::sensors::Sample;

use super::commands::AppCommand;
use super::events::{AppEvent, DetectorStats};
use super::ports::{EventSink, FeedbackPort, MagnetometerPort};

// ───────────────────────────────────────────────────────────────
// DetectorService
// ───────────────────────────────────────────────────────────────

pub struct DetectorService {
    config: DetectorConfig,
    conditioner: SignalConditioner,
    trigger: AlertTrigger,
    animator: PulseAnimator,
    lifecycle: DetectionLifecycle,
    /// Latest smoothed magnitude (µT).
    magnitude: f32,
    samples: u64,
    pulses: u64,
    feedback_suppressed: u64,
}

impl DetectorService {
    /// Construct the service from configuration.
    ///
    /// The sensor is treated as missing until [`attach`](Self::attach)
    /// has probed it.
    pub fn new(config: DetectorConfig) -> Self {
        Self {
            conditioner: SignalConditioner::from_config(&config),
            trigger: AlertTrigger::from_config(&config),
            animator: PulseAnimator::from_config(&config),
            lifecycle: DetectionLifecycle::new(false),
            config,
            magnitude: 0.0,
            samples: 0,
            pulses: 0,
            feedback_suppressed: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Probe the sensor and set up the view.  Returns whether detection
    /// can be used at all.
    pub fn attach(
        &mut self,
        sensor: &impl MagnetometerPort,
        ui: &mut impl FeedbackPort,
        sink: &mut impl EventSink,
    ) -> bool {
        let available = sensor.is_available();
        self.lifecycle = DetectionLifecycle::new(available);
        if available {
            ui.set_toggle(START_LABEL, true);
            info!("DetectorService attached (threshold {:.1} µT)", self.config.threshold_ut);
        } else {
            self.surface_unavailable(ui, sink);
        }
        available
    }

    /// Start detecting.  Resets the filter and the alert state.
    pub fn start(
        &mut self,
        sensor: &mut impl MagnetometerPort,
        ui: &mut impl FeedbackPort,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        if self.lifecycle.is_running() {
            return Ok(());
        }
        let action = match self.lifecycle.start() {
            Ok(action) => action,
            Err(e) => {
                self.surface_unavailable(ui, sink);
                return Err(e.into());
            }
        };

        self.conditioner.reset();
        self.trigger.reset();
        self.reset_visual(ui);

        if action == SubscriptionAction::Subscribe {
            if let Err(e) = sensor.subscribe(self.config.sensor_rate) {
                warn!("magnetometer subscription failed: {}", e);
                self.lifecycle.subscription_failed();
                ui.set_toggle(START_LABEL, true);
                return Err(e.into());
            }
        }

        ui.set_toggle(STOP_LABEL, true);
        sink.emit(&AppEvent::DetectionStarted {
            rate: self.config.sensor_rate,
        });
        Ok(())
    }

    /// Stop detecting, drop the subscription and return the view to neutral.
    pub fn stop(
        &mut self,
        sensor: &mut impl MagnetometerPort,
        ui: &mut impl FeedbackPort,
        sink: &mut impl EventSink,
    ) {
        if !self.lifecycle.is_running() {
            return;
        }
        if self.lifecycle.stop() == SubscriptionAction::Unsubscribe {
            sensor.unsubscribe();
        }
        self.trigger.reset();
        self.reset_visual(ui);
        ui.set_toggle(START_LABEL, true);
        sink.emit(&AppEvent::DetectionStopped);
    }

    /// Start if stopped, stop if running.
    pub fn toggle(
        &mut self,
        sensor: &mut impl MagnetometerPort,
        ui: &mut impl FeedbackPort,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        if self.lifecycle.is_running() {
            self.stop(sensor, ui, sink);
            Ok(())
        } else {
            self.start(sensor, ui, sink)
        }
    }

    /// Host went to the background: stop consuming samples.
    pub fn pause(
        &mut self,
        sensor: &mut impl MagnetometerPort,
        ui: &mut impl FeedbackPort,
        sink: &mut impl EventSink,
    ) {
        if self.lifecycle.pause() == SubscriptionAction::Unsubscribe {
            sensor.unsubscribe();
        }
        self.reset_visual(ui);
        sink.emit(&AppEvent::Suspended);
    }

    /// Host is visible again: resubscribe if detection was running.
    pub fn resume(
        &mut self,
        sensor: &mut impl MagnetometerPort,
        ui: &mut impl FeedbackPort,
        sink: &mut impl EventSink,
    ) {
        let mut resubscribed = false;
        if self.lifecycle.resume() == SubscriptionAction::Subscribe {
            match sensor.subscribe(self.config.sensor_rate) {
                Ok(()) => resubscribed = true,
                Err(e) => {
                    warn!("resubscribe on resume failed: {}", e);
                    self.abandon_detection(ui, sink);
                }
            }
        }
        sink.emit(&AppEvent::Resumed { resubscribed });
    }

    // ── Per-sample processing ─────────────────────────────────

    /// Process one sensor delivery: condition → display → trigger → feedback.
    ///
    /// Deliveries arriving while unsubscribed (a late callback racing an
    /// unregister) are dropped without touching any state.
    pub fn on_sample(
        &mut self,
        sample: Sample,
        now_ms: u64,
        ui: &mut impl FeedbackPort,
        sink: &mut impl EventSink,
    ) -> AlertDecision {
        if !self.lifecycle.is_subscribed() {
            debug!("dropping sample delivered while unsubscribed");
            return AlertDecision::None;
        }
        self.samples = self.samples.saturating_add(1);

        // 1. Condition
        let magnitude = self.conditioner.update(sample);
        self.magnitude = magnitude;
        trace!("sample {:?} -> {:.2} µT", sample, magnitude);

        // 2. Display
        ui.render_text(&format_reading(magnitude));

        // 3. Threshold + debounce
        let was_alerting = self.trigger.is_alerting();
        let samples_alerting = self.trigger.samples_in_state();
        let decision = self.trigger.evaluate(magnitude, now_ms);

        match (was_alerting, self.trigger.is_alerting()) {
            (false, true) => {
                info!("alert: {:.1} µT >= {:.1} µT", magnitude, self.config.threshold_ut);
                sink.emit(&AppEvent::AlertEntered {
                    magnitude_ut: magnitude,
                });
            }
            (true, false) => {
                info!("alert cleared after {} samples", samples_alerting);
                sink.emit(&AppEvent::AlertCleared {
                    magnitude_ut: magnitude,
                    samples_alerting,
                });
            }
            _ => {}
        }

        // 4. Continuous visual feedback (level-triggered)
        self.drive_visual(ui);

        // 5. Discrete pulse (debounced)
        if decision == AlertDecision::Pulse {
            self.fire_pulse(ui);
            self.pulses = self.pulses.saturating_add(1);
            sink.emit(&AppEvent::Pulse {
                magnitude_ut: magnitude,
            });
        }

        decision
    }

    /// Frame callback: advance the visual pulse and push the scale.
    /// Returns the scale in effect.
    pub fn advance_animation(&mut self, delta_ms: u32, ui: &mut impl FeedbackPort) -> f32 {
        if !self.animator.is_running() {
            return NEUTRAL_SCALE;
        }
        let scale = self.animator.tick(delta_ms);
        ui.set_scale(scale);
        scale
    }

    // ── Command handling ──────────────────────────────────────

    /// Process an external command (button, lifecycle callback, settings).
    pub fn handle_command(
        &mut self,
        cmd: AppCommand,
        sensor: &mut impl MagnetometerPort,
        ui: &mut impl FeedbackPort,
        sink: &mut impl EventSink,
    ) {
        match cmd {
            AppCommand::ToggleDetection => {
                if let Err(e) = self.toggle(sensor, ui, sink) {
                    warn!("toggle detection failed: {}", e);
                }
            }
            AppCommand::StartDetection => {
                if let Err(e) = self.start(sensor, ui, sink) {
                    warn!("start detection failed: {}", e);
                }
            }
            AppCommand::StopDetection => self.stop(sensor, ui, sink),
            AppCommand::HostPaused => self.pause(sensor, ui, sink),
            AppCommand::HostResumed => self.resume(sensor, ui, sink),
            AppCommand::UpdateConfig(config) => {
                if let Err(e) = self.update_config(config, sensor, ui, sink) {
                    warn!("config update not applied: {}", e);
                }
            }
        }
    }

    /// Validate and apply a new configuration.  On rejection the running
    /// configuration is left untouched.
    pub fn update_config(
        &mut self,
        config: DetectorConfig,
        sensor: &mut impl MagnetometerPort,
        ui: &mut impl FeedbackPort,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        if let Err(e) = config.validate() {
            sink.emit(&AppEvent::ConfigRejected(e));
            return Err(e.into());
        }

        let filter_changed = config.smoothing_alpha != self.config.smoothing_alpha
            || config.smoothing != self.config.smoothing
            || config.filter_seed != self.config.filter_seed;
        let rate_changed = config.sensor_rate != self.config.sensor_rate;

        if filter_changed {
            self.conditioner = SignalConditioner::from_config(&config);
        }
        self.trigger.set_limits(config.threshold_ut, config.debounce_ms);
        self.animator
            .set_shape(config.pulse_scale_max, config.pulse_half_period_ms);
        self.config = config;

        if !self.config.visual_pulse_enabled && self.animator.is_running() {
            self.reset_visual(ui);
        }

        if rate_changed && self.lifecycle.is_subscribed() {
            sensor.unsubscribe();
            if let Err(e) = sensor.subscribe(self.config.sensor_rate) {
                warn!("resubscribe at {:?} failed: {}", self.config.sensor_rate, e);
                self.abandon_detection(ui, sink);
            }
        }

        info!("configuration updated");
        sink.emit(&AppEvent::ConfigUpdated);
        Ok(())
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn detection_state(&self) -> DetectionState {
        self.lifecycle.state()
    }

    pub fn alert_state(&self) -> StateId {
        self.trigger.state()
    }

    pub fn is_subscribed(&self) -> bool {
        self.lifecycle.is_subscribed()
    }

    /// Latest smoothed magnitude (µT).
    pub fn magnitude(&self) -> f32 {
        self.magnitude
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Whether the visual pulse is currently oscillating.
    pub fn is_pulsing(&self) -> bool {
        self.animator.is_running()
    }

    pub fn stats(&self) -> DetectorStats {
        DetectorStats {
            detection: self.lifecycle.state(),
            alert: self.trigger.state(),
            magnitude_ut: self.magnitude,
            samples: self.samples,
            pulses: self.pulses,
            feedback_suppressed: self.feedback_suppressed,
        }
    }

    // ── Internal ──────────────────────────────────────────────

    fn surface_unavailable(&mut self, ui: &mut impl FeedbackPort, sink: &mut impl EventSink) {
        warn!("no magnetometer; detection disabled");
        ui.render_text(SENSOR_UNAVAILABLE_MSG);
        ui.set_toggle(START_LABEL, false);
        sink.emit(&AppEvent::SensorUnavailable);
    }

    /// A resubscribe failed mid-session: fall back to `Stopped` exactly as
    /// an explicit stop would.
    fn abandon_detection(&mut self, ui: &mut impl FeedbackPort, sink: &mut impl EventSink) {
        self.lifecycle.subscription_failed();
        self.trigger.reset();
        self.reset_visual(ui);
        ui.set_toggle(START_LABEL, true);
        sink.emit(&AppEvent::DetectionStopped);
    }

    fn drive_visual(&mut self, ui: &mut impl FeedbackPort) {
        if self.trigger.is_alerting() {
            if self.config.visual_pulse_enabled && !self.animator.is_running() {
                self.animator.start();
                ui.set_scale(self.animator.scale());
            }
        } else if self.trigger.visual_command() == VisualCommand::Stop
            || self.animator.is_running()
        {
            self.reset_visual(ui);
        }
    }

    fn reset_visual(&mut self, ui: &mut impl FeedbackPort) {
        self.animator.cancel();
        ui.set_scale(NEUTRAL_SCALE);
    }

    /// Best-effort haptic + tone.  Failures are counted and swallowed.
    fn fire_pulse(&mut self, ui: &mut impl FeedbackPort) {
        if self.config.haptic_enabled {
            if let Err(e) = ui.vibrate(self.config.haptic_pulse_ms) {
                self.feedback_suppressed = self.feedback_suppressed.saturating_add(1);
                debug!("haptic pulse suppressed: {}", e);
            }
        }
        if self.config.tone_enabled {
            if let Err(e) = ui.play_tone(self.config.tone_ms, self.config.tone_volume_percent) {
                self.feedback_suppressed = self.feedback_suppressed.saturating_add(1);
                debug!("alert tone suppressed: {}", e);
            }
        }
    }
}
