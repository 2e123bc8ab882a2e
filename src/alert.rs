//! Alert trigger.
//!
//! Wraps the two-state alert FSM behind a single call per sample:
//! [`AlertTrigger::evaluate`] takes the smoothed magnitude and a monotonic
//! timestamp and answers whether a discrete pulse should fire now.
//!
//! ## Two kinds of feedback
//!
//! 1. **Continuous** (visual), level-triggered: on while the magnitude is
//!    at or above the threshold, off as soon as it drops below.  Reported
//!    through [`AlertTrigger::visual_command`].
//! 2. **Discrete** (haptic/audio): a pulse fires on the crossing sample
//!    and then at most once per debounce window while the level holds.
//!    The window is measured from the last pulse, so dithering around the
//!    threshold cannot flood the sinks either.

use log::info;

use crate::config::DetectorConfig;
use crate::fsm::context::{AlertContext, VisualCommand};
use crate::fsm::states::build_state_table;
use crate::fsm::{Fsm, StateId};

/// Outcome of evaluating one sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertDecision {
    None,
    Pulse,
}

/// Threshold + debounce state machine.
pub struct AlertTrigger {
    fsm: Fsm,
    ctx: AlertContext,
}

impl AlertTrigger {
    pub fn new(threshold_ut: f32, debounce_ms: u32) -> Self {
        let mut ctx = AlertContext::new(threshold_ut, debounce_ms);
        let mut fsm = Fsm::new(build_state_table(), StateId::Idle);
        fsm.start(&mut ctx);
        Self { fsm, ctx }
    }

    pub fn from_config(config: &DetectorConfig) -> Self {
        Self::new(config.threshold_ut, config.debounce_ms)
    }

    /// Evaluate one smoothed magnitude taken at `now_ms` (monotonic).
    pub fn evaluate(&mut self, magnitude: f32, now_ms: u64) -> AlertDecision {
        self.ctx.begin_sample(magnitude, now_ms);
        self.fsm.tick(&mut self.ctx);

        if self.ctx.commands.fire_pulse {
            AlertDecision::Pulse
        } else {
            AlertDecision::None
        }
    }

    pub fn state(&self) -> StateId {
        self.fsm.current_state()
    }

    pub fn is_alerting(&self) -> bool {
        self.state() == StateId::Alerting
    }

    /// Visual instruction produced by the most recent evaluation.
    pub fn visual_command(&self) -> VisualCommand {
        self.ctx.commands.visual
    }

    pub fn last_pulse_ms(&self) -> Option<u64> {
        self.ctx.last_pulse_ms
    }

    /// Samples evaluated since the current state was entered.
    pub fn samples_in_state(&self) -> u64 {
        self.fsm.ticks_in_current_state()
    }

    pub fn threshold_ut(&self) -> f32 {
        self.ctx.threshold_ut
    }

    pub fn debounce_ms(&self) -> u32 {
        self.ctx.debounce_ms
    }

    /// Change threshold and debounce window.  Takes effect from the next
    /// sample; the current state is kept.
    pub fn set_limits(&mut self, threshold_ut: f32, debounce_ms: u32) {
        self.ctx.threshold_ut = threshold_ut;
        self.ctx.debounce_ms = debounce_ms;
    }

    /// Return to `Idle` and forget the last pulse.  If the trigger was
    /// alerting, the visual command after reset is `Stop`.
    pub fn reset(&mut self) {
        if self.is_alerting() {
            info!("alert trigger reset while alerting");
        }
        self.ctx.commands = Default::default();
        self.fsm.force_transition(StateId::Idle, &mut self.ctx);
        self.ctx.last_pulse_ms = None;
    }
}
