//! Shared mutable context threaded through every alert state handler.
//!
//! The trigger writes the latest magnitude and timestamp in before each
//! tick; handlers read them, update the debounce memory and leave
//! [`FeedbackCommands`] for the service to act on afterwards.

// ---------------------------------------------------------------------------
// Feedback commands (written by state handlers; consumed by the service)
// ---------------------------------------------------------------------------

/// What the continuous visual feedback should do after this sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisualCommand {
    /// Leave the animation as it is.
    #[default]
    Hold,
    /// Begin oscillating.
    Start,
    /// Stop oscillating and return to the neutral scale.
    Stop,
}

/// Commands produced by one tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeedbackCommands {
    /// Fire one discrete haptic/audio pulse.
    pub fire_pulse: bool,
    pub visual: VisualCommand,
}

// ---------------------------------------------------------------------------
// AlertContext
// ---------------------------------------------------------------------------

pub struct AlertContext {
    // -- Input --
    /// Smoothed magnitude (µT) of the sample being evaluated.
    pub magnitude: f32,
    /// Monotonic timestamp (ms) of the sample being evaluated.
    pub now_ms: u64,
    /// Samples since the current state was entered.
    pub samples_in_state: u64,

    // -- Limits --
    pub threshold_ut: f32,
    pub debounce_ms: u32,

    // -- Debounce memory --
    /// Timestamp of the last discrete pulse; survives dips below threshold.
    pub last_pulse_ms: Option<u64>,

    // -- Output --
    pub commands: FeedbackCommands,
}

impl AlertContext {
    pub fn new(threshold_ut: f32, debounce_ms: u32) -> Self {
        Self {
            magnitude: 0.0,
            now_ms: 0,
            samples_in_state: 0,
            threshold_ut,
            debounce_ms,
            last_pulse_ms: None,
            commands: FeedbackCommands::default(),
        }
    }

    /// Load the next sample and clear the previous tick's commands.
    pub fn begin_sample(&mut self, magnitude: f32, now_ms: u64) {
        self.magnitude = magnitude;
        self.now_ms = now_ms;
        self.commands = FeedbackCommands::default();
    }

    pub fn above_threshold(&self) -> bool {
        self.magnitude >= self.threshold_ut
    }

    /// True when no pulse has fired yet or the debounce window since the
    /// last one has fully elapsed.
    pub fn debounce_elapsed(&self) -> bool {
        match self.last_pulse_ms {
            None => true,
            Some(last) => self.now_ms.saturating_sub(last) >= u64::from(self.debounce_ms),
        }
    }
}
