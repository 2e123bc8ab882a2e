//! Console feedback adapter.
//!
//! Implements [`FeedbackPort`] for the host simulation: text goes to the
//! log, haptic and tone requests are logged as if dispatched.  Either
//! capability can be switched off to exercise the suppression path.

use log::{debug, info, trace};

use crate::app::ports::FeedbackPort;
use crate::error::FeedbackError;

pub struct ConsoleFeedback {
    haptics: bool,
    audio: bool,
    last_text: String,
    scale: f32,
}

impl ConsoleFeedback {
    pub fn new(haptics: bool, audio: bool) -> Self {
        Self {
            haptics,
            audio,
            last_text: String::new(),
            scale: 1.0,
        }
    }

    pub fn last_text(&self) -> &str {
        &self.last_text
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }
}

impl FeedbackPort for ConsoleFeedback {
    fn render_text(&mut self, text: &str) {
        if text != self.last_text {
            debug!("VIEW | {}", text);
            self.last_text.clear();
            self.last_text.push_str(text);
        }
    }

    fn set_scale(&mut self, scale: f32) {
        trace!("VIEW | scale={:.3}", scale);
        self.scale = scale;
    }

    fn set_toggle(&mut self, label: &str, enabled: bool) {
        info!("VIEW | [{}]{}", label, if enabled { "" } else { " (disabled)" });
    }

    fn vibrate(&mut self, duration_ms: u32) -> Result<(), FeedbackError> {
        if !self.haptics {
            return Err(FeedbackError::Unsupported);
        }
        info!("HAPTIC | {} ms", duration_ms);
        Ok(())
    }

    fn play_tone(&mut self, duration_ms: u32, volume_percent: u8) -> Result<(), FeedbackError> {
        if !self.audio {
            return Err(FeedbackError::Unsupported);
        }
        info!("TONE | {} ms @ {}%", duration_ms, volume_percent);
        Ok(())
    }
}
