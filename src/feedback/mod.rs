//! Feedback generation: the visual pulse and the reading text.
//!
//! Haptic and audio pulses need no local state beyond the debounce in
//! [`crate::alert`]; they go straight to the
//! [`FeedbackPort`](crate::app::ports::FeedbackPort).

pub mod animation;
pub mod display;

pub use animation::{NEUTRAL_SCALE, PulseAnimator};
pub use display::format_reading;
