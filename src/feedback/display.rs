//! Text shown on the reading view.

use core::fmt::Write;

use heapless::String;

/// Room for the prefix, the widest `f32` rendered with one decimal, and
/// the unit.
pub const READING_CAPACITY: usize = 80;

pub const SENSOR_UNAVAILABLE_MSG: &str = "Magnetometer not available";
pub const START_LABEL: &str = "Start Detection";
pub const STOP_LABEL: &str = "Stop Detection";

/// Render a magnitude as `Magnetic Field Strength: 61.3 µT`.
pub fn format_reading(magnitude_ut: f32) -> String<READING_CAPACITY> {
    let mut text = String::new();
    if write!(text, "Magnetic Field Strength: {:.1} \u{00b5}T", magnitude_ut).is_err() {
        text.clear();
        let _ = text.push_str("Magnetic Field Strength: -- \u{00b5}T");
    }
    text
}
