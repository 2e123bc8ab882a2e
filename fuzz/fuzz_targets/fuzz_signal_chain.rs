//! Fuzz target: conditioner → alert trigger
//!
//! Interprets the input as a stream of 14-byte records
//! (`x`, `y`, `z` as little-endian f32, then a u16 millisecond delta) and
//! verifies:
//! - No panics for any bit pattern, including NaN and infinities
//! - Smoothed magnitude is non-negative whenever it is finite
//! - Pulses are never closer together than the debounce window
//!
//! cargo fuzz run fuzz_signal_chain

#![no_main]

use libfuzzer_sys::fuzz_target;
use magdetect::alert::{AlertDecision, AlertTrigger};
use magdetect::conditioning::{FilterSeed, SignalConditioner, SmoothingStrategy};
use magdetect::sensors::Sample;

const RECORD: usize = 14;
const DEBOUNCE_MS: u32 = 300;

fn f32_at(b: &[u8], at: usize) -> f32 {
    f32::from_le_bytes([b[at], b[at + 1], b[at + 2], b[at + 3]])
}

fuzz_target!(|data: &[u8]| {
    let Some((&mode, rest)) = data.split_first() else {
        return;
    };
    let strategy = if mode & 1 == 0 {
        SmoothingStrategy::PerAxis
    } else {
        SmoothingStrategy::Scalar
    };
    let seed = if mode & 2 == 0 {
        FilterSeed::Zero
    } else {
        FilterSeed::FirstSample
    };

    let mut conditioner = SignalConditioner::new(0.15, strategy, seed);
    let mut trigger = AlertTrigger::new(60.0, DEBOUNCE_MS);
    let mut now = 0u64;
    let mut last_pulse: Option<u64> = None;

    for rec in rest.chunks_exact(RECORD) {
        let sample = Sample::new(f32_at(rec, 0), f32_at(rec, 4), f32_at(rec, 8));
        now += u64::from(u16::from_le_bytes([rec[12], rec[13]]));

        let m = conditioner.update(sample);
        if m.is_finite() {
            assert!(m >= 0.0, "negative magnitude {m}");
        }

        if trigger.evaluate(m, now) == AlertDecision::Pulse {
            if let Some(prev) = last_pulse {
                assert!(now - prev >= u64::from(DEBOUNCE_MS));
            }
            last_pulse = Some(now);
        }
    }
});
