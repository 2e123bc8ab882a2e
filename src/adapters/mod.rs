//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements    | Connects to                 |
//! |------------|---------------|-----------------------------|
//! | `console`  | FeedbackPort  | Log output (host simulation)|
//! | `log_sink` | EventSink     | Log output                  |
//! | `time`     | ClockPort     | `std::time::Instant`        |
//!
//! The simulated magnetometer lives with the sample types in
//! [`crate::sensors::magnetometer`].

pub mod console;
pub mod log_sink;
pub mod time;
