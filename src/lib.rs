//! MagDetect core library.
//!
//! Turns a stream of magnetometer samples into a smoothed field magnitude
//! and debounced haptic/audio/visual alerts.  Everything the host platform
//! provides (sensor stream, vibrator, tone generator, view) is reached
//! through the port traits in [`app::ports`], so the whole library runs
//! and tests on a plain host.

#![deny(unused_must_use)]

pub mod adapters;
pub mod alert;
pub mod app;
pub mod conditioning;
pub mod config;
pub mod error;
pub mod feedback;
pub mod fsm;
pub mod lifecycle;
pub mod sensors;
