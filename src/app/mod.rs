//! Application core: pure domain logic, zero I/O.
//!
//! Business rules for the detector: conditioning, threshold alerting,
//! feedback dispatch and the detection lifecycle.  All interaction with
//! the host happens through **port traits** defined in [`ports`], keeping
//! this layer fully testable without a real sensor or view.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
