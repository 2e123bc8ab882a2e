//! Unified error types for the MagDetect core.
//!
//! `DetectorService` operations return the crate-wide [`Error`], which the
//! sensor and configuration errors convert into.  Feedback failures never
//! leave the service, so [`FeedbackError`] stays a port-level type.  All
//! types are `Copy` so they can travel through events and logs without
//! allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Error returned by the fallible `DetectorService` operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The magnetometer is missing or refused a subscription.
    Sensor(SensorError),
    /// Configuration is invalid or could not be parsed.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// The host has no magnetometer.
    Unavailable,
    /// The sensor framework rejected the listener registration.
    SubscribeFailed,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => write!(f, "magnetometer not available"),
            Self::SubscribeFailed => write!(f, "subscription rejected"),
        }
    }
}

impl core::error::Error for SensorError {}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Feedback errors
// ---------------------------------------------------------------------------

/// Failures of the best-effort haptic and audio channels.  These are
/// always swallowed by the service; the type exists so adapters can say
/// *why* a pulse was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackError {
    /// The device has no vibrator / tone generator.
    Unsupported,
    /// The host denied the capability (e.g. missing VIBRATE permission).
    PermissionDenied,
}

impl fmt::Display for FeedbackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsupported => write!(f, "capability not supported"),
            Self::PermissionDenied => write!(f, "permission denied"),
        }
    }
}

impl core::error::Error for FeedbackError {}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A field failed range validation.
    /// The `&'static str` names the field and the rule it broke.
    ValidationFailed(&'static str),
    /// The override document could not be parsed.
    Malformed,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValidationFailed(msg) => write!(f, "validation failed: {msg}"),
            Self::Malformed => write!(f, "malformed config document"),
        }
    }
}

impl core::error::Error for ConfigError {}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
