//! Inbound commands to the detector service.
//!
//! These represent actions requested by the host (button presses,
//! lifecycle callbacks, settings) that the
//! [`DetectorService`](super::service::DetectorService) interprets.

use crate::config::DetectorConfig;

/// Commands that host adapters can send into the detector core.
#[derive(Debug, Clone)]
pub enum AppCommand {
    /// The start/stop button was pressed.
    ToggleDetection,

    /// Begin detecting (no-op if already running).
    StartDetection,

    /// Stop detecting (no-op if already stopped).
    StopDetection,

    /// The host view went to the background.
    HostPaused,

    /// The host view is visible again.
    HostResumed,

    /// Replace the running configuration.  Rejected if it fails validation.
    UpdateConfig(DetectorConfig),
}
