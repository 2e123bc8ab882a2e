//! Detection lifecycle: start/stop plus host foreground/background.
//!
//! ## States
//!
//! | Detection | Host        | Subscribed |
//! |-----------|-------------|------------|
//! | Stopped   | any         | never      |
//! | Running   | Foreground  | yes        |
//! | Running   | Background  | no         |
//!
//! Every operation returns the [`SubscriptionAction`] the caller must apply
//! to the sensor port.  The controller never talks to the sensor itself,
//! so the table above can be checked without one.

use log::{debug, info};

use crate::error::SensorError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionState {
    Stopped,
    Running,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostVisibility {
    Foreground,
    Background,
}

/// What the caller must do with the sensor subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionAction {
    Subscribe,
    Unsubscribe,
    None,
}

pub struct DetectionLifecycle {
    state: DetectionState,
    visibility: HostVisibility,
    subscribed: bool,
    sensor_available: bool,
}

impl DetectionLifecycle {
    pub fn new(sensor_available: bool) -> Self {
        Self {
            state: DetectionState::Stopped,
            visibility: HostVisibility::Foreground,
            subscribed: false,
            sensor_available,
        }
    }

    /// Begin detecting.  Fails if the host has no magnetometer.
    pub fn start(&mut self) -> Result<SubscriptionAction, SensorError> {
        if !self.sensor_available {
            return Err(SensorError::Unavailable);
        }
        if self.state == DetectionState::Running {
            return Ok(SubscriptionAction::None);
        }
        self.state = DetectionState::Running;
        info!("detection started ({:?})", self.visibility);
        Ok(self.subscribe_if_visible())
    }

    /// Stop detecting and drop the subscription.
    pub fn stop(&mut self) -> SubscriptionAction {
        if self.state == DetectionState::Stopped {
            return SubscriptionAction::None;
        }
        self.state = DetectionState::Stopped;
        info!("detection stopped");
        self.release()
    }

    /// The host went to the background.  Detection stays `Running` but
    /// the subscription is dropped.
    pub fn pause(&mut self) -> SubscriptionAction {
        self.visibility = HostVisibility::Background;
        self.release()
    }

    /// The host is visible again.  Re-subscribes only if detection was
    /// running when it left.
    pub fn resume(&mut self) -> SubscriptionAction {
        self.visibility = HostVisibility::Foreground;
        if self.state == DetectionState::Running {
            self.subscribe_if_visible()
        } else {
            SubscriptionAction::None
        }
    }

    /// The sensor refused a `Subscribe` this controller asked for.
    pub fn subscription_failed(&mut self) {
        debug!("subscription failed; rolling back to Stopped");
        self.subscribed = false;
        self.state = DetectionState::Stopped;
    }

    pub fn state(&self) -> DetectionState {
        self.state
    }

    pub fn visibility(&self) -> HostVisibility {
        self.visibility
    }

    pub fn is_running(&self) -> bool {
        self.state == DetectionState::Running
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscribed
    }

    pub fn sensor_available(&self) -> bool {
        self.sensor_available
    }

    fn subscribe_if_visible(&mut self) -> SubscriptionAction {
        if self.visibility == HostVisibility::Foreground && !self.subscribed {
            self.subscribed = true;
            SubscriptionAction::Subscribe
        } else {
            SubscriptionAction::None
        }
    }

    fn release(&mut self) -> SubscriptionAction {
        if self.subscribed {
            self.subscribed = false;
            SubscriptionAction::Unsubscribe
        } else {
            SubscriptionAction::None
        }
    }
}
