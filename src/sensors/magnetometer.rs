//! Simulated magnetometer.
//!
//! Stands in for the platform sensor stream on the host: samples are
//! queued by the caller (or generated by [`magnet_pass`]) and handed out
//! by [`SimMagnetometer::poll`] **only while a listener is registered**,
//! mirroring how the platform stops calling back after unregistering.

use std::collections::VecDeque;

use log::{debug, info};

use super::{Sample, SensorRate};
use crate::app::ports::MagnetometerPort;
use crate::error::SensorError;

/// Scripted stand-in for the platform magnetometer.
pub struct SimMagnetometer {
    available: bool,
    subscribed: Option<SensorRate>,
    pending: VecDeque<Sample>,
    reject_next_subscribe: bool,
    subscribe_count: u32,
}

impl SimMagnetometer {
    pub fn new(available: bool) -> Self {
        Self {
            available,
            subscribed: None,
            pending: VecDeque::new(),
            reject_next_subscribe: false,
            subscribe_count: 0,
        }
    }

    /// Queue one reading for delivery.
    pub fn push(&mut self, sample: Sample) {
        self.pending.push_back(sample);
    }

    /// Queue a batch of readings for delivery.
    pub fn extend(&mut self, samples: impl IntoIterator<Item = Sample>) {
        self.pending.extend(samples);
    }

    /// Make the next `subscribe` call fail with `SubscribeFailed`.
    pub fn reject_next_subscribe(&mut self) {
        self.reject_next_subscribe = true;
    }

    /// Deliver the next queued reading, if a listener is registered.
    pub fn poll(&mut self) -> Option<Sample> {
        self.subscribed?;
        self.pending.pop_front()
    }

    /// Readings still waiting for delivery.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Currently registered delivery rate, if any.
    pub fn subscribed_rate(&self) -> Option<SensorRate> {
        self.subscribed
    }

    /// Successful registrations since construction.
    pub fn subscribe_count(&self) -> u32 {
        self.subscribe_count
    }
}

impl MagnetometerPort for SimMagnetometer {
    fn is_available(&self) -> bool {
        self.available
    }

    fn subscribe(&mut self, rate: SensorRate) -> Result<(), SensorError> {
        if !self.available {
            return Err(SensorError::Unavailable);
        }
        if self.reject_next_subscribe {
            self.reject_next_subscribe = false;
            return Err(SensorError::SubscribeFailed);
        }
        self.subscribed = Some(rate);
        self.subscribe_count = self.subscribe_count.saturating_add(1);
        info!("SimMagnetometer: listener registered ({:?})", rate);
        Ok(())
    }

    fn unsubscribe(&mut self) {
        if self.subscribed.take().is_some() {
            debug!("SimMagnetometer: listener unregistered");
        }
    }
}

/// Synthesise a sweep of the phone over a ferrous object.
///
/// `background` is the ambient (earth) field; the object adds a bell-shaped
/// bump of `peak_ut` along the background direction, centred on the middle
/// of the `count` samples.  Small deterministic jitter keeps the filter
/// honest.
pub fn magnet_pass(background: Sample, peak_ut: f32, count: usize) -> Vec<Sample> {
    let norm = background.magnitude();
    let (ux, uy, uz) = if norm > 0.0 {
        (background.x / norm, background.y / norm, background.z / norm)
    } else {
        (0.0, 0.0, 1.0)
    };
    let centre = count as f32 / 2.0;
    let width = (count as f32 / 8.0).max(1.0);

    (0..count)
        .map(|i| {
            let d = (i as f32 - centre) / width;
            let bump = peak_ut * (-0.5 * d * d).exp();
            let jitter = ((i * 7919) % 13) as f32 * 0.05 - 0.3;
            Sample::new(
                background.x + ux * bump + jitter,
                background.y + uy * bump - jitter,
                background.z + uz * bump,
            )
        })
        .collect()
}
