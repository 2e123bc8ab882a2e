//! Magnetometer samples and delivery-rate classes.
//!
//! The host sensor framework delivers one [`Sample`] per callback at the
//! cadence requested through [`SensorRate`].  Samples are ephemeral: the
//! conditioner folds each one into its filter state and drops it.

pub mod magnetometer;

use serde::{Deserialize, Serialize};

/// One tri-axis magnetic field reading in microtesla.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Sample {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Sample {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Euclidean norm in µT.  Never negative for finite input.
    pub fn magnitude(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

impl From<[f32; 3]> for Sample {
    fn from(v: [f32; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

/// Delivery cadence requested from the sensor framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SensorRate {
    /// Fast enough for smooth on-screen feedback (~50 Hz).
    #[default]
    Game,
    /// Ordinary UI refresh cadence (~15 Hz).
    Ui,
}

impl SensorRate {
    /// Nominal spacing between deliveries.  The platform treats this as a
    /// hint, so nothing downstream may depend on it being exact.
    pub const fn nominal_interval_ms(self) -> u32 {
        match self {
            Self::Game => 20,
            Self::Ui => 67,
        }
    }
}
