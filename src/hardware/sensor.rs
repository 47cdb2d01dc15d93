//! Sensor provider trait and acquisition options

use crate::core::{Fix, DEFAULT_SENSOR_MAXIMUM_AGE_MS, DEFAULT_SENSOR_TIMEOUT_MS};
use crate::hardware::{SensorError, SensorResult};
use crate::utils::config::ConfigError;
use serde::{Deserialize, Serialize};

/// Platform location source
///
/// One-shot fixes are requested with [`current_fix`](Self::current_fix).
/// Continuous readings are delivered after [`subscribe`](Self::subscribe) and
/// drained one at a time through [`poll`](Self::poll); platforms that push
/// readings from a callback can skip `poll` and feed the controller directly.
pub trait SensorProvider {
    /// Block until one fix is available or the request fails
    fn current_fix(&mut self, options: &SensorOptions) -> SensorResult<Fix>;

    /// Begin continuous acquisition
    fn subscribe(&mut self, options: &SensorOptions) -> SensorResult<SubscriptionHandle>;

    /// End continuous acquisition. Unknown handles are ignored.
    fn unsubscribe(&mut self, handle: SubscriptionHandle);

    /// Next queued reading from the continuous subscription, if any
    fn poll(&mut self) -> Option<SensorReading>;
}

/// Opaque handle for a continuous subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle(u64);

impl SubscriptionHandle {
    pub fn new(id: u64) -> Self {
        SubscriptionHandle(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// One delivery from a continuous subscription
#[derive(Debug, Clone, PartialEq)]
pub enum SensorReading {
    Fix(Fix),
    Error(SensorError),
}

/// Options passed through to the sensor provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorOptions {
    /// Prefer GNSS over network positioning
    pub enable_high_accuracy: bool,
    /// One-shot request timeout (milliseconds)
    pub timeout_ms: u64,
    /// Oldest cached fix the platform may return (milliseconds)
    pub maximum_age_ms: u64,
}

impl Default for SensorOptions {
    fn default() -> Self {
        Self {
            enable_high_accuracy: true,
            timeout_ms: DEFAULT_SENSOR_TIMEOUT_MS,
            maximum_age_ms: DEFAULT_SENSOR_MAXIMUM_AGE_MS,
        }
    }
}

impl SensorOptions {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_ms == 0 {
            return Err(ConfigError::invalid(
                "sensor.timeout_ms",
                self.timeout_ms,
                "timeout must be greater than zero",
            ));
        }
        Ok(())
    }
}
