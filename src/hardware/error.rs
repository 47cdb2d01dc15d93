//! Sensor error types and recovery hints

use serde::{Deserialize, Serialize};

/// Why the sensor provider could not deliver a fix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SensorError {
    /// The user or OS refused location access
    #[error("location permission denied")]
    PermissionDenied,

    /// No position could be determined (no signal, sensor off)
    #[error("position unavailable: {reason}")]
    PositionUnavailable { reason: String },

    /// No fix arrived within the configured timeout
    #[error("location request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// The device has no location capability
    #[error("location services not supported")]
    Unsupported,

    /// The provider produced a coordinate outside WGS84 bounds
    #[error("sensor produced an invalid fix ({lat}, {lng})")]
    InvalidFix { lat: f64, lng: f64 },

    /// Subscribing to continuous updates failed
    #[error("subscription failed: {reason}")]
    SubscriptionFailed { reason: String },
}

/// Result type for sensor operations
pub type SensorResult<T> = Result<T, SensorError>;

/// What an external error handler might reasonably do next
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryHint {
    /// Try again after a delay
    RetryWithDelay { delay_ms: u64 },
    /// Ask the player to enter their location by hand
    ManualLocation,
}

impl SensorError {
    /// Geolocation-style numeric code: 1 denied, 2 unavailable, 3 timeout, 0 other
    pub fn code(&self) -> u8 {
        match self {
            SensorError::PermissionDenied => 1,
            SensorError::PositionUnavailable { .. } | SensorError::InvalidFix { .. } => 2,
            SensorError::Timeout { .. } => 3,
            SensorError::Unsupported | SensorError::SubscriptionFailed { .. } => 0,
        }
    }

    pub fn recovery_hint(&self) -> RecoveryHint {
        match self {
            SensorError::PermissionDenied => RecoveryHint::ManualLocation,
            SensorError::PositionUnavailable { .. } => RecoveryHint::RetryWithDelay { delay_ms: 5000 },
            SensorError::Timeout { .. } => RecoveryHint::RetryWithDelay { delay_ms: 1000 },
            SensorError::InvalidFix { .. } => RecoveryHint::RetryWithDelay { delay_ms: 1000 },
            SensorError::SubscriptionFailed { .. } => RecoveryHint::RetryWithDelay { delay_ms: 2000 },
            SensorError::Unsupported => RecoveryHint::ManualLocation,
        }
    }

    pub fn is_recoverable(&self) -> bool {
        matches!(self.recovery_hint(), RecoveryHint::RetryWithDelay { .. })
    }

    /// Player-facing text for a fallback UI
    pub fn user_message(&self) -> &'static str {
        match self {
            SensorError::PermissionDenied => {
                "Location access was denied. Enable location permissions to keep playing."
            }
            SensorError::PositionUnavailable { .. } | SensorError::InvalidFix { .. } => {
                "Your location is currently unavailable. Try moving to an open area."
            }
            SensorError::Timeout { .. } => "Finding your location is taking too long. Retrying may help.",
            SensorError::Unsupported => "This device does not support location services.",
            SensorError::SubscriptionFailed { .. } => "Location updates could not be started.",
        }
    }
}
