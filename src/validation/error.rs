//! Error taxonomy for the navigation engine
//!
//! Coordinate problems fail the call that caused them. Sensor problems arrive
//! asynchronously and are normally published as `locationError` events; they
//! only show up here when a caller is waiting on them (e.g. `start()`).
//! Filtered fixes are not errors at all and never appear in this module.

use crate::hardware::SensorError;
use crate::utils::config::ConfigError;
use serde::{Deserialize, Serialize};

/// Result alias used across the public API
pub type NavResult<T> = Result<T, NavError>;

/// A coordinate that is not a finite, in-range WGS84 latitude/longitude pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CoordinateError {
    #[error("coordinate ({lat}, {lng}) is not finite")]
    NonFinite { lat: f64, lng: f64 },

    #[error("latitude {lat} outside [-90, 90]")]
    LatitudeOutOfRange { lat: f64 },

    #[error("longitude {lng} outside [-180, 180]")]
    LongitudeOutOfRange { lng: f64 },
}

/// Crate-wide error type
#[derive(Debug, thiserror::Error)]
pub enum NavError {
    /// Caller supplied a bad coordinate
    #[error("invalid coordinate: {0}")]
    CoordinateValidity(#[from] CoordinateError),

    /// Arrival radius must be a finite, non-negative distance
    #[error("invalid arrival radius {radius} m")]
    InvalidRadius { radius: f64 },

    /// The sensor provider could not deliver a fix
    #[error("location acquisition failed: {0}")]
    SensorAcquisition(#[from] SensorError),

    /// Rejected or unreadable configuration
    #[error(transparent)]
    Configuration(#[from] ConfigError),
}

impl NavError {
    /// True for caller precondition failures (bad coordinate or radius)
    pub fn is_validity_error(&self) -> bool {
        matches!(
            self,
            NavError::CoordinateValidity(_) | NavError::InvalidRadius { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_error_converts() {
        let err: NavError = CoordinateError::LatitudeOutOfRange { lat: 91.0 }.into();
        assert!(err.is_validity_error());
        assert!(err.to_string().contains("91"));
    }

    #[test]
    fn test_sensor_error_is_not_validity() {
        let err: NavError = SensorError::PermissionDenied.into();
        assert!(!err.is_validity_error());
        assert!(err.to_string().starts_with("location acquisition failed"));
    }

    #[test]
    fn test_coordinate_error_serializes_with_kind() {
        let json = serde_json::to_value(CoordinateError::LongitudeOutOfRange { lng: 200.0 }).unwrap();
        assert_eq!(json["kind"], "longitude_out_of_range");
        assert_eq!(json["lng"], 200.0);
    }
}
