//! Core data types for the navigation engine

use crate::algorithms::geodesy;
use crate::validation::{CoordinateError, NavError, NavResult};
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// Validated WGS84 latitude/longitude pair in degrees
///
/// Fields are private so an out-of-range coordinate can never exist.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    lat: f64,
    lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Result<Self, CoordinateError> {
        geodesy::validate_coordinate(lat, lng)?;
        Ok(Self { lat, lng })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lng(&self) -> f64 {
        self.lng
    }
}

/// One raw reading from the sensor, before validation and filtering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fix {
    pub lat: f64,
    pub lng: f64,
    /// Horizontal accuracy radius (m)
    pub accuracy: f64,
    pub altitude: Option<f64>,
    /// Heading reported by the platform (degrees)
    pub heading: Option<f64>,
    /// Speed reported by the platform (m/s)
    pub speed: Option<f64>,
    /// Milliseconds since the Unix epoch
    pub timestamp: u64,
}

impl Fix {
    pub fn new(lat: f64, lng: f64, accuracy: f64, timestamp: u64) -> Self {
        Self {
            lat,
            lng,
            accuracy,
            altitude: None,
            heading: None,
            speed: None,
            timestamp,
        }
    }

    pub fn with_altitude(mut self, altitude: f64) -> Self {
        self.altitude = Some(altitude);
        self
    }

    pub fn with_heading(mut self, heading: f64) -> Self {
        self.heading = Some(heading);
        self
    }

    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = Some(speed);
        self
    }
}

/// Speed and direction derived from two consecutive accepted positions
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Velocity {
    /// m/s
    pub speed: f64,
    pub speed_kmh: f64,
    /// Degrees clockwise from true north, [0, 360)
    pub bearing: f64,
}

impl Velocity {
    /// East/north components in m/s
    pub fn components(&self) -> Vector2<f64> {
        let bearing = self.bearing.to_radians();
        Vector2::new(self.speed * bearing.sin(), self.speed * bearing.cos())
    }
}

/// An accepted fix
///
/// Built once from a [`Fix`] and never mutated afterwards; each new accepted
/// fix produces a new `Position`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    #[serde(flatten)]
    pub coordinate: Coordinate,
    pub accuracy: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub altitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    pub timestamp: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub velocity: Option<Velocity>,
}

impl Position {
    /// Validate a raw fix. Fails if its coordinate is not finite and in range.
    pub fn from_fix(fix: &Fix) -> Result<Self, CoordinateError> {
        Ok(Self {
            coordinate: Coordinate::new(fix.lat, fix.lng)?,
            accuracy: fix.accuracy,
            altitude: fix.altitude,
            heading: fix.heading,
            speed: fix.speed,
            timestamp: fix.timestamp,
            velocity: None,
        })
    }

    pub fn lat(&self) -> f64 {
        self.coordinate.lat()
    }

    pub fn lng(&self) -> f64 {
        self.coordinate.lng()
    }

    pub(crate) fn with_velocity(mut self, velocity: Option<Velocity>) -> Self {
        self.velocity = velocity;
        self
    }
}

/// Identity under which a target's arrival is remembered
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TargetKey {
    /// Caller-supplied id
    Named(String),
    /// Bit patterns of the coordinate pair
    Coordinate { lat_bits: u64, lng_bits: u64 },
}

/// A coordinate plus the radius inside which the player has arrived
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Target {
    #[serde(flatten)]
    pub coordinate: Coordinate,
    /// Arrival radius (m)
    pub radius: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl Target {
    pub fn new(lat: f64, lng: f64, radius: f64) -> NavResult<Self> {
        let coordinate = Coordinate::new(lat, lng)?;
        if !radius.is_finite() || radius < 0.0 {
            return Err(NavError::InvalidRadius { radius });
        }
        Ok(Self {
            coordinate,
            radius,
            id: None,
        })
    }

    /// Attach a mission id; arrival is then tracked by id instead of coordinate.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn key(&self) -> TargetKey {
        match &self.id {
            Some(id) => TargetKey::Named(id.clone()),
            None => TargetKey::Coordinate {
                // -0.0 and 0.0 are the same place
                lat_bits: (self.coordinate.lat() + 0.0).to_bits(),
                lng_bits: (self.coordinate.lng() + 0.0).to_bits(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_from_valid_fix() {
        let fix = Fix::new(-27.630548, -48.681134, 10.0, 1000).with_altitude(12.0);
        let position = Position::from_fix(&fix).unwrap();
        assert_eq!(position.lat(), -27.630548);
        assert_eq!(position.lng(), -48.681134);
        assert_eq!(position.altitude, Some(12.0));
        assert!(position.velocity.is_none());
    }

    #[test]
    fn test_position_rejects_invalid_fix() {
        assert!(Position::from_fix(&Fix::new(91.0, 0.0, 5.0, 0)).is_err());
        assert!(Position::from_fix(&Fix::new(0.0, f64::NAN, 5.0, 0)).is_err());
    }

    #[test]
    fn test_target_radius_validation() {
        assert!(Target::new(0.0, 0.0, 20.0).is_ok());
        assert!(Target::new(0.0, 0.0, 0.0).is_ok());
        assert!(matches!(
            Target::new(0.0, 0.0, -1.0),
            Err(NavError::InvalidRadius { .. })
        ));
        assert!(matches!(
            Target::new(0.0, 0.0, f64::INFINITY),
            Err(NavError::InvalidRadius { .. })
        ));
        assert!(matches!(
            Target::new(0.0, 190.0, 20.0),
            Err(NavError::CoordinateValidity(_))
        ));
    }

    #[test]
    fn test_target_key_identity() {
        let a = Target::new(-27.630548, -48.681134, 20.0).unwrap();
        let b = Target::new(-27.630548, -48.681134, 50.0).unwrap();
        let c = Target::new(-27.630549, -48.681134, 20.0).unwrap();
        assert_eq!(a.key(), b.key());
        assert_ne!(a.key(), c.key());

        let zero = Target::new(0.0, 0.0, 5.0).unwrap();
        let neg_zero = Target::new(-0.0, -0.0, 5.0).unwrap();
        assert_eq!(zero.key(), neg_zero.key());

        let named = a.clone().with_id("lighthouse");
        assert_eq!(named.key(), TargetKey::Named("lighthouse".to_string()));
    }

    #[test]
    fn test_velocity_components() {
        let east = Velocity { speed: 2.0, speed_kmh: 7.2, bearing: 90.0 };
        let v = east.components();
        assert!((v.x - 2.0).abs() < 1e-9);
        assert!(v.y.abs() < 1e-9);
    }

    #[test]
    fn test_position_serializes_flat() {
        let position = Position::from_fix(&Fix::new(1.5, 2.5, 4.0, 7)).unwrap();
        let json = serde_json::to_value(&position).unwrap();
        assert_eq!(json["lat"], 1.5);
        assert_eq!(json["lng"], 2.5);
        assert_eq!(json["timestamp"], 7);
        assert!(json.get("velocity").is_none());
    }
}
