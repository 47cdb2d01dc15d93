//! Great-circle geodesy on a spherical Earth
//!
//! Haversine distance and forward-azimuth bearing between WGS84 coordinates.
//! The functions taking [`Coordinate`] are infallible because the type is
//! already validated; the `*_deg` variants accept raw degrees and fail fast
//! on anything that is not a finite, in-range coordinate.

use crate::core::{Coordinate, EARTH_RADIUS_M};
use crate::validation::CoordinateError;

/// True iff both values are finite and inside their WGS84 ranges
pub fn is_valid_coordinate(lat: f64, lng: f64) -> bool {
    validate_coordinate(lat, lng).is_ok()
}

/// Check a raw latitude/longitude pair
pub fn validate_coordinate(lat: f64, lng: f64) -> Result<(), CoordinateError> {
    if !lat.is_finite() || !lng.is_finite() {
        return Err(CoordinateError::NonFinite { lat, lng });
    }
    if !(-90.0..=90.0).contains(&lat) {
        return Err(CoordinateError::LatitudeOutOfRange { lat });
    }
    if !(-180.0..=180.0).contains(&lng) {
        return Err(CoordinateError::LongitudeOutOfRange { lng });
    }
    Ok(())
}

/// Haversine distance in metres
pub fn distance(a: Coordinate, b: Coordinate) -> f64 {
    if a == b {
        return 0.0;
    }

    let lat1 = a.lat().to_radians();
    let lat2 = b.lat().to_radians();
    let delta_lat = (b.lat() - a.lat()).to_radians();
    let delta_lng = (b.lng() - a.lng()).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lng / 2.0).sin().powi(2);
    // Rounding can push h a hair outside [0, 1] for antipodal points
    let c = 2.0 * h.clamp(0.0, 1.0).sqrt().asin();

    EARTH_RADIUS_M * c
}

/// Initial compass bearing from `a` to `b`, degrees in [0, 360)
pub fn bearing(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.lat().to_radians();
    let lat2 = b.lat().to_radians();
    let delta_lng = (b.lng() - a.lng()).to_radians();

    let y = delta_lng.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * delta_lng.cos();

    normalize_bearing(y.atan2(x).to_degrees())
}

/// Distance between raw degree pairs
pub fn distance_deg(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> Result<f64, CoordinateError> {
    Ok(distance(Coordinate::new(lat1, lng1)?, Coordinate::new(lat2, lng2)?))
}

/// Bearing between raw degree pairs
pub fn bearing_deg(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> Result<f64, CoordinateError> {
    Ok(bearing(Coordinate::new(lat1, lng1)?, Coordinate::new(lat2, lng2)?))
}

/// Fold any finite angle into [0, 360)
pub fn normalize_bearing(degrees: f64) -> f64 {
    let normalized = degrees.rem_euclid(360.0);
    // rem_euclid can return exactly 360.0 for tiny negative inputs
    if normalized >= 360.0 {
        0.0
    } else {
        normalized
    }
}
