//! Velocity from consecutive accepted positions

use crate::algorithms::geodesy;
use crate::core::{Position, Velocity, MPS_TO_KMH};

/// Speed and bearing from `previous` to `current`.
///
/// Returns `None` when no time has elapsed (or time ran backwards): an
/// unknown velocity is not the same thing as standing still.
pub fn estimate(previous: &Position, current: &Position) -> Option<Velocity> {
    if current.timestamp <= previous.timestamp {
        return None;
    }
    let dt_seconds = (current.timestamp - previous.timestamp) as f64 / 1000.0;
    let speed = geodesy::distance(previous.coordinate, current.coordinate) / dt_seconds;

    Some(Velocity {
        speed,
        speed_kmh: speed * MPS_TO_KMH,
        bearing: geodesy::bearing(previous.coordinate, current.coordinate),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Fix;

    fn position(lat: f64, lng: f64, timestamp: u64) -> Position {
        Position::from_fix(&Fix::new(lat, lng, 5.0, timestamp)).unwrap()
    }

    #[test]
    fn test_walking_pace() {
        // 100 m due north in one minute
        let lat2 = 100.0 / 111_194.93;
        let v = estimate(&position(0.0, 0.0, 0), &position(lat2, 0.0, 60_000)).unwrap();
        assert!((v.speed - 1.6667).abs() < 0.01, "speed {}", v.speed);
        assert!((v.speed_kmh - 6.0).abs() < 0.05, "kmh {}", v.speed_kmh);
        assert!(v.bearing.abs() < 1e-6);
    }

    #[test]
    fn test_no_elapsed_time_is_unknown() {
        let a = position(0.0, 0.0, 1000);
        let b = position(0.001, 0.0, 1000);
        assert!(estimate(&a, &b).is_none());
        assert!(estimate(&b, &position(0.002, 0.0, 500)).is_none());
    }

    #[test]
    fn test_stationary_is_zero_not_none() {
        let v = estimate(&position(1.0, 1.0, 0), &position(1.0, 1.0, 1000)).unwrap();
        assert_eq!(v.speed, 0.0);
    }
}
