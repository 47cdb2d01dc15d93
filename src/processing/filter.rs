//! Position filter
//!
//! Decides whether a new fix is trustworthy enough to become the current
//! position. Rules run in a fixed order:
//!
//! 1. filtering disabled: accept
//! 2. reported accuracy worse than `min_accuracy`: reject
//! 3. no previous accepted position: accept
//! 4. moved less than `min_movement` (strictly): reject as jitter
//! 5. implied speed above `max_speed`: reject as a teleport
//!
//! Rejection is routine and never an error.

use crate::algorithms::geodesy;
use crate::core::{Position, DEFAULT_MAX_SPEED_MPS, DEFAULT_MIN_ACCURACY_M, DEFAULT_MIN_MOVEMENT_M};
use crate::utils::config::ConfigError;
use serde::{Deserialize, Serialize};

/// Filter thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PositionFilterConfig {
    pub enabled: bool,
    /// Worst acceptable reported accuracy (m)
    pub min_accuracy: f64,
    /// Smallest displacement treated as real movement (m)
    pub min_movement: f64,
    /// Largest plausible speed between fixes (m/s)
    pub max_speed: f64,
}

impl Default for PositionFilterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_accuracy: DEFAULT_MIN_ACCURACY_M,
            min_movement: DEFAULT_MIN_MOVEMENT_M,
            max_speed: DEFAULT_MAX_SPEED_MPS,
        }
    }
}

impl PositionFilterConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.min_accuracy.is_finite() || self.min_accuracy <= 0.0 {
            return Err(ConfigError::invalid(
                "filter.min_accuracy",
                self.min_accuracy,
                "must be a positive number of metres",
            ));
        }
        if !self.min_movement.is_finite() || self.min_movement < 0.0 {
            return Err(ConfigError::invalid(
                "filter.min_movement",
                self.min_movement,
                "must be zero or a positive number of metres",
            ));
        }
        if !self.max_speed.is_finite() || self.max_speed <= 0.0 {
            return Err(ConfigError::invalid(
                "filter.max_speed",
                self.max_speed,
                "must be a positive speed in m/s",
            ));
        }
        Ok(())
    }
}

/// Why a fix was dropped
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RejectReason {
    PoorAccuracy { accuracy: f64, limit: f64 },
    InsufficientMovement { distance: f64, minimum: f64 },
    ImpliedSpeed { speed: f64, maximum: f64 },
}

/// Outcome of running a fix through the filter
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterDecision {
    Accept,
    Reject(RejectReason),
}

impl FilterDecision {
    pub fn is_accepted(&self) -> bool {
        matches!(self, FilterDecision::Accept)
    }
}

/// Run the filter rules and report which one decided
pub fn evaluate(
    candidate: &Position,
    previous: Option<&Position>,
    config: &PositionFilterConfig,
) -> FilterDecision {
    if !config.enabled {
        return FilterDecision::Accept;
    }

    // Written as a negated <= so a NaN accuracy is rejected too
    if !(candidate.accuracy <= config.min_accuracy) {
        return FilterDecision::Reject(RejectReason::PoorAccuracy {
            accuracy: candidate.accuracy,
            limit: config.min_accuracy,
        });
    }

    let previous = match previous {
        Some(previous) => previous,
        None => return FilterDecision::Accept,
    };

    let distance = geodesy::distance(previous.coordinate, candidate.coordinate);
    if distance < config.min_movement {
        return FilterDecision::Reject(RejectReason::InsufficientMovement {
            distance,
            minimum: config.min_movement,
        });
    }

    let dt = (candidate.timestamp as f64 - previous.timestamp as f64) / 1000.0;
    if dt > 0.0 {
        let speed = distance / dt;
        if speed > config.max_speed {
            return FilterDecision::Reject(RejectReason::ImpliedSpeed {
                speed,
                maximum: config.max_speed,
            });
        }
    }

    FilterDecision::Accept
}

/// `true` if the fix should become the new current position
pub fn accept(candidate: &Position, previous: Option<&Position>, config: &PositionFilterConfig) -> bool {
    evaluate(candidate, previous, config).is_accepted()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Fix;

    fn position(lat: f64, lng: f64, accuracy: f64, timestamp: u64) -> Position {
        Position::from_fix(&Fix::new(lat, lng, accuracy, timestamp)).unwrap()
    }

    // ~111 m per 0.001 degree of latitude
    const LAT_STEP_100M: f64 = 0.000_899_3;

    #[test]
    fn test_disabled_accepts_everything() {
        let config = PositionFilterConfig {
            enabled: false,
            ..Default::default()
        };
        let prev = position(0.0, 0.0, 5.0, 0);
        let noisy = position(0.0, 0.0, 500.0, 0);
        assert!(accept(&noisy, Some(&prev), &config));
    }

    #[test]
    fn test_first_fix_accepted_when_accurate() {
        let config = PositionFilterConfig::default();
        assert!(accept(&position(10.0, 10.0, 20.0, 0), None, &config));
        assert!(!accept(&position(10.0, 10.0, 80.0, 0), None, &config));
    }

    #[test]
    fn test_noisy_fix_rejected() {
        let config = PositionFilterConfig::default();
        let prev = position(-27.62, -48.67, 10.0, 0);
        let noisy = position(-27.621, -48.67, 80.0, 5000);
        assert_eq!(
            evaluate(&noisy, Some(&prev), &config),
            FilterDecision::Reject(RejectReason::PoorAccuracy {
                accuracy: 80.0,
                limit: 50.0
            })
        );
    }

    #[test]
    fn test_nan_accuracy_rejected() {
        let config = PositionFilterConfig::default();
        assert!(!accept(&position(0.0, 0.0, f64::NAN, 0), None, &config));
    }

    #[test]
    fn test_jitter_rejected() {
        let config = PositionFilterConfig::default();
        let prev = position(0.0, 0.0, 5.0, 0);
        // ~1.1 m north
        let jitter = position(0.00001, 0.0, 5.0, 1000);
        assert!(matches!(
            evaluate(&jitter, Some(&prev), &config),
            FilterDecision::Reject(RejectReason::InsufficientMovement { .. })
        ));
    }

    #[test]
    fn test_zero_min_movement_accepts_stationary() {
        let config = PositionFilterConfig {
            min_movement: 0.0,
            ..Default::default()
        };
        let prev = position(0.0, 0.0, 5.0, 0);
        let same = position(0.0, 0.0, 5.0, 1000);
        // 0 < 0 is false, so an identical fix passes
        assert!(accept(&same, Some(&prev), &config));
    }

    #[test]
    fn test_teleport_rejected() {
        let config = PositionFilterConfig::default();
        let prev = position(0.0, 0.0, 5.0, 0);
        // ~100 m in one second
        let jump = position(LAT_STEP_100M, 0.0, 5.0, 1000);
        assert!(matches!(
            evaluate(&jump, Some(&prev), &config),
            FilterDecision::Reject(RejectReason::ImpliedSpeed { .. })
        ));

        // Same distance over a minute is a brisk walk
        let walk = position(LAT_STEP_100M, 0.0, 5.0, 60_000);
        assert!(accept(&walk, Some(&prev), &config));
    }

    #[test]
    fn test_speed_check_skipped_without_elapsed_time() {
        let config = PositionFilterConfig::default();
        let prev = position(0.0, 0.0, 5.0, 1000);
        let same_instant = position(LAT_STEP_100M, 0.0, 5.0, 1000);
        assert!(accept(&same_instant, Some(&prev), &config));
    }

    #[test]
    fn test_config_validation() {
        assert!(PositionFilterConfig::default().validate().is_ok());
        let bad = PositionFilterConfig {
            max_speed: 0.0,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
        let bad = PositionFilterConfig {
            min_movement: f64::NAN,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_poor_accuracy_always_rejected(
                min_accuracy in 1.0..200.0_f64,
                excess in 0.001..1000.0_f64,
                lat in -89.0..89.0_f64,
                lng in -179.0..179.0_f64,
                prev_lat in -89.0..89.0_f64,
                dt in 0u64..120_000,
                with_previous in any::<bool>(),
            ) {
                let config = PositionFilterConfig { min_accuracy, ..Default::default() };
                let prev = position(prev_lat, lng, 1.0, 0);
                let candidate = position(lat, lng, min_accuracy + excess, dt);
                let previous = if with_previous { Some(&prev) } else { None };
                prop_assert!(!accept(&candidate, previous, &config));
            }
        }
    }
}
