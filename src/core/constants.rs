//! Physical constants and engine defaults

/// Mean Earth radius for the spherical approximation (m)
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// m/s to km/h
pub const MPS_TO_KMH: f64 = 3.6;

/// Minimum spacing between proximity evaluations (ms)
pub const DEFAULT_PROXIMITY_CHECK_INTERVAL_MS: u64 = 2000;

/// Accepted positions retained for velocity estimation
pub const DEFAULT_MAX_HISTORY_SIZE: usize = 10;

/// Average speed above which the player counts as moving (m/s)
pub const DEFAULT_MOVING_THRESHOLD_MPS: f64 = 0.5;

/// Fixes reporting a worse accuracy than this are dropped (m)
pub const DEFAULT_MIN_ACCURACY_M: f64 = 50.0;

/// Displacements shorter than this are treated as jitter (m)
pub const DEFAULT_MIN_MOVEMENT_M: f64 = 2.0;

/// Implied speeds above this are treated as GPS teleports (m/s)
pub const DEFAULT_MAX_SPEED_MPS: f64 = 50.0;

/// Sensor one-shot timeout (ms)
pub const DEFAULT_SENSOR_TIMEOUT_MS: u64 = 10_000;

/// Oldest cached fix the sensor may hand back (ms)
pub const DEFAULT_SENSOR_MAXIMUM_AGE_MS: u64 = 5000;

/// Oldest and newest history entries must be this far apart before a track is derived (m)
pub const MIN_TRACK_DISTANCE_M: f64 = 10.0;
