//! Geospatial Navigation & Proximity Engine
//!
//! Turns a stream of noisy location fixes into a filtered current position,
//! a short history with derived velocity, and distance/bearing readouts
//! toward a single active target, firing an arrival event the first time the
//! player comes within the target's radius.
//!
//! ```no_run
//! use geonav::{EngineConfig, MockSensor, TrackingController};
//!
//! let sensor = MockSensor::new();
//! let mut tracker = TrackingController::new(Box::new(sensor), EngineConfig::default())?;
//! tracker.listen(|event| println!("{}", event.name()));
//! tracker.start()?;
//! tracker.set_target(-27.630548, -48.681134, 20.0)?;
//! loop {
//!     tracker.process();
//! #   break;
//! }
//! # Ok::<(), geonav::NavError>(())
//! ```

pub mod core;
pub mod algorithms;
pub mod processing;
pub mod navigation;
pub mod validation;
pub mod utils;
pub mod hardware;
pub mod api;

// Re-export commonly used types
pub use crate::core::{Coordinate, Fix, Position, Target, Velocity, EARTH_RADIUS_M};
pub use algorithms::{bearing, distance, is_valid_coordinate};
pub use processing::{FilterDecision, PositionFilterConfig, PositionHistory, RejectReason};
pub use navigation::{Arrival, NavigationState, NavigationUpdate};
pub use validation::{CoordinateError, NavError, NavResult};
pub use utils::{Clock, ConfigError, EngineConfig, ManualClock, SystemClock};
pub use hardware::{MockSensor, SensorError, SensorOptions, SensorProvider, SensorReading};
pub use api::{
    NavigationEvent, NavigationSummary, SubscriptionId, TrackerSnapshot, TrackingController,
    TrackingState, TrackingStats,
};
