//! Location sensor abstraction
//!
//! The engine never talks to platform APIs directly. It consumes a
//! [`SensorProvider`], which a platform adapter implements; [`MockSensor`]
//! provides a scripted implementation for tests and demos.

pub mod sensor;
pub mod mock;
pub mod error;

pub use sensor::{SensorOptions, SensorProvider, SensorReading, SubscriptionHandle};
pub use mock::MockSensor;
pub use error::{RecoveryHint, SensorError, SensorResult};
