//! Configuration and time utilities

pub mod config;
pub mod clock;

pub use config::{ConfigError, EngineConfig};
pub use clock::{Clock, ManualClock, SystemClock};
