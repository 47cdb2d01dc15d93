//! Target registry and proximity evaluation

pub mod targets;
pub mod proximity;

pub use targets::TargetRegistry;
pub use proximity::{Arrival, NavigationState, NavigationUpdate, ProximityEngine, ProximityOutcome};
