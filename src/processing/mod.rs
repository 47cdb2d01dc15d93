//! Fix processing: filtering, history and velocity

pub mod filter;
pub mod history;
pub mod velocity;

pub use filter::{FilterDecision, PositionFilterConfig, RejectReason};
pub use history::PositionHistory;
