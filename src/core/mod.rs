//! Core types and constants for the navigation engine

pub mod types;
pub mod constants;

pub use types::*;
pub use constants::*;
