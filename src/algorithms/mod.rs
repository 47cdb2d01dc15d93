//! Geodesy algorithms

pub mod geodesy;

pub use geodesy::{bearing, distance, is_valid_coordinate};
