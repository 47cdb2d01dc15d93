//! Bounded history of accepted positions
//!
//! Keeps the last N accepted positions (oldest first) for velocity and
//! movement estimates. Entries leave by eviction only; there is no time-based
//! expiry.

use crate::algorithms::geodesy;
use crate::core::{Position, DEFAULT_MAX_HISTORY_SIZE, MIN_TRACK_DISTANCE_M};
use nalgebra::Vector2;
use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct PositionHistory {
    entries: VecDeque<Position>,
    capacity: usize,
}

impl Default for PositionHistory {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HISTORY_SIZE)
    }
}

impl PositionHistory {
    /// Create a history holding at most `capacity` positions (minimum 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a position, returning the evicted oldest entry when full
    pub fn push(&mut self, position: Position) -> Option<Position> {
        let evicted = if self.entries.len() >= self.capacity {
            self.entries.pop_front()
        } else {
            None
        };
        self.entries.push_back(position);
        evicted
    }

    /// Change capacity, dropping the oldest entries if it shrinks
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn latest(&self) -> Option<&Position> {
        self.entries.back()
    }

    pub fn oldest(&self) -> Option<&Position> {
        self.entries.front()
    }

    /// Oldest first
    pub fn iter(&self) -> impl Iterator<Item = &Position> {
        self.entries.iter()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Mean of the velocities attached to retained positions
    pub fn average_speed(&self) -> Option<f64> {
        if self.entries.len() < 2 {
            return None;
        }
        let speeds: Vec<f64> = self
            .entries
            .iter()
            .filter_map(|p| p.velocity.map(|v| v.speed))
            .collect();
        if speeds.is_empty() {
            return None;
        }
        Some(speeds.iter().sum::<f64>() / speeds.len() as f64)
    }

    /// Whether the average speed over the history exceeds `threshold_mps`
    pub fn is_moving(&self, threshold_mps: f64) -> bool {
        self.average_speed()
            .map_or(false, |speed| speed > threshold_mps)
    }

    /// Mean east/north velocity vector (m/s)
    pub fn mean_velocity(&self) -> Option<Vector2<f64>> {
        let vectors: Vec<Vector2<f64>> = self
            .entries
            .iter()
            .filter_map(|p| p.velocity.map(|v| v.components()))
            .collect();
        if vectors.is_empty() {
            return None;
        }
        let sum = vectors.iter().fold(Vector2::<f64>::zeros(), |acc, v| acc + v);
        Some(sum / vectors.len() as f64)
    }

    /// Bearing from the oldest to the newest entry.
    ///
    /// `None` until the two are far enough apart for the bearing to mean
    /// something.
    pub fn track(&self) -> Option<f64> {
        let oldest = self.entries.front()?;
        let newest = self.entries.back()?;
        if geodesy::distance(oldest.coordinate, newest.coordinate) < MIN_TRACK_DISTANCE_M {
            return None;
        }
        Some(geodesy::bearing(oldest.coordinate, newest.coordinate))
    }
}
