//! Active target and the arrived-at set

use crate::core::{Target, TargetKey};
use std::collections::HashSet;

/// Holds the single active target and every target identity that has
/// already fired an arrival this session.
///
/// Clearing or replacing the target leaves the arrived set alone; only
/// [`reset`](Self::reset) forgets arrivals.
#[derive(Debug, Default)]
pub struct TargetRegistry {
    active: Option<Target>,
    arrived: HashSet<TargetKey>,
}

impl TargetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the active target, returning the one it displaced
    pub fn set(&mut self, target: Target) -> Option<Target> {
        self.active.replace(target)
    }

    /// Remove the active target
    pub fn clear(&mut self) -> Option<Target> {
        self.active.take()
    }

    pub fn active(&self) -> Option<&Target> {
        self.active.as_ref()
    }

    pub fn has_arrived(&self, target: &Target) -> bool {
        self.arrived.contains(&target.key())
    }

    /// Record an arrival. Returns `false` if this identity had already arrived.
    pub fn mark_arrived(&mut self, target: &Target) -> bool {
        self.arrived.insert(target.key())
    }

    pub fn arrived_count(&self) -> usize {
        self.arrived.len()
    }

    /// Forget the active target and every arrival
    pub fn reset(&mut self) {
        self.active = None;
        self.arrived.clear();
    }
}
