//! Throttled proximity evaluation
//!
//! While navigating, each accepted position may trigger an evaluation of
//! distance and bearing to the active target. Evaluations closer together
//! than the check interval are skipped. An evaluation that finds the player
//! inside the target radius (boundary included) records an arrival, at most
//! once per target identity per session.

use crate::algorithms::geodesy;
use crate::core::{Position, Target};
use crate::navigation::TargetRegistry;
use serde::Serialize;
use tracing::debug;

/// Polling view of navigation; the event stream is authoritative
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationState {
    pub is_navigating: bool,
    pub current_target: Option<Target>,
    pub last_bearing: Option<f64>,
    pub last_distance: Option<f64>,
}

/// Result of one evaluation that ran
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavigationUpdate {
    /// Metres to the target
    pub distance: f64,
    /// Degrees from the player to the target, [0, 360)
    pub bearing: f64,
    pub target: Target,
    pub position: Position,
}

/// First entry into a target's radius
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Arrival {
    pub target: Target,
    pub position: Position,
    pub distance: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProximityOutcome {
    /// Not navigating, or no active target
    Inactive,
    /// Too soon after the previous evaluation
    Throttled,
    Evaluated {
        update: NavigationUpdate,
        arrival: Option<Arrival>,
    },
}

#[derive(Debug)]
pub struct ProximityEngine {
    interval_ms: u64,
    last_evaluation_ms: Option<u64>,
    state: NavigationState,
}

impl ProximityEngine {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_evaluation_ms: None,
            state: NavigationState::default(),
        }
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    /// Takes effect on the next evaluation
    pub fn set_interval_ms(&mut self, interval_ms: u64) {
        self.interval_ms = interval_ms;
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    /// Start navigating toward `target`.
    ///
    /// A different target starts fresh and its first evaluation is not
    /// throttled. Re-activating the target already held keeps the throttle
    /// and the last readings.
    pub fn activate(&mut self, target: Target) {
        let same_target = self
            .state
            .current_target
            .as_ref()
            .map_or(false, |current| current.key() == target.key());
        if !same_target {
            self.last_evaluation_ms = None;
            self.state.last_bearing = None;
            self.state.last_distance = None;
        }
        self.state.is_navigating = true;
        self.state.current_target = Some(target);
    }

    pub fn deactivate(&mut self) {
        self.state.is_navigating = false;
    }

    /// Drop the target and the last readings
    pub fn clear(&mut self) {
        self.state = NavigationState::default();
        self.last_evaluation_ms = None;
    }

    /// Evaluate proximity from `position` to the registry's active target
    pub fn evaluate(
        &mut self,
        position: &Position,
        registry: &mut TargetRegistry,
        now_ms: u64,
    ) -> ProximityOutcome {
        if !self.state.is_navigating {
            return ProximityOutcome::Inactive;
        }
        let target = match registry.active() {
            Some(target) => target.clone(),
            None => return ProximityOutcome::Inactive,
        };

        if let Some(last) = self.last_evaluation_ms {
            // A clock that stepped backwards does not block evaluation
            if let Some(elapsed) = now_ms.checked_sub(last) {
                if elapsed < self.interval_ms {
                    debug!(elapsed_ms = elapsed, interval_ms = self.interval_ms, "proximity check throttled");
                    return ProximityOutcome::Throttled;
                }
            }
        }
        self.last_evaluation_ms = Some(now_ms);

        let distance = geodesy::distance(position.coordinate, target.coordinate);
        let bearing = geodesy::bearing(position.coordinate, target.coordinate);

        self.state.current_target = Some(target.clone());
        self.state.last_distance = Some(distance);
        self.state.last_bearing = Some(bearing);

        let arrival = if distance <= target.radius && registry.mark_arrived(&target) {
            Some(Arrival {
                target: target.clone(),
                position: position.clone(),
                distance,
            })
        } else {
            None
        };

        ProximityOutcome::Evaluated {
            update: NavigationUpdate {
                distance,
                bearing,
                target,
                position: position.clone(),
            },
            arrival,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Fix;

    fn position(lat: f64, lng: f64, timestamp: u64) -> Position {
        Position::from_fix(&Fix::new(lat, lng, 5.0, timestamp)).unwrap()
    }

    fn navigating(target: &Target) -> (ProximityEngine, TargetRegistry) {
        let mut registry = TargetRegistry::new();
        registry.set(target.clone());
        let mut engine = ProximityEngine::new(2000);
        engine.activate(target.clone());
        (engine, registry)
    }

    #[test]
    fn test_inactive_without_navigation() {
        let mut engine = ProximityEngine::new(2000);
        let mut registry = TargetRegistry::new();
        registry.set(Target::new(0.0, 0.0, 10.0).unwrap());
        assert_eq!(
            engine.evaluate(&position(0.0, 0.0, 0), &mut registry, 0),
            ProximityOutcome::Inactive
        );
    }

    #[test]
    fn test_colocated_arrives_at_zero() {
        let target = Target::new(-27.630548, -48.681134, 20.0).unwrap();
        let (mut engine, mut registry) = navigating(&target);

        match engine.evaluate(&position(-27.630548, -48.681134, 0), &mut registry, 0) {
            ProximityOutcome::Evaluated { update, arrival } => {
                assert_eq!(update.distance, 0.0);
                let arrival = arrival.expect("arrival");
                assert_eq!(arrival.distance, 0.0);
                assert_eq!(arrival.target, target);
            }
            other => panic!("unexpected outcome {:?}", other),
        }
        assert_eq!(engine.state().last_distance, Some(0.0));
    }

    #[test]
    fn test_throttle_interval() {
        let target = Target::new(0.0, 0.0, 1.0).unwrap();
        let (mut engine, mut registry) = navigating(&target);
        let p = position(0.01, 0.0, 0);

        assert!(matches!(engine.evaluate(&p, &mut registry, 1000), ProximityOutcome::Evaluated { .. }));
        assert_eq!(engine.evaluate(&p, &mut registry, 2999), ProximityOutcome::Throttled);
        assert!(matches!(engine.evaluate(&p, &mut registry, 3000), ProximityOutcome::Evaluated { .. }));
    }

    #[test]
    fn test_boundary_counts_as_arrived() {
        let target_pos = position(0.0, 0.0, 0);
        let player = position(0.0005, 0.0, 0);
        let exact = geodesy::distance(player.coordinate, target_pos.coordinate);
        let target = Target::new(0.0, 0.0, exact).unwrap();
        let (mut engine, mut registry) = navigating(&target);

        match engine.evaluate(&player, &mut registry, 0) {
            ProximityOutcome::Evaluated { arrival, .. } => assert!(arrival.is_some()),
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_arrival_only_once() {
        let target = Target::new(0.0, 0.0, 50.0).unwrap();
        let (mut engine, mut registry) = navigating(&target);
        let inside = position(0.0001, 0.0, 0);
        let mut arrivals = 0;
        for step in 0..5u64 {
            if let ProximityOutcome::Evaluated { arrival: Some(_), .. } =
                engine.evaluate(&inside, &mut registry, step * 2000)
            {
                arrivals += 1;
            }
        }
        assert_eq!(arrivals, 1);
    }

    #[test]
    fn test_activate_resets_throttle() {
        let first = Target::new(0.0, 0.0, 1.0).unwrap();
        let (mut engine, mut registry) = navigating(&first);
        let p = position(0.01, 0.0, 0);
        engine.evaluate(&p, &mut registry, 1000);

        let second = Target::new(0.02, 0.0, 1.0).unwrap();
        registry.set(second.clone());
        engine.activate(second);
        assert!(matches!(engine.evaluate(&p, &mut registry, 1001), ProximityOutcome::Evaluated { .. }));
    }

    #[test]
    fn test_reactivating_same_target_keeps_throttle() {
        let target = Target::new(0.0, 0.0, 1.0).unwrap();
        let (mut engine, mut registry) = navigating(&target);
        let p = position(0.01, 0.0, 0);
        engine.evaluate(&p, &mut registry, 1000);

        // Same place, new radius: still the same target
        let resized = Target::new(0.0, 0.0, 5.0).unwrap();
        registry.set(resized.clone());
        engine.activate(resized.clone());
        assert_eq!(engine.evaluate(&p, &mut registry, 1500), ProximityOutcome::Throttled);
        assert!(engine.state().last_distance.is_some());
        assert_eq!(engine.state().current_target, Some(resized));
    }

    #[test]
    fn test_clock_stepping_back_does_not_block() {
        let target = Target::new(0.0, 0.0, 1.0).unwrap();
        let (mut engine, mut registry) = navigating(&target);
        let p = position(0.01, 0.0, 0);
        engine.evaluate(&p, &mut registry, 10_000);
        assert!(matches!(engine.evaluate(&p, &mut registry, 500), ProximityOutcome::Evaluated { .. }));
    }
}
