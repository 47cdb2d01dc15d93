//! Tracking controller
//!
//! Owns all engine state for one session and drives raw fixes through
//! validation, filtering, history, velocity and proximity, publishing the
//! results on its [`EventChannel`].
//!
//! Everything runs on the caller's thread. Continuous readings either come
//! from [`TrackingController::process`], which drains the sensor provider, or
//! are pushed in by a platform callback through
//! [`TrackingController::on_fix`] and [`TrackingController::on_sensor_error`].
//! Each fix is handled to completion before the next one.

use crate::api::events::{EventChannel, NavigationEvent, SubscriberError, SubscriptionId};
use crate::api::formatting::NavigationSummary;
use crate::core::{Fix, Position, Target, Velocity, DEFAULT_MOVING_THRESHOLD_MPS};
use crate::hardware::{SensorError, SensorOptions, SensorProvider, SensorReading, SubscriptionHandle};
use crate::navigation::{NavigationState, ProximityEngine, ProximityOutcome, TargetRegistry};
use crate::processing::{filter, velocity, FilterDecision, PositionFilterConfig, PositionHistory};
use crate::utils::config::{ConfigError, EngineConfig};
use crate::utils::clock::{Clock, SystemClock};
use crate::validation::{NavError, NavResult};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Acquisition state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackingState {
    Idle,
    Tracking,
}

/// Per-session counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TrackingStats {
    pub fixes_received: u64,
    pub fixes_accepted: u64,
    pub fixes_filtered: u64,
    pub fixes_out_of_order: u64,
    pub fixes_invalid: u64,
    /// Fixes that arrived while idle
    pub fixes_discarded: u64,
    pub evaluations_run: u64,
    pub evaluations_throttled: u64,
    pub sensor_errors: u64,
}

/// Point-in-time view of the whole engine
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackerSnapshot {
    pub state: TrackingState,
    pub current_position: Option<Position>,
    pub navigation: NavigationState,
    pub stats: TrackingStats,
    pub history_len: usize,
    pub arrived_count: usize,
}

pub struct TrackingController {
    sensor: Box<dyn SensorProvider>,
    clock: Box<dyn Clock>,
    config: EngineConfig,
    state: TrackingState,
    subscription: Option<SubscriptionHandle>,
    current_position: Option<Position>,
    history: PositionHistory,
    targets: TargetRegistry,
    proximity: ProximityEngine,
    events: EventChannel,
    stats: TrackingStats,
}

impl TrackingController {
    /// Create a controller using the system clock
    pub fn new(sensor: Box<dyn SensorProvider>, config: EngineConfig) -> NavResult<Self> {
        Self::with_clock(sensor, config, Box::new(SystemClock))
    }

    /// Create a controller with an explicit time source
    pub fn with_clock(
        sensor: Box<dyn SensorProvider>,
        config: EngineConfig,
        clock: Box<dyn Clock>,
    ) -> NavResult<Self> {
        config.validate()?;
        Ok(Self {
            sensor,
            clock,
            history: PositionHistory::new(config.max_history_size),
            proximity: ProximityEngine::new(config.proximity_check_interval_ms),
            config,
            state: TrackingState::Idle,
            subscription: None,
            current_position: None,
            targets: TargetRegistry::new(),
            events: EventChannel::new(),
            stats: TrackingStats::default(),
        })
    }

    // Subscribers

    /// Register a fallible subscriber; see [`EventChannel::subscribe`]
    pub fn subscribe<F>(&mut self, subscriber: F) -> SubscriptionId
    where
        F: FnMut(&NavigationEvent) -> Result<(), SubscriberError> + Send + 'static,
    {
        self.events.subscribe(subscriber)
    }

    /// Register a subscriber that cannot fail
    pub fn listen<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&NavigationEvent) + Send + 'static,
    {
        self.events.listen(listener)
    }

    /// Remove a subscriber. Returns `false` for an unknown id.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    // Lifecycle

    /// Begin tracking.
    ///
    /// Waits for one fix to prove the sensor works, then opens the continuous
    /// subscription. Calling this while already tracking does nothing. On
    /// failure a `locationError` is published, the error is returned and the
    /// controller stays idle.
    pub fn start(&mut self) -> NavResult<()> {
        if self.state == TrackingState::Tracking {
            debug!("start ignored, already tracking");
            return Ok(());
        }

        let fix = match self.sensor.current_fix(&self.config.sensor) {
            Ok(fix) => fix,
            Err(error) => return Err(self.fail_start(error)),
        };
        let position = match Position::from_fix(&fix) {
            Ok(position) => position,
            Err(_) => {
                return Err(self.fail_start(SensorError::InvalidFix {
                    lat: fix.lat,
                    lng: fix.lng,
                }))
            }
        };
        let handle = match self.sensor.subscribe(&self.config.sensor) {
            Ok(handle) => handle,
            Err(error) => return Err(self.fail_start(error)),
        };

        self.subscription = Some(handle);
        self.state = TrackingState::Tracking;
        info!(
            lat = position.lat(),
            lng = position.lng(),
            accuracy = position.accuracy,
            "tracking started"
        );

        self.stats.fixes_received += 1;
        self.ingest(position.clone());
        self.publish(NavigationEvent::TrackingStarted { position });
        Ok(())
    }

    fn fail_start(&mut self, error: SensorError) -> NavError {
        warn!(%error, "initial fix failed, staying idle");
        self.report_sensor_error(error.clone());
        error.into()
    }

    /// Stop tracking.
    ///
    /// Once this returns, fixes still in flight from the sensor are discarded
    /// and no further position updates are published. Arrivals and
    /// configuration are kept.
    pub fn stop(&mut self) {
        if self.state == TrackingState::Idle {
            return;
        }
        if let Some(handle) = self.subscription.take() {
            self.sensor.unsubscribe(handle);
        }
        self.state = TrackingState::Idle;
        self.proximity.deactivate();
        info!("tracking stopped");
        self.publish(NavigationEvent::TrackingStopped);
    }

    /// Stop tracking and forget everything this session learned
    pub fn reset_session(&mut self) {
        self.stop();
        self.targets.reset();
        self.proximity.clear();
        self.history.clear();
        self.current_position = None;
        self.stats = TrackingStats::default();
        info!("session reset");
    }

    /// Drain and handle every reading the sensor has queued.
    ///
    /// Returns the number of readings handled.
    pub fn process(&mut self) -> usize {
        let mut handled = 0;
        while self.state == TrackingState::Tracking {
            match self.sensor.poll() {
                Some(SensorReading::Fix(fix)) => {
                    self.on_fix(fix);
                }
                Some(SensorReading::Error(error)) => self.on_sensor_error(error),
                None => break,
            }
            handled += 1;
        }
        handled
    }

    /// Handle one continuous fix. Returns `true` if it was accepted.
    ///
    /// A fix with an unusable coordinate is a sensor fault and is published
    /// as `locationError`, the same as during `start()`.
    pub fn on_fix(&mut self, fix: Fix) -> bool {
        if self.state != TrackingState::Tracking {
            self.stats.fixes_discarded += 1;
            debug!(timestamp = fix.timestamp, "fix arrived while idle, discarded");
            return false;
        }
        self.stats.fixes_received += 1;

        match Position::from_fix(&fix) {
            Ok(position) => self.ingest(position),
            Err(error) => {
                self.stats.fixes_invalid += 1;
                warn!(%error, "sensor delivered an invalid fix, discarded");
                self.report_sensor_error(SensorError::InvalidFix {
                    lat: fix.lat,
                    lng: fix.lng,
                });
                false
            }
        }
    }

    /// Handle one continuous acquisition error.
    ///
    /// Published as `locationError`; the subscription is left as is and no
    /// retry is attempted here.
    pub fn on_sensor_error(&mut self, error: SensorError) {
        if self.state != TrackingState::Tracking {
            debug!(%error, "sensor error arrived while idle, ignored");
            return;
        }
        warn!(%error, code = error.code(), "location error");
        self.report_sensor_error(error);
    }

    fn report_sensor_error(&mut self, error: SensorError) {
        self.stats.sensor_errors += 1;
        let message = error.user_message().to_string();
        self.publish(NavigationEvent::LocationError { error, message });
    }

    fn ingest(&mut self, position: Position) -> bool {
        if let Some(current) = &self.current_position {
            if position.timestamp < current.timestamp {
                self.stats.fixes_out_of_order += 1;
                debug!(
                    timestamp = position.timestamp,
                    current = current.timestamp,
                    "out-of-order fix dropped"
                );
                return false;
            }
        }

        if let FilterDecision::Reject(reason) =
            filter::evaluate(&position, self.current_position.as_ref(), &self.config.filter)
        {
            self.stats.fixes_filtered += 1;
            debug!(?reason, timestamp = position.timestamp, "fix filtered");
            return false;
        }

        let velocity = self
            .history
            .latest()
            .and_then(|previous| velocity::estimate(previous, &position));
        let position = position.with_velocity(velocity);

        self.history.push(position.clone());
        self.current_position = Some(position.clone());
        self.stats.fixes_accepted += 1;

        self.publish(NavigationEvent::PositionUpdate {
            position: position.clone(),
        });
        self.check_proximity(&position);
        true
    }

    fn check_proximity(&mut self, position: &Position) {
        let now = self.clock.now_ms();
        match self.proximity.evaluate(position, &mut self.targets, now) {
            ProximityOutcome::Inactive => {}
            ProximityOutcome::Throttled => self.stats.evaluations_throttled += 1,
            ProximityOutcome::Evaluated { update, arrival } => {
                self.stats.evaluations_run += 1;
                debug!(distance = update.distance, bearing = update.bearing, "navigation update");
                self.publish(NavigationEvent::NavigationUpdate(update));

                if let Some(arrival) = arrival {
                    info!(
                        lat = arrival.target.coordinate.lat(),
                        lng = arrival.target.coordinate.lng(),
                        distance = arrival.distance,
                        "target reached"
                    );
                    self.publish(NavigationEvent::TargetReached(arrival));
                }
            }
        }
    }

    fn publish(&mut self, event: NavigationEvent) {
        self.events.publish(&event);
    }

    // Targets

    /// Navigate to a new target, replacing any current one.
    ///
    /// Fails without side effects if the coordinate or radius is invalid.
    /// While tracking with a current position, proximity is evaluated at once
    /// (subject to the throttle when the target is unchanged). While idle the
    /// target is armed and first evaluated against the next accepted fix.
    pub fn set_target(&mut self, lat: f64, lng: f64, radius: f64) -> NavResult<()> {
        let target = Target::new(lat, lng, radius)?;
        self.navigate_to(target);
        Ok(())
    }

    /// Navigate to an already-validated target. See [`set_target`](Self::set_target).
    pub fn navigate_to(&mut self, target: Target) {
        if let Some(previous) = self.targets.set(target.clone()) {
            debug!(lat = previous.coordinate.lat(), lng = previous.coordinate.lng(), "target replaced");
        }
        self.proximity.activate(target.clone());
        info!(
            lat = target.coordinate.lat(),
            lng = target.coordinate.lng(),
            radius = target.radius,
            "target set"
        );
        self.publish(NavigationEvent::TargetSet { target });

        if self.state != TrackingState::Tracking {
            return;
        }
        if let Some(position) = self.current_position.clone() {
            self.check_proximity(&position);
        }
    }

    /// Drop the active target. Arrivals are remembered.
    pub fn clear_target(&mut self) {
        self.proximity.clear();
        if self.targets.clear().is_some() {
            info!("target cleared");
            self.publish(NavigationEvent::TargetCleared);
        }
    }

    // Configuration

    /// Configuration currently in effect
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Replace filter thresholds; applies from the next fix
    pub fn set_filter_config(&mut self, filter: PositionFilterConfig) -> NavResult<()> {
        filter.validate()?;
        self.config.filter = filter;
        Ok(())
    }

    /// Change the throttle interval; applies from the next evaluation
    pub fn set_proximity_check_interval(&mut self, interval_ms: u64) {
        self.config.proximity_check_interval_ms = interval_ms;
        self.proximity.set_interval_ms(interval_ms);
    }

    /// Resize the history, evicting the oldest entries if it shrinks
    pub fn set_max_history_size(&mut self, size: usize) -> NavResult<()> {
        if size < 2 {
            return Err(ConfigError::invalid(
                "max_history_size",
                size,
                "velocity needs at least two retained positions",
            )
            .into());
        }
        self.config.max_history_size = size;
        self.history.set_capacity(size);
        Ok(())
    }

    /// Replace sensor options; used by the next `start()`
    pub fn set_sensor_options(&mut self, options: SensorOptions) -> NavResult<()> {
        options.validate()?;
        self.config.sensor = options;
        Ok(())
    }

    // Accessors

    /// Idle or tracking
    pub fn state(&self) -> TrackingState {
        self.state
    }

    /// `true` between a successful `start()` and `stop()`
    pub fn is_tracking(&self) -> bool {
        self.state == TrackingState::Tracking
    }

    /// Last accepted position, if any. Kept across `stop()`.
    pub fn current_position(&self) -> Option<&Position> {
        self.current_position.as_ref()
    }

    /// Velocity attached to the current position
    pub fn velocity(&self) -> Option<Velocity> {
        self.current_position.as_ref().and_then(|p| p.velocity)
    }

    /// Polling view of navigation; the event stream is authoritative
    pub fn navigation_state(&self) -> &NavigationState {
        self.proximity.state()
    }

    /// Target currently navigated to
    pub fn active_target(&self) -> Option<&Target> {
        self.targets.active()
    }

    /// Retained accepted positions, oldest first
    pub fn history(&self) -> &PositionHistory {
        &self.history
    }

    /// Moving faster than the default 0.5 m/s on average
    pub fn is_moving(&self) -> bool {
        self.history.is_moving(DEFAULT_MOVING_THRESHOLD_MPS)
    }

    /// Whether `target`'s identity has already fired an arrival this session
    pub fn has_arrived(&self, target: &Target) -> bool {
        self.targets.has_arrived(target)
    }

    /// Number of distinct targets reached this session
    pub fn arrived_count(&self) -> usize {
        self.targets.arrived_count()
    }

    /// Counters since construction or the last `reset_session()`
    pub fn stats(&self) -> &TrackingStats {
        &self.stats
    }

    /// Readout of the last evaluation, marked arrived once the active target
    /// has been reached this session
    pub fn summary(&self) -> Option<NavigationSummary> {
        let arrived = self
            .targets
            .active()
            .map_or(false, |target| self.targets.has_arrived(target));
        NavigationSummary::from_state(self.proximity.state(), arrived)
    }

    /// Copy of the observable engine state
    pub fn snapshot(&self) -> TrackerSnapshot {
        TrackerSnapshot {
            state: self.state,
            current_position: self.current_position.clone(),
            navigation: self.proximity.state().clone(),
            stats: self.stats.clone(),
            history_len: self.history.len(),
            arrived_count: self.targets.arrived_count(),
        }
    }
}
