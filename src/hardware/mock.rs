//! Scripted sensor provider for tests and the demo binary

use crate::core::Fix;
use crate::hardware::{
    SensorError, SensorOptions, SensorProvider, SensorReading, SensorResult, SubscriptionHandle,
};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// Mock location sensor
///
/// Clones share the same script, so a test can hand one clone to the
/// controller and keep another to push readings and inspect subscriptions.
#[derive(Debug, Clone, Default)]
pub struct MockSensor {
    inner: Arc<Mutex<MockState>>,
}

#[derive(Debug, Default)]
struct MockState {
    one_shot: VecDeque<SensorResult<Fix>>,
    readings: VecDeque<SensorReading>,
    active: Vec<SubscriptionHandle>,
    next_handle: u64,
    subscribe_error: Option<SensorError>,
    one_shot_requests: u32,
    last_options: Option<SensorOptions>,
}

impl MockSensor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer the next one-shot request with this fix
    pub fn queue_current_fix(&self, fix: Fix) {
        self.inner.lock().one_shot.push_back(Ok(fix));
    }

    /// Fail the next one-shot request
    pub fn fail_current_fix(&self, error: SensorError) {
        self.inner.lock().one_shot.push_back(Err(error));
    }

    /// Fail the next subscribe call
    pub fn fail_next_subscribe(&self, error: SensorError) {
        self.inner.lock().subscribe_error = Some(error);
    }

    /// Queue a continuous fix
    pub fn push_fix(&self, fix: Fix) {
        self.inner.lock().readings.push_back(SensorReading::Fix(fix));
    }

    /// Queue a continuous error
    pub fn push_error(&self, error: SensorError) {
        self.inner.lock().readings.push_back(SensorReading::Error(error));
    }

    pub fn active_subscriptions(&self) -> usize {
        self.inner.lock().active.len()
    }

    pub fn queued_reading_count(&self) -> usize {
        self.inner.lock().readings.len()
    }

    pub fn one_shot_requests(&self) -> u32 {
        self.inner.lock().one_shot_requests
    }

    pub fn last_options(&self) -> Option<SensorOptions> {
        self.inner.lock().last_options.clone()
    }
}

impl SensorProvider for MockSensor {
    fn current_fix(&mut self, options: &SensorOptions) -> SensorResult<Fix> {
        let mut state = self.inner.lock();
        state.one_shot_requests += 1;
        state.last_options = Some(options.clone());
        state.one_shot.pop_front().unwrap_or(Err(SensorError::Timeout {
            timeout_ms: options.timeout_ms,
        }))
    }

    fn subscribe(&mut self, options: &SensorOptions) -> SensorResult<SubscriptionHandle> {
        let mut state = self.inner.lock();
        state.last_options = Some(options.clone());
        if let Some(error) = state.subscribe_error.take() {
            return Err(error);
        }
        state.next_handle += 1;
        let handle = SubscriptionHandle::new(state.next_handle);
        state.active.push(handle);
        Ok(handle)
    }

    fn unsubscribe(&mut self, handle: SubscriptionHandle) {
        self.inner.lock().active.retain(|h| *h != handle);
    }

    fn poll(&mut self) -> Option<SensorReading> {
        let mut state = self.inner.lock();
        // Nothing is delivered without a live subscription
        if state.active.is_empty() {
            return None;
        }
        state.readings.pop_front()
    }
}
