//! In-process event channel
//!
//! Subscribers are called synchronously, in subscription order, for every
//! published event. Each call runs behind its own error boundary: a
//! subscriber that returns an error or panics is logged and skipped, and the
//! remaining subscribers still receive the event.

use crate::core::{Position, Target};
use crate::hardware::SensorError;
use crate::navigation::{Arrival, NavigationUpdate};
use serde::Serialize;
use std::panic::{self, AssertUnwindSafe};
use tracing::warn;

/// Everything the engine tells the outside world
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum NavigationEvent {
    /// A fix passed the filter and became the current position
    PositionUpdate { position: Position },
    TargetSet { target: Target },
    TargetCleared,
    /// A proximity evaluation ran
    NavigationUpdate(NavigationUpdate),
    /// First arrival at a target this session
    TargetReached(Arrival),
    TrackingStarted { position: Position },
    TrackingStopped,
    /// The sensor failed; retry policy belongs to the receiver
    LocationError { error: SensorError, message: String },
}

impl NavigationEvent {
    /// Event name as used on the wire
    pub fn name(&self) -> &'static str {
        match self {
            NavigationEvent::PositionUpdate { .. } => "positionUpdate",
            NavigationEvent::TargetSet { .. } => "targetSet",
            NavigationEvent::TargetCleared => "targetCleared",
            NavigationEvent::NavigationUpdate(_) => "navigationUpdate",
            NavigationEvent::TargetReached(_) => "targetReached",
            NavigationEvent::TrackingStarted { .. } => "trackingStarted",
            NavigationEvent::TrackingStopped => "trackingStopped",
            NavigationEvent::LocationError { .. } => "locationError",
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Error a subscriber may hand back
pub type SubscriberError = Box<dyn std::error::Error + Send + Sync>;

/// Subscriber callback
pub type Subscriber = Box<dyn FnMut(&NavigationEvent) -> Result<(), SubscriberError> + Send>;

/// Registration handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u32);

impl SubscriptionId {
    pub fn id(&self) -> u32 {
        self.0
    }
}

/// Delivery outcome of one publish
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub delivered: usize,
    pub failed: usize,
}

#[derive(Default)]
pub struct EventChannel {
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_id: u32,
}

impl std::fmt::Debug for EventChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventChannel")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl EventChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fallible subscriber
    pub fn subscribe<F>(&mut self, subscriber: F) -> SubscriptionId
    where
        F: FnMut(&NavigationEvent) -> Result<(), SubscriberError> + Send + 'static,
    {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    /// Register a subscriber that cannot fail
    pub fn listen<F>(&mut self, mut listener: F) -> SubscriptionId
    where
        F: FnMut(&NavigationEvent) + Send + 'static,
    {
        self.subscribe(move |event| {
            listener(event);
            Ok(())
        })
    }

    /// Returns `false` for an unknown id
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Deliver `event` to every subscriber
    pub fn publish(&mut self, event: &NavigationEvent) -> DispatchReport {
        let mut report = DispatchReport::default();

        for (id, subscriber) in self.subscribers.iter_mut() {
            match panic::catch_unwind(AssertUnwindSafe(|| subscriber(event))) {
                Ok(Ok(())) => report.delivered += 1,
                Ok(Err(error)) => {
                    report.failed += 1;
                    warn!(subscriber = id.0, event = event.name(), %error, "subscriber failed");
                }
                Err(_) => {
                    report.failed += 1;
                    warn!(subscriber = id.0, event = event.name(), "subscriber panicked");
                }
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[test]
    fn test_delivery_in_subscription_order() {
        let mut channel = EventChannel::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        for n in 0..3 {
            let order = order.clone();
            channel.listen(move |_| order.lock().push(n));
        }

        let report = channel.publish(&NavigationEvent::TargetCleared);
        assert_eq!(report, DispatchReport { delivered: 3, failed: 0 });
        assert_eq!(*order.lock(), vec![0, 1, 2]);
    }

    #[test]
    fn test_failing_subscribers_are_isolated() {
        let mut channel = EventChannel::new();
        let seen = Arc::new(Mutex::new(0));

        channel.subscribe(|_| Err("boom".into()));
        channel.listen(|_| panic!("subscriber bug"));
        let counter = seen.clone();
        channel.listen(move |_| *counter.lock() += 1);

        let report = channel.publish(&NavigationEvent::TrackingStopped);
        assert_eq!(report.delivered, 1);
        assert_eq!(report.failed, 2);
        assert_eq!(*seen.lock(), 1);

        // Still subscribed and still isolated on the next event
        channel.publish(&NavigationEvent::TrackingStopped);
        assert_eq!(*seen.lock(), 2);
    }

    #[test]
    fn test_unsubscribe() {
        let mut channel = EventChannel::new();
        let id = channel.listen(|_| {});
        assert_eq!(channel.subscriber_count(), 1);
        assert!(channel.unsubscribe(id));
        assert!(!channel.unsubscribe(id));
        assert_eq!(channel.publish(&NavigationEvent::TargetCleared).delivered, 0);
    }

    #[test]
    fn test_event_json_is_tagged() {
        let json = NavigationEvent::LocationError {
            error: SensorError::Timeout { timeout_ms: 10_000 },
            message: "slow".to_string(),
        }
        .to_json()
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["type"], "locationError");
        assert_eq!(value["error"]["kind"], "timeout");
        assert_eq!(value["error"]["timeout_ms"], 10_000);

        let value = serde_json::to_value(NavigationEvent::TargetCleared).unwrap();
        assert_eq!(value["type"], "targetCleared");
    }

    #[test]
    fn test_names_match_serialized_tag() {
        let target = Target::new(1.0, 2.0, 3.0).unwrap();
        let event = NavigationEvent::TargetSet { target };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], event.name());
        assert_eq!(value["target"]["radius"], 3.0);
    }
}
