//! Public engine surface
//!
//! The tracking controller drives the pipeline, the event channel carries
//! its output, and the formatting helpers turn navigation state into short
//! readouts.

pub mod events;
pub mod tracker;
pub mod formatting;

pub use events::{
    DispatchReport, EventChannel, NavigationEvent, Subscriber, SubscriberError, SubscriptionId,
};
pub use tracker::{TrackerSnapshot, TrackingController, TrackingState, TrackingStats};
pub use formatting::{compass_point, format_distance, NavigationSummary};
