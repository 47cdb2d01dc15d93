//! Scripted walk toward a target, printing every engine event as JSON.
//!
//! Usage: `geonav-demo [config.json]`. Set `RUST_LOG=geonav=debug` to see
//! filter and throttle decisions.

use geonav::{EngineConfig, Fix, ManualClock, MockSensor, SensorError, TrackingController};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const START: (f64, f64) = (-27.632000, -48.681134);
const TARGET: (f64, f64) = (-27.630548, -48.681134);
const STEP_DEG: f64 = 0.0001;
const STEP_MS: u64 = 10_000;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = run() {
        error!(error = %e, "demo failed");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = match std::env::args().nth(1) {
        Some(path) => EngineConfig::from_file(&path)?,
        None => EngineConfig::default(),
    };

    let sensor = MockSensor::new();
    let clock = ManualClock::new(0);
    let mut tracker =
        TrackingController::with_clock(Box::new(sensor.clone()), config, Box::new(clock.clone()))?;

    tracker.listen(|event| match event.to_json() {
        Ok(line) => println!("{}", line),
        Err(e) => error!(error = %e, "event serialization failed"),
    });

    sensor.queue_current_fix(Fix::new(START.0, START.1, 12.0, 0));
    tracker.start()?;
    tracker.set_target(TARGET.0, TARGET.1, 20.0)?;

    // Walk north one step at a time, with a few bad readings mixed in
    let mut lat = START.0;
    let mut timestamp = 0;
    for step in 1..=16u64 {
        lat += STEP_DEG;
        timestamp += STEP_MS;
        clock.advance(STEP_MS);

        match step {
            4 => sensor.push_fix(Fix::new(lat, START.1, 120.0, timestamp)),
            7 => sensor.push_fix(Fix::new(lat + 0.05, START.1, 5.0, timestamp)),
            10 => sensor.push_error(SensorError::PositionUnavailable {
                reason: "signal lost".into(),
            }),
            _ => sensor.push_fix(Fix::new(lat, START.1, 6.0, timestamp).with_speed(1.1)),
        }
        tracker.process();

        if let Some(summary) = tracker.summary() {
            info!(step, "{}", summary);
        }
    }

    if let Some(track) = tracker.history().track() {
        info!(track, moving = tracker.is_moving(), "walk track");
    }

    tracker.stop();
    info!(stats = ?tracker.stats(), "demo finished");
    Ok(())
}
