//! Navigation readout helpers
//!
//! Distance and compass strings plus a one-line summary for UI collaborators.

use crate::navigation::NavigationState;
use serde::Serialize;
use std::fmt;

const COMPASS_POINTS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

/// "850 m" below one kilometre, "1.2 km" from there on
pub fn format_distance(meters: f64) -> String {
    if meters < 1000.0 {
        format!("{:.0} m", meters)
    } else {
        format!("{:.1} km", meters / 1000.0)
    }
}

/// Nearest point of a 16-point compass rose
pub fn compass_point(bearing: f64) -> &'static str {
    let sector = (bearing.rem_euclid(360.0) / 22.5).round() as usize % 16;
    COMPASS_POINTS[sector]
}

/// One-line navigation readout
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationSummary {
    pub target_lat: f64,
    pub target_lng: f64,
    pub distance_m: f64,
    pub distance_text: String,
    pub bearing_deg: f64,
    pub compass: &'static str,
    pub arrived: bool,
}

impl NavigationSummary {
    /// Build from the last evaluation; `None` until one has run
    pub fn from_state(state: &NavigationState, arrived: bool) -> Option<Self> {
        let target = state.current_target.as_ref()?;
        let distance = state.last_distance?;
        let bearing = state.last_bearing?;
        Some(Self {
            target_lat: target.coordinate.lat(),
            target_lng: target.coordinate.lng(),
            distance_m: distance,
            distance_text: format_distance(distance),
            bearing_deg: bearing,
            compass: compass_point(bearing),
            arrived,
        })
    }
}

impl fmt::Display for NavigationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.arrived {
            write!(f, "Arrived ({} from target)", self.distance_text)
        } else {
            write!(
                f,
                "{} {} ({:.0}°)",
                self.distance_text, self.compass, self.bearing_deg
            )
        }
    }
}
