//! Presentation helpers for showing stops on a map.
//!
//! Nothing here draws; these functions produce the values a map view needs
//! (a center to frame, marker positions and tooltip labels).

use crate::geo_utils::compute_center;
use crate::{GpsPoint, Stop};

/// Map center used when there are no stops to frame (central London).
pub const DEFAULT_MAP_CENTER: GpsPoint = GpsPoint {
    latitude: 51.505,
    longitude: -0.09,
};

/// A marker ready for a map view.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StopMarker {
    pub position: GpsPoint,
    /// Tooltip text, e.g. `Stop 1: 00:01:30`
    pub label: String,
}

/// Format a duration in seconds as `HH:MM:SS`.
///
/// Fractional seconds are truncated. Negative and non-finite inputs format
/// as `00:00:00`. Hours are not wrapped, so 100 hours prints as `100:00:00`.
///
/// ```
/// use stop_detector::view::format_duration;
/// assert_eq!(format_duration(3725.0), "01:02:05");
/// ```
pub fn format_duration(duration_secs: f64) -> String {
    let total = if duration_secs.is_finite() && duration_secs > 0.0 {
        duration_secs as u64
    } else {
        0
    };

    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// Unweighted mean of all stop positions, or `None` without stops.
pub fn stop_centroid(stops: &[Stop]) -> Option<GpsPoint> {
    let positions: Vec<GpsPoint> = stops.iter().map(|s| s.position).collect();
    compute_center(&positions)
}

/// Where to center the map: the stop centroid, else [`DEFAULT_MAP_CENTER`].
pub fn map_center(stops: &[Stop]) -> GpsPoint {
    stop_centroid(stops).unwrap_or(DEFAULT_MAP_CENTER)
}

/// Tooltip label for the stop at `index` (0-based; displayed 1-based).
pub fn stop_label(index: usize, stop: &Stop) -> String {
    format!("Stop {}: {}", index + 1, format_duration(stop.duration_secs))
}

/// One marker per stop, in stop order.
pub fn build_markers(stops: &[Stop]) -> Vec<StopMarker> {
    stops
        .iter()
        .enumerate()
        .map(|(idx, stop)| StopMarker {
            position: stop.position,
            label: stop_label(idx, stop),
        })
        .collect()
}
