//! # Stop Detection
//!
//! Finds intervals in a GPS track where the subject stayed within a small
//! radius for a sustained time.
//!
//! ## Algorithm
//! 1. From the scan cursor `i`, look ahead to the last sample inside a fixed
//!    time window (default 20 s).
//! 2. If that sample is within the radius (default 10 m) of `track[i]`, the
//!    window is stationary: grow it greedily while each next sample stays
//!    within the radius of the current stop end, then resume after it.
//! 3. Otherwise advance `i` by one sample.
//! 4. Drop candidates lasting no longer than the minimum duration (default 60 s).
//!
//! The greedy growth compares against the *current* end, so slow drift keeps
//! extending one stop. The stop position is the first sample of the stop.
//!
//! All thresholds are strict: a sample exactly `window_secs` after the start
//! is outside the window, a distance of exactly `radius_meters` is not
//! stationary, and a stop of exactly `min_stop_secs` is dropped.

use crate::error::{Result, StopError};
use crate::geo_utils::sample_distance;
use crate::{Stop, TrackSample};
use log::{debug, info, warn};

/// Configuration for stop detection
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StopConfig {
    /// Lookahead window used to test for a stationary start (seconds)
    pub window_secs: f64,
    /// Maximum movement still counted as stationary (meters)
    pub radius_meters: f64,
    /// Stops must last strictly longer than this (seconds)
    pub min_stop_secs: f64,
}

impl Default for StopConfig {
    fn default() -> Self {
        Self {
            window_secs: 20.0,   // long enough to ride out a few GPS fixes
            radius_meters: 10.0, // typical consumer GPS jitter
            min_stop_secs: 60.0, // ignores traffic lights
        }
    }
}

impl StopConfig {
    /// Check that every threshold is finite and non-negative.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("window_secs", self.window_secs),
            ("radius_meters", self.radius_meters),
            ("min_stop_secs", self.min_stop_secs),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(StopError::Config {
                    message: format!("{} must be a finite non-negative number, got {}", name, value),
                });
            }
        }
        Ok(())
    }
}

/// Seconds elapsed from `from` to `to` (negative if `to` is earlier).
///
/// Widened to `i128` so any pair of `i64` timestamps has an exact difference.
#[inline]
pub fn elapsed_secs(from: &TrackSample, to: &TrackSample) -> f64 {
    (to.timestamp_ms as i128 - from.timestamp_ms as i128) as f64 / 1000.0
}

/// Detect stops using the default configuration.
///
/// # Example
/// ```
/// use stop_detector::{TrackSample, detect_stops};
///
/// // Standing still for two minutes, one fix every 10 seconds
/// let track: Vec<TrackSample> = (0..13)
///     .map(|i| TrackSample::new(i * 10_000, 51.5074, -0.1278))
///     .collect();
///
/// let stops = detect_stops(&track);
/// assert_eq!(stops.len(), 1);
/// assert_eq!(stops[0].duration_secs, 120.0);
/// ```
pub fn detect_stops(track: &[TrackSample]) -> Vec<Stop> {
    detect_stops_with_config(track, &StopConfig::default())
}

/// Detect stops with a custom configuration.
///
/// An invalid configuration is logged and replaced by the defaults so that
/// detection stays total over any track.
pub fn detect_stops_with_config(track: &[TrackSample], config: &StopConfig) -> Vec<Stop> {
    let default_config;
    let config = match config.validate() {
        Ok(()) => config,
        Err(e) => {
            warn!("[StopDetector] {}; using defaults", e);
            default_config = StopConfig::default();
            &default_config
        }
    };

    let candidates = find_candidates(track, config);
    let candidate_count = candidates.len();

    let stops: Vec<Stop> = candidates
        .into_iter()
        .filter(|s| s.duration_secs > config.min_stop_secs)
        .collect();

    info!(
        "[StopDetector] {} samples -> {} candidates -> {} stops",
        track.len(),
        candidate_count,
        stops.len()
    );

    stops
}

/// Run the windowed scan and return every stationary interval, before the
/// minimum-duration filter.
fn find_candidates(track: &[TrackSample], config: &StopConfig) -> Vec<Stop> {
    let mut candidates = Vec::new();
    if track.len() < 2 {
        return candidates;
    }

    let last = track.len() - 1;
    let mut i = 0;

    while i < last {
        let start = &track[i];
        let mut j = window_end(track, i, config.window_secs);
        let end = &track[j - 1];

        if sample_distance(start, end) < config.radius_meters {
            j = extend_stop(track, j, config.radius_meters);
            let stop = Stop::from_samples(start, &track[j - 1]);
            debug!(
                "[StopDetector] candidate at samples {}..={} ({:.0}s)",
                i,
                j - 1,
                stop.duration_secs
            );
            candidates.push(stop);
            i = j;
        } else {
            i += 1;
        }
    }

    candidates
}

/// Index one past the last sample less than `window_secs` after `track[start]`.
///
/// Always at least `start + 1`, so `track[result - 1]` is the window end
/// (which is `track[start]` itself when the next sample is already outside
/// the window).
fn window_end(track: &[TrackSample], start: usize, window_secs: f64) -> usize {
    let mut j = start + 1;
    while j < track.len() && elapsed_secs(&track[start], &track[j]) < window_secs {
        j += 1;
    }
    j
}

/// Greedily extend a stop whose current end is `track[j - 1]`.
///
/// Returns the new cursor; the extended stop ends at `track[result - 1]`.
fn extend_stop(track: &[TrackSample], mut j: usize, radius_meters: f64) -> usize {
    while j < track.len() && sample_distance(&track[j - 1], &track[j]) < radius_meters {
        j += 1;
    }
    j
}

/// Detect stops for many tracks. Results are index-aligned with `tracks`.
pub fn detect_stops_batch(tracks: &[Vec<TrackSample>], config: &StopConfig) -> Vec<Vec<Stop>> {
    tracks
        .iter()
        .map(|track| detect_stops_with_config(track, config))
        .collect()
}

/// Detect stops for many tracks using rayon.
///
/// Same output as [`detect_stops_batch`]; worthwhile once there are dozens
/// of long tracks.
#[cfg(feature = "parallel")]
pub fn detect_stops_batch_parallel(
    tracks: &[Vec<TrackSample>],
    config: &StopConfig,
) -> Vec<Vec<Stop>> {
    use rayon::prelude::*;

    tracks
        .par_iter()
        .map(|track| detect_stops_with_config(track, config))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo_utils::haversine_distance;

    // Degrees of latitude per meter
    const METER_DEG: f64 = 1.0 / 111_195.0;
    const BASE_LAT: f64 = 51.5074;
    const BASE_LNG: f64 = -0.1278;

    fn at(secs: i64, north_m: f64) -> TrackSample {
        TrackSample::new(secs * 1000, BASE_LAT + north_m * METER_DEG, BASE_LNG)
    }

    /// Samples every `step` seconds for `span` seconds, jittering up to ~2 m.
    fn stationary(start_secs: i64, span: i64, step: i64) -> Vec<TrackSample> {
        (0..=span / step)
            .map(|k| at(start_secs + k * step, (k % 3) as f64 * 0.9))
            .collect()
    }

    /// Samples every 10 s, ~200 m apart.
    fn moving(start_secs: i64, count: i64, start_north_m: f64) -> Vec<TrackSample> {
        (0..count)
            .map(|k| at(start_secs + k * 10, start_north_m + k as f64 * 200.0))
            .collect()
    }

    #[test]
    fn test_empty_and_single_sample() {
        assert!(detect_stops(&[]).is_empty());
        assert!(detect_stops(&[at(0, 0.0)]).is_empty());
    }

    #[test]
    fn test_short_pause_is_dropped() {
        // 5 samples, 10 s apart, within 2 m: a 40 s candidate
        let track = stationary(0, 40, 10);
        assert_eq!(track.len(), 5);

        let candidates = find_candidates(&track, &StopConfig::default());
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].duration_secs, 40.0);

        assert!(detect_stops(&track).is_empty());
    }

    #[test]
    fn test_long_stop() {
        let track = stationary(0, 90, 10);
        let stops = detect_stops(&track);

        assert_eq!(stops.len(), 1);
        assert_eq!(stops[0].start_ms, 0);
        assert_eq!(stops[0].end_ms, 90_000);
        assert_eq!(stops[0].duration_secs, 90.0);
        assert_eq!(stops[0].position, track[0].point());
    }

    #[test]
    fn test_moving_track_has_no_stops() {
        let track = moving(0, 13, 0.0);
        let d = haversine_distance(&track[0].point(), &track[1].point());
        assert!(d > 150.0);

        assert!(find_candidates(&track, &StopConfig::default()).is_empty());
        assert!(detect_stops(&track).is_empty());
    }

    #[test]
    fn test_stop_between_movement() {
        let mut track = moving(0, 3, -600.0);
        track.extend(stationary(30, 120, 10));
        track.extend(moving(160, 4, 200.0));

        let stops = detect_stops(&track);
        assert_eq!(stops.len(), 1);
        assert_eq!(stops[0].start_ms, 30_000);
        assert_eq!(stops[0].end_ms, 150_000);
        assert_eq!(stops[0].duration_secs, 120.0);
    }

    #[test]
    fn test_two_stops_are_ordered_and_disjoint() {
        let mut track = stationary(0, 100, 10);
        track.extend(moving(110, 5, 300.0));
        let far = 300.0 + 5.0 * 200.0 + 500.0;
        track.extend((0..=8).map(|k| at(160 + k * 10, far)));

        let stops = detect_stops(&track);
        assert_eq!(stops.len(), 2);
        assert_eq!(stops[0].start_ms, 0);
        assert_eq!(stops[0].end_ms, 100_000);
        assert_eq!(stops[1].start_ms, 160_000);
        assert_eq!(stops[1].end_ms, 240_000);
        assert!(stops[0].end_ms < stops[1].start_ms);
    }

    #[test]
    fn test_slow_drift_extends_one_stop() {
        // 4 m per 10 s: each step is inside the radius even though the
        // total drift is far outside it
        let track: Vec<TrackSample> = (0..=20).map(|k| at(k * 10, k as f64 * 3.6)).collect();
        let total = haversine_distance(&track[0].point(), &track[20].point());
        assert!(total > 50.0);

        let stops = detect_stops(&track);
        assert_eq!(stops.len(), 1);
        assert_eq!(stops[0].duration_secs, 200.0);
        assert_eq!(stops[0].position, track[0].point());
    }

    #[test]
    fn test_window_end_excludes_exact_window() {
        let track = vec![at(0, 0.0), at(10, 0.0), at(20, 0.0), at(30, 0.0)];
        assert_eq!(window_end(&track, 0, 20.0), 2);
        assert_eq!(window_end(&track, 1, 20.0), 3);
        assert_eq!(window_end(&track, 2, 20.0), 4);
    }

    #[test]
    fn test_window_end_with_sparse_samples() {
        // Next fix is already outside the window: the window is the start alone
        let track = vec![at(0, 0.0), at(45, 0.0)];
        assert_eq!(window_end(&track, 0, 20.0), 1);
    }

    #[test]
    fn test_radius_is_strict() {
        let a = at(0, 0.0);
        let b = at(10, 8.0);
        let c = at(70, 8.0);
        let radius = sample_distance(&a, &b);

        // Window [a, b] is exactly `radius` apart: not stationary
        let config = StopConfig {
            radius_meters: radius,
            min_stop_secs: 0.0,
            ..StopConfig::default()
        };
        let track = vec![a, b, c];
        let candidates = find_candidates(&track, &config);
        // i = 0 fails; i = 1 opens a window [b] and extends to c
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].start_ms, 10_000);

        let track = vec![a, b];
        assert!(find_candidates(&track, &config).is_empty());
    }

    #[test]
    fn test_extend_stop_is_strict() {
        let track = vec![at(0, 0.0), at(10, 0.0), at(20, 8.0)];
        let radius = sample_distance(&track[1], &track[2]);
        assert_eq!(extend_stop(&track, 2, radius), 2);
        assert_eq!(extend_stop(&track, 2, radius + 0.01), 3);
    }

    #[test]
    fn test_min_duration_is_strict() {
        let exactly = stationary(0, 60, 10);
        assert!(detect_stops(&exactly).is_empty());

        let mut longer = stationary(0, 60, 10);
        longer.push(at(61, 0.0));
        let stops = detect_stops(&longer);
        assert_eq!(stops.len(), 1);
        assert_eq!(stops[0].duration_secs, 61.0);
    }

    #[test]
    fn test_gap_opens_single_sample_window() {
        // t=30 has no neighbour inside 20 s, so its window is the sample
        // itself and trivially stationary
        let mut track = moving(0, 4, 0.0);
        track.push(at(200, 4.0 * 200.0));

        let candidates = find_candidates(&track, &StopConfig::default());
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].start_ms, 30_000);
        assert_eq!(candidates[0].duration_secs, 0.0);
        assert!(detect_stops(&track).is_empty());
    }

    #[test]
    fn test_trailing_sample_never_starts_a_window() {
        let mut track = stationary(0, 90, 10);
        track.push(at(100, 500.0));

        let candidates = find_candidates(&track, &StopConfig::default());
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].end_ms, 90_000);
    }

    #[test]
    fn test_duplicate_timestamps() {
        let track: Vec<TrackSample> = (0..10).map(|_| at(0, 0.0)).collect();
        let candidates = find_candidates(&track, &StopConfig::default());
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].duration_secs, 0.0);
        assert!(detect_stops(&track).is_empty());
    }

    #[test]
    fn test_extreme_timestamps() {
        let track = vec![
            TrackSample::new(i64::MIN, BASE_LAT, BASE_LNG),
            TrackSample::new(i64::MAX, BASE_LAT, BASE_LNG),
        ];
        let stops = detect_stops(&track);
        assert_eq!(stops.len(), 1);
        assert_eq!(stops[0].start_ms, i64::MIN);
        assert_eq!(stops[0].end_ms, i64::MAX);
        assert!(stops[0].duration_secs > 1.8e16);

        assert!(elapsed_secs(&track[1], &track[0]) < -1.8e16);
    }

    #[test]
    fn test_sub_second_timestamps() {
        let track: Vec<TrackSample> = (0..=10)
            .map(|k| TrackSample::new(k * 6_150, BASE_LAT, BASE_LNG))
            .collect();
        let stops = detect_stops(&track);
        assert_eq!(stops.len(), 1);
        assert!((stops[0].duration_secs - 61.5).abs() < 1e-9);
    }

    #[test]
    fn test_detection_is_idempotent() {
        let mut track = stationary(0, 90, 10);
        track.extend(moving(100, 3, 300.0));
        track.extend(stationary(130, 200, 5));
        assert_eq!(detect_stops(&track), detect_stops(&track));
    }

    #[test]
    fn test_duration_matches_timestamps() {
        let mut track = stationary(0, 300, 7);
        track.extend(moving(310, 3, 300.0));
        for stop in detect_stops(&track) {
            assert!(stop.duration_secs > 60.0);
            assert_eq!(stop.duration_secs, (stop.end_ms - stop.start_ms) as f64 / 1000.0);
        }
    }

    #[test]
    fn test_custom_config() {
        let track = stationary(0, 40, 10);
        let config = StopConfig {
            min_stop_secs: 30.0,
            ..StopConfig::default()
        };
        assert_eq!(detect_stops_with_config(&track, &config).len(), 1);
    }

    #[test]
    fn test_invalid_config_falls_back_to_defaults() {
        let config = StopConfig {
            radius_meters: f64::NAN,
            ..StopConfig::default()
        };
        assert!(matches!(config.validate(), Err(StopError::Config { .. })));

        let track = stationary(0, 90, 10);
        assert_eq!(detect_stops_with_config(&track, &config), detect_stops(&track));
    }

    #[test]
    fn test_validate_rejects_negative() {
        let config = StopConfig {
            window_secs: -1.0,
            ..StopConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("window_secs"));
        assert!(StopConfig::default().validate().is_ok());
    }

    #[test]
    fn test_batch_is_index_aligned() {
        let tracks = vec![stationary(0, 90, 10), moving(0, 10, 0.0), vec![]];
        let results = detect_stops_batch(&tracks, &StopConfig::default());
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].len(), 1);
        assert!(results[1].is_empty());
        assert!(results[2].is_empty());
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_batch_matches_sequential() {
        let tracks: Vec<Vec<TrackSample>> = (0..8)
            .map(|n| {
                let mut t = stationary(0, 60 + n * 10, 10);
                t.extend(moving(1000, 3, 500.0));
                t
            })
            .collect();
        let config = StopConfig::default();
        assert_eq!(
            detect_stops_batch_parallel(&tracks, &config),
            detect_stops_batch(&tracks, &config)
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_config_from_json() {
        let json = r#"{"window_secs": 30.0, "radius_meters": 15.0, "min_stop_secs": 120.0}"#;
        let config: StopConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.window_secs, 30.0);
        assert_eq!(config.radius_meters, 15.0);
        assert_eq!(config.min_stop_secs, 120.0);
    }
}
