//! # Stop Detector
//!
//! Finds the places an activity paused in a GPS track.
//!
//! This library provides:
//! - Stop detection over timestamped GPS samples (windowed stationary scan)
//! - TCX trackpoint loading
//! - Helpers for presenting stops on a map (duration labels, map framing)
//!
//! ## Features
//!
//! - **`parallel`** - Batch detection across many tracks with rayon
//! - **`serde`** - Serialize samples, stops and [`StopConfig`]
//! - **`ffi`** - Enable FFI bindings for mobile platforms (iOS/Android)
//! - **`full`** - Enable all features
//!
//! ## Quick Start
//!
//! ```rust
//! use stop_detector::{TrackSample, detect_stops, view};
//!
//! // Ride in, wait 90 seconds, ride away
//! let mut track = vec![TrackSample::new(0, 51.5000, -0.1278)];
//! track.extend((1..=10).map(|i| TrackSample::new(i * 10_000, 51.5074, -0.1278)));
//! track.push(TrackSample::new(110_000, 51.5150, -0.1278));
//!
//! let stops = detect_stops(&track);
//! assert_eq!(stops.len(), 1);
//! assert_eq!(view::format_duration(stops[0].duration_secs), "00:01:30");
//! ```

pub mod error;
pub use error::{Result, StopError};

pub mod geo_utils;

// Stationary-window stop detection
pub mod stops;
pub use stops::{StopConfig, detect_stops, detect_stops_batch, detect_stops_with_config};
#[cfg(feature = "parallel")]
pub use stops::detect_stops_batch_parallel;

// TCX track loading
pub mod tcx;
pub use tcx::{load_tcx_file, parse_tcx};

// Map presentation helpers
pub mod view;

#[cfg(feature = "ffi")]
uniffi::setup_scaffolding!();

/// Initialize logging for Android (only used in FFI)
#[cfg(all(feature = "ffi", target_os = "android"))]
fn init_logging() {
    use android_logger::Config;
    use log::LevelFilter;

    android_logger::init_once(
        Config::default()
            .with_max_level(LevelFilter::Debug)
            .with_tag("StopDetectorRust")
    );
}

#[cfg(all(feature = "ffi", not(target_os = "android")))]
fn init_logging() {
    // No-op on non-Android platforms
}

// ============================================================================
// Core Types
// ============================================================================

/// A GPS coordinate with latitude and longitude.
///
/// # Example
/// ```
/// use stop_detector::GpsPoint;
/// let point = GpsPoint::new(51.5074, -0.1278); // London
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GpsPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GpsPoint {
    /// Create a new GPS point.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Check if the point has valid coordinates.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
    }
}

/// One timestamped fix in a track.
///
/// Tracks are plain slices of samples in chronological order; detection
/// assumes (but does not check) that timestamps never decrease.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackSample {
    /// Unix timestamp in milliseconds
    pub timestamp_ms: i64,
    pub latitude: f64,
    pub longitude: f64,
}

impl TrackSample {
    /// Create a new sample.
    pub fn new(timestamp_ms: i64, latitude: f64, longitude: f64) -> Self {
        Self { timestamp_ms, latitude, longitude }
    }

    /// Position of this sample.
    pub fn point(&self) -> GpsPoint {
        GpsPoint::new(self.latitude, self.longitude)
    }
}

/// A detected stationary interval.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stop {
    /// Timestamp of the first sample of the stop (Unix ms)
    pub start_ms: i64,
    /// Timestamp of the last sample of the stop (Unix ms)
    pub end_ms: i64,
    /// `end_ms - start_ms` in seconds
    pub duration_secs: f64,
    /// Position of the first sample (not an average over the stop)
    pub position: GpsPoint,
}

impl Stop {
    /// Build a stop spanning `start` to `end`, located at `start`.
    pub fn from_samples(start: &TrackSample, end: &TrackSample) -> Self {
        Self {
            start_ms: start.timestamp_ms,
            end_ms: end.timestamp_ms,
            duration_secs: stops::elapsed_secs(start, end),
            position: start.point(),
        }
    }
}

// ============================================================================
// FFI Exports (only when feature enabled)
// ============================================================================

#[cfg(feature = "ffi")]
mod ffi {
    use super::*;
    use log::{info, warn};

    /// Detect stops with the default configuration.
    #[uniffi::export]
    pub fn ffi_detect_stops(samples: Vec<TrackSample>) -> Vec<Stop> {
        init_logging();
        info!("[StopDetectorRust] detect_stops called with {} samples", samples.len());
        detect_stops(&samples)
    }

    /// Detect stops with a custom configuration.
    #[uniffi::export]
    pub fn ffi_detect_stops_with_config(samples: Vec<TrackSample>, config: StopConfig) -> Vec<Stop> {
        init_logging();
        info!(
            "[StopDetectorRust] detect_stops_with_config called with {} samples (window={}s, radius={}m, min={}s)",
            samples.len(),
            config.window_secs,
            config.radius_meters,
            config.min_stop_secs
        );
        detect_stops_with_config(&samples, &config)
    }

    /// Detect stops for many tracks in parallel.
    #[uniffi::export]
    pub fn ffi_detect_stops_batch(tracks: Vec<Vec<TrackSample>>, config: StopConfig) -> Vec<Vec<Stop>> {
        init_logging();
        let start = std::time::Instant::now();
        let results = detect_stops_batch_parallel(&tracks, &config);
        info!(
            "[StopDetectorRust] batch detection over {} tracks in {:?}",
            tracks.len(),
            start.elapsed()
        );
        results
    }

    /// Parse TCX text into samples. Returns `None` if the XML is malformed.
    #[uniffi::export]
    pub fn ffi_parse_tcx(xml: String) -> Option<Vec<TrackSample>> {
        init_logging();
        match parse_tcx(&xml) {
            Ok(samples) => Some(samples),
            Err(e) => {
                warn!("[StopDetectorRust] parse_tcx failed: {}", e);
                None
            }
        }
    }

    /// Format seconds as `HH:MM:SS`.
    #[uniffi::export]
    pub fn ffi_format_duration(duration_secs: f64) -> String {
        view::format_duration(duration_secs)
    }

    /// Map center for a set of stops, or the default center when empty.
    #[uniffi::export]
    pub fn ffi_map_center(stops: Vec<Stop>) -> GpsPoint {
        view::map_center(&stops)
    }

    /// Markers (position + tooltip label) for a set of stops.
    #[uniffi::export]
    pub fn ffi_build_markers(stops: Vec<Stop>) -> Vec<view::StopMarker> {
        view::build_markers(&stops)
    }

    /// Default stop detection configuration.
    #[uniffi::export]
    pub fn default_stop_config() -> StopConfig {
        init_logging();
        StopConfig::default()
    }

}

// ============================================================================
// Tests
// ============================================================================
