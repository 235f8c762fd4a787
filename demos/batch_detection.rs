//! Example of detecting stops across many tracks in parallel.
//!
//! Run with: cargo run --example batch_detection --features parallel

use std::time::Instant;
use stop_detector::{detect_stops_batch, detect_stops_batch_parallel, StopConfig, TrackSample};

/// A commute-like track: `stops` waits of `wait_secs` separated by riding.
fn commute(seed: usize, stops: usize, wait_secs: i64) -> Vec<TrackSample> {
    let mut track = Vec::new();
    let mut lat = 48.8566 + seed as f64 * 0.01;
    let mut t = 0i64;

    for _ in 0..stops {
        for _ in 0..60 {
            track.push(TrackSample::new(t * 1000, lat, 2.3522));
            lat += 0.0004;
            t += 5;
        }
        for _ in 0..wait_secs / 5 {
            // Jitter of a couple of meters while standing
            let jitter = if t % 10 == 0 { 0.00001 } else { 0.0 };
            track.push(TrackSample::new(t * 1000, lat + jitter, 2.3522));
            t += 5;
        }
    }
    track
}

fn main() {
    println!("Batch Stop Detection Example\n");

    let tracks: Vec<Vec<TrackSample>> = (0..200).map(|i| commute(i, 6, 90 + i as i64)).collect();
    let total_samples: usize = tracks.iter().map(|t| t.len()).sum();
    println!("Tracks: {} ({} samples)", tracks.len(), total_samples);

    let config = StopConfig::default();

    let start = Instant::now();
    let sequential = detect_stops_batch(&tracks, &config);
    println!("Sequential: {:?}", start.elapsed());

    let start = Instant::now();
    let parallel = detect_stops_batch_parallel(&tracks, &config);
    println!("Parallel:   {:?}", start.elapsed());

    assert_eq!(sequential, parallel);

    let total_stops: usize = parallel.iter().map(|s| s.len()).sum();
    println!("\nFound {} stops ({:.1} per track)", total_stops, total_stops as f64 / tracks.len() as f64);
}
