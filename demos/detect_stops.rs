//! Detect stops in a TCX file and print them.
//!
//! Run with: cargo run --example detect_stops -- path/to/activity.tcx
//!
//! Without a path, a synthetic ride with two stops is used.

use stop_detector::{detect_stops, load_tcx_file, view, TrackSample};

fn synthetic_ride() -> Vec<TrackSample> {
    let mut track = Vec::new();
    let mut lat = 51.5000;
    let mut t = 0i64;

    // Ride north, wait, ride north, wait longer, ride away
    for (ride_fixes, wait_secs) in [(12, 95), (8, 400), (10, 0)] {
        for _ in 0..ride_fixes {
            track.push(TrackSample::new(t * 1000, lat, -0.1278));
            lat += 0.0005; // ~55 m per fix
            t += 10;
        }
        let mut waited = 0;
        while waited < wait_secs {
            track.push(TrackSample::new(t * 1000, lat, -0.1278));
            waited += 5;
            t += 5;
        }
    }
    track
}

fn main() {
    let track = match std::env::args().nth(1) {
        Some(path) => match load_tcx_file(&path) {
            Ok(samples) => samples,
            Err(e) => {
                eprintln!("Failed to load {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => synthetic_ride(),
    };

    println!("Stop Detection Example\n");
    println!("Track: {} samples", track.len());

    let stops = detect_stops(&track);
    println!("Found {} stops\n", stops.len());

    for marker in view::build_markers(&stops) {
        println!(
            "  {} at ({:.5}, {:.5})",
            marker.label, marker.position.latitude, marker.position.longitude
        );
    }

    let center = view::map_center(&stops);
    println!("\nMap center: ({:.5}, {:.5})", center.latitude, center.longitude);
}
