//! # Geographic Utilities
//!
//! Geographic computations used by stop detection and map framing.
//!
//! | Function | Description |
//! |----------|-------------|
//! | [`haversine_distance`] | Great-circle distance between two GPS points |
//! | [`sample_distance`] | Great-circle distance between two track samples |
//! | [`compute_center`] | Arithmetic-mean centroid of a set of points |
//!
//! ## Example
//!
//! ```rust
//! use stop_detector::{GpsPoint, geo_utils};
//!
//! let a = GpsPoint::new(51.5074, -0.1278);
//! let b = GpsPoint::new(51.5080, -0.1290);
//!
//! let dist = geo_utils::haversine_distance(&a, &b);
//! println!("a to b: {:.0}m", dist);
//! ```
//!
//! ## Algorithm Notes
//!
//! Distances use the haversine formula on a sphere with the mean earth radius
//! (6,371 km). Ellipsoidal effects are ignored; for the 10 m radii used by
//! stop detection the error is far below GPS noise.
//!
//! Reference: [Haversine formula (Wikipedia)](https://en.wikipedia.org/wiki/Haversine_formula)

use geo::{Point, Haversine, Distance};
use crate::{GpsPoint, TrackSample};

// =============================================================================
// Distance Functions
// =============================================================================

/// Calculate the great-circle distance between two GPS points using the Haversine formula.
///
/// Returns the distance in meters along the Earth's surface. NaN or
/// out-of-range coordinates are not rejected; whatever the formula yields is
/// returned.
///
/// # Example
///
/// ```rust
/// use stop_detector::{GpsPoint, geo_utils};
///
/// let london = GpsPoint::new(51.5074, -0.1278);
/// let paris = GpsPoint::new(48.8566, 2.3522);
///
/// let distance = geo_utils::haversine_distance(&london, &paris);
/// assert!((distance - 343_560.0).abs() < 1000.0); // ~344 km
/// ```
#[inline]
pub fn haversine_distance(p1: &GpsPoint, p2: &GpsPoint) -> f64 {
    let point1 = Point::new(p1.longitude, p1.latitude);
    let point2 = Point::new(p2.longitude, p2.latitude);
    Haversine::distance(point1, point2)
}

/// Great-circle distance in meters between the positions of two samples.
#[inline]
pub fn sample_distance(a: &TrackSample, b: &TrackSample) -> f64 {
    haversine_distance(&a.point(), &b.point())
}

// =============================================================================
// Center/Centroid Functions
// =============================================================================

/// Compute the arithmetic-mean centroid of a set of points.
///
/// Latitudes and longitudes are averaged independently without weighting.
/// Returns `None` for empty input.
///
/// # Notes
///
/// Points straddling the antimeridian (180°/-180° longitude) average to a
/// longitude near 0, which is wrong for such inputs. Stops in a single
/// activity never span that far in practice.
///
/// # Example
///
/// ```rust
/// use stop_detector::{GpsPoint, geo_utils};
///
/// let points = vec![
///     GpsPoint::new(51.50, -0.10),
///     GpsPoint::new(51.52, -0.12),
/// ];
///
/// let center = geo_utils::compute_center(&points).unwrap();
/// assert!((center.latitude - 51.51).abs() < 0.001);
/// assert!((center.longitude - (-0.11)).abs() < 0.001);
/// ```
pub fn compute_center(points: &[GpsPoint]) -> Option<GpsPoint> {
    if points.is_empty() {
        return None;
    }

    let sum_lat: f64 = points.iter().map(|p| p.latitude).sum();
    let sum_lng: f64 = points.iter().map(|p| p.longitude).sum();
    let n = points.len() as f64;

    Some(GpsPoint::new(sum_lat / n, sum_lng / n))
}

// =============================================================================
// Unit Tests
// =============================================================================
