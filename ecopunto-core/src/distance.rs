//! Simulated distances and distance ordering for drop-off points.

use std::cmp::Ordering;

use rand::Rng;

use crate::model::{LocationFix, Point};

/// Upper bound (exclusive) of a simulated distance in kilometers.
pub const SIMULATED_RANGE_KM: f64 = 5.0;

/// Give every point a random distance in `[0, SIMULATED_RANGE_KM)`.
///
/// The origin is recorded by callers but not used for any geometry; this is
/// the place a real geodesic distance would go.
pub fn assign_simulated_distances<R: Rng>(
    points: &mut [Point],
    origin: &LocationFix,
    rng: &mut R,
) {
    for point in points.iter_mut() {
        point.distance_km = Some(rng.random_range(0.0..SIMULATED_RANGE_KM));
    }
    tracing::debug!(
        count = points.len(),
        latitude = origin.latitude,
        longitude = origin.longitude,
        "assigned simulated distances"
    );
}

/// Order by known distance; unknown distances go last.
fn compare_distance(left: Option<f64>, right: Option<f64>) -> Ordering {
    match (left, right) {
        (Some(left), Some(right)) => left.total_cmp(&right),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable sort by `distance_km` ascending; equal distances keep their input order.
pub fn sort_by_distance_ascending(points: &mut [Point]) {
    points.sort_by(|left, right| compare_distance(left.distance_km, right.distance_km));
}

/// Card label for a distance, e.g. `2.3 km`.
#[must_use]
pub fn format_distance(km: f64) -> String {
    format!("{km:.1} km")
}
