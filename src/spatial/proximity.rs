//! Marker matching: decides whether a tapped coordinate is "the same marker"
//! as one already placed.
//!
//! The test is an axis-aligned box of half-width `T` degrees on both axes,
//! inclusive at the edges. It is not a geodesic distance: a degree of
//! longitude spans less ground away from the equator, so the box is
//! anisotropic on the ground.

use crate::core::constants::MARKER_TOLERANCE_DEG;
use crate::core::geo::LatLng;
use serde::{Deserialize, Serialize};

/// Per-axis tolerance in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tolerance(f64);

impl Tolerance {
    pub fn new(degrees: f64) -> Self {
        Self(degrees.abs())
    }

    pub fn degrees(&self) -> f64 {
        self.0
    }

    /// Inclusive box test on both axes
    pub fn contains(&self, a: &LatLng, b: &LatLng) -> bool {
        (a.lat - b.lat).abs() <= self.0 && (a.lng - b.lng).abs() <= self.0
    }

    /// South-west and north-east corners of the box around `center`
    pub fn box_around(&self, center: &LatLng) -> (LatLng, LatLng) {
        (
            LatLng::new(center.lat - self.0, center.lng - self.0),
            LatLng::new(center.lat + self.0, center.lng + self.0),
        )
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self(MARKER_TOLERANCE_DEG)
    }
}

/// Stateless matcher over a slice of marker positions
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProximityMatcher {
    tolerance: Tolerance,
}

impl ProximityMatcher {
    pub fn new(tolerance: Tolerance) -> Self {
        Self { tolerance }
    }

    pub fn tolerance(&self) -> Tolerance {
        self.tolerance
    }

    /// Whether `query` and `marker` count as the same marker
    pub fn matches(&self, query: &LatLng, marker: &LatLng) -> bool {
        self.tolerance.contains(query, marker)
    }

    /// True iff any member of `markers` matches `query`
    pub fn is_matched(&self, query: &LatLng, markers: &[LatLng]) -> bool {
        markers.iter().any(|marker| self.matches(query, marker))
    }

    /// Position of the first matching member in iteration order
    pub fn index_of(&self, query: &LatLng, markers: &[LatLng]) -> Option<usize> {
        markers.iter().position(|marker| self.matches(query, marker))
    }
}

/// [`ProximityMatcher::is_matched`] with the default tolerance
pub fn is_matched(query: &LatLng, markers: &[LatLng]) -> bool {
    ProximityMatcher::default().is_matched(query, markers)
}

/// [`ProximityMatcher::index_of`] with the default tolerance
pub fn index_of(query: &LatLng, markers: &[LatLng]) -> Option<usize> {
    ProximityMatcher::default().index_of(query, markers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_marker_predicate() {
        let b = LatLng::new(37.0, -122.0);
        let cases = [
            (LatLng::new(37.0, -122.0), true),
            (LatLng::new(37.001, -122.001), true),
            (LatLng::new(37.003, -121.997), true),
            (LatLng::new(37.01, -122.0), false),
            (LatLng::new(37.0, -122.01), false),
            (LatLng::new(37.01, -122.01), false),
        ];
        for (a, expected) in cases {
            let by_formula =
                (a.lat - b.lat).abs() <= 0.0035 && (a.lng - b.lng).abs() <= 0.0035;
            assert_eq!(by_formula, expected, "{a}");
            assert_eq!(is_matched(&a, &[b]), expected, "{a}");
        }
    }

    #[test]
    fn test_boundary_is_inclusive() {
        let origin = LatLng::new(0.0, 0.0);
        assert!(is_matched(&LatLng::new(0.0035, 0.0035), &[origin]));
        assert!(is_matched(&LatLng::new(-0.0035, -0.0035), &[origin]));
    }

    #[test]
    fn test_just_past_boundary_misses() {
        let origin = LatLng::new(0.0, 0.0);
        let eps = 1e-9;
        assert!(!is_matched(&LatLng::new(0.0035 + eps, 0.0), &[origin]));
        assert!(!is_matched(&LatLng::new(0.0, 0.0035 + eps), &[origin]));
        assert!(!is_matched(&LatLng::new(0.0035 + eps, 0.0035 + eps), &[origin]));
    }

    #[test]
    fn test_box_not_circle() {
        // Corner of the box is farther than T in Euclidean terms but still matches
        let origin = LatLng::new(0.0, 0.0);
        let corner = LatLng::new(0.0034, 0.0034);
        assert!(((corner.lat.powi(2) + corner.lng.powi(2)).sqrt()) > 0.0035);
        assert!(is_matched(&corner, &[origin]));
    }

    #[test]
    fn test_first_match_wins() {
        let p1 = LatLng::new(37.0, -122.0);
        let p2 = LatLng::new(37.005, -122.0);
        let q = LatLng::new(37.0025, -122.0);
        assert!(is_matched(&q, &[p1]));
        assert!(is_matched(&q, &[p2]));
        assert_eq!(index_of(&q, &[p1, p2]), Some(0));
        assert_eq!(index_of(&q, &[p2, p1]), Some(0));
    }

    #[test]
    fn test_empty_set() {
        let q = LatLng::new(1.0, 2.0);
        assert!(!is_matched(&q, &[]));
        assert_eq!(index_of(&q, &[]), None);
    }

    #[test]
    fn test_index_skips_non_matching_prefix() {
        let far = LatLng::new(10.0, 10.0);
        let near = LatLng::new(37.0, -122.0);
        assert_eq!(index_of(&LatLng::new(37.001, -122.0), &[far, near]), Some(1));
    }

    #[test]
    fn test_custom_tolerance() {
        let matcher = ProximityMatcher::new(Tolerance::new(0.1));
        let origin = LatLng::new(0.0, 0.0);
        assert!(matcher.is_matched(&LatLng::new(0.05, -0.05), &[origin]));
        assert!(!is_matched(&LatLng::new(0.05, -0.05), &[origin]));
        let (sw, ne) = matcher.tolerance().box_around(&origin);
        assert_eq!(sw, LatLng::new(-0.1, -0.1));
        assert_eq!(ne, LatLng::new(0.1, 0.1));
    }
}
