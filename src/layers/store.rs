use crate::core::geo::LatLng;
use crate::layers::marker::PinDescriptor;
use crate::spatial::proximity::ProximityMatcher;
use crate::Result;

/// What a toggle did to the marker set
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToggleOutcome {
    Added { index: usize },
    Removed { index: usize, marker: LatLng },
}

/// Ordered set of user-placed markers.
///
/// Only [`MarkerStore::toggle`] mutates it, so no two members are ever
/// within tolerance of each other.
#[derive(Debug, Clone, Default)]
pub struct MarkerStore {
    markers: Vec<LatLng>,
    matcher: ProximityMatcher,
    revision: u64,
}

impl MarkerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_matcher(matcher: ProximityMatcher) -> Self {
        Self {
            matcher,
            ..Self::default()
        }
    }

    /// Adds `point` unless it matches an existing marker, in which case the
    /// first matching marker is removed instead.
    pub fn toggle(&mut self, point: LatLng) -> ToggleOutcome {
        let outcome = match self.matcher.index_of(&point, &self.markers) {
            None => {
                self.markers.push(point);
                ToggleOutcome::Added {
                    index: self.markers.len() - 1,
                }
            }
            Some(index) => ToggleOutcome::Removed {
                index,
                marker: self.markers.remove(index),
            },
        };
        self.revision += 1;
        log::debug!("marker toggle at {point}: {outcome:?}");
        outcome
    }

    pub fn markers(&self) -> &[LatLng] {
        &self.markers
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn matcher(&self) -> &ProximityMatcher {
        &self.matcher
    }

    /// Bumped on every mutation; the host redraws all pins when it changes
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Full pin list for the current set, in insertion order
    pub fn pins(&self) -> Vec<PinDescriptor> {
        self.markers
            .iter()
            .copied()
            .map(PinDescriptor::user_marker)
            .collect()
    }

    /// Current markers as a JSON array, for diagnostics
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.markers)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::proximity::Tolerance;

    #[test]
    fn test_toggle_adds_to_empty() {
        let mut store = MarkerStore::new();
        let outcome = store.toggle(LatLng::new(37.0, -122.0));
        assert_eq!(outcome, ToggleOutcome::Added { index: 0 });
        assert_eq!(store.markers(), &[LatLng::new(37.0, -122.0)]);
        assert_eq!(store.pins().len(), 1);
        assert_eq!(store.pins()[0].position, LatLng::new(37.0, -122.0));
    }

    #[test]
    fn test_toggle_twice_returns_to_empty() {
        let mut store = MarkerStore::new();
        let p = LatLng::new(48.8566, 2.3522);
        store.toggle(p);
        let outcome = store.toggle(p);
        assert_eq!(outcome, ToggleOutcome::Removed { index: 0, marker: p });
        assert!(store.is_empty());
        assert_eq!(store.revision(), 2);
    }

    #[test]
    fn test_tap_within_tolerance_removes() {
        let mut store = MarkerStore::new();
        store.toggle(LatLng::new(37.0, -122.0));
        store.toggle(LatLng::new(37.001, -122.001));
        assert!(store.is_empty());
        assert!(store.pins().is_empty());
    }

    #[test]
    fn test_tap_outside_tolerance_appends() {
        let mut store = MarkerStore::new();
        store.toggle(LatLng::new(37.0, -122.0));
        let outcome = store.toggle(LatLng::new(37.01, -122.01));
        assert_eq!(outcome, ToggleOutcome::Added { index: 1 });
        assert_eq!(
            store.markers(),
            &[LatLng::new(37.0, -122.0), LatLng::new(37.01, -122.01)]
        );
        assert_eq!(store.pins().len(), 2);
    }

    #[test]
    fn test_removal_hits_earliest_match() {
        // Two markers 0.006 apart are not mutually close, yet a query between
        // them matches both.
        let mut store = MarkerStore::new();
        let p1 = LatLng::new(37.0, -122.0);
        let p2 = LatLng::new(37.006, -122.0);
        store.toggle(p1);
        store.toggle(p2);
        assert_eq!(store.len(), 2);

        let outcome = store.toggle(LatLng::new(37.003, -122.0));
        assert_eq!(outcome, ToggleOutcome::Removed { index: 0, marker: p1 });
        assert_eq!(store.markers(), &[p2]);
    }

    #[test]
    fn test_no_two_markers_close() {
        let mut store = MarkerStore::new();
        let taps = [
            (37.0, -122.0),
            (37.002, -122.0),
            (37.004, -122.0),
            (37.006, -122.0),
            (37.0061, -122.0005),
            (37.1, -122.1),
            (37.0, -122.0),
        ];
        for (lat, lng) in taps {
            store.toggle(LatLng::new(lat, lng));
            let markers = store.markers();
            for (i, a) in markers.iter().enumerate() {
                for b in &markers[i + 1..] {
                    assert!(!store.matcher().matches(a, b), "{a} and {b} are close");
                }
            }
        }
    }

    #[test]
    fn test_custom_matcher() {
        let mut store = MarkerStore::with_matcher(ProximityMatcher::new(Tolerance::new(1.0)));
        store.toggle(LatLng::new(0.0, 0.0));
        store.toggle(LatLng::new(0.9, 0.9));
        assert!(store.is_empty());
    }

    #[test]
    fn test_to_json() {
        let mut store = MarkerStore::new();
        store.toggle(LatLng::new(1.5, -2.5));
        assert_eq!(store.to_json().unwrap(), r#"[{"lat":1.5,"lng":-2.5}]"#);
    }
}
