use crate::core::geo::{LatLng, Point};
use serde::{Deserialize, Serialize};

/// Raw input delivered by the map surface, in viewport pixel space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Single click/tap
    Click { position: Point },
    /// Drag in progress
    Drag { delta: Point },
    /// Scroll wheel or pinch zoom, in zoom levels
    Scroll { delta: f64, position: Point },
    /// Zoom control buttons
    ZoomIn,
    ZoomOut,
    /// "My location" button
    MyLocationButton,
    /// Viewport/window resize
    Resize { size: Point },
}

/// Map event types emitted by the screen
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    /// Map view has changed (center or zoom)
    ViewChanged { center: LatLng, zoom: f64 },
    /// Tap on the map surface
    Click { lat_lng: LatLng, pixel: Point },
    /// The "my location" button was pressed
    MyLocationButtonClick,
}

/// Host lifecycle transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifecycleEvent {
    /// Screen created; state starts fresh
    Mount,
    /// Screen in the foreground
    Active,
    /// Screen left the foreground
    Inactive,
    /// Screen destroyed; state discarded
    Unmount,
}

impl std::fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LifecycleEvent::Mount => write!(f, "mount"),
            LifecycleEvent::Active => write!(f, "active"),
            LifecycleEvent::Inactive => write!(f, "inactive"),
            LifecycleEvent::Unmount => write!(f, "unmount"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle_display() {
        assert_eq!(LifecycleEvent::Active.to_string(), "active");
        assert_eq!(LifecycleEvent::Unmount.to_string(), "unmount");
    }
}
