use crate::core::constants::{HUE_RED, MARKER_SNIPPET, MARKER_TITLE};
use crate::core::geo::LatLng;
use serde::{Deserialize, Serialize};

/// Icon style of a pin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MarkerIcon {
    /// The stock teardrop pin tinted with a hue in degrees (0 = red)
    Default { hue: f32 },
}

impl MarkerIcon {
    pub fn default_marker(hue: f32) -> Self {
        Self::Default {
            hue: hue.rem_euclid(360.0),
        }
    }

    pub fn hue(&self) -> f32 {
        match self {
            MarkerIcon::Default { hue } => *hue,
        }
    }
}

impl Default for MarkerIcon {
    fn default() -> Self {
        Self::default_marker(HUE_RED)
    }
}

/// Declarative description of one pin to draw this frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PinDescriptor {
    pub position: LatLng,
    pub title: String,
    pub snippet: String,
    pub icon: MarkerIcon,
}

impl PinDescriptor {
    /// A user-placed pin: fixed title, snippet, and red icon
    pub fn user_marker(position: LatLng) -> Self {
        Self {
            position,
            title: MARKER_TITLE.to_string(),
            snippet: MARKER_SNIPPET.to_string(),
            icon: MarkerIcon::default(),
        }
    }
}
