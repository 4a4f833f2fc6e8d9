//! Configuration for the marker screen
//!
//! Mirrors the display options a map SDK exposes (UI settings and map
//! properties) plus the location request parameters and camera behavior.
//! Everything has a sensible default; a JSON document may override any
//! subset of fields.

use crate::animation::EasingType;
use crate::core::constants::{
    CAMERA_ANIMATION_MS, INITIAL_LOCATION_ZOOM, MARKER_TOLERANCE_DEG, MAX_ZOOM, MIN_ZOOM,
};
use crate::core::geo::LatLng;
use crate::location::LocationRequest;
use crate::traits::ConfigPreset;
use crate::{MapError, Result};
use serde::{Deserialize, Serialize};

/// Base map rendering style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MapType {
    #[default]
    Normal,
    Satellite,
    Terrain,
    Hybrid,
    None,
}

/// On-map controls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapUiSettings {
    pub my_location_button_enabled: bool,
    pub zoom_controls_enabled: bool,
}

impl Default for MapUiSettings {
    fn default() -> Self {
        Self {
            my_location_button_enabled: true,
            zoom_controls_enabled: true,
        }
    }
}

/// Map-level display properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapProperties {
    pub map_type: MapType,
    /// Draws the device position layer; only honored while permission is granted
    pub is_my_location_enabled: bool,
}

impl Default for MapProperties {
    fn default() -> Self {
        Self {
            map_type: MapType::Normal,
            is_my_location_enabled: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraAnimationConfig {
    pub enabled: bool,
    pub duration_ms: u64,
    pub easing: EasingType,
}

impl Default for CameraAnimationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            duration_ms: CAMERA_ANIMATION_MS,
            easing: EasingType::EaseOut,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    pub ui_settings: MapUiSettings,
    pub properties: MapProperties,
    pub location_request: LocationRequest,
    /// Zoom used when jumping to the last known location
    pub initial_zoom: f64,
    /// Camera before any location fix is known
    pub default_center: LatLng,
    pub default_zoom: f64,
    /// Per-axis "same marker" tolerance in degrees
    pub tolerance_deg: f64,
    pub camera_animation: CameraAnimationConfig,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            ui_settings: MapUiSettings::default(),
            properties: MapProperties::default(),
            location_request: LocationRequest::default(),
            initial_zoom: INITIAL_LOCATION_ZOOM,
            default_center: LatLng::default(),
            default_zoom: 2.0,
            tolerance_deg: MARKER_TOLERANCE_DEG,
            camera_animation: CameraAnimationConfig::default(),
        }
    }
}

impl ScreenConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn preset(preset: ConfigPreset<Self>) -> Self {
        match preset {
            ConfigPreset::Default => Self::default(),
            // No animation, no my-location layer
            ConfigPreset::LowResource => Self {
                properties: MapProperties {
                    is_my_location_enabled: false,
                    ..Default::default()
                },
                camera_animation: CameraAnimationConfig {
                    enabled: false,
                    ..Default::default()
                },
                ..Default::default()
            },
            ConfigPreset::HighPerformance => Self {
                camera_animation: CameraAnimationConfig {
                    duration_ms: 600,
                    easing: EasingType::Smooth,
                    ..Default::default()
                },
                ..Default::default()
            },
            ConfigPreset::Custom(config) => config,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.tolerance_deg.is_finite() && self.tolerance_deg >= 0.0) {
            return Err(MapError::Config(format!(
                "tolerance_deg must be a non-negative number, got {}",
                self.tolerance_deg
            )));
        }
        for (name, zoom) in [
            ("initial_zoom", self.initial_zoom),
            ("default_zoom", self.default_zoom),
        ] {
            if !(MIN_ZOOM..=MAX_ZOOM).contains(&zoom) {
                return Err(MapError::Config(format!(
                    "{name} must be within {MIN_ZOOM}..={MAX_ZOOM}, got {zoom}"
                )));
            }
        }
        LatLng::try_new(self.default_center.lat, self.default_center.lng)
            .map_err(|e| MapError::Config(format!("default_center: {e}")))?;
        self.location_request.validate()
    }
}
