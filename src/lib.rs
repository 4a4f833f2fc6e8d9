//! # pinmap
//!
//! A map screen that centers on the user's last known location and lets the
//! user tap to toggle markers on and off.
//!
//! The crate is split the way a small map engine is: geographic primitives
//! and camera state in [`core`], the marker-matching rule in [`spatial`], the
//! marker collection in [`layers`], platform collaborators behind traits in
//! [`permission`] and [`location`], and the screen itself in [`ui`].

pub mod animation;
pub mod core;
pub mod input;
pub mod layers;
pub mod location;
pub mod permission;
pub mod prelude;
pub mod spatial;
pub mod traits;
pub mod ui;
pub use crate::core::constants;

// Re-export public API
pub use core::{
    camera::{CameraState, CameraUpdate},
    config::{MapProperties, MapType, MapUiSettings, ScreenConfig},
    geo::{LatLng, Point},
};

pub use layers::{
    marker::{MarkerIcon, PinDescriptor},
    store::{MarkerStore, ToggleOutcome},
};

pub use input::events::{LifecycleEvent, MapEvent};

pub use location::{
    session::LocationSession, LocationFix, LocationProvider, LocationRequest, Priority,
    SubscriptionId,
};

pub use permission::{gate::PermissionGate, Permission, PermissionProvider, PermissionStatus};

pub use spatial::proximity::{ProximityMatcher, Tolerance};

pub use ui::screen::MapScreen;

#[cfg(feature = "egui")]
pub use ui::widget::MapView;

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Security exception: {0}")]
    Security(String),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Error type alias for convenience
pub type Error = MapError;

/// Initializes `env_logger` once; later calls are ignored.
#[cfg(feature = "debug")]
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}
