//! Prelude module for common pinmap types and traits
//!
//! ```rust,ignore
//! use pinmap::prelude::*;
//! ```

pub use crate::core::{
    camera::{CameraState, CameraUpdate},
    config::{CameraAnimationConfig, MapProperties, MapType, MapUiSettings, ScreenConfig},
    geo::{LatLng, Point},
};

pub use crate::layers::{
    marker::{MarkerIcon, PinDescriptor},
    store::{MarkerStore, ToggleOutcome},
};

pub use crate::spatial::proximity::{ProximityMatcher, Tolerance};

pub use crate::input::{
    events::{InputEvent, LifecycleEvent, MapEvent},
    handler::InputHandler,
};

pub use crate::location::{
    LocationFix, LocationProvider, LocationRequest, LocationSession, Priority,
    SimulatedLocationProvider,
};

pub use crate::permission::{
    Permission, PermissionGate, PermissionProvider, PermissionStatus, PromptPolicy,
    SimulatedPermissions,
};

pub use crate::animation::EasingType;
pub use crate::traits::{ConfigPreset, Lerp};
pub use crate::ui::screen::MapScreen;

#[cfg(feature = "egui")]
pub use crate::ui::{MapStyle, MapView, MapViewExt};

pub use crate::{MapError, Result};
