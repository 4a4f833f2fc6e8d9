//! Screen-wide constants.
//! Keeping them in a single place makes it easier to tweak the magic numbers.

/// Per-axis tolerance, in degrees, under which a tap counts as the same marker.
pub const MARKER_TOLERANCE_DEG: f64 = 0.0035;

/// Zoom level used when the camera jumps to the last known location.
pub const INITIAL_LOCATION_ZOOM: f64 = 15.0;

/// Target interval between continuous location fixes.
pub const LOCATION_UPDATE_INTERVAL_MS: u64 = 10_000;

/// Floor on the interval between continuous location fixes.
pub const LOCATION_MIN_UPDATE_INTERVAL_MS: u64 = 5_000;

/// Title shown on every user-placed pin.
pub const MARKER_TITLE: &str = "Custom Marker";

/// Snippet shown on every user-placed pin.
pub const MARKER_SNIPPET: &str = "User added marker";

/// Hue of the default red marker icon, in degrees on the color wheel.
pub const HUE_RED: f32 = 0.0;

/// Default square tile size in pixels, used by the projection.
pub const TILE_SIZE: u32 = 256;

/// Latitude limit of the Web Mercator projection.
pub const MAX_LATITUDE: f64 = 85.0511287798;

/// Zoom range accepted by the camera.
pub const MIN_ZOOM: f64 = 0.0;
pub const MAX_ZOOM: f64 = 21.0;

/// Duration of the programmatic camera animation.
pub const CAMERA_ANIMATION_MS: u64 = 1_000;
