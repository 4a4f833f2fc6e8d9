pub mod camera;
pub mod config;
pub mod constants;
pub mod geo;

pub use camera::{CameraAnimation, CameraState, CameraUpdate};
pub use config::{CameraAnimationConfig, MapProperties, MapType, MapUiSettings, ScreenConfig};
pub use geo::{LatLng, Point};
