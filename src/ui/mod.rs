pub mod screen;

#[cfg(feature = "egui")]
pub mod style;
#[cfg(feature = "egui")]
pub mod widget;

pub use screen::MapScreen;

#[cfg(feature = "egui")]
pub use style::{ControlStyle, MapStyle, MarkerStyle, MyLocationStyle};
#[cfg(feature = "egui")]
pub use widget::{MapView, MapViewExt};
