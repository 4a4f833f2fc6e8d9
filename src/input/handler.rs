use crate::{
    core::camera::CameraState,
    core::geo::Point,
    input::events::{InputEvent, MapEvent},
};

/// Translates surface input into camera motion and map events
#[derive(Debug, Clone)]
pub struct InputHandler {
    /// Drags shorter than this (pixels) are ignored as jitter
    pub drag_threshold: f64,
    /// Zoom step for the +/- controls
    pub zoom_delta: f64,
}

impl Default for InputHandler {
    fn default() -> Self {
        Self {
            drag_threshold: 0.5,
            zoom_delta: 1.0,
        }
    }
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies camera gestures directly and returns the map-level event, if any.
    ///
    /// Taps are converted to coordinates under the current camera and handed
    /// back unchanged; what to do with them is the caller's business.
    pub fn handle(&self, camera: &mut CameraState, event: &InputEvent) -> Option<MapEvent> {
        match event {
            InputEvent::Click { position } => Some(MapEvent::Click {
                lat_lng: camera.screen_to_lat_lng(*position),
                pixel: *position,
            }),
            InputEvent::Drag { delta } => {
                if delta.distance_to(&Point::default()) < self.drag_threshold {
                    return None;
                }
                camera.pan_by_pixels(*delta);
                Some(Self::view_changed(camera))
            }
            InputEvent::Scroll { delta, position } => {
                camera.zoom_around(*delta, Some(*position));
                Some(Self::view_changed(camera))
            }
            InputEvent::ZoomIn => {
                camera.zoom_around(self.zoom_delta, None);
                Some(Self::view_changed(camera))
            }
            InputEvent::ZoomOut => {
                camera.zoom_around(-self.zoom_delta, None);
                Some(Self::view_changed(camera))
            }
            InputEvent::MyLocationButton => Some(MapEvent::MyLocationButtonClick),
            InputEvent::Resize { size } => {
                camera.set_size(*size);
                None
            }
        }
    }

    fn view_changed(camera: &CameraState) -> MapEvent {
        MapEvent::ViewChanged {
            center: camera.center,
            zoom: camera.zoom,
        }
    }
}
