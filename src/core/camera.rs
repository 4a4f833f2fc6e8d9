use crate::animation::EasingType;
use crate::core::config::CameraAnimationConfig;
use crate::core::constants::{MAX_ZOOM, MIN_ZOOM, TILE_SIZE};
use crate::core::geo::{LatLng, Point};
use crate::traits::Lerp;
use instant::Instant;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::time::Duration;

/// A camera command, in the spirit of a map SDK's camera update factory
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraUpdate {
    /// Center on a coordinate at an absolute zoom level
    NewLatLngZoom { center: LatLng, zoom: f64 },
    /// Center on a coordinate, keeping the zoom level
    NewLatLng(LatLng),
    /// Relative zoom step
    ZoomBy(f64),
}

impl CameraUpdate {
    pub fn new_lat_lng_zoom(center: LatLng, zoom: f64) -> Self {
        Self::NewLatLngZoom { center, zoom }
    }

    /// Resolves the update against the current camera into an absolute target
    fn target(&self, from: &CameraState) -> (LatLng, f64) {
        match *self {
            CameraUpdate::NewLatLngZoom { center, zoom } => (center, zoom),
            CameraUpdate::NewLatLng(center) => (center, from.zoom),
            CameraUpdate::ZoomBy(delta) => (from.center, from.zoom + delta),
        }
    }
}

/// In-flight tween between two camera positions
#[derive(Debug, Clone)]
pub struct CameraAnimation {
    start_time: Instant,
    duration: Duration,
    easing: EasingType,
    from_center: LatLng,
    to_center: LatLng,
    from_zoom: f64,
    to_zoom: f64,
}

impl CameraAnimation {
    pub fn new(
        from_center: LatLng,
        to_center: LatLng,
        from_zoom: f64,
        to_zoom: f64,
        config: &CameraAnimationConfig,
    ) -> Self {
        Self::starting_at(Instant::now(), from_center, to_center, from_zoom, to_zoom, config)
    }

    pub fn starting_at(
        start_time: Instant,
        from_center: LatLng,
        to_center: LatLng,
        from_zoom: f64,
        to_zoom: f64,
        config: &CameraAnimationConfig,
    ) -> Self {
        Self {
            start_time,
            duration: Duration::from_millis(config.duration_ms),
            easing: config.easing,
            from_center,
            to_center,
            from_zoom,
            to_zoom,
        }
    }

    /// Normalized progress at `now`, in [0, 1]
    pub fn progress(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.start_time);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    /// Interpolated (center, zoom) at `now`
    pub fn sample(&self, now: Instant) -> (LatLng, f64) {
        let t = self.easing.apply(self.progress(now));
        (
            self.from_center.lerp(&self.to_center, t),
            self.from_zoom.lerp(&self.to_zoom, t),
        )
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        self.progress(now) >= 1.0
    }

    pub fn target(&self) -> (LatLng, f64) {
        (self.to_center, self.to_zoom)
    }
}

/// Current map viewport: center, zoom, and the on-screen size in pixels
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraState {
    pub center: LatLng,
    pub zoom: f64,
    pub size: Point,
    #[serde(skip)]
    animation: Option<CameraAnimation>,
}

impl Default for CameraState {
    fn default() -> Self {
        Self::new(LatLng::default(), 2.0, Point::new(800.0, 600.0))
    }
}

impl CameraState {
    pub fn new(center: LatLng, zoom: f64, size: Point) -> Self {
        Self {
            center: LatLng::new(LatLng::clamp_lat(center.lat), center.lng),
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
            size,
            animation: None,
        }
    }

    /// Applies an update immediately
    pub fn move_camera(&mut self, update: CameraUpdate) {
        let (center, zoom) = update.target(self);
        self.animation = None;
        self.set_view(center, zoom);
    }

    /// Starts an animated transition towards the update's target
    pub fn animate(&mut self, update: CameraUpdate, config: &CameraAnimationConfig) {
        let (center, zoom) = update.target(self);
        let zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        if !config.enabled {
            self.move_camera(CameraUpdate::new_lat_lng_zoom(center, zoom));
            return;
        }
        self.animation = Some(CameraAnimation::new(
            self.center,
            center,
            self.zoom,
            zoom,
            config,
        ));
    }

    /// Advances a running animation. Returns true while more frames are needed.
    pub fn tick(&mut self) -> bool {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> bool {
        let Some(animation) = self.animation.take() else {
            return false;
        };
        let (center, zoom) = animation.sample(now);
        self.set_view(center, zoom);
        if animation.is_finished(now) {
            let (center, zoom) = animation.target();
            self.set_view(center, zoom);
            false
        } else {
            self.animation = Some(animation);
            true
        }
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Pans by a screen-space drag delta. User gestures cancel any animation.
    pub fn pan_by_pixels(&mut self, delta: Point) {
        self.animation = None;
        let center_px = self.project(&self.center);
        let new_center = self.unproject(&center_px.subtract(&delta));
        self.set_view(new_center, self.zoom);
    }

    /// Zooms around a screen-space focus point so the coordinate under it stays put
    pub fn zoom_around(&mut self, delta: f64, focus: Option<Point>) {
        self.animation = None;
        let new_zoom = (self.zoom + delta).clamp(MIN_ZOOM, MAX_ZOOM);
        if (new_zoom - self.zoom).abs() < f64::EPSILON {
            return;
        }
        match focus {
            Some(focus) => {
                let anchor = self.unwrapped_lat_lng_at(focus);
                self.zoom = new_zoom;
                let anchor_px = self.project(&anchor);
                let offset = focus.subtract(&self.screen_center());
                let center = self.unproject(&anchor_px.subtract(&offset));
                self.set_view(center, new_zoom);
            }
            None => self.set_view(self.center, new_zoom),
        }
    }

    pub fn set_size(&mut self, size: Point) {
        self.size = size;
    }

    fn set_view(&mut self, center: LatLng, zoom: f64) {
        self.center = LatLng::new(LatLng::clamp_lat(center.lat), LatLng::wrap_lng(center.lng));
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    fn world_size(&self) -> f64 {
        TILE_SIZE as f64 * 2_f64.powf(self.zoom)
    }

    /// Projects a LatLng to world pixel coordinates at the current zoom (EPSG:3857)
    pub fn project(&self, lat_lng: &LatLng) -> Point {
        let scale = self.world_size();
        let lat = LatLng::clamp_lat(lat_lng.lat).to_radians();
        let x = (lat_lng.lng + 180.0) / 360.0 * scale;
        let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0 * scale;
        Point::new(x, y)
    }

    /// Unprojects world pixel coordinates back to LatLng at the current zoom
    pub fn unproject(&self, pixel: &Point) -> LatLng {
        let scale = self.world_size();
        let lng = pixel.x / scale * 360.0 - 180.0;
        let n = PI * (1.0 - 2.0 * pixel.y / scale);
        let lat = n.sinh().atan().to_degrees();
        LatLng::new(lat, lng)
    }

    fn screen_center(&self) -> Point {
        Point::new(self.size.x / 2.0, self.size.y / 2.0)
    }

    /// Converts a coordinate to a pixel position relative to the viewport's top-left corner.
    ///
    /// Uses the copy of the longitude nearest the camera center, so points
    /// across the antimeridian land next to the center rather than a world away.
    pub fn lat_lng_to_screen(&self, lat_lng: &LatLng) -> Point {
        let lng = self.center.lng + (lat_lng.lng - self.center.lng + 180.0).rem_euclid(360.0) - 180.0;
        let offset = self
            .project(&LatLng::new(lat_lng.lat, lng))
            .subtract(&self.project(&self.center));
        self.screen_center().add(&offset)
    }

    /// Converts a viewport-relative pixel position to a coordinate, longitude wrapped to [-180, 180]
    pub fn screen_to_lat_lng(&self, pixel: Point) -> LatLng {
        let lat_lng = self.unwrapped_lat_lng_at(pixel);
        LatLng::new(lat_lng.lat, LatLng::wrap_lng(lat_lng.lng))
    }

    /// Longitude continues past ±180 on the same side as the center
    fn unwrapped_lat_lng_at(&self, pixel: Point) -> LatLng {
        let offset = pixel.subtract(&self.screen_center());
        self.unproject(&self.project(&self.center).add(&offset))
    }

    /// Longitude span covered by the viewport width, in degrees
    pub fn visible_lng_span(&self) -> f64 {
        self.size.x / self.world_size() * 360.0
    }
}
