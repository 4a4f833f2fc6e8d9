//! The marker screen as a plain state holder.
//!
//! The host calls the lifecycle hooks, forwards surface input, and calls
//! [`MapScreen::poll`] once per frame to pick up asynchronous results. After
//! any mutation the render revision changes so the host knows to redraw.

use crate::core::camera::{CameraState, CameraUpdate};
use crate::core::config::ScreenConfig;
use crate::core::geo::{LatLng, Point};
use crate::input::events::{InputEvent, LifecycleEvent, MapEvent};
use crate::input::handler::InputHandler;
use crate::layers::marker::PinDescriptor;
use crate::layers::store::{MarkerStore, ToggleOutcome};
use crate::location::{LocationProvider, LocationSession};
use crate::permission::{Permission, PermissionGate, PermissionProvider, PermissionStatus};
use crate::spatial::proximity::{ProximityMatcher, Tolerance};
use std::sync::Arc;

pub struct MapScreen {
    config: ScreenConfig,
    permissions: Arc<dyn PermissionProvider>,
    location: Arc<dyn LocationProvider>,
    gate: Option<PermissionGate>,
    session: LocationSession,
    camera: CameraState,
    markers: MarkerStore,
    input: InputHandler,
    my_location: Option<LatLng>,
    active: bool,
    revision: u64,
}

impl std::fmt::Debug for MapScreen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapScreen")
            .field("gate", &self.gate)
            .field("session", &self.session)
            .field("camera", &self.camera)
            .field("markers", &self.markers.markers())
            .field("active", &self.active)
            .finish()
    }
}

impl MapScreen {
    pub fn new(
        config: ScreenConfig,
        permissions: Arc<dyn PermissionProvider>,
        location: Arc<dyn LocationProvider>,
    ) -> Self {
        let session = LocationSession::new(location.clone(), config.location_request.clone());
        let camera = Self::default_camera(&config);
        let markers = Self::empty_markers(&config);
        Self {
            config,
            permissions,
            location,
            gate: None,
            session,
            camera,
            markers,
            input: InputHandler::default(),
            my_location: None,
            active: false,
            revision: 0,
        }
    }

    fn default_camera(config: &ScreenConfig) -> CameraState {
        CameraState::new(
            config.default_center,
            config.default_zoom,
            Point::new(800.0, 600.0),
        )
    }

    fn empty_markers(config: &ScreenConfig) -> MarkerStore {
        MarkerStore::with_matcher(ProximityMatcher::new(Tolerance::new(config.tolerance_deg)))
    }

    fn notify(&mut self) {
        self.revision += 1;
    }

    /// Drops the marker set, keeping the revision monotonic
    fn reset_markers(&mut self) {
        self.revision += self.markers.revision();
        self.markers = Self::empty_markers(&self.config);
    }

    pub fn on_lifecycle(&mut self, event: LifecycleEvent) {
        match event {
            LifecycleEvent::Mount => self.on_mount(),
            LifecycleEvent::Active => self.on_active(),
            LifecycleEvent::Inactive => self.on_inactive(),
            LifecycleEvent::Unmount => self.on_unmount(),
        }
    }

    /// Fresh state; reads the permission and either fetches the last known
    /// location or issues the one prompt this mount is allowed.
    pub fn on_mount(&mut self) {
        log::debug!("screen {}", LifecycleEvent::Mount);
        let size = self.camera.size;
        self.camera = Self::default_camera(&self.config);
        self.camera.set_size(size);
        self.reset_markers();
        self.my_location = None;
        // The one-shot fetch belongs to the mount; the old session releases its subscription
        self.session = LocationSession::new(
            self.location.clone(),
            self.config.location_request.clone(),
        );

        let mut gate = PermissionGate::mount(Permission::FineLocation, self.permissions.as_ref());
        if gate.is_granted() {
            self.session.fetch_last_location();
        } else {
            gate.request(self.permissions.as_ref());
        }
        self.gate = Some(gate);
        self.notify();
    }

    pub fn on_active(&mut self) {
        log::debug!("screen {}", LifecycleEvent::Active);
        self.active = true;
        if self.is_permission_granted() {
            self.start_location_updates();
        }
    }

    /// Releases the continuous subscription, whether or not one is live
    pub fn on_inactive(&mut self) {
        log::debug!("screen {}", LifecycleEvent::Inactive);
        self.active = false;
        self.session.stop();
    }

    pub fn on_unmount(&mut self) {
        log::debug!("screen {}", LifecycleEvent::Unmount);
        self.active = false;
        self.session.stop();
        self.gate = None;
        self.reset_markers();
        self.notify();
    }

    fn start_location_updates(&mut self) {
        // Permission can be revoked between the check and this call
        if let Err(e) = self.session.start() {
            log::error!("could not start location updates: {e}");
        }
    }

    /// Picks up asynchronous results and advances the camera animation.
    /// Returns true when another frame is needed.
    pub fn poll(&mut self) -> bool {
        let before = self.revision();

        let answer = self.gate.as_mut().and_then(PermissionGate::poll);
        if answer == Some(PermissionStatus::Granted) {
            if self.active {
                self.start_location_updates();
            }
            self.session.fetch_last_location();
        }
        if answer.is_some() {
            self.notify();
        }

        if let Some(position) = self.session.poll_last_location() {
            log::info!("centering camera on last known location {position}");
            self.my_location = Some(position);
            self.camera.animate(
                CameraUpdate::new_lat_lng_zoom(position, self.config.initial_zoom),
                &self.config.camera_animation,
            );
            self.notify();
        }

        self.session.drain_updates();

        let animating = self.camera.tick();
        animating || self.revision() != before
    }

    /// Routes surface input. Taps toggle markers; gestures move the camera.
    pub fn handle_input(&mut self, event: &InputEvent) -> Option<MapEvent> {
        if !self.is_map_visible() {
            return None;
        }
        let map_event = self.input.handle(&mut self.camera, event)?;
        match &map_event {
            MapEvent::Click { lat_lng, .. } => {
                self.markers.toggle(*lat_lng);
            }
            MapEvent::MyLocationButtonClick => self.center_on_my_location(),
            MapEvent::ViewChanged { .. } => self.notify(),
        }
        Some(map_event)
    }

    /// Toggles the marker at a tapped coordinate. Ignored while the map is hidden.
    pub fn handle_tap(&mut self, lat_lng: LatLng) -> Option<ToggleOutcome> {
        if !self.is_map_visible() {
            return None;
        }
        Some(self.markers.toggle(lat_lng))
    }

    fn center_on_my_location(&mut self) {
        if !self.config.ui_settings.my_location_button_enabled || !self.my_location_layer_enabled()
        {
            return;
        }
        if let Some(position) = self.my_location {
            self.camera.animate(
                CameraUpdate::NewLatLng(position),
                &self.config.camera_animation,
            );
            self.notify();
        }
    }

    pub fn is_permission_granted(&self) -> bool {
        self.gate.as_ref().is_some_and(PermissionGate::is_granted)
    }

    pub fn permission_status(&self) -> PermissionStatus {
        self.gate
            .as_ref()
            .map(PermissionGate::status)
            .unwrap_or_default()
    }

    pub fn is_awaiting_permission(&self) -> bool {
        self.gate
            .as_ref()
            .is_some_and(PermissionGate::is_awaiting_answer)
    }

    /// The map subtree exists only while mounted with the permission held
    pub fn is_map_visible(&self) -> bool {
        self.is_permission_granted()
    }

    pub fn my_location_layer_enabled(&self) -> bool {
        self.is_permission_granted() && self.config.properties.is_my_location_enabled
    }

    /// Device position for the "my location" layer, if enabled and known
    pub fn my_location(&self) -> Option<LatLng> {
        self.my_location
            .filter(|_| self.my_location_layer_enabled())
    }

    /// Pins to draw this frame
    pub fn pins(&self) -> Vec<PinDescriptor> {
        if self.is_map_visible() {
            self.markers.pins()
        } else {
            Vec::new()
        }
    }

    pub fn markers(&self) -> &MarkerStore {
        &self.markers
    }

    pub fn camera(&self) -> &CameraState {
        &self.camera
    }

    pub fn config(&self) -> &ScreenConfig {
        &self.config
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_subscribed(&self) -> bool {
        self.session.is_subscribed()
    }

    /// Changes whenever anything visible changed
    pub fn revision(&self) -> u64 {
        self.revision + self.markers.revision()
    }
}
