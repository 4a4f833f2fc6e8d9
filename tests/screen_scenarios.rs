//! End-to-end behavior of the marker screen against simulated device services

use pinmap::{
    location::{LocationFix, LocationProvider, LocationRequest, Priority, SimulatedLocationProvider},
    permission::{Permission, PromptPolicy, SimulatedPermissions},
    LatLng, LifecycleEvent, MapScreen, ScreenConfig, ToggleOutcome,
};
use std::sync::Arc;

fn screen_with(
    config: ScreenConfig,
    permissions: &SimulatedPermissions,
    location: &SimulatedLocationProvider,
) -> MapScreen {
    MapScreen::new(
        config,
        Arc::new(permissions.clone()),
        Arc::new(location.clone()),
    )
}

fn granted_screen() -> (MapScreen, SimulatedPermissions, SimulatedLocationProvider) {
    let permissions = SimulatedPermissions::granted();
    let location = SimulatedLocationProvider::new(permissions.clone())
        .with_last_known(Some(LatLng::new(37.0, -122.0)));
    let mut screen = screen_with(ScreenConfig::default(), &permissions, &location);
    screen.on_lifecycle(LifecycleEvent::Mount);
    screen.on_lifecycle(LifecycleEvent::Active);
    screen.poll();
    (screen, permissions, location)
}

#[test]
fn tap_on_empty_map_adds_one_pin() {
    let (mut screen, _, _) = granted_screen();

    let outcome = screen.handle_tap(LatLng::new(37.0, -122.0));

    assert_eq!(outcome, Some(ToggleOutcome::Added { index: 0 }));
    assert_eq!(screen.markers().markers(), &[LatLng::new(37.0, -122.0)]);
    let pins = screen.pins();
    assert_eq!(pins.len(), 1);
    assert_eq!(pins[0].position, LatLng::new(37.0, -122.0));
    assert_eq!(pins[0].title, "Custom Marker");
    assert_eq!(pins[0].snippet, "User added marker");
}

#[test]
fn tap_near_existing_marker_removes_it() {
    let (mut screen, _, _) = granted_screen();
    screen.handle_tap(LatLng::new(37.0, -122.0));

    let outcome = screen.handle_tap(LatLng::new(37.001, -122.001));

    assert!(matches!(outcome, Some(ToggleOutcome::Removed { index: 0, .. })));
    assert!(screen.markers().is_empty());
    assert!(screen.pins().is_empty());
}

#[test]
fn tap_outside_tolerance_appends() {
    let (mut screen, _, _) = granted_screen();
    screen.handle_tap(LatLng::new(37.0, -122.0));

    let outcome = screen.handle_tap(LatLng::new(37.01, -122.01));

    assert_eq!(outcome, Some(ToggleOutcome::Added { index: 1 }));
    assert_eq!(
        screen.markers().markers(),
        &[LatLng::new(37.0, -122.0), LatLng::new(37.01, -122.01)]
    );
    assert_eq!(screen.pins().len(), 2);
}

#[test]
fn tolerance_box_is_inclusive() {
    let (mut screen, _, _) = granted_screen();
    screen.handle_tap(LatLng::new(0.0, 0.0));

    // Exactly on the corner of the box
    let outcome = screen.handle_tap(LatLng::new(0.0035, -0.0035));

    assert!(matches!(outcome, Some(ToggleOutcome::Removed { .. })));
    assert!(screen.markers().is_empty());
}

#[test]
fn denied_permission_never_shows_map() {
    let permissions = SimulatedPermissions::not_granted(PromptPolicy::Deny);
    let location = SimulatedLocationProvider::new(permissions.clone())
        .with_last_known(Some(LatLng::new(37.0, -122.0)));
    let mut screen = screen_with(ScreenConfig::default(), &permissions, &location);
    screen.on_lifecycle(LifecycleEvent::Mount);
    screen.on_lifecycle(LifecycleEvent::Active);

    for _ in 0..3 {
        screen.poll();
    }

    assert_eq!(permissions.prompt_count(), 1);
    assert!(!screen.is_map_visible());
    assert_eq!(screen.handle_tap(LatLng::new(37.0, -122.0)), None);
    assert!(screen.pins().is_empty());
    assert!(screen.markers().is_empty());
    assert_eq!(location.last_location_requests(), 0);
    assert_eq!(location.subscribe_count(), 0);
}

#[test]
fn dismissed_prompt_counts_as_denied() {
    let permissions = SimulatedPermissions::not_granted(PromptPolicy::Manual);
    let location = SimulatedLocationProvider::new(permissions.clone());
    let mut screen = screen_with(ScreenConfig::default(), &permissions, &location);
    screen.on_lifecycle(LifecycleEvent::Mount);
    assert!(screen.is_awaiting_permission());

    permissions.dismiss();
    screen.poll();

    assert!(!screen.is_awaiting_permission());
    assert!(!screen.is_map_visible());
    assert_eq!(permissions.prompt_count(), 1);
}

#[test]
fn background_then_foreground_resubscribes_once() {
    let (mut screen, _, location) = granted_screen();
    assert_eq!(location.subscribe_count(), 1);
    assert_eq!(location.active_subscriptions(), 1);

    screen.on_lifecycle(LifecycleEvent::Inactive);
    assert!(!screen.is_subscribed());
    assert_eq!(location.active_subscriptions(), 0);

    screen.on_lifecycle(LifecycleEvent::Active);
    screen.on_lifecycle(LifecycleEvent::Active);

    assert_eq!(location.subscribe_count(), 2);
    assert_eq!(location.unsubscribe_count(), 1);
    assert_eq!(location.active_subscriptions(), 1);
}

#[test]
fn inactive_without_subscription_is_harmless() {
    let permissions = SimulatedPermissions::not_granted(PromptPolicy::Manual);
    let location = SimulatedLocationProvider::new(permissions.clone());
    let mut screen = screen_with(ScreenConfig::default(), &permissions, &location);
    screen.on_lifecycle(LifecycleEvent::Mount);

    screen.on_lifecycle(LifecycleEvent::Inactive);
    screen.on_lifecycle(LifecycleEvent::Inactive);

    assert_eq!(location.unsubscribe_count(), 0);
    assert!(!screen.is_subscribed());
}

#[test]
fn continuous_fixes_do_not_move_camera_or_markers() {
    let (mut screen, _, location) = granted_screen();
    let revision = screen.revision();

    location.publish(LocationFix::now(LatLng::new(51.5, -0.12), Some(5.0)));
    screen.poll();

    assert_eq!(screen.my_location(), Some(LatLng::new(37.0, -122.0)));
    assert_eq!(screen.revision(), revision);
    assert!(screen.markers().is_empty());
    assert_ne!(screen.camera().center, LatLng::new(51.5, -0.12));
}

#[test]
fn unmount_releases_subscription_and_markers() {
    let (mut screen, _, location) = granted_screen();
    screen.handle_tap(LatLng::new(1.0, 1.0));

    screen.on_lifecycle(LifecycleEvent::Inactive);
    screen.on_lifecycle(LifecycleEvent::Unmount);

    assert_eq!(location.active_subscriptions(), 0);
    assert!(screen.markers().is_empty());
}

#[test]
fn revoked_before_start_is_absorbed() {
    let permissions = SimulatedPermissions::granted();
    let location = SimulatedLocationProvider::new(permissions.clone());
    let mut screen = screen_with(ScreenConfig::default(), &permissions, &location);
    screen.on_lifecycle(LifecycleEvent::Mount);
    permissions.revoke(Permission::FineLocation);

    screen.on_lifecycle(LifecycleEvent::Active);

    assert!(!screen.is_subscribed());
    assert_eq!(location.active_subscriptions(), 0);
}

#[test]
fn json_config_tolerance_drives_toggling() {
    let config = ScreenConfig::from_json_str(r#"{ "tolerance_deg": 0.01 }"#).unwrap();
    let permissions = SimulatedPermissions::granted();
    let location = SimulatedLocationProvider::new(permissions.clone());
    let mut screen = screen_with(config, &permissions, &location);
    screen.on_lifecycle(LifecycleEvent::Mount);

    screen.handle_tap(LatLng::new(0.0, 0.0));
    let outcome = screen.handle_tap(LatLng::new(0.005, 0.005));

    assert!(matches!(outcome, Some(ToggleOutcome::Removed { .. })));
}

#[cfg(feature = "tokio-runtime")]
#[tokio::test]
async fn emitter_publishes_to_live_subscription() {
    let permissions = SimulatedPermissions::granted();
    let origin = LatLng::new(42.3505, -71.1054);
    let location = SimulatedLocationProvider::new(permissions.clone());
    let (tx, rx) = crossbeam_channel::unbounded();
    let request = LocationRequest::new(Priority::HighAccuracy, 100).with_min_update_interval(50);
    location.request_location_updates(&request, tx).unwrap();

    let emitter = location.spawn_emitter(origin);
    tokio::time::sleep(std::time::Duration::from_millis(300)).await;
    emitter.abort();

    let fix = rx.try_recv().expect("a fix within three intervals");
    assert!((fix.position.lat - origin.lat).abs() <= 0.001);
    assert!((fix.position.lng - origin.lng).abs() <= 0.001);
    assert!(location.last_known().is_some());
}
