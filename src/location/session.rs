use super::{LocationFix, LocationProvider, LocationRequest, SubscriptionId};
use crate::core::geo::LatLng;
use crate::Result;
use crossbeam_channel::{unbounded, Receiver, Sender};
use futures::channel::oneshot;
use std::sync::Arc;

#[derive(Debug)]
enum LastLocation {
    NotRequested,
    Pending(oneshot::Receiver<Option<LatLng>>),
    Done,
}

/// Owns the screen's use of the location provider.
///
/// At most one continuous subscription is live at a time; dropping the
/// session releases it.
pub struct LocationSession {
    provider: Arc<dyn LocationProvider>,
    request: LocationRequest,
    subscription: Option<SubscriptionId>,
    last_location: LastLocation,
    sink: Sender<LocationFix>,
    fixes: Receiver<LocationFix>,
}

impl std::fmt::Debug for LocationSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocationSession")
            .field("request", &self.request)
            .field("subscription", &self.subscription)
            .field("last_location", &self.last_location)
            .finish()
    }
}

impl LocationSession {
    pub fn new(provider: Arc<dyn LocationProvider>, request: LocationRequest) -> Self {
        let (sink, fixes) = unbounded();
        Self {
            provider,
            request,
            subscription: None,
            last_location: LastLocation::NotRequested,
            sink,
            fixes,
        }
    }

    pub fn request(&self) -> &LocationRequest {
        &self.request
    }

    /// Asks for the last known position once; later calls are no-ops.
    /// Returns whether a fetch was issued.
    pub fn fetch_last_location(&mut self) -> bool {
        if !matches!(self.last_location, LastLocation::NotRequested) {
            return false;
        }
        log::debug!("fetching last known location");
        self.last_location = LastLocation::Pending(self.provider.last_location());
        true
    }

    pub fn last_location_requested(&self) -> bool {
        !matches!(self.last_location, LastLocation::NotRequested)
    }

    /// Yields the last known position the first time it is observed.
    ///
    /// `None` while the fetch is outstanding, and forever once it resolved
    /// without a position.
    pub fn poll_last_location(&mut self) -> Option<LatLng> {
        let LastLocation::Pending(receiver) = &mut self.last_location else {
            return None;
        };
        match receiver.try_recv() {
            Ok(None) => None,
            Ok(Some(position)) => {
                self.last_location = LastLocation::Done;
                if position.is_none() {
                    log::info!("no last known location, keeping default camera");
                }
                position
            }
            Err(oneshot::Canceled) => {
                log::debug!("last known location request dropped");
                self.last_location = LastLocation::Done;
                None
            }
        }
    }

    /// Subscribes to continuous updates unless a subscription is already live.
    /// Returns whether a new subscription was created.
    pub fn start(&mut self) -> Result<bool> {
        if self.subscription.is_some() {
            return Ok(false);
        }
        let id = self
            .provider
            .request_location_updates(&self.request, self.sink.clone())?;
        log::debug!("location updates started ({id:?})");
        self.subscription = Some(id);
        Ok(true)
    }

    /// Stops continuous updates; safe to call when none are running
    pub fn stop(&mut self) {
        match self.subscription.take() {
            Some(id) => {
                self.provider.remove_location_updates(id);
                log::debug!("location updates stopped ({id:?})");
            }
            None => log::debug!("location updates already stopped"),
        }
        self.drain_updates();
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    /// Discards fixes delivered so far. Nothing on this screen reads them.
    pub fn drain_updates(&mut self) -> usize {
        let mut count = 0;
        for fix in self.fixes.try_iter() {
            log::trace!("location fix {} (unused)", fix.position);
            count += 1;
        }
        count
    }
}

impl Drop for LocationSession {
    fn drop(&mut self) {
        if let Some(id) = self.subscription.take() {
            self.provider.remove_location_updates(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::simulated::SimulatedLocationProvider;
    use crate::permission::{Permission, SimulatedPermissions};
    use crate::MapError;

    fn session_with(
        provider: &SimulatedLocationProvider,
    ) -> LocationSession {
        LocationSession::new(Arc::new(provider.clone()), LocationRequest::default())
    }

    #[test]
    fn test_start_is_idempotent() {
        let provider = SimulatedLocationProvider::new(SimulatedPermissions::granted());
        let mut session = session_with(&provider);
        assert!(session.start().unwrap());
        assert!(!session.start().unwrap());
        assert_eq!(provider.active_subscriptions(), 1);
        assert_eq!(provider.subscribe_count(), 1);
    }

    #[test]
    fn test_stop_without_start_is_harmless() {
        let provider = SimulatedLocationProvider::new(SimulatedPermissions::granted());
        let mut session = session_with(&provider);
        session.stop();
        session.stop();
        assert!(!session.is_subscribed());
        assert_eq!(provider.unsubscribe_count(), 0);
    }

    #[test]
    fn test_stop_then_start_resubscribes_once() {
        let provider = SimulatedLocationProvider::new(SimulatedPermissions::granted());
        let mut session = session_with(&provider);
        session.start().unwrap();
        session.stop();
        assert_eq!(provider.active_subscriptions(), 0);
        session.start().unwrap();
        assert_eq!(provider.active_subscriptions(), 1);
        assert_eq!(provider.subscribe_count(), 2);
        assert_eq!(provider.unsubscribe_count(), 1);
    }

    #[test]
    fn test_start_without_permission_is_security_error() {
        let permissions = SimulatedPermissions::granted();
        let provider = SimulatedLocationProvider::new(permissions.clone());
        permissions.revoke(Permission::FineLocation);
        let mut session = session_with(&provider);
        assert!(matches!(session.start(), Err(MapError::Security(_))));
        assert!(!session.is_subscribed());
    }

    #[test]
    fn test_drop_releases_subscription() {
        let provider = SimulatedLocationProvider::new(SimulatedPermissions::granted());
        {
            let mut session = session_with(&provider);
            session.start().unwrap();
            assert_eq!(provider.active_subscriptions(), 1);
        }
        assert_eq!(provider.active_subscriptions(), 0);
    }

    #[test]
    fn test_last_location_resolves_once() {
        let provider = SimulatedLocationProvider::new(SimulatedPermissions::granted())
            .with_last_known(Some(LatLng::new(42.36, -71.06)));
        let mut session = session_with(&provider);
        assert_eq!(session.poll_last_location(), None);
        assert!(session.fetch_last_location());
        assert!(!session.fetch_last_location());
        assert_eq!(session.poll_last_location(), Some(LatLng::new(42.36, -71.06)));
        assert_eq!(session.poll_last_location(), None);
        assert_eq!(provider.last_location_requests(), 1);
    }

    #[test]
    fn test_missing_last_location() {
        let provider = SimulatedLocationProvider::new(SimulatedPermissions::granted());
        let mut session = session_with(&provider);
        session.fetch_last_location();
        assert_eq!(session.poll_last_location(), None);
        assert!(session.last_location_requested());
    }

    #[test]
    fn test_fixes_are_drained_not_used() {
        let provider = SimulatedLocationProvider::new(SimulatedPermissions::granted());
        let mut session = session_with(&provider);
        session.start().unwrap();
        provider.publish(LocationFix::now(LatLng::new(1.0, 1.0), None));
        provider.publish(LocationFix::now(LatLng::new(1.0, 1.1), None));
        assert_eq!(session.drain_updates(), 2);
        assert_eq!(session.drain_updates(), 0);
    }
}
