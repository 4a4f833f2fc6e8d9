//! In-process location service for desktop hosts and tests

use super::{LocationFix, LocationProvider, LocationRequest, SubscriptionId};
use crate::core::geo::LatLng;
use crate::permission::{Permission, PermissionProvider, SimulatedPermissions};
use crate::{MapError, Result};
use crossbeam_channel::Sender;
use fxhash::FxHashMap;
use futures::channel::oneshot;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug)]
struct Subscription {
    request: LocationRequest,
    sink: Sender<LocationFix>,
}

#[derive(Debug, Default)]
struct Inner {
    last_known: Option<LatLng>,
    hold_last_location: bool,
    held: Vec<oneshot::Sender<Option<LatLng>>>,
    subscriptions: FxHashMap<SubscriptionId, Subscription>,
    next_id: u64,
    last_location_requests: usize,
    subscribe_count: usize,
    unsubscribe_count: usize,
}

/// Fused-provider stand-in. Clones share one device.
#[derive(Debug, Clone)]
pub struct SimulatedLocationProvider {
    permissions: SimulatedPermissions,
    inner: Arc<Mutex<Inner>>,
}

impl SimulatedLocationProvider {
    pub fn new(permissions: SimulatedPermissions) -> Self {
        Self {
            permissions,
            inner: Arc::new(Mutex::new(Inner::default())),
        }
    }

    pub fn with_last_known(self, position: Option<LatLng>) -> Self {
        self.set_last_known(position);
        self
    }

    /// Keeps last-location fetches outstanding until [`Self::release_last_location`]
    pub fn holding_last_location(self) -> Self {
        self.lock().hold_last_location = true;
        self
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_last_known(&self, position: Option<LatLng>) {
        self.lock().last_known = position;
    }

    pub fn last_known(&self) -> Option<LatLng> {
        self.lock().last_known
    }

    /// Resolves every held last-location fetch with the current cached position
    pub fn release_last_location(&self) {
        let mut inner = self.lock();
        inner.hold_last_location = false;
        let position = inner.last_known;
        for sender in inner.held.drain(..) {
            let _ = sender.send(position);
        }
    }

    /// Delivers a fix to every live subscription and caches it as last known
    pub fn publish(&self, fix: LocationFix) {
        let mut inner = self.lock();
        inner.last_known = Some(fix.position);
        // Receivers that went away are forgotten
        inner
            .subscriptions
            .retain(|_, subscription| subscription.sink.send(fix).is_ok());
    }

    pub fn active_subscriptions(&self) -> usize {
        self.lock().subscriptions.len()
    }

    /// Shortest min-update interval across live subscriptions
    pub fn fastest_interval_ms(&self) -> Option<u64> {
        self.lock()
            .subscriptions
            .values()
            .map(|s| s.request.min_update_interval_ms)
            .min()
    }

    pub fn subscribe_count(&self) -> usize {
        self.lock().subscribe_count
    }

    pub fn unsubscribe_count(&self) -> usize {
        self.lock().unsubscribe_count
    }

    pub fn last_location_requests(&self) -> usize {
        self.lock().last_location_requests
    }

    /// Publishes a slow circular walk around the cached position at the
    /// fastest interval any subscriber accepts.
    #[cfg(feature = "tokio-runtime")]
    pub fn spawn_emitter(&self, origin: LatLng) -> tokio::task::JoinHandle<()> {
        let provider = self.clone();
        tokio::spawn(async move {
            let mut step: u32 = 0;
            loop {
                let interval_ms = provider
                    .fastest_interval_ms()
                    .unwrap_or(crate::core::constants::LOCATION_MIN_UPDATE_INTERVAL_MS);
                tokio::time::sleep(std::time::Duration::from_millis(interval_ms)).await;
                if provider.active_subscriptions() == 0 {
                    continue;
                }
                let angle = f64::from(step) * 0.2;
                let position = LatLng::new(
                    origin.lat + 0.0005 * angle.sin(),
                    origin.lng + 0.0005 * angle.cos(),
                );
                provider.publish(LocationFix::now(position, Some(8.0)));
                step = step.wrapping_add(1);
            }
        })
    }
}

impl LocationProvider for SimulatedLocationProvider {
    fn last_location(&self) -> oneshot::Receiver<Option<LatLng>> {
        let (sender, receiver) = oneshot::channel();
        let mut inner = self.lock();
        inner.last_location_requests += 1;
        if inner.hold_last_location {
            inner.held.push(sender);
        } else {
            let _ = sender.send(inner.last_known);
        }
        receiver
    }

    fn request_location_updates(
        &self,
        request: &LocationRequest,
        sink: Sender<LocationFix>,
    ) -> Result<SubscriptionId> {
        if !self.permissions.check(Permission::FineLocation).is_granted() {
            return Err(MapError::Security(format!(
                "{} not held",
                Permission::FineLocation
            )));
        }
        let mut inner = self.lock();
        inner.next_id += 1;
        let id = SubscriptionId(inner.next_id);
        inner.subscriptions.insert(
            id,
            Subscription {
                request: request.clone(),
                sink,
            },
        );
        inner.subscribe_count += 1;
        Ok(id)
    }

    fn remove_location_updates(&self, id: SubscriptionId) {
        let mut inner = self.lock();
        if inner.subscriptions.remove(&id).is_some() {
            inner.unsubscribe_count += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;

    #[test]
    fn test_publish_reaches_subscribers_and_caches() {
        let provider = SimulatedLocationProvider::new(SimulatedPermissions::granted());
        let (tx, rx) = unbounded();
        provider
            .request_location_updates(&LocationRequest::default(), tx)
            .unwrap();
        provider.publish(LocationFix::now(LatLng::new(3.0, 4.0), None));
        assert_eq!(rx.try_recv().unwrap().position, LatLng::new(3.0, 4.0));
        assert_eq!(provider.last_known(), Some(LatLng::new(3.0, 4.0)));
    }

    #[test]
    fn test_dead_subscribers_are_pruned() {
        let provider = SimulatedLocationProvider::new(SimulatedPermissions::granted());
        let (tx, rx) = unbounded();
        provider
            .request_location_updates(&LocationRequest::default(), tx)
            .unwrap();
        drop(rx);
        provider.publish(LocationFix::now(LatLng::new(0.0, 0.0), None));
        assert_eq!(provider.active_subscriptions(), 0);
    }

    #[test]
    fn test_held_last_location() {
        let provider = SimulatedLocationProvider::new(SimulatedPermissions::granted())
            .with_last_known(Some(LatLng::new(5.0, 6.0)))
            .holding_last_location();
        let mut receiver = provider.last_location();
        assert_eq!(receiver.try_recv(), Ok(None));
        provider.release_last_location();
        assert_eq!(receiver.try_recv(), Ok(Some(Some(LatLng::new(5.0, 6.0)))));
    }

    #[test]
    fn test_fastest_interval() {
        let provider = SimulatedLocationProvider::new(SimulatedPermissions::granted());
        assert_eq!(provider.fastest_interval_ms(), None);
        let (tx, _rx) = unbounded();
        provider
            .request_location_updates(&LocationRequest::default(), tx)
            .unwrap();
        assert_eq!(provider.fastest_interval_ms(), Some(5_000));
    }

    #[test]
    fn test_removing_unknown_id_is_ignored() {
        let provider = SimulatedLocationProvider::new(SimulatedPermissions::granted());
        provider.remove_location_updates(SubscriptionId(99));
        assert_eq!(provider.unsubscribe_count(), 0);
    }
}
