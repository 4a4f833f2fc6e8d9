//! Location provider abstraction
//!
//! Two capabilities, matching a fused location client: a one-shot fetch of
//! the cached last known position, and a continuous stream of fixes that
//! must be explicitly started and stopped.

pub mod session;
pub mod simulated;

use crate::core::constants::{LOCATION_MIN_UPDATE_INTERVAL_MS, LOCATION_UPDATE_INTERVAL_MS};
use crate::core::geo::LatLng;
use crate::{MapError, Result};
use crossbeam_channel::Sender;
use futures::channel::oneshot;
use serde::{Deserialize, Serialize};

pub use session::LocationSession;
pub use simulated::SimulatedLocationProvider;

/// Accuracy/power trade-off requested from the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    #[default]
    HighAccuracy,
    BalancedPowerAccuracy,
    LowPower,
    Passive,
}

/// Parameters of a continuous subscription
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationRequest {
    pub priority: Priority,
    /// Desired interval between fixes
    pub interval_ms: u64,
    /// Fixes never arrive faster than this
    pub min_update_interval_ms: u64,
}

impl Default for LocationRequest {
    fn default() -> Self {
        Self::new(Priority::HighAccuracy, LOCATION_UPDATE_INTERVAL_MS)
            .with_min_update_interval(LOCATION_MIN_UPDATE_INTERVAL_MS)
    }
}

impl LocationRequest {
    pub fn new(priority: Priority, interval_ms: u64) -> Self {
        Self {
            priority,
            interval_ms,
            min_update_interval_ms: interval_ms,
        }
    }

    pub fn with_min_update_interval(mut self, min_update_interval_ms: u64) -> Self {
        self.min_update_interval_ms = min_update_interval_ms;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.interval_ms == 0 {
            return Err(MapError::Config("interval_ms must be positive".to_string()));
        }
        if self.min_update_interval_ms > self.interval_ms {
            return Err(MapError::Config(format!(
                "min_update_interval_ms ({}) exceeds interval_ms ({})",
                self.min_update_interval_ms, self.interval_ms
            )));
        }
        Ok(())
    }
}

/// One position report from the continuous stream
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationFix {
    pub position: LatLng,
    /// Horizontal accuracy radius in meters
    pub accuracy_m: Option<f32>,
    /// Milliseconds since the Unix epoch
    pub timestamp_ms: u64,
}

impl LocationFix {
    pub fn now(position: LatLng, accuracy_m: Option<f32>) -> Self {
        let timestamp_ms = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();
        Self {
            position,
            accuracy_m,
            timestamp_ms,
        }
    }
}

/// Handle for removing a continuous subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub u64);

/// Platform location service
pub trait LocationProvider: Send + Sync {
    /// Cached last known position. Resolves with `None` when the device has
    /// no fix yet; may never resolve at all.
    fn last_location(&self) -> oneshot::Receiver<Option<LatLng>>;

    /// Starts delivering fixes into `sink`.
    ///
    /// Fails with [`MapError::Security`] when the location permission is not
    /// held at the time of the call.
    fn request_location_updates(
        &self,
        request: &LocationRequest,
        sink: Sender<LocationFix>,
    ) -> Result<SubscriptionId>;

    /// Stops a subscription. Unknown ids are ignored.
    fn remove_location_updates(&self, id: SubscriptionId);
}
