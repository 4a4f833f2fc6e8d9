//! Runtime permission abstraction
//!
//! The platform owns the grant state and the prompt; the screen only asks
//! for the current status and, at most once per mount, for a prompt whose
//! answer arrives later on a oneshot channel.

pub mod gate;
pub mod simulated;

use futures::channel::oneshot;
use serde::{Deserialize, Serialize};

pub use gate::PermissionGate;
pub use simulated::{PromptPolicy, SimulatedPermissions};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Permission {
    /// High-accuracy device position
    FineLocation,
    CoarseLocation,
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Permission::FineLocation => write!(f, "ACCESS_FINE_LOCATION"),
            Permission::CoarseLocation => write!(f, "ACCESS_COARSE_LOCATION"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PermissionStatus {
    Granted,
    /// Denied, or never asked
    #[default]
    NotGranted,
}

impl PermissionStatus {
    pub fn is_granted(self) -> bool {
        self == PermissionStatus::Granted
    }
}

impl From<bool> for PermissionStatus {
    fn from(granted: bool) -> Self {
        if granted {
            PermissionStatus::Granted
        } else {
            PermissionStatus::NotGranted
        }
    }
}

/// Platform permission system
pub trait PermissionProvider: Send + Sync {
    /// Current grant status, without prompting
    fn check(&self, permission: Permission) -> PermissionStatus;

    /// Shows the system prompt. The receiver resolves once with the user's answer.
    fn request(&self, permission: Permission) -> oneshot::Receiver<bool>;
}
