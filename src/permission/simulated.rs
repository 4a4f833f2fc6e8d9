//! In-process permission system for desktop hosts and tests

use super::{Permission, PermissionProvider, PermissionStatus};
use fxhash::FxHashMap;
use futures::channel::oneshot;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// How prompts are answered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptPolicy {
    /// Answer "allow" immediately
    Grant,
    /// Answer "deny" immediately
    Deny,
    /// Leave the prompt open until [`SimulatedPermissions::respond`] is called
    Manual,
}

#[derive(Debug)]
struct Inner {
    statuses: FxHashMap<Permission, PermissionStatus>,
    policy: PromptPolicy,
    pending: Vec<(Permission, oneshot::Sender<bool>)>,
    prompts_shown: usize,
}

/// Shared, cloneable permission state. Clones observe the same grants.
#[derive(Debug, Clone)]
pub struct SimulatedPermissions {
    inner: Arc<Mutex<Inner>>,
}

impl SimulatedPermissions {
    pub fn new(fine_location: PermissionStatus, policy: PromptPolicy) -> Self {
        let mut statuses = FxHashMap::default();
        statuses.insert(Permission::FineLocation, fine_location);
        Self {
            inner: Arc::new(Mutex::new(Inner {
                statuses,
                policy,
                pending: Vec::new(),
                prompts_shown: 0,
            })),
        }
    }

    pub fn granted() -> Self {
        Self::new(PermissionStatus::Granted, PromptPolicy::Grant)
    }

    pub fn not_granted(policy: PromptPolicy) -> Self {
        Self::new(PermissionStatus::NotGranted, policy)
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Permission whose prompt is currently on screen, if any
    pub fn pending_prompt(&self) -> Option<Permission> {
        self.lock().pending.first().map(|(permission, _)| *permission)
    }

    /// Answers every open prompt
    pub fn respond(&self, granted: bool) {
        let mut inner = self.lock();
        let pending = std::mem::take(&mut inner.pending);
        for (permission, sender) in pending {
            if granted {
                inner.statuses.insert(permission, PermissionStatus::Granted);
            }
            // The screen may already be gone
            let _ = sender.send(granted);
        }
    }

    /// Closes every open prompt without an answer
    pub fn dismiss(&self) {
        self.lock().pending.clear();
    }

    pub fn grant(&self, permission: Permission) {
        self.lock()
            .statuses
            .insert(permission, PermissionStatus::Granted);
    }

    /// Withdraws a grant behind the screen's back, as a user could from system settings
    pub fn revoke(&self, permission: Permission) {
        self.lock()
            .statuses
            .insert(permission, PermissionStatus::NotGranted);
    }

    pub fn prompt_count(&self) -> usize {
        self.lock().prompts_shown
    }
}

impl PermissionProvider for SimulatedPermissions {
    fn check(&self, permission: Permission) -> PermissionStatus {
        self.lock()
            .statuses
            .get(&permission)
            .copied()
            .unwrap_or_default()
    }

    fn request(&self, permission: Permission) -> oneshot::Receiver<bool> {
        let (sender, receiver) = oneshot::channel();
        let mut inner = self.lock();
        inner.prompts_shown += 1;
        match inner.policy {
            PromptPolicy::Grant => {
                inner.statuses.insert(permission, PermissionStatus::Granted);
                let _ = sender.send(true);
            }
            PromptPolicy::Deny => {
                let _ = sender.send(false);
            }
            PromptPolicy::Manual => inner.pending.push((permission, sender)),
        }
        receiver
    }
}
