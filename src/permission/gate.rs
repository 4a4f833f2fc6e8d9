use super::{Permission, PermissionProvider, PermissionStatus};
use futures::channel::oneshot;

#[derive(Debug)]
enum PromptState {
    NotRequested,
    Pending(oneshot::Receiver<bool>),
    Resolved(bool),
}

/// Tracks one runtime permission for the lifetime of a screen mount.
///
/// The status is read once at mount and afterwards changes only through the
/// answer to the single prompt this gate may issue.
#[derive(Debug)]
pub struct PermissionGate {
    permission: Permission,
    status: PermissionStatus,
    prompt: PromptState,
}

impl PermissionGate {
    /// Reads the current grant status from the platform
    pub fn mount(permission: Permission, provider: &dyn PermissionProvider) -> Self {
        let status = provider.check(permission);
        log::debug!("{permission} at mount: {status:?}");
        Self {
            permission,
            status,
            prompt: PromptState::NotRequested,
        }
    }

    pub fn permission(&self) -> Permission {
        self.permission
    }

    pub fn status(&self) -> PermissionStatus {
        self.status
    }

    pub fn is_granted(&self) -> bool {
        self.status.is_granted()
    }

    pub fn prompt_issued(&self) -> bool {
        !matches!(self.prompt, PromptState::NotRequested)
    }

    pub fn is_awaiting_answer(&self) -> bool {
        matches!(self.prompt, PromptState::Pending(_))
    }

    /// Issues the prompt if the permission is missing and no prompt has been
    /// issued yet. Returns whether a prompt was issued.
    pub fn request(&mut self, provider: &dyn PermissionProvider) -> bool {
        if self.is_granted() || self.prompt_issued() {
            return false;
        }
        log::info!("requesting {}", self.permission);
        self.prompt = PromptState::Pending(provider.request(self.permission));
        true
    }

    /// Checks for the prompt's answer. Returns the new status the first time
    /// an answer is observed, `None` otherwise.
    pub fn poll(&mut self) -> Option<PermissionStatus> {
        let PromptState::Pending(receiver) = &mut self.prompt else {
            return None;
        };
        let granted = match receiver.try_recv() {
            Ok(Some(granted)) => granted,
            Ok(None) => return None,
            Err(oneshot::Canceled) => {
                log::warn!("{} prompt dismissed without an answer", self.permission);
                false
            }
        };
        self.prompt = PromptState::Resolved(granted);
        self.status = PermissionStatus::from(granted);
        log::info!("{} prompt answered: {:?}", self.permission, self.status);
        Some(self.status)
    }
}
