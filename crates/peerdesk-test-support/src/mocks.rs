//! In-memory `ConfigApplier` doubles.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use peerdesk_config::DesktopConfig;
use peerdesk_session::{ApplyError, ConfigApplier};
use tokio::sync::oneshot;

/// Applier that replays queued responses and records every snapshot it sees.
///
/// Once the queue is empty every call succeeds.
#[derive(Default)]
pub struct ScriptedApplier {
    responses: Mutex<VecDeque<Result<(), ApplyError>>>,
    applied: Mutex<Vec<DesktopConfig>>,
}

impl ScriptedApplier {
    /// Applier that answers with `responses` in order.
    #[must_use]
    pub fn new(responses: impl IntoIterator<Item = Result<(), ApplyError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            applied: Mutex::new(Vec::new()),
        }
    }

    /// Applier whose first call fails with `error`.
    #[must_use]
    pub fn failing_once(error: ApplyError) -> Self {
        Self::new([Err(error)])
    }

    /// Snapshots received so far, in call order.
    #[must_use]
    pub fn applied(&self) -> Vec<DesktopConfig> {
        self.applied
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of apply calls received.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.applied
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[async_trait]
impl ConfigApplier for ScriptedApplier {
    async fn apply(&self, config: &DesktopConfig) -> Result<(), ApplyError> {
        self.applied
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(config.clone());
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or(Ok(()))
    }
}

/// Applier that parks its single call until the paired [`Gate`] is released.
pub struct GatedApplier {
    release: Mutex<Option<oneshot::Receiver<Result<(), ApplyError>>>>,
    applied: Mutex<Vec<DesktopConfig>>,
}

/// Handle that decides when, and how, a [`GatedApplier`] call returns.
pub struct Gate {
    sender: oneshot::Sender<Result<(), ApplyError>>,
}

impl Gate {
    /// Let the parked call return `result`.
    pub fn release(self, result: Result<(), ApplyError>) {
        // The receiver is gone only if the apply future was dropped.
        let _ = self.sender.send(result);
    }
}

impl GatedApplier {
    /// Applier plus the gate controlling its response.
    #[must_use]
    pub fn new() -> (Self, Gate) {
        let (sender, receiver) = oneshot::channel();
        let applier = Self {
            release: Mutex::new(Some(receiver)),
            applied: Mutex::new(Vec::new()),
        };
        (applier, Gate { sender })
    }

    /// Snapshots received so far, in call order.
    #[must_use]
    pub fn applied(&self) -> Vec<DesktopConfig> {
        self.applied
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl ConfigApplier for GatedApplier {
    async fn apply(&self, config: &DesktopConfig) -> Result<(), ApplyError> {
        self.applied
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(config.clone());
        let receiver = self
            .release
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        let Some(receiver) = receiver else {
            return Err(ApplyError::new("gated applier accepts a single call"));
        };
        receiver
            .await
            .unwrap_or_else(|_| Err(ApplyError::new("gate dropped before release")))
    }
}
