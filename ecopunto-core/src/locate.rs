//! Single-slot, cancellable location lookup.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot::{self, error::TryRecvError};
use tokio::task::JoinHandle;

use crate::model::LocationFix;
use crate::ports::{LocateError, LocationPort};

/// Outcome of a finished lookup.
pub type LocateResult = Result<LocationFix, LocateError>;

/// How long the nearby-points search pretends to take after a fix arrives.
pub const DEFAULT_SEARCH_DELAY: Duration = Duration::from_millis(1500);

struct Pending {
    handle: JoinHandle<()>,
    receiver: oneshot::Receiver<LocateResult>,
}

/// Holds at most one location lookup in flight.
#[derive(Default)]
pub struct LocateTask {
    pending: Option<Pending>,
}

impl LocateTask {
    /// Create an idle slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a lookup is pending.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// Spawn a lookup on the current tokio runtime.
    ///
    /// On success the task waits `search_delay` before reporting the fix.
    ///
    /// # Errors
    ///
    /// Returns [`LocateError::Busy`] while another lookup is pending.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn start(
        &mut self,
        port: Arc<dyn LocationPort>,
        search_delay: Duration,
    ) -> Result<(), LocateError> {
        if self.is_busy() {
            tracing::warn!("location lookup rejected, one is already pending");
            return Err(LocateError::Busy);
        }

        let (sender, receiver) = oneshot::channel();
        let handle = tokio::spawn(async move {
            let result = match port.locate().await {
                Ok(fix) => {
                    tokio::time::sleep(search_delay).await;
                    Ok(fix)
                }
                Err(err) => Err(err),
            };
            if sender.send(result).is_err() {
                tracing::debug!("location result dropped, slot no longer listening");
            }
        });

        tracing::info!(delay = ?search_delay, "location lookup started");
        self.pending = Some(Pending { handle, receiver });
        Ok(())
    }

    /// Abort the pending lookup, if any. Returns `true` when one was cancelled.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(pending) => {
                pending.handle.abort();
                tracing::info!("location lookup cancelled");
                true
            }
            None => false,
        }
    }

    /// Non-blocking poll; frees the slot once a result is taken.
    pub fn try_finish(&mut self) -> Option<LocateResult> {
        let pending = self.pending.as_mut()?;
        let result = match pending.receiver.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Closed) => Err(LocateError::Cancelled),
        };
        self.pending = None;
        Some(result)
    }

    /// Wait for the pending lookup. Returns `None` when the slot is idle.
    pub async fn finished(&mut self) -> Option<LocateResult> {
        let pending = self.pending.take()?;
        Some(
            pending
                .receiver
                .await
                .unwrap_or(Err(LocateError::Cancelled)),
        )
    }
}

impl Drop for LocateTask {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.handle.abort();
        }
    }
}
