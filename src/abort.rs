//! Cancellation handle tied to the lifetime of the hosting page.
//!
//! An [`AbortController`] owns the trigger; any number of [`AbortSignal`]
//! clones observe it. Once aborted a signal stays aborted.

use std::future::Future;
use tokio::sync::watch;
use tracing::warn;

#[derive(Debug)]
pub struct AbortController {
    tx: watch::Sender<bool>,
}

#[derive(Debug, Clone)]
pub struct AbortSignal {
    rx: watch::Receiver<bool>,
}

impl Default for AbortController {
    fn default() -> Self {
        Self::new()
    }
}

impl AbortController {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    pub fn signal(&self) -> AbortSignal {
        AbortSignal { rx: self.tx.subscribe() }
    }

    pub fn abort(&self) {
        self.tx.send_replace(true);
    }

    /// Aborts when `trigger` resolves with `Ok`. If the trigger fails the
    /// controller is held until this future is dropped, so nothing aborts.
    pub async fn abort_on<F>(self, trigger: F)
    where
        F: Future<Output = std::io::Result<()>>,
    {
        match trigger.await {
            Ok(()) => self.abort(),
            Err(e) => {
                warn!("Abort trigger unavailable: {}", e);
                std::future::pending::<()>().await;
            }
        }
    }
}

impl Drop for AbortController {
    // Dropping the controller is the unmount: pending fetches must stop.
    fn drop(&mut self) {
        self.tx.send_replace(true);
    }
}

impl AbortSignal {
    /// A signal that never fires, for callers with no page lifetime to track.
    pub fn never() -> Self {
        let (tx, rx) = watch::channel(false);
        // Leak the sender so the channel never reports closure.
        std::mem::forget(tx);
        Self { rx }
    }

    pub fn is_aborted(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once the controller aborts. Pends forever for [`AbortSignal::never`].
    pub async fn aborted(&self) {
        let mut rx = self.rx.clone();
        // wait_for errors only when the sender is gone, which Drop already marks as aborted
        let _ = rx.wait_for(|aborted| *aborted).await;
    }
}
