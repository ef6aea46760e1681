use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use orpfile_protocol::{TransferEvent, TransferProgress, TransferRequest};

use crate::{SinkProvider, TransferError, TransferReceiver};

/// A [`TransferReceiver`] shared between dispatch threads (thread-safe).
///
/// Every operation holds the lock for its whole run, so byte accounting and
/// the matching write are never interleaved with another caller's.
pub struct SharedReceiver<P: SinkProvider> {
    inner: Arc<Mutex<TransferReceiver<P>>>,
}

impl<P: SinkProvider> Clone for SharedReceiver<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P: SinkProvider> SharedReceiver<P> {
    pub fn new(receiver: TransferReceiver<P>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(receiver)),
        }
    }

    pub fn ready(&self, request: &TransferRequest) -> Result<(), TransferError> {
        self.lock().ready(request)
    }

    pub fn event(&self, event: TransferEvent) -> Result<(), TransferError> {
        self.lock().event(event)
    }

    pub fn data(&self, chunk: Option<&[u8]>) -> Result<usize, TransferError> {
        self.lock().data(chunk)
    }

    pub fn acknowledge(&self) -> Result<usize, TransferError> {
        self.lock().acknowledge()
    }

    pub fn set_auto(&self, auto: bool) {
        self.lock().set_auto(auto);
    }

    pub fn progress(&self) -> TransferProgress {
        self.lock().progress()
    }

    /// Runs `f` with exclusive access, for sequences that must not interleave.
    pub fn with<R>(&self, f: impl FnOnce(&mut TransferReceiver<P>) -> R) -> R {
        f(&mut self.lock())
    }

    fn lock(&self) -> MutexGuard<'_, TransferReceiver<P>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
