//! One-shot broadcast cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crossbeam_channel::{bounded, Receiver, Sender};

/// A cloneable stop signal shared by the orchestrator, workers and reporter.
///
/// Once raised it stays raised. Besides the cheap [`is_cancelled`] check,
/// [`signal`] hands out a channel that every holder sees disconnect at the
/// moment of cancellation, for use inside `crossbeam_channel::select!`.
///
/// [`is_cancelled`]: CancelToken::is_cancelled
/// [`signal`]: CancelToken::signal
#[derive(Debug, Clone)]
pub struct CancelToken {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    raised: AtomicBool,
    // Dropping the sender is the broadcast.
    trigger: Mutex<Option<Sender<()>>>,
    signal: Receiver<()>,
}

impl CancelToken {
    pub fn new() -> Self {
        let (tx, rx) = bounded(0);
        Self {
            inner: Arc::new(Inner {
                raised: AtomicBool::new(false),
                trigger: Mutex::new(Some(tx)),
                signal: rx,
            }),
        }
    }

    /// Raises the signal. Calling it again has no effect.
    pub fn cancel(&self) {
        self.inner.raised.store(true, Ordering::Release);
        let trigger = self
            .inner
            .trigger
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        drop(trigger);
    }

    /// Returns true once [`cancel`](CancelToken::cancel) has been called.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.inner.raised.load(Ordering::Acquire)
    }

    /// Receiver that never yields a message and becomes ready
    /// (disconnected) when the token is cancelled.
    pub fn signal(&self) -> &Receiver<()> {
        &self.inner.signal
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}
