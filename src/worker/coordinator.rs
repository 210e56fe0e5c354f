//! Single-slot, first-writer-wins result handoff.

use std::sync::atomic::{AtomicBool, Ordering};

use crossbeam_channel::{bounded, select, Receiver, Sender};

use super::CancelToken;

/// Accepts exactly one value per search.
///
/// The `filled` flag decides the winner with a compare-and-swap; only the
/// winner ever touches the capacity-one channel, so publishing never blocks
/// on a full slot. Losers return immediately.
#[derive(Debug)]
pub struct ResultSlot<T> {
    filled: AtomicBool,
    tx: Sender<T>,
    rx: Receiver<T>,
}

impl<T> ResultSlot<T> {
    pub fn new() -> Self {
        let (tx, rx) = bounded(1);
        Self {
            filled: AtomicBool::new(false),
            tx,
            rx,
        }
    }

    /// Offers `value` to the slot.
    ///
    /// Returns true only for the first caller whose value was delivered.
    /// Late callers get false and their value is dropped.
    pub fn publish(&self, value: T, cancel: &CancelToken) -> bool {
        if self
            .filled
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return false;
        }

        select! {
            send(self.tx, value) -> res => res.is_ok(),
            recv(cancel.signal()) -> _ => false,
        }
    }

    /// Blocks until a value is published or `cancel` is raised.
    ///
    /// A value that is already waiting wins over a concurrent cancellation.
    pub fn await_first(&self, cancel: &CancelToken) -> Option<T> {
        select! {
            recv(self.rx) -> value => value.ok(),
            recv(cancel.signal()) -> _ => self.rx.try_recv().ok(),
        }
    }

    /// Returns true once some caller has claimed the slot.
    pub fn is_filled(&self) -> bool {
        self.filled.load(Ordering::Acquire)
    }
}

impl<T> Default for ResultSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}
