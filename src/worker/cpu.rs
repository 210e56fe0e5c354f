//! CPU worker that generates and tests candidate keys.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::crypto::{Candidate, KeyGenerator};
use crate::matcher::PatternSet;

use super::{CancelToken, Outcome, ResultSlot, SearchResult};

/// Total candidates generated across all workers of one search.
#[derive(Debug, Default)]
pub struct AttemptCounter {
    attempts: AtomicU64,
}

impl AttemptCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one attempt and returns the new total.
    #[inline]
    pub fn increment(&self) -> u64 {
        self.attempts.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Returns a snapshot of the total.
    #[inline]
    pub fn total(&self) -> u64 {
        self.attempts.load(Ordering::Relaxed)
    }
}

/// Why a worker stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerExit {
    /// Saw the cancellation signal before finding anything.
    Cancelled,
    /// Found a match; `accepted` tells whether it won the slot.
    Matched { accepted: bool },
    /// The key generator failed.
    Failed { accepted: bool },
}

/// A worker bound to one search.
pub struct CpuWorker<G: KeyGenerator> {
    id: usize,
    generator: Arc<G>,
    patterns: Arc<PatternSet>,
    slot: Arc<ResultSlot<Outcome<G::Key>>>,
    cancel: CancelToken,
    counter: Arc<AttemptCounter>,
}

impl<G: KeyGenerator> CpuWorker<G> {
    pub fn new(
        id: usize,
        generator: Arc<G>,
        patterns: Arc<PatternSet>,
        slot: Arc<ResultSlot<Outcome<G::Key>>>,
        cancel: CancelToken,
        counter: Arc<AttemptCounter>,
    ) -> Self {
        Self {
            id,
            generator,
            patterns,
            slot,
            cancel,
            counter,
        }
    }

    /// Runs the worker loop.
    ///
    /// Generates candidates and tests them against the pattern set until:
    /// - The cancellation signal is observed
    /// - A match is found (offered to the result slot)
    /// - The generator fails (the failure is offered to the result slot)
    ///
    /// A worker never resumes searching after it has offered an outcome.
    pub fn run(&self) -> WorkerExit {
        log::debug!("worker {} started", self.id);

        let exit = loop {
            if self.cancel.is_cancelled() {
                break WorkerExit::Cancelled;
            }

            let key = match self.generator.generate() {
                Ok(key) => key,
                Err(e) => {
                    log::error!("worker {}: {}", self.id, e);
                    let accepted = self.slot.publish(Err(e), &self.cancel);
                    if !accepted {
                        log::error!(
                            "worker {}: generation failure arrived after the search ended",
                            self.id
                        );
                    }
                    break WorkerExit::Failed { accepted };
                }
            };

            self.counter.increment();

            if self.patterns.matches_all(&key.public_text()) {
                let result = SearchResult {
                    keypair: key,
                    attempts: self.counter.total(),
                    worker_id: self.id,
                };
                let accepted = self.slot.publish(Ok(result), &self.cancel);
                break WorkerExit::Matched { accepted };
            }
        };

        log::debug!("worker {} stopped: {:?}", self.id, exit);
        exit
    }

    /// Returns the worker ID.
    pub fn id(&self) -> usize {
        self.id
    }
}
