//! Worker pool management.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::crypto::KeyGenerator;
use crate::error::VanityError;
use crate::matcher::PatternSet;

use super::cpu::{AttemptCounter, CpuWorker, WorkerExit};
use super::progress::{print_progress, Progress, ProgressReporter, ProgressSink};
use super::{CancelToken, ResultSlot};

/// Default interval between progress lines.
pub const DEFAULT_REPORT_INTERVAL: Duration = Duration::from_secs(5);

/// Result of a successful search.
#[derive(Debug, Clone)]
pub struct SearchResult<K> {
    /// The winning keypair
    pub keypair: K,
    /// Snapshot of the shared attempt counter when the match was published.
    /// Other workers may have added to it in the same instant.
    pub attempts: u64,
    /// The ID of the worker that found this result
    pub worker_id: usize,
}

/// What a worker hands to the result slot.
pub type Outcome<K> = Result<SearchResult<K>, VanityError>;

/// Raises cancellation if a worker thread unwinds, so the pool never waits
/// on a result that can no longer arrive.
struct PanicGuard(CancelToken);

impl Drop for PanicGuard {
    fn drop(&mut self) {
        if thread::panicking() {
            self.0.cancel();
        }
    }
}

/// Runs one search over a pool of worker threads.
pub struct WorkerPool<G: KeyGenerator> {
    /// Number of workers
    num_workers: usize,
    /// The patterns every candidate must satisfy
    patterns: Arc<PatternSet>,
    /// Source of candidates
    generator: Arc<G>,
    /// Shared attempt counter
    counter: Arc<AttemptCounter>,
    /// Shared cancellation signal
    cancel: CancelToken,
    /// Time between progress reports
    report_interval: Duration,
    /// Where progress reports go
    progress: ProgressSink,
}

impl<G: KeyGenerator + 'static> WorkerPool<G> {
    /// Creates a pool with the specified number of workers (at least one).
    pub fn new(num_workers: usize, patterns: PatternSet, generator: G) -> Self {
        Self {
            num_workers: num_workers.max(1),
            patterns: Arc::new(patterns),
            generator: Arc::new(generator),
            counter: Arc::new(AttemptCounter::new()),
            cancel: CancelToken::new(),
            report_interval: DEFAULT_REPORT_INTERVAL,
            progress: Box::new(print_progress),
        }
    }

    /// Sets the interval between progress reports.
    pub fn with_report_interval(mut self, interval: Duration) -> Self {
        self.report_interval = interval;
        self
    }

    /// Replaces the default stdout progress output.
    pub fn with_progress<F>(mut self, sink: F) -> Self
    where
        F: FnMut(&Progress) + Send + 'static,
    {
        self.progress = Box::new(sink);
        self
    }

    /// Returns a handle to the cancellation signal (e.g., for signal handlers).
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Returns a handle to the shared attempt counter.
    pub fn counter(&self) -> Arc<AttemptCounter> {
        self.counter.clone()
    }

    /// Returns the number of workers.
    pub fn num_workers(&self) -> usize {
        self.num_workers
    }

    /// Returns the pattern set being searched for.
    pub fn patterns(&self) -> &PatternSet {
        &self.patterns
    }

    /// Searches until one worker's candidate matches every pattern.
    ///
    /// All workers and the progress reporter have stopped by the time this
    /// returns, whatever the outcome. Errors:
    /// - `GenerationFailure` if any worker's generator failed first
    /// - `Cancelled` if the token was raised externally before a match
    /// - `WorkerPanicked` if a worker thread panicked
    /// - `Spawn` if a thread could not be started
    pub fn search(self) -> Result<SearchResult<G::Key>, VanityError> {
        let start = Instant::now();
        let slot = Arc::new(ResultSlot::new());

        let workers = self.spawn_workers(&slot)?;
        log::debug!("started {} workers", workers.len());

        let reporter = ProgressReporter::new(
            self.counter.clone(),
            self.cancel.clone(),
            self.report_interval,
            start,
            self.progress,
        );
        let reporter = thread::Builder::new()
            .name("vanity-progress".into())
            .spawn(move || reporter.run())
            .map_err(|e| log::warn!("progress reporter not started: {}", e))
            .ok();

        let outcome = slot.await_first(&self.cancel);
        self.cancel.cancel();

        let panicked = join_workers(workers);
        if let Some(handle) = reporter {
            let _ = handle.join();
        }
        log::debug!(
            "search finished after {} attempts in {:?}",
            self.counter.total(),
            start.elapsed()
        );

        match outcome {
            Some(outcome) => outcome,
            None if panicked => Err(VanityError::WorkerPanicked),
            None => Err(VanityError::Cancelled),
        }
    }

    /// Spawns worker threads. On failure every worker already started is
    /// cancelled and joined before the error is returned.
    fn spawn_workers(
        &self,
        slot: &Arc<ResultSlot<Outcome<G::Key>>>,
    ) -> Result<Vec<JoinHandle<WorkerExit>>, VanityError> {
        let mut handles = Vec::with_capacity(self.num_workers);

        for id in 0..self.num_workers {
            let worker = CpuWorker::new(
                id,
                self.generator.clone(),
                self.patterns.clone(),
                slot.clone(),
                self.cancel.clone(),
                self.counter.clone(),
            );
            let guard = PanicGuard(self.cancel.clone());

            let spawned = thread::Builder::new()
                .name(format!("vanity-worker-{}", id))
                .spawn(move || {
                    let _guard = guard;
                    worker.run()
                });

            match spawned {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    self.cancel.cancel();
                    join_workers(handles);
                    return Err(VanityError::Spawn(e));
                }
            }
        }

        Ok(handles)
    }
}

/// Joins every worker. Returns true if any of them panicked.
fn join_workers(handles: Vec<JoinHandle<WorkerExit>>) -> bool {
    let mut panicked = false;
    for handle in handles {
        if handle.join().is_err() {
            log::warn!("search worker panicked");
            panicked = true;
        }
    }
    panicked
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crossbeam_channel::unbounded;

    use super::*;
    use crate::crypto::{Candidate, Keypair, OsKeyGenerator};

    #[derive(Debug)]
    struct TextKey(String);

    impl Candidate for TextKey {
        fn public_text(&self) -> String {
            self.0.clone()
        }
    }

    /// Yields the listed texts in order, then `X<n>` forever.
    struct SequenceGenerator {
        texts: Vec<&'static str>,
        next: AtomicUsize,
    }

    impl SequenceGenerator {
        fn new(texts: &[&'static str]) -> Self {
            Self {
                texts: texts.to_vec(),
                next: AtomicUsize::new(0),
            }
        }
    }

    impl KeyGenerator for SequenceGenerator {
        type Key = TextKey;

        fn generate(&self) -> Result<TextKey, VanityError> {
            let i = self.next.fetch_add(1, Ordering::Relaxed);
            Ok(TextKey(match self.texts.get(i) {
                Some(text) => text.to_string(),
                None => format!("X{}", i),
            }))
        }
    }

    /// Fails on the `fail_at`-th call (zero based) and every call after it.
    struct FlakyGenerator {
        calls: AtomicUsize,
        fail_at: usize,
    }

    impl KeyGenerator for FlakyGenerator {
        type Key = TextKey;

        fn generate(&self) -> Result<TextKey, VanityError> {
            if self.calls.fetch_add(1, Ordering::Relaxed) >= self.fail_at {
                Err(VanityError::GenerationFailure("rng unavailable".into()))
            } else {
                Ok(TextKey("AAAA".into()))
            }
        }
    }

    struct PanickingGenerator;

    impl KeyGenerator for PanickingGenerator {
        type Key = TextKey;

        fn generate(&self) -> Result<TextKey, VanityError> {
            panic!("generator bug");
        }
    }

    fn quiet<G: KeyGenerator + 'static>(pool: WorkerPool<G>) -> WorkerPool<G> {
        pool.with_progress(|_| {})
    }

    #[test]
    fn test_prefix_scenario_stops_on_third_candidate() {
        let patterns = PatternSet::new(["^ABC"]).unwrap();
        let generator = SequenceGenerator::new(&["AAA", "ABA", "ABC1", "ABC2"]);
        let pool = quiet(WorkerPool::new(1, patterns, generator));
        let counter = pool.counter();

        let result = pool.search().unwrap();

        assert_eq!(result.keypair.0, "ABC1");
        assert_eq!(result.attempts, 3);
        assert_eq!(counter.total(), 3);
    }

    #[test]
    fn test_many_workers_return_a_matching_result() {
        let patterns = PatternSet::new(["^X", "7$"]).unwrap();
        let pool = quiet(WorkerPool::new(8, patterns.clone(), SequenceGenerator::new(&[])));
        let counter = pool.counter();

        let result = pool.search().unwrap();

        assert!(patterns.matches_all(&result.keypair.0));
        assert!(result.attempts >= 1);
        assert!(counter.total() >= result.attempts);
        assert!(result.worker_id < 8);
    }

    #[test]
    fn test_unsatisfiable_search_runs_until_cancelled() {
        const WORKERS: usize = 4;

        let patterns = PatternSet::new(["^ZZZ$"]).unwrap();
        let pool = quiet(WorkerPool::new(WORKERS, patterns, SequenceGenerator::new(&[])));
        let counter = pool.counter();
        let cancel = pool.cancel_token();

        let search = thread::spawn(move || pool.search());

        while counter.total() < 1_000 {
            thread::yield_now();
        }
        cancel.cancel();
        let at_cancel = counter.total();

        let outcome = search.join().unwrap();
        assert!(matches!(outcome, Err(VanityError::Cancelled)));
        // At most one more generate-and-test per worker after the signal.
        assert!(counter.total() <= at_cancel + WORKERS as u64);
    }

    #[test]
    fn test_generation_failure_stops_search() {
        let patterns = PatternSet::new(["^ZZZ$"]).unwrap();
        let generator = FlakyGenerator {
            calls: AtomicUsize::new(0),
            fail_at: 50,
        };
        let pool = quiet(WorkerPool::new(4, patterns, generator));
        let cancel = pool.cancel_token();

        let outcome = pool.search();

        assert!(matches!(outcome, Err(VanityError::GenerationFailure(_))));
        assert!(cancel.is_cancelled());
    }

    #[test]
    fn test_worker_panic_does_not_hang_search() {
        let patterns = PatternSet::new(["^RW"]).unwrap();
        let pool = quiet(WorkerPool::new(2, patterns, PanickingGenerator));

        assert!(matches!(pool.search(), Err(VanityError::WorkerPanicked)));
    }

    #[test]
    fn test_progress_sink_receives_ticks() {
        let patterns = PatternSet::new(["^ZZZ$"]).unwrap();
        let (tx, rx) = unbounded();
        let pool = WorkerPool::new(2, patterns, SequenceGenerator::new(&[]))
            .with_report_interval(Duration::from_millis(5))
            .with_progress(move |p| {
                let _ = tx.send(p.attempts);
            });
        let cancel = pool.cancel_token();

        let search = thread::spawn(move || pool.search());
        rx.recv_timeout(Duration::from_secs(5)).unwrap();
        cancel.cancel();

        assert!(matches!(search.join().unwrap(), Err(VanityError::Cancelled)));
    }

    #[test]
    fn test_zero_workers_means_one() {
        let patterns = PatternSet::new(["."]).unwrap();
        let pool = WorkerPool::new(0, patterns, SequenceGenerator::new(&[]));
        assert_eq!(pool.num_workers(), 1);
    }

    #[test]
    fn test_invalid_pattern_prevents_search() {
        let calls = Arc::new(AtomicUsize::new(0));
        let generator = FlakyGenerator {
            calls: AtomicUsize::new(0),
            fail_at: usize::MAX,
        };

        let pool = PatternSet::new(["^RW", "([a-z]", "x$"]).map(|patterns| {
            calls.fetch_add(1, Ordering::Relaxed);
            WorkerPool::new(4, patterns, generator)
        });

        assert!(matches!(pool, Err(VanityError::InvalidPattern { .. })));
        assert_eq!(calls.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_real_keys_match_short_prefix() {
        // Every key text starts with "RW" followed by one of Q, R, S or T.
        let patterns = PatternSet::new(["^RW[QRST]", "[0-9]"]).unwrap();
        let pool = quiet(WorkerPool::new(2, patterns.clone(), OsKeyGenerator));

        let result = pool.search().unwrap();

        let keypair: Keypair = result.keypair;
        assert!(patterns.matches_all(&keypair.public_text()));
        assert!(result.attempts >= 1);
    }
}
