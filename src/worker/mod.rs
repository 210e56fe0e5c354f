//! Worker pool for parallel vanity key search.
//!
//! This module provides:
//! - Multi-threaded CPU workers sharing one attempt counter
//! - A first-writer-wins result slot
//! - Broadcast cancellation
//! - Progress tracking and reporting

mod cancel;
mod coordinator;
mod cpu;
mod pool;
mod progress;

pub use cancel::CancelToken;
pub use coordinator::ResultSlot;
pub use cpu::{AttemptCounter, CpuWorker, WorkerExit};
pub use pool::{Outcome, SearchResult, WorkerPool, DEFAULT_REPORT_INTERVAL};
pub use progress::{
    format_elapsed, format_number, print_progress, Progress, ProgressReporter, ProgressSink,
};
