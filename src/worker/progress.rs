//! Periodic progress reporting.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use colored::Colorize;
use crossbeam_channel::{select, tick};

use super::{AttemptCounter, CancelToken};

/// Callback receiving each progress tick.
pub type ProgressSink = Box<dyn FnMut(&Progress) + Send>;

/// Snapshot taken on one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    /// Candidates generated so far
    pub attempts: u64,
    /// Wall-clock time since the search started
    pub elapsed: Duration,
}

impl Progress {
    /// Returns the average generation rate (keys per second).
    pub fn keys_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.attempts as f64 / secs
        } else {
            0.0
        }
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Generated {} keys in {} ({}/s)...",
            format_number(self.attempts),
            format_elapsed(self.elapsed),
            format_number(self.keys_per_second() as u64)
        )
    }
}

/// Default sink: one dimmed line per tick on stdout.
pub fn print_progress(progress: &Progress) {
    println!("{}", progress.to_string().dimmed());
}

/// Emits a [`Progress`] every `interval` until cancelled.
pub struct ProgressReporter {
    counter: Arc<AttemptCounter>,
    cancel: CancelToken,
    interval: Duration,
    start: Instant,
    sink: ProgressSink,
}

impl ProgressReporter {
    pub fn new(
        counter: Arc<AttemptCounter>,
        cancel: CancelToken,
        interval: Duration,
        start: Instant,
        sink: ProgressSink,
    ) -> Self {
        Self {
            counter,
            cancel,
            interval,
            start,
            sink,
        }
    }

    /// Runs until the cancellation signal is raised and returns the
    /// number of ticks reported.
    pub fn run(mut self) -> u64 {
        let ticker = tick(self.interval);
        let mut ticks = 0;

        loop {
            select! {
                recv(self.cancel.signal()) -> _ => break,
                recv(ticker) -> _ => {
                    if self.cancel.is_cancelled() {
                        break;
                    }
                    let progress = Progress {
                        attempts: self.counter.total(),
                        elapsed: self.start.elapsed(),
                    };
                    (self.sink)(&progress);
                    ticks += 1;
                }
            }
        }

        ticks
    }
}

/// Formats a count compactly (`1.25M`).
pub fn format_number(n: u64) -> String {
    if n >= 1_000_000_000 {
        format!("{:.2}B", n as f64 / 1_000_000_000.0)
    } else if n >= 1_000_000 {
        format!("{:.2}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.2}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

/// Formats a duration truncated to whole seconds (`1m 5s`).
pub fn format_elapsed(elapsed: Duration) -> String {
    humantime::format_duration(Duration::from_secs(elapsed.as_secs())).to_string()
}
