// src/engine/queue.rs

use std::collections::{BTreeSet, VecDeque};

use tracing::debug;

/// Queue of file changes that arrive while a compile is already running.
///
/// Semantics:
/// - Each queued entry is a *batch* of changed paths that will be served by
///   one future compile run.
/// - `queue_length` (max_runs) defines how many such batches to keep. With
///   the default of 1 every change during a run coalesces into a single
///   follow-up run.
/// - Once the queue is full, new changes merge into the last batch instead
///   of dropping anything.
#[derive(Debug)]
pub struct TriggerQueue {
    max_runs: usize,
    runs: VecDeque<BTreeSet<String>>,
}

impl TriggerQueue {
    /// Create a new queue with the given maximum number of queued runs.
    ///
    /// `max_runs` is clamped to at least 1, as a zero-length queue would
    /// silently lose changes.
    pub fn new(max_runs: usize) -> Self {
        Self {
            max_runs: max_runs.max(1),
            runs: VecDeque::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Number of queued runs.
    pub fn len(&self) -> usize {
        self.runs.len()
    }

    /// Record a change that arrived while a run is in progress.
    pub fn record_trigger(&mut self, path: &str) {
        let name = path.to_string();

        if self.runs.len() < self.max_runs {
            let mut set = BTreeSet::new();
            set.insert(name.clone());
            self.runs.push_back(set);
            debug!(path = %name, queued = self.runs.len(), "queued new run");
        } else if let Some(last_batch) = self.runs.back_mut() {
            let inserted = last_batch.insert(name.clone());
            debug!(
                path = %name,
                inserted,
                "queue full; merged change into last queued run",
            );
        }
    }

    /// Take the oldest queued batch, if any.
    pub fn pop_next(&mut self) -> Option<Vec<String>> {
        let batch = self.runs.pop_front()?;
        debug!(paths = batch.len(), remaining = self.runs.len(), "dequeued run");
        Some(batch.into_iter().collect())
    }
}
