// src/engine/core.rs

//! Pure watch state machine.
//!
//! [`WatchCore`] consumes [`WatchEvent`]s and returns the commands the IO
//! shell (`engine::runtime::WatchRuntime`) should execute. It has no
//! channels, no Tokio types and performs no IO, so the overlap policy can be
//! tested deterministically.

use std::collections::BTreeSet;

use tracing::{debug, info, warn};

use crate::engine::queue::TriggerQueue;
use crate::engine::WatchEvent;
use crate::types::TriggerWhileRunningBehaviour;

/// Command produced by the core, to be executed by the outer IO shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchCommand {
    /// Run the watched task once. `changes` lists the paths that led to it.
    StartRun { run_id: u64, changes: Vec<String> },
}

/// Decision returned by the core after handling a single event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchStep {
    pub commands: Vec<WatchCommand>,
    /// Whether the outer loop should keep running.
    pub keep_running: bool,
}

impl WatchStep {
    fn keep(commands: Vec<WatchCommand>) -> Self {
        Self {
            commands,
            keep_running: true,
        }
    }
}

#[derive(Debug)]
pub struct WatchCore {
    behaviour: TriggerWhileRunningBehaviour,
    queue: TriggerQueue,
    running: BTreeSet<u64>,
    run_counter: u64,
}

impl WatchCore {
    pub fn new(behaviour: TriggerWhileRunningBehaviour, queue_length: usize) -> Self {
        Self {
            behaviour,
            queue: TriggerQueue::new(queue_length),
            running: BTreeSet::new(),
            run_counter: 0,
        }
    }

    /// True when no run is in flight.
    pub fn is_idle(&self) -> bool {
        self.running.is_empty()
    }

    /// Number of runs currently in flight.
    pub fn running(&self) -> usize {
        self.running.len()
    }

    pub fn queue_is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Handle a single event, updating state and returning commands.
    pub fn step(&mut self, event: WatchEvent) -> WatchStep {
        match event {
            WatchEvent::FileChanged { path } => self.on_change(path),
            WatchEvent::RunFinished { run_id, ok } => self.on_finished(run_id, ok),
            WatchEvent::ShutdownRequested => {
                info!(in_flight = self.running.len(), "watch shutdown requested");
                WatchStep {
                    commands: Vec::new(),
                    keep_running: false,
                }
            }
        }
    }

    fn on_change(&mut self, path: String) -> WatchStep {
        match self.behaviour {
            TriggerWhileRunningBehaviour::Overlap => WatchStep::keep(vec![self.start(vec![path])]),
            TriggerWhileRunningBehaviour::Queue if self.is_idle() => {
                WatchStep::keep(vec![self.start(vec![path])])
            }
            TriggerWhileRunningBehaviour::Queue => {
                self.queue.record_trigger(&path);
                WatchStep::keep(Vec::new())
            }
        }
    }

    fn on_finished(&mut self, run_id: u64, ok: bool) -> WatchStep {
        if !self.running.remove(&run_id) {
            warn!(run_id, "finish reported for a run that is not in flight");
        }
        debug!(run_id, ok, "watch run finished");

        let mut commands = Vec::new();
        if self.is_idle() {
            if let Some(changes) = self.queue.pop_next() {
                commands.push(self.start(changes));
            }
        }
        WatchStep::keep(commands)
    }

    fn start(&mut self, changes: Vec<String>) -> WatchCommand {
        self.run_counter += 1;
        let run_id = self.run_counter;
        self.running.insert(run_id);
        WatchCommand::StartRun { run_id, changes }
    }
}
