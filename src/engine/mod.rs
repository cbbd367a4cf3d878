// src/engine/mod.rs

//! Orchestration engine for styledag.
//!
//! This module ties together:
//! - the task runner, which resolves a task name against the registry and
//!   runs its dependencies before its own action
//! - the trigger queue (what happens when changes arrive while a compile is
//!   still running)
//! - the watch event loop that turns file changes into compile runs
//!
//! The pure watch state machine lives in [`core`]; the async/IO shell is
//! implemented in [`runtime`].

/// Canonical task name type used throughout the engine.
pub type TaskName = String;

/// Lifecycle of a task's own action, reported to a [`TaskObserver`].
///
/// `Started` is only emitted once every dependency of the task has finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskEvent {
    Started { task: TaskName },
    Finished { task: TaskName },
    Failed { task: TaskName, error: String },
}

/// Receives [`TaskEvent`]s from the runner.
pub trait TaskObserver: Send + Sync {
    fn on_event(&self, event: &TaskEvent);
}

/// Events flowing into the watch runtime from the watcher and from finished
/// compile runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    /// A watched file changed (path relative to the project root).
    FileChanged { path: String },
    /// A compile run started by the watch runtime finished.
    RunFinished { run_id: u64, ok: bool },
    /// Graceful shutdown requested (e.g. Ctrl-C).
    ShutdownRequested,
}

pub mod core;
pub mod queue;
pub mod runner;
pub mod runtime;

pub use crate::types::TriggerWhileRunningBehaviour;
pub use self::core::{WatchCommand, WatchCore, WatchStep};
pub use queue::TriggerQueue;
pub use runner::TaskRunner;
pub use runtime::WatchRuntime;
