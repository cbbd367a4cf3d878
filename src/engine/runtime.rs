// src/engine/runtime.rs

use std::fmt;

use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::engine::{TaskName, TaskRunner, WatchCommand, WatchCore, WatchEvent};
use crate::errors::Result;

/// Drives the watch state machine in response to [`WatchEvent`]s and runs
/// the target task through a [`TaskRunner`].
///
/// This is the IO shell around [`WatchCore`]: it reads events from the
/// channel, spawns runs, and feeds each run's completion back into the same
/// channel.
pub struct WatchRuntime {
    core: WatchCore,
    runner: TaskRunner,
    target: TaskName,
    event_tx: mpsc::Sender<WatchEvent>,
    event_rx: mpsc::Receiver<WatchEvent>,
}

impl fmt::Debug for WatchRuntime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchRuntime")
            .field("core", &self.core)
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

impl WatchRuntime {
    /// `event_tx` must be the sending half of `event_rx`; spawned runs use it
    /// to report `RunFinished`.
    pub fn new(
        core: WatchCore,
        runner: TaskRunner,
        target: impl Into<TaskName>,
        event_tx: mpsc::Sender<WatchEvent>,
        event_rx: mpsc::Receiver<WatchEvent>,
    ) -> Self {
        Self {
            core,
            runner,
            target: target.into(),
            event_tx,
            event_rx,
        }
    }

    /// Main event loop. Returns after `ShutdownRequested`.
    pub async fn run(mut self) -> Result<()> {
        info!(task = %self.target, "watch runtime started");

        while let Some(event) = self.event_rx.recv().await {
            debug!(?event, in_flight = self.core.running(), "watch runtime received event");

            let step = self.core.step(event);

            for command in step.commands {
                self.execute(command);
            }

            if !step.keep_running {
                break;
            }
        }

        info!("watch runtime exiting");
        Ok(())
    }

    fn execute(&self, command: WatchCommand) {
        match command {
            WatchCommand::StartRun { run_id, changes } => {
                info!(run_id, task = %self.target, ?changes, "change detected; running task");

                let runner = self.runner.clone();
                let target = self.target.clone();
                let tx = self.event_tx.clone();

                tokio::spawn(async move {
                    // Compile failures are reported by the task itself; anything
                    // reaching here must not stop the watcher.
                    let ok = match runner.run(&target).await {
                        Ok(()) => true,
                        Err(err) => {
                            error!(run_id, task = %target, error = %err, "watched run failed");
                            false
                        }
                    };
                    let _ = tx.send(WatchEvent::RunFinished { run_id, ok }).await;
                });
            }
        }
    }
}
