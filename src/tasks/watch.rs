// src/tasks/watch.rs

use std::path::{Path, PathBuf};

use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::config::WatchSection;
use crate::engine::{TaskName, TaskRunner, WatchCore, WatchEvent, WatchRuntime};
use crate::errors::{Result, StyledagError};
use crate::tasks::{TaskAction, TaskFuture};
use crate::types::TriggerWhileRunningBehaviour;
use crate::watch::{spawn_watcher, WatchProfile};

/// The `watch` task: re-run `target` whenever a watched file changes.
///
/// Never finishes on its own; Ctrl-C stops it.
#[derive(Debug)]
pub struct WatchStyles {
    root: PathBuf,
    profile: WatchProfile,
    target: TaskName,
    behaviour: TriggerWhileRunningBehaviour,
    queue_length: usize,
}

impl WatchStyles {
    pub fn new(section: &WatchSection, root: &Path, target: impl Into<TaskName>) -> Result<Self> {
        let profile = WatchProfile::from_section(section)
            .map_err(|e| StyledagError::ConfigError(format!("[watch]: {e:#}")))?;
        Ok(Self {
            root: root.to_path_buf(),
            profile,
            target: target.into(),
            behaviour: section.triggered_while_running_behaviour,
            queue_length: section.queue_length,
        })
    }
}

impl TaskAction for WatchStyles {
    fn run<'a>(&'a self, runner: &'a TaskRunner) -> TaskFuture<'a> {
        Box::pin(async move {
            let (tx, rx) = mpsc::channel::<WatchEvent>(64);

            // Dropping the handle stops the watcher, so keep it for the
            // lifetime of the runtime loop below.
            let _watcher = spawn_watcher(&self.root, self.profile.clone(), tx.clone())?;

            // Ctrl-C → graceful shutdown.
            {
                let tx = tx.clone();
                tokio::spawn(async move {
                    if let Err(e) = tokio::signal::ctrl_c().await {
                        warn!(error = %e, "failed to listen for Ctrl+C");
                        return;
                    }
                    let _ = tx.send(WatchEvent::ShutdownRequested).await;
                });
            }

            info!(
                task = %self.target,
                behaviour = ?self.behaviour,
                "watching for changes"
            );

            let core = WatchCore::new(self.behaviour, self.queue_length);
            WatchRuntime::new(core, runner.clone(), self.target.clone(), tx, rx)
                .run()
                .await
        })
    }
}
