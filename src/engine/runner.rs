// src/engine/runner.rs

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use futures::future::try_join_all;
use tracing::{debug, error, info};

use crate::dag::{Dependencies, TaskRegistry};
use crate::engine::{TaskEvent, TaskObserver};
use crate::errors::{Result, StyledagError};
use crate::tasks::TaskFuture;

/// Resolves task names against a [`TaskRegistry`] and runs them.
///
/// Cloning is cheap; clones share the registry and observer.
#[derive(Clone)]
pub struct TaskRunner {
    registry: Arc<TaskRegistry>,
    observer: Option<Arc<dyn TaskObserver>>,
}

impl fmt::Debug for TaskRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskRunner")
            .field("tasks", &self.registry.names().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl TaskRunner {
    pub fn new(registry: TaskRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
            observer: None,
        }
    }

    /// Report every task start/finish/failure to `observer`.
    pub fn with_observer(mut self, observer: Arc<dyn TaskObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn registry(&self) -> &TaskRegistry {
        &self.registry
    }

    /// Run `name`: first its dependencies, then its own action.
    ///
    /// - An unknown name fails with [`StyledagError::UnknownTask`] before
    ///   anything runs.
    /// - `Sequence` dependencies run strictly one after another.
    /// - `Parallel` dependencies are started together; no order is implied.
    /// - The first failing dependency or action aborts the run and its error
    ///   is returned.
    pub async fn run(&self, name: &str) -> Result<()> {
        if !self.registry.contains(name) {
            return Err(StyledagError::UnknownTask(name.to_string()));
        }
        self.run_task(name).await
    }

    fn run_task<'a>(&'a self, name: &'a str) -> TaskFuture<'a> {
        Box::pin(async move {
            let entry = self
                .registry
                .get(name)
                .ok_or_else(|| StyledagError::UnknownTask(name.to_string()))?;

            match entry.dependencies() {
                Dependencies::None => {}
                Dependencies::Sequence(deps) => {
                    for dep in deps {
                        debug!(task = name, dep = %dep, "running sequential dependency");
                        self.run_task(dep).await?;
                    }
                }
                Dependencies::Parallel(deps) => {
                    debug!(task = name, ?deps, "running parallel dependencies");
                    try_join_all(deps.iter().map(|dep| self.run_task(dep))).await?;
                }
            }

            self.emit(TaskEvent::Started {
                task: name.to_string(),
            });
            info!(task = name, "starting task");
            let started = Instant::now();

            match entry.action().run(self).await {
                Ok(()) => {
                    info!(
                        task = name,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "finished task"
                    );
                    self.emit(TaskEvent::Finished {
                        task: name.to_string(),
                    });
                    Ok(())
                }
                Err(err) => {
                    error!(task = name, error = %err, "task failed");
                    self.emit(TaskEvent::Failed {
                        task: name.to_string(),
                        error: err.to_string(),
                    });
                    Err(err)
                }
            }
        })
    }

    fn emit(&self, event: TaskEvent) {
        if let Some(observer) = &self.observer {
            observer.on_event(&event);
        }
    }
}
