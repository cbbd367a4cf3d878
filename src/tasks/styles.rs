// src/tasks/styles.rs

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use crate::config::{ConfigFile, NotifySection};
use crate::engine::TaskRunner;
use crate::errors::Result;
use crate::fs::FileSystem;
use crate::notifier::{Notification, Notifier};
use crate::pipeline::{StyleError, StylePipeline};
use crate::tasks::{TaskAction, TaskFuture};

/// Outcome of one compile run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileReport {
    /// Sources whose output was written, in processing order.
    pub compiled: Vec<PathBuf>,
    /// The source that failed, if any. Processing stops there.
    pub failed: Option<PathBuf>,
    /// Sources not processed because an earlier one failed.
    pub skipped: Vec<PathBuf>,
}

impl CompileReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_none()
    }
}

/// The `css` task.
///
/// A compile error never fails the task: it is handed to the failure
/// callback (an error notification), the rest of the run is abandoned, and
/// the task completes so a watcher can trigger the next run.
///
/// Clones share the pipeline, so a run can move onto a blocking thread.
#[derive(Debug, Clone)]
pub struct CompileStyles {
    pipeline: Arc<StylePipeline>,
    notifier: Arc<dyn Notifier>,
    notify: Arc<NotifySection>,
}

impl CompileStyles {
    pub fn new(
        config: &ConfigFile,
        root: &Path,
        fs: Arc<dyn FileSystem>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self> {
        Ok(Self {
            pipeline: Arc::new(StylePipeline::new(root, fs, config.styles())?),
            notifier,
            notify: Arc::new(config.notify().clone()),
        })
    }

    /// Compile and write every source.
    ///
    /// `on_error` is called once, for the first stylesheet that fails to
    /// compile; the remaining sources are skipped. Errors listing or writing
    /// files are returned instead.
    pub fn compile_all(&self, mut on_error: impl FnMut(&StyleError)) -> Result<CompileReport> {
        let sources = self.pipeline.list_sources()?;
        let mut report = CompileReport::default();

        info!(sources = sources.len(), "compiling stylesheets");

        let mut iter = sources.into_iter();
        while let Some(source) = iter.next() {
            match self.pipeline.compile_file(&source) {
                Ok(compiled) => {
                    self.pipeline
                        .write(&compiled)
                        .with_context(|| format!("writing output for {}", source.display()))?;
                    info!(
                        source = %source.display(),
                        css = %compiled.css_path.display(),
                        "compiled stylesheet"
                    );
                    if !self.notify.on_last {
                        self.success();
                    }
                    report.compiled.push(source);
                }
                Err(err) => {
                    warn!(
                        source = %err.path().display(),
                        error = %err,
                        "stylesheet failed to compile"
                    );
                    on_error(&err);
                    report.failed = Some(source);
                    report.skipped = iter.collect();
                    break;
                }
            }
        }

        if !report.skipped.is_empty() {
            warn!(skipped = report.skipped.len(), "remaining stylesheets skipped after error");
        }
        if self.notify.on_last && !report.compiled.is_empty() {
            self.success();
        }

        Ok(report)
    }

    /// Failure callback used by the task: one error notification.
    pub fn report_error(&self, err: &StyleError) {
        self.send(Notification::error(
            &self.notify.title,
            &self.notify.error_subtitle,
            err.to_string(),
        ));
    }

    fn success(&self) {
        self.send(Notification::success(
            &self.notify.title,
            &self.notify.success_message,
        ));
    }

    fn send(&self, notification: Notification) {
        if let Err(err) = self.notifier.notify(&notification) {
            warn!(error = %format!("{err:#}"), %notification, "could not deliver notification");
        }
    }
}

impl TaskAction for CompileStyles {
    fn run<'a>(&'a self, _runner: &'a TaskRunner) -> TaskFuture<'a> {
        let this = self.clone();
        Box::pin(async move {
            // grass and lightningcss block.
            let report = tokio::task::spawn_blocking(move || {
                this.compile_all(|err| this.report_error(err))
            })
            .await??;
            info!(
                compiled = report.compiled.len(),
                failed = report.failed.is_some(),
                "stylesheet run complete"
            );
            Ok(())
        })
    }
}
