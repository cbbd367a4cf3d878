// src/tasks/mod.rs

//! Task actions and the built-in task set.
//!
//! - [`styles`]: `css`, compiles the stylesheet sources.
//! - [`clean`]: `css:clean`, removes generated source maps.
//! - [`watch`]: `watch`, recompiles whenever a source changes.
//!
//! [`standard_registry`] wires them together with the aggregate tasks
//! `css:dist`, `dist` and `default`.

use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::sync::Arc;

use crate::config::ConfigFile;
use crate::dag::{Dependencies, TaskRegistry};
use crate::engine::TaskRunner;
use crate::errors::Result;
use crate::fs::FileSystem;
use crate::notifier::Notifier;

pub mod clean;
pub mod styles;
pub mod watch;

pub use clean::CleanMaps;
pub use styles::{CompileReport, CompileStyles};
pub use watch::WatchStyles;

pub const CSS: &str = "css";
pub const CSS_CLEAN: &str = "css:clean";
pub const CSS_DIST: &str = "css:dist";
pub const WATCH: &str = "watch";
pub const DEFAULT: &str = "default";
pub const DIST: &str = "dist";

/// Every task [`standard_registry`] defines.
pub const TASK_NAMES: [&str; 6] = [CSS, CSS_CLEAN, CSS_DIST, WATCH, DEFAULT, DIST];

/// Boxed future returned by task actions and the runner.
pub type TaskFuture<'a> = Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;

/// The work a task performs once its dependencies are done.
///
/// The runner is passed in so long-running actions (the watcher) can
/// trigger other tasks by name.
pub trait TaskAction: Send + Sync {
    fn run<'a>(&'a self, runner: &'a TaskRunner) -> TaskFuture<'a>;
}

/// Action of tasks that only exist to run their dependencies.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopAction;

impl TaskAction for NoopAction {
    fn run<'a>(&'a self, _runner: &'a TaskRunner) -> TaskFuture<'a> {
        Box::pin(async { Ok(()) })
    }
}

/// Build the six built-in tasks:
///
/// | task        | dependencies                   | action          |
/// |-------------|--------------------------------|-----------------|
/// | `css`       | -                              | compile sources |
/// | `css:clean` | -                              | delete maps     |
/// | `css:dist`  | sequence `css` → `css:clean`   | -               |
/// | `watch`     | -                              | watch → `css`   |
/// | `default`   | parallel `watch`, `css`        | -               |
/// | `dist`      | sequence `css:dist`            | -               |
pub fn standard_registry(
    config: &ConfigFile,
    root: &Path,
    fs: Arc<dyn FileSystem>,
    notifier: Arc<dyn Notifier>,
) -> Result<TaskRegistry> {
    let compile = CompileStyles::new(config, root, Arc::clone(&fs), notifier)?;
    let clean = CleanMaps::new(config.clean(), root, fs)?;
    let watch = WatchStyles::new(config.watch(), root, CSS)?;

    TaskRegistry::builder()
        .task(CSS, Dependencies::None, Arc::new(compile))
        .task(CSS_CLEAN, Dependencies::None, Arc::new(clean))
        .alias(CSS_DIST, Dependencies::sequence([CSS, CSS_CLEAN]))
        .task(WATCH, Dependencies::None, Arc::new(watch))
        .alias(DEFAULT, Dependencies::parallel([WATCH, CSS]))
        .alias(DIST, Dependencies::sequence([CSS_DIST]))
        .build()
}
