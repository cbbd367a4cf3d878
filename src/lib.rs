// src/lib.rs

pub mod cli;
pub mod config;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod fs;
pub mod logging;
pub mod notifier;
pub mod pipeline;
pub mod tasks;
pub mod types;
pub mod watch;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{load_or_default, ConfigFile};
use crate::dag::TaskRegistry;
use crate::engine::TaskRunner;
use crate::errors::{Result, StyledagError};
use crate::fs::{FileSystem, RealFileSystem};
use crate::notifier::{DesktopNotifier, LogNotifier, Notifier};
use crate::tasks::{standard_registry, DEFAULT, TASK_NAMES};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading (or built-in defaults)
/// - the notification side channel
/// - the task registry
/// - the runner for the selected task
pub async fn run(args: CliArgs) -> Result<()> {
    // Task names are fixed, so a typo is reported before touching any file.
    let task = args.task.as_deref().unwrap_or(DEFAULT);
    if !TASK_NAMES.contains(&task) {
        return Err(StyledagError::UnknownTask(task.to_string()));
    }

    let root = project_root(args.root.as_deref());
    let cfg = load_or_default(args.config.as_deref(), &root)?;

    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let notifier = build_notifier(&cfg, args.no_notify);
    let registry = standard_registry(&cfg, &root, fs, notifier)?;

    if args.dry_run {
        print_dry_run(&cfg, &registry, task);
        return Ok(());
    }

    info!(task, root = %root.display(), "running");
    TaskRunner::new(registry).run(task).await
}

/// The project root: `--root` if given, otherwise the working directory.
fn project_root(explicit: Option<&Path>) -> PathBuf {
    match explicit {
        Some(path) => path.to_path_buf(),
        None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}

/// Desktop notifications unless disabled by flag or config.
pub fn build_notifier(cfg: &ConfigFile, no_notify: bool) -> Arc<dyn Notifier> {
    if no_notify || !cfg.notify().enabled {
        debug!("desktop notifications disabled; logging them instead");
        Arc::new(LogNotifier)
    } else {
        Arc::new(DesktopNotifier::new())
    }
}

/// Simple dry-run output: print tasks, dependencies and settings.
fn print_dry_run(cfg: &ConfigFile, registry: &TaskRegistry, selected: &str) {
    println!("styledag dry-run (task: {selected})");
    println!();

    println!("tasks ({}):", registry.len());
    for name in registry.names() {
        println!("  - {name}");
        if let Some(deps) = registry.dependencies_of(name) {
            if !deps.names().is_empty() {
                println!("      deps: {deps}");
            }
        }
        let dependents = registry.graph().dependents_of(name);
        if !dependents.is_empty() {
            println!("      used by: {dependents:?}");
        }
    }
    println!();

    let styles = cfg.styles();
    println!("styles:");
    println!("  sources = {:?}", styles.sources);
    println!("  output_style = {}", styles.output_style);
    println!("  indent_width = {}", styles.indent_width);
    println!("  browsers = {:?}", styles.browsers);
    println!("  source_maps = {}", styles.source_maps);
    println!("clean:");
    println!("  patterns = {:?}", cfg.clean().patterns);
    println!("  force = {}", cfg.clean().force);
    println!("watch:");
    println!("  patterns = {:?}", cfg.watch().patterns);
    if !cfg.watch().exclude.is_empty() {
        println!("  exclude = {:?}", cfg.watch().exclude);
    }
    println!(
        "  triggered_while_running_behaviour = {:?}",
        cfg.watch().triggered_while_running_behaviour
    );
    println!("  queue_length = {}", cfg.watch().queue_length);

    debug!("dry-run complete (no execution)");
}
