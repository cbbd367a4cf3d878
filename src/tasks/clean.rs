// src/tasks/clean.rs

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use crate::config::CleanSection;
use crate::engine::TaskRunner;
use crate::errors::{Result, StyledagError};
use crate::fs::FileSystem;
use crate::tasks::{TaskAction, TaskFuture};
use crate::watch::patterns::{collect_matching_files, WatchProfile};

/// The `css:clean` task: delete every generated file matching the clean
/// patterns anywhere under the root.
///
/// Running it with nothing to delete succeeds and deletes nothing.
#[derive(Debug, Clone)]
pub struct CleanMaps {
    root: PathBuf,
    fs: Arc<dyn FileSystem>,
    profile: WatchProfile,
    force: bool,
}

impl CleanMaps {
    pub fn new(section: &CleanSection, root: &Path, fs: Arc<dyn FileSystem>) -> Result<Self> {
        let profile = WatchProfile::new(&section.patterns, &[])
            .map_err(|e| StyledagError::ConfigError(format!("[clean].patterns: {e:#}")))?;
        Ok(Self {
            root: root.to_path_buf(),
            fs,
            profile,
            force: section.force,
        })
    }

    /// Delete all matching files and return their paths.
    ///
    /// Stops at the first file that cannot be removed.
    pub fn clean(&self) -> Result<Vec<PathBuf>> {
        let targets = collect_matching_files(self.fs.as_ref(), &self.root, &self.profile)?;
        let mut deleted = Vec::with_capacity(targets.len());

        for path in targets {
            if self.force {
                self.fs
                    .set_writable(&path)
                    .map_err(|source| StyledagError::Cleanup {
                        path: path.clone(),
                        source,
                    })?;
            }
            self.fs
                .remove_file(&path)
                .map_err(|source| StyledagError::Cleanup {
                    path: path.clone(),
                    source,
                })?;
            debug!(path = %path.display(), "deleted");
            deleted.push(path);
        }

        Ok(deleted)
    }
}

impl TaskAction for CleanMaps {
    fn run<'a>(&'a self, _runner: &'a TaskRunner) -> TaskFuture<'a> {
        let this = self.clone();
        Box::pin(async move {
            let deleted = tokio::task::spawn_blocking(move || this.clean()).await??;
            info!(deleted = deleted.len(), "removed generated files");
            Ok(())
        })
    }
}
