// src/watch/patterns.rs

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use tracing::debug;

use crate::config::WatchSection;
use crate::fs::FileSystem;

/// Directories never descended into when listing files.
const SKIPPED_DIRS: &[&str] = &["node_modules", ".git", "target"];

/// Compiled include/exclude glob patterns.
///
/// The patterns are relative to the project root. Callers pass relative,
/// forward-slash paths (e.g. `"badexample/b.scss"`) into `matches`.
#[derive(Clone)]
pub struct WatchProfile {
    include: GlobSet,
    exclude: Option<GlobSet>,
    patterns: Vec<String>,
}

impl fmt::Debug for WatchProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchProfile")
            .field("patterns", &self.patterns)
            .finish_non_exhaustive()
    }
}

impl WatchProfile {
    pub fn new(include: &[String], exclude: &[String]) -> Result<Self> {
        let include_set = build_globset(include).context("building include globset")?;
        let exclude_set = if exclude.is_empty() {
            None
        } else {
            Some(build_globset(exclude).context("building exclude globset")?)
        };

        Ok(Self {
            include: include_set,
            exclude: exclude_set,
            patterns: include.to_vec(),
        })
    }

    /// Profile for the `[watch]` section.
    pub fn from_section(section: &WatchSection) -> Result<Self> {
        Self::new(&section.patterns, &section.exclude)
    }

    /// The include patterns this profile was built from.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Returns true if `rel_path` (relative to project root) is included and
    /// not excluded.
    pub fn matches(&self, rel_path: &str) -> bool {
        if !self.include.is_match(rel_path) {
            return false;
        }
        if let Some(exclude) = &self.exclude {
            if exclude.is_match(rel_path) {
                return false;
            }
        }
        true
    }
}

/// Build a GlobSet from simple string patterns.
///
/// `*` and `?` never match `/`, so `*.scss` only selects files in the root
/// directory while `**/*.scss` selects them at any depth.
pub fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob = GlobBuilder::new(pat)
            .literal_separator(true)
            .build()
            .with_context(|| format!("invalid glob pattern: {pat}"))?;
        builder.add(glob);
    }
    Ok(builder.build()?)
}

/// Collect all files under `root` that match `profile`.
///
/// Symlinked directories are not descended into.
///
/// The tree is walked on every call; nothing is cached between runs. The
/// result is sorted so runs are deterministic.
pub fn collect_matching_files(
    fs: &dyn FileSystem,
    root: &Path,
    profile: &WatchProfile,
) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut stack = vec![root.to_path_buf()];

    while let Some(dir) = stack.pop() {
        for path in fs.read_dir(&dir)? {
            if fs.is_dir(&path) {
                let skipped = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| SKIPPED_DIRS.contains(&n));
                if skipped {
                    continue;
                }
                // A link back up the tree would never end.
                if fs.is_symlink(&path) {
                    debug!(path = %path.display(), "not following directory symlink");
                    continue;
                }
                stack.push(path);
            } else if fs.is_file(&path) {
                if let Ok(rel) = path.strip_prefix(root) {
                    let rel_str = rel.to_string_lossy().replace('\\', "/");
                    if profile.matches(&rel_str) {
                        files.push(path);
                    }
                }
            }
        }
    }

    files.sort();
    Ok(files)
}
