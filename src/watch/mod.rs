// src/watch/mod.rs

//! File watching and file discovery.
//!
//! This module is responsible for:
//! - Compiling glob patterns (`*` stays inside a directory, `**` crosses them).
//! - Listing the files under the project root that match a pattern set.
//! - Wiring up a cross-platform filesystem watcher (`notify`).
//!
//! It does **not** know about tasks; it only turns filesystem changes into
//! [`crate::engine::WatchEvent`]s.

pub mod path_utils;
pub mod patterns;
pub mod watcher;

pub use patterns::{build_globset, collect_matching_files, WatchProfile};
pub use watcher::{spawn_watcher, WatcherHandle};
