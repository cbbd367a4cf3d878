// src/watch/watcher.rs

use std::path::PathBuf;

use anyhow::Result;
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::engine::WatchEvent;
use crate::watch::path_utils::relative_str;
use crate::watch::patterns::WatchProfile;

/// Handle for the filesystem watcher.
///
/// This exists mainly so the underlying `RecommendedWatcher` is kept alive for
/// as long as needed. Dropping this handle will stop file watching.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish()
    }
}

/// Spawn a filesystem watcher that observes the given `root` directory
/// recursively and sends `WatchEvent::FileChanged` for every changed path
/// matched by `profile`.
///
/// - `root` is the project root against which all glob patterns are evaluated.
/// - `event_tx` is the channel into the watch runtime.
pub fn spawn_watcher(
    root: impl Into<PathBuf>,
    profile: WatchProfile,
    event_tx: mpsc::Sender<WatchEvent>,
) -> Result<WatcherHandle> {
    let root = root.into();
    // Canonicalize once so we have a stable base path.
    let root = root.canonicalize().unwrap_or_else(|_| root.clone());

    // Channel from the blocking notify callback into the async world.
    let (notify_tx, mut notify_rx) = mpsc::unbounded_channel::<Event>();

    // Closure called synchronously by notify whenever an event arrives.
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if let Err(err) = notify_tx.send(event) {
                    // We can't log via tracing here easily, so fallback to stderr.
                    eprintln!("styledag: failed to forward notify event: {err}");
                }
            }
            Err(err) => {
                eprintln!("styledag: file watch error: {err}");
            }
        },
        Config::default(),
    )?;

    watcher.watch(&root, RecursiveMode::Recursive)?;

    info!(root = %root.display(), patterns = ?profile.patterns(), "file watcher started");

    tokio::spawn(async move {
        while let Some(event) = notify_rx.recv().await {
            debug!(?event, "received notify event");

            if !is_content_change(&event.kind) {
                continue;
            }

            for path in &event.paths {
                let Some(rel) = relative_str(&root, path) else {
                    warn!(
                        path = %path.display(),
                        root = %root.display(),
                        "could not relativize path"
                    );
                    continue;
                };
                if !profile.matches(&rel) {
                    continue;
                }

                debug!(path = %rel, "watch match -> triggering compile");
                if event_tx
                    .send(WatchEvent::FileChanged { path: rel })
                    .await
                    .is_err()
                {
                    // Runtime is gone; nothing left to trigger.
                    debug!("watch event channel closed; stopping watcher loop");
                    return;
                }
            }
        }
        debug!("watcher event loop finished");
    });

    Ok(WatcherHandle { _inner: watcher })
}

fn is_content_change(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) | EventKind::Any
    )
}
