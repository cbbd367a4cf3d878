// tests/watcher.rs

use std::fs;
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;
use tokio::sync::mpsc;

use styledag::config::{ConfigFile, WatchSection};
use styledag::engine::{TaskRunner, WatchEvent};
use styledag::fs::RealFileSystem;
use styledag::tasks::{standard_registry, DEFAULT};
use styledag::watch::{spawn_watcher, WatchProfile};
use styledag_test_utils::recording::RecordingNotifier;
use styledag_test_utils::{eventually, init_tracing, with_timeout};

/// Everything that arrives on `rx` within `window`.
async fn drain(rx: &mut mpsc::Receiver<WatchEvent>, window: Duration) -> Vec<WatchEvent> {
    let mut events = Vec::new();
    let deadline = tokio::time::Instant::now() + window;
    while let Ok(Some(event)) = tokio::time::timeout_at(deadline, rx.recv()).await {
        events.push(event);
    }
    events
}

#[tokio::test]
async fn only_scss_changes_are_forwarded() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let root = dir.path().canonicalize().unwrap();

    let profile = WatchProfile::from_section(&WatchSection::default()).unwrap();
    let (tx, mut rx) = mpsc::channel(64);
    let _watcher = spawn_watcher(&root, profile, tx).unwrap();

    fs::write(root.join("a.scss"), ".a { color: red; }\n").unwrap();
    fs::write(root.join("a.css"), ".a {\n    color: red;\n}\n").unwrap();
    fs::write(root.join("a.css.map"), "{}").unwrap();

    let first = with_timeout(rx.recv()).await.expect("watcher stopped");
    let mut events = vec![first];
    events.extend(drain(&mut rx, Duration::from_millis(300)).await);

    let expected = WatchEvent::FileChanged {
        path: "a.scss".to_string(),
    };
    assert!(events.iter().all(|e| *e == expected), "{events:?}");
}

#[tokio::test]
async fn changes_in_subdirectories_use_relative_paths() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let root = dir.path().canonicalize().unwrap();
    fs::create_dir(root.join("badexample")).unwrap();

    let profile = WatchProfile::from_section(&WatchSection::default()).unwrap();
    let (tx, mut rx) = mpsc::channel(64);
    let _watcher = spawn_watcher(&root, profile, tx).unwrap();

    fs::write(root.join("badexample/b.scss"), ".b {\n").unwrap();

    let event = with_timeout(rx.recv()).await.expect("watcher stopped");
    assert_eq!(
        event,
        WatchEvent::FileChanged {
            path: "badexample/b.scss".to_string()
        }
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn default_task_compiles_then_recompiles_on_change() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let root = dir.path().canonicalize().unwrap();
    fs::write(root.join("a.scss"), ".a { color: red; }\n").unwrap();

    let notifier = Arc::new(RecordingNotifier::new());
    let registry = standard_registry(
        &ConfigFile::default(),
        &root,
        Arc::new(RealFileSystem),
        notifier.clone(),
    )
    .unwrap();
    let runner = TaskRunner::new(registry);
    let handle = tokio::spawn(async move { runner.run(DEFAULT).await });

    let css = root.join("a.css");
    let read_css = || fs::read_to_string(&css).unwrap_or_default();
    assert!(eventually(|| read_css().contains("color: red")).await);

    fs::write(root.join("a.scss"), ".a { color: blue; }\n").unwrap();
    let recompiled = || {
        let out = read_css();
        out.contains(".a {") && !out.contains("red")
    };
    assert!(eventually(recompiled).await, "{}", read_css());

    // Writing a.css and a.css.map must not trigger further runs.
    tokio::time::sleep(Duration::from_millis(600)).await;
    let settled = notifier.successes().len();
    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(notifier.successes().len(), settled);
    assert!(notifier.errors().is_empty());

    // `default` only ends on Ctrl-C.
    assert!(!handle.is_finished());
    handle.abort();
}
