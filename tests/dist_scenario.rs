// tests/dist_scenario.rs

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tempfile::TempDir;

use styledag::config::ConfigFile;
use styledag::engine::{TaskEvent, TaskObserver, TaskRunner};
use styledag::fs::mock::{FsOp, MockFileSystem};
use styledag::fs::RealFileSystem;
use styledag::tasks::{standard_registry, CSS, DIST};
use styledag_test_utils::recording::{new_log, snapshot, RecordingNotifier, RecordingObserver};
use styledag_test_utils::{init_tracing, with_timeout};

fn files_with_suffix(root: &Path, suffix: &str) -> Vec<PathBuf> {
    let mut found = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        for entry in fs::read_dir(&dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                stack.push(path);
            } else if path.to_string_lossy().ends_with(suffix) {
                found.push(path);
            }
        }
    }
    found
}

#[tokio::test]
async fn dist_compiles_then_removes_every_map() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    fs::write(root.join("_variables.scss"), "$primary: #336699;\n").unwrap();
    fs::write(
        root.join("a.scss"),
        "@use \"variables\" as *;\n.nav { color: $primary; }\n",
    )
    .unwrap();
    fs::create_dir_all(root.join("badexample")).unwrap();
    fs::write(root.join("badexample/b.scss"), ".broken {\n  color: red;\n").unwrap();
    // A stale map from an earlier run goes too.
    fs::write(root.join("badexample/old.css.map"), "{}").unwrap();

    let notifier = Arc::new(RecordingNotifier::new());
    let log = new_log();
    let registry = standard_registry(
        &ConfigFile::default(),
        root,
        Arc::new(RealFileSystem),
        notifier.clone(),
    )
    .unwrap();
    let observer = Arc::new(RecordingObserver::new(log.clone()));
    let runner = TaskRunner::new(registry).with_observer(observer);

    with_timeout(runner.run(DIST)).await.unwrap();

    assert!(root.join("a.css").exists());
    assert!(!root.join("badexample/b.css").exists());
    assert!(files_with_suffix(root, ".map").is_empty());

    assert_eq!(notifier.errors().len(), 1);
    assert_eq!(notifier.successes().len(), 1);

    assert_eq!(
        snapshot(&log),
        vec![
            "started:css",
            "finished:css",
            "started:css:clean",
            "finished:css:clean",
            "started:css:dist",
            "finished:css:dist",
            "started:dist",
            "finished:dist",
        ]
    );
}

/// Records how many filesystem operations had happened when `css` finished.
struct CssFinishedMark {
    fs: MockFileSystem,
    mark: Mutex<Option<usize>>,
}

impl TaskObserver for CssFinishedMark {
    fn on_event(&self, event: &TaskEvent) {
        if matches!(event, TaskEvent::Finished { task } if task == CSS) {
            *self.mark.lock().unwrap() = Some(self.fs.ops().len());
        }
    }
}

#[tokio::test]
async fn no_map_is_removed_before_compilation_finished() {
    init_tracing();
    let fs = MockFileSystem::new();
    fs.add_file("a.scss", ".a { color: red; }\n");
    fs.add_file("z.scss", ".z { margin: 0; }\n");

    let observer = Arc::new(CssFinishedMark {
        fs: fs.clone(),
        mark: Mutex::new(None),
    });
    let registry = standard_registry(
        &ConfigFile::default(),
        Path::new("."),
        Arc::new(fs.clone()),
        Arc::new(RecordingNotifier::new()),
    )
    .unwrap();
    let runner = TaskRunner::new(registry).with_observer(observer.clone());

    with_timeout(runner.run(DIST)).await.unwrap();

    let mark = observer.mark.lock().unwrap().expect("css never finished");
    let ops = fs.ops();
    let removals: Vec<usize> = ops
        .iter()
        .enumerate()
        .filter(|(_, op)| matches!(op, FsOp::Remove(_)))
        .map(|(i, _)| i)
        .collect();

    assert_eq!(removals.len(), 2, "{ops:?}");
    assert!(removals.iter().all(|&i| i >= mark), "{ops:?}");

    assert!(fs.contents("a.css").is_some());
    assert!(fs.contents("z.css").is_some());
    assert!(fs.contents("a.css.map").is_none());
    assert!(fs.contents("z.css.map").is_none());
}
