// tests/watch_runtime.rs

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use styledag::dag::{Dependencies, TaskRegistry};
use styledag::engine::{TaskRunner, WatchCore, WatchEvent, WatchRuntime};
use styledag::types::TriggerWhileRunningBehaviour;
use styledag_test_utils::recording::{new_log, snapshot, Log, RecordingAction};
use styledag_test_utils::{init_tracing, with_timeout};

fn slow_css(log: Log) -> TaskRunner {
    let registry = TaskRegistry::builder()
        .task(
            "css",
            Dependencies::None,
            Arc::new(RecordingAction::new("css", log).delay(Duration::from_millis(100))),
        )
        .build()
        .unwrap();
    TaskRunner::new(registry)
}

/// Send three changes in quick succession, give runs time to settle, then
/// shut down. Returns how many times `css` began.
async fn runs_for_burst(behaviour: TriggerWhileRunningBehaviour) -> usize {
    init_tracing();
    let log = new_log();
    let (tx, rx) = mpsc::channel(16);

    let runtime = WatchRuntime::new(
        WatchCore::new(behaviour, 1),
        slow_css(log.clone()),
        "css",
        tx.clone(),
        rx,
    );
    let handle = tokio::spawn(runtime.run());

    for path in ["a.scss", "badexample/b.scss", "a.scss"] {
        tx.send(WatchEvent::FileChanged {
            path: path.to_string(),
        })
        .await
        .unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    tokio::time::sleep(Duration::from_millis(400)).await;
    tx.send(WatchEvent::ShutdownRequested).await.unwrap();
    with_timeout(handle).await.unwrap().unwrap();

    snapshot(&log).iter().filter(|e| *e == "begin:css").count()
}

#[tokio::test]
async fn queued_changes_collapse_into_one_extra_run() {
    assert_eq!(runs_for_burst(TriggerWhileRunningBehaviour::Queue).await, 2);
}

#[tokio::test]
async fn overlap_runs_once_per_change() {
    assert_eq!(runs_for_burst(TriggerWhileRunningBehaviour::Overlap).await, 3);
}

#[tokio::test]
async fn failing_run_keeps_the_watcher_alive() {
    init_tracing();
    let log = new_log();
    let registry = TaskRegistry::builder()
        .task(
            "css",
            Dependencies::None,
            Arc::new(RecordingAction::new("css", log.clone()).failing()),
        )
        .build()
        .unwrap();
    let (tx, rx) = mpsc::channel(16);
    let runtime = WatchRuntime::new(
        WatchCore::new(TriggerWhileRunningBehaviour::Queue, 1),
        TaskRunner::new(registry),
        "css",
        tx.clone(),
        rx,
    );
    let handle = tokio::spawn(runtime.run());

    for _ in 0..2 {
        tx.send(WatchEvent::FileChanged {
            path: "a.scss".to_string(),
        })
        .await
        .unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    tx.send(WatchEvent::ShutdownRequested).await.unwrap();
    with_timeout(handle).await.unwrap().unwrap();

    assert_eq!(
        snapshot(&log).iter().filter(|e| *e == "begin:css").count(),
        2
    );
}

#[tokio::test]
async fn shutdown_ends_an_idle_loop() {
    init_tracing();
    let (tx, rx) = mpsc::channel(4);
    let runtime = WatchRuntime::new(
        WatchCore::new(TriggerWhileRunningBehaviour::Queue, 1),
        slow_css(new_log()),
        "css",
        tx.clone(),
        rx,
    );

    tx.send(WatchEvent::ShutdownRequested).await.unwrap();
    with_timeout(runtime.run()).await.unwrap();
}
