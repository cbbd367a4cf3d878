use std::sync::{Arc, Mutex};
use std::time::Duration;

use styledag::engine::{TaskEvent, TaskObserver, TaskRunner};
use styledag::errors::StyledagError;
use styledag::notifier::{Notification, NotificationKind, Notifier};
use styledag::tasks::{TaskAction, TaskFuture};

/// Shared, ordered log of strings.
pub type Log = Arc<Mutex<Vec<String>>>;

pub fn new_log() -> Log {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn snapshot(log: &Log) -> Vec<String> {
    log.lock().unwrap().clone()
}

/// Notifier that keeps every notification it receives.
#[derive(Debug, Default, Clone)]
pub struct RecordingNotifier {
    seen: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<Notification> {
        self.seen.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<Notification> {
        self.of_kind(NotificationKind::Error)
    }

    pub fn successes(&self) -> Vec<Notification> {
        self.of_kind(NotificationKind::Success)
    }

    fn of_kind(&self, kind: NotificationKind) -> Vec<Notification> {
        self.all().into_iter().filter(|n| n.kind == kind).collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: &Notification) -> anyhow::Result<()> {
        self.seen.lock().unwrap().push(notification.clone());
        Ok(())
    }
}

/// Notifier that always fails, like a desktop without a notification daemon.
#[derive(Debug, Default, Clone)]
pub struct FailingNotifier;

impl Notifier for FailingNotifier {
    fn notify(&self, _notification: &Notification) -> anyhow::Result<()> {
        anyhow::bail!("no notification daemon")
    }
}

/// Observer that appends `started:<task>` / `finished:<task>` /
/// `failed:<task>` to a log.
#[derive(Debug, Clone)]
pub struct RecordingObserver {
    log: Log,
}

impl RecordingObserver {
    pub fn new(log: Log) -> Self {
        Self { log }
    }
}

impl TaskObserver for RecordingObserver {
    fn on_event(&self, event: &TaskEvent) {
        let entry = match event {
            TaskEvent::Started { task } => format!("started:{task}"),
            TaskEvent::Finished { task } => format!("finished:{task}"),
            TaskEvent::Failed { task, .. } => format!("failed:{task}"),
        };
        self.log.lock().unwrap().push(entry);
    }
}

/// Action that logs `begin:<name>` and `end:<name>` around an optional delay,
/// and can be told to fail.
#[derive(Debug, Clone)]
pub struct RecordingAction {
    name: String,
    log: Log,
    delay: Duration,
    fail: bool,
}

impl RecordingAction {
    pub fn new(name: &str, log: Log) -> Self {
        Self {
            name: name.to_string(),
            log,
            delay: Duration::ZERO,
            fail: false,
        }
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }
}

impl TaskAction for RecordingAction {
    fn run<'a>(&'a self, _runner: &'a TaskRunner) -> TaskFuture<'a> {
        Box::pin(async move {
            self.log.lock().unwrap().push(format!("begin:{}", self.name));
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.log.lock().unwrap().push(format!("end:{}", self.name));
            if self.fail {
                return Err(StyledagError::Other(anyhow::anyhow!(
                    "{} failed on purpose",
                    self.name
                )));
            }
            Ok(())
        })
    }
}
