// src/notifier/desktop.rs

use anyhow::{Context, Result};
use tracing::debug;

use super::{Notification, NotificationKind, Notifier};

/// Native desktop notifications through `notify-rust`.
#[derive(Debug, Clone, Default)]
pub struct DesktopNotifier;

impl DesktopNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl Notifier for DesktopNotifier {
    fn notify(&self, notification: &Notification) -> Result<()> {
        let mut native = notify_rust::Notification::new();
        native
            .appname("styledag")
            .summary(&notification.title)
            .body(&notification.body());

        if notification.kind == NotificationKind::Error {
            native.icon("dialog-error");
        }

        native
            .show()
            .with_context(|| format!("showing desktop notification '{}'", notification.title))?;

        debug!(%notification, "desktop notification shown");
        Ok(())
    }
}
