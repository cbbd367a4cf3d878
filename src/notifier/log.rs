// src/notifier/log.rs

use anyhow::Result;
use tracing::{error, info};

use super::{Notification, NotificationKind, Notifier};

/// Writes notifications to the log instead of the desktop.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: &Notification) -> Result<()> {
        match notification.kind {
            NotificationKind::Success => info!(
                title = %notification.title,
                "{}",
                notification.message
            ),
            NotificationKind::Error => error!(
                title = %notification.title,
                subtitle = notification.subtitle.as_deref().unwrap_or_default(),
                "{}",
                notification.message
            ),
        }
        Ok(())
    }
}
