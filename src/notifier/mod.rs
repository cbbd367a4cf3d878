// src/notifier/mod.rs

//! User-visible notifications for compile results.
//!
//! The compile step reports through a [`Notifier`] rather than printing, so
//! the desktop integration can be swapped for log output (`--no-notify`) or
//! a recording implementation in tests.

use std::fmt;

use anyhow::Result;

pub mod desktop;
pub mod log;

pub use desktop::DesktopNotifier;
pub use log::LogNotifier;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

/// A single notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub subtitle: Option<String>,
    pub message: String,
}

impl Notification {
    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            title: title.into(),
            subtitle: None,
            message: message.into(),
        }
    }

    pub fn error(
        title: impl Into<String>,
        subtitle: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind: NotificationKind::Error,
            title: title.into(),
            subtitle: Some(subtitle.into()),
            message: message.into(),
        }
    }

    /// Subtitle and message joined for backends without a subtitle field.
    pub fn body(&self) -> String {
        match &self.subtitle {
            Some(sub) => format!("{sub}\n{}", self.message),
            None => self.message.clone(),
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.subtitle {
            Some(sub) => write!(f, "{}: {sub}: {}", self.title, self.message),
            None => write!(f, "{}: {}", self.title, self.message),
        }
    }
}

/// Side channel for notifications.
///
/// Implementations may fail (no notification daemon, headless session);
/// callers log the failure and carry on.
pub trait Notifier: Send + Sync + fmt::Debug {
    fn notify(&self, notification: &Notification) -> Result<()>;
}
