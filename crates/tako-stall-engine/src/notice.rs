/*
[INPUT]:  Outcome messages raised by board operations
[OUTPUT]: Single transient notice with severity and expiry
[POS]:    Feedback layer - consume-once operator notifications
[UPDATE]: When notice lifetime or severity rules change
*/

use std::time::{Duration, Instant};

use serde::Serialize;

use crate::types::Severity;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub message: String,
    pub severity: Severity,
    #[serde(skip)]
    pub raised_at: Instant,
}

/// Holds at most one notice; a new notice replaces the current one.
#[derive(Debug)]
pub struct NoticeBoard {
    current: Option<Notice>,
    display_for: Duration,
}

impl NoticeBoard {
    pub fn new(display_for: Duration) -> Self {
        Self {
            current: None,
            display_for,
        }
    }

    pub fn raise_at(&mut self, severity: Severity, message: impl Into<String>, now: Instant) {
        let message = message.into();
        tracing::debug!(severity = ?severity, message = %message, "notice raised");
        self.current = Some(Notice {
            message,
            severity,
            raised_at: now,
        });
    }

    /// The live notice, if it has not expired yet.
    pub fn current(&self, now: Instant) -> Option<&Notice> {
        self.current
            .as_ref()
            .filter(|notice| now.saturating_duration_since(notice.raised_at) < self.display_for)
    }

    /// Consume the notice; later calls return `None` until a new one is raised.
    pub fn take(&mut self) -> Option<Notice> {
        self.current.take()
    }

    pub fn dismiss(&mut self) {
        self.current = None;
    }

    /// Drop the notice once its display time has passed. Returns true when one was dropped.
    pub fn expire(&mut self, now: Instant) -> bool {
        let expired = self
            .current
            .as_ref()
            .is_some_and(|notice| now.saturating_duration_since(notice.raised_at) >= self.display_for);
        if expired {
            self.current = None;
        }
        expired
    }
}
