//! User-visible notices: the toast surface.
//!
//! Callers post fire-and-forget notices; the event loop prunes expired
//! ones each tick and the screens render whatever is current. Nothing
//! here is persisted and no caller reads a result back.

use std::collections::VecDeque;
use std::time::Duration;

use jiff::Timestamp;

/// How long a notice stays on screen.
const NOTICE_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Error,
}

/// A single toast: title, supporting line, and severity.
#[derive(Debug, Clone)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub severity: Severity,
    posted_at: Timestamp,
}

/// The queue of live notices.
#[derive(Default)]
pub struct Notices {
    queue: VecDeque<Notice>,
}

impl Notices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn post(&mut self, title: impl Into<String>, description: impl Into<String>, severity: Severity) {
        self.queue.push_back(Notice {
            title: title.into(),
            description: description.into(),
            severity,
            posted_at: Timestamp::now(),
        });
    }

    /// Drops notices older than the display window.
    pub fn prune(&mut self) {
        let now = Timestamp::now();
        self.queue
            .retain(|n| now.duration_since(n.posted_at).unsigned_abs() <= NOTICE_TTL);
    }

    /// The most recent live notice, if any. Only one toast is shown at
    /// a time; newer posts win.
    pub fn current(&self) -> Option<&Notice> {
        self.queue.back()
    }
}
