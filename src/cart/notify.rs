//! Transient User Notifications
//!
//! The store reports the outcome of every user-visible cart action through a
//! `Notifier`. Binaries log the notices; tests record them for assertions.

use std::sync::Mutex;

/// Sink for transient outcome messages emitted by the cart store.
pub trait Notifier: Send + Sync {
    /// An action completed; `message` is suitable for a success toast.
    fn success(&self, message: &str);

    /// An action failed; `message` is suitable for a failure toast.
    fn failure(&self, message: &str);
}

/// Notifier that forwards notices to the `tracing` log.
#[derive(Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn success(&self, message: &str) {
        tracing::info!(notice = %message, "cart action succeeded");
    }

    fn failure(&self, message: &str) {
        tracing::warn!(notice = %message, "cart action failed");
    }
}

/// A recorded notice, kept in emission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Failure(String),
}

/// Notifier that records every notice, for test assertions.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything emitted so far.
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().expect("notifier lock poisoned").clone()
    }

    /// Count of failure notices emitted so far.
    pub fn failure_count(&self) -> usize {
        self.notices()
            .iter()
            .filter(|n| matches!(n, Notice::Failure(_)))
            .count()
    }
}

impl Notifier for RecordingNotifier {
    fn success(&self, message: &str) {
        self.notices
            .lock()
            .expect("notifier lock poisoned")
            .push(Notice::Success(message.to_owned()));
    }

    fn failure(&self, message: &str) {
        self.notices
            .lock()
            .expect("notifier lock poisoned")
            .push(Notice::Failure(message.to_owned()));
    }
}
