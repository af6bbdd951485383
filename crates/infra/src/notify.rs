//! Notification sinks.

use std::sync::Mutex;

use transerp_forms::{Notification, Notifier, Severity};

/// Writes every notification to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, n: Notification) {
        match n.severity {
            Severity::Success | Severity::Info => tracing::info!(severity = ?n.severity, "{}", n.message),
            Severity::Warning => tracing::warn!("{}", n.message),
            Severity::Error => tracing::error!("{}", n.message),
        }
    }
}

/// Keeps notifications in memory, in order; for tests and the demo binary.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.seen.lock().map(|seen| seen.clone()).unwrap_or_default()
    }

    pub fn last(&self) -> Option<Notification> {
        self.seen.lock().ok().and_then(|seen| seen.last().cloned())
    }

    pub fn clear(&self) {
        if let Ok(mut seen) = self.seen.lock() {
            seen.clear();
        }
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(notification);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_in_order() {
        let sink = RecordingNotifier::new();
        sink.notify(Notification::success("saved"));
        sink.notify(Notification::error("boom"));

        let seen = sink.notifications();
        assert_eq!(seen.len(), 2);
        assert_eq!(sink.last(), Some(Notification::error("boom")));

        sink.clear();
        assert!(sink.notifications().is_empty());
    }
}
