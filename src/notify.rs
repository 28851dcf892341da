//! User-facing notifications
//!
//! Flows and the session layer announce outcomes here without knowing how
//! they are rendered. The sink feeds the app event channel; the TUI turns
//! notices into toasts.

use tokio::sync::mpsc;

use crate::events::AppEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub severity: Severity,
}

impl Notification {
    pub fn new(severity: Severity, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            severity,
        }
    }
}

/// Cheap clonable handle for emitting notifications. Emission is
/// fire-and-forget: a full or closed channel drops the notice rather than
/// failing the operation that raised it.
#[derive(Clone)]
pub struct Notifier {
    tx: mpsc::Sender<AppEvent>,
}

impl Notifier {
    pub fn new(tx: mpsc::Sender<AppEvent>) -> Self {
        Self { tx }
    }

    pub fn info(&self, title: impl Into<String>, message: impl Into<String>) {
        self.emit(Notification::new(Severity::Info, title, message));
    }

    pub fn success(&self, title: impl Into<String>, message: impl Into<String>) {
        self.emit(Notification::new(Severity::Success, title, message));
    }

    pub fn error(&self, title: impl Into<String>, message: impl Into<String>) {
        self.emit(Notification::new(Severity::Error, title, message));
    }

    fn emit(&self, notification: Notification) {
        if let Err(e) = self.tx.try_send(AppEvent::Notice(notification)) {
            tracing::debug!(error = %e, "notification dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn emits_onto_the_app_channel() {
        let (tx, mut rx) = mpsc::channel(8);
        let notifier = Notifier::new(tx);
        notifier.success("Saved", "All good");

        match rx.recv().await {
            Some(AppEvent::Notice(n)) => {
                assert_eq!(n.title, "Saved");
                assert_eq!(n.severity, Severity::Success);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn closed_channel_drops_the_notice() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let notifier = Notifier::new(tx);
        notifier.error("Oops", "nobody listening");
    }
}
