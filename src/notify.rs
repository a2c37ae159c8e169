use std::sync::{Arc, Mutex, MutexGuard};

use crate::alerts::Notification;

/// Display surface for transient notifications (the toast layer).
pub trait NotificationSink: Send {
    fn notify(&mut self, notification: &Notification);
}

/// Writes notifications through the `log` facade.
#[derive(Clone, Debug, Default)]
pub struct LogSink;

impl NotificationSink for LogSink {
    fn notify(&mut self, notification: &Notification) {
        log::info!("{}", notification);
    }
}

/// Keeps every notification in memory. Clones share the same record.
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    notifications: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn guard(&self) -> MutexGuard<'_, Vec<Notification>> {
        // A poisoned record is still a valid list of notifications.
        self.notifications
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.guard().clone()
    }

    pub fn last(&self) -> Option<Notification> {
        self.guard().last().cloned()
    }

    pub fn len(&self) -> usize {
        self.guard().len()
    }

    pub fn is_empty(&self) -> bool {
        self.guard().is_empty()
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&mut self, notification: &Notification) {
        self.guard().push(notification.clone());
    }
}
