use crate::ports::{Notification, NotificationKind, Notifier};
use std::sync::Mutex;
use tracing::info;

/// Collects the notifications raised while one request is handled.
#[derive(Debug, Default)]
pub struct FlashNotifier {
    pending: Mutex<Vec<Notification>>,
}

impl FlashNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&self) -> Vec<Notification> {
        match self.pending.lock() {
            Ok(mut pending) => std::mem::take(&mut *pending),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl Notifier for FlashNotifier {
    fn notify(&self, kind: NotificationKind, message: &str) {
        info!(?kind, "{message}");
        let notification = Notification {
            kind,
            message: message.to_string(),
        };
        match self.pending.lock() {
            Ok(mut pending) => pending.push(notification),
            Err(poisoned) => poisoned.into_inner().push(notification),
        }
    }
}
