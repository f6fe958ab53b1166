use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;

use super::domain::{Notification, NotificationId, NotificationKind, UserId};
use super::store::{NotificationStore, StoreError};

/// Outbound announcement hook sitting behind the lifecycle.
///
/// Kept narrow so tests can substitute or fail it without touching transition
/// logic. Implementations create exactly one notification row per call.
pub trait NotificationDispatcher: Send + Sync {
    fn notify(
        &self,
        recipient: &UserId,
        kind: NotificationKind,
    ) -> Result<Notification, NotifyError>;
}

/// Dispatch failure. Callers log these; they never undo a transition.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("notification write failed: {0}")]
    Store(#[from] StoreError),
}

static NOTIFICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_notification_id() -> NotificationId {
    let id = NOTIFICATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    NotificationId(format!("ntf-{id:06}"))
}

/// Dispatcher that records notifications in the board's own store.
pub struct StoreNotifier<S> {
    store: Arc<S>,
}

impl<S> StoreNotifier<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

impl<S> NotificationDispatcher for StoreNotifier<S>
where
    S: NotificationStore,
{
    fn notify(
        &self,
        recipient: &UserId,
        kind: NotificationKind,
    ) -> Result<Notification, NotifyError> {
        let notification = Notification {
            id: next_notification_id(),
            recipient_user_id: recipient.clone(),
            kind,
            message: kind.message(),
            is_read: false,
            created_at: Utc::now(),
        };

        Ok(self.store.insert_notification(notification)?)
    }
}
