pub mod log;
pub mod webhook;

use async_trait::async_trait;
use serde::Serialize;

/// Something a person submitted through the public site that staff should see.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notification {
    BookingRequest {
        id: i64,
        name: String,
        email: String,
        phone: Option<String>,
        date: String,
        booking_type: Option<String>,
        message: Option<String>,
    },
    DirectBooking {
        id: i64,
        title: String,
        start: String,
        end: Option<String>,
        email: String,
    },
    ContactMessage {
        id: i64,
        name: String,
        email: String,
        message: String,
    },
    MembershipSignup {
        id: i64,
        name: String,
        email: String,
        phone: Option<String>,
    },
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notification: &Notification) -> anyhow::Result<()>;
}

/// Hands `notification` to the notifier. Delivery failures are logged, never
/// returned: the submission itself is already stored.
pub async fn dispatch(notifier: &dyn Notifier, notification: Notification) {
    if let Err(e) = notifier.notify(&notification).await {
        tracing::error!(error = %e, ?notification, "failed to deliver notification");
    }
}
