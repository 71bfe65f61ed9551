use async_trait::async_trait;

use super::{Notification, Notifier};

/// Writes notifications to the application log.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, notification: &Notification) -> anyhow::Result<()> {
        match notification {
            Notification::BookingRequest {
                id,
                name,
                email,
                phone,
                date,
                booking_type,
                message,
            } => tracing::info!(
                booking_id = id,
                %name,
                %email,
                phone = phone.as_deref().unwrap_or(""),
                %date,
                booking_type = booking_type.as_deref().unwrap_or(""),
                message = message.as_deref().unwrap_or(""),
                "new booking request (pending)"
            ),
            Notification::DirectBooking {
                id,
                title,
                start,
                end,
                email,
            } => tracing::info!(
                booking_id = id,
                %title,
                %start,
                end = end.as_deref().unwrap_or(""),
                %email,
                "new direct booking"
            ),
            Notification::ContactMessage {
                id,
                name,
                email,
                message,
            } => tracing::info!(message_id = id, %name, %email, %message, "new contact message"),
            Notification::MembershipSignup {
                id,
                name,
                email,
                phone,
            } => tracing::info!(
                member_id = id,
                %name,
                %email,
                phone = phone.as_deref().unwrap_or(""),
                "new membership sign-up"
            ),
        }
        Ok(())
    }
}
