use chrono::Utc;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::event::Event;
use crate::models::notification::NotificationKind;
use crate::models::registration::{Registration, RegistrationStatus};
use crate::utils::error::AppError;

/// A message headed for the dispatcher. Delivery here means writing the
/// history row and logging; an SMTP hop would slot in behind the same call.
#[derive(Debug, Clone)]
pub struct OutboundNotification {
    pub kind: NotificationKind,
    pub recipient_id: Uuid,
    pub event_id: Option<Uuid>,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Serialize)]
pub struct BulkReport {
    pub sent: u32,
    pub failed: u32,
}

/// Fire-and-forget delivery after the core transaction has committed.
/// Failures are logged and swallowed, never surfaced to the caller.
pub fn dispatch(pool: PgPool, note: OutboundNotification) {
    tokio::spawn(async move {
        if let Err(e) = deliver(&pool, &note).await {
            tracing::warn!(
                kind = ?note.kind,
                recipient = %note.recipient_id,
                error = %e,
                "Failed to deliver notification"
            );
        }
    });
}

async fn deliver(pool: &PgPool, note: &OutboundNotification) -> Result<(), AppError> {
    sqlx::query(
        "INSERT INTO notifications (id, kind, recipient_id, event_id, subject, body, sent_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7)",
    )
    .bind(Uuid::new_v4())
    .bind(note.kind)
    .bind(note.recipient_id)
    .bind(note.event_id)
    .bind(&note.subject)
    .bind(&note.body)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    tracing::info!(
        kind = ?note.kind,
        recipient = %note.recipient_id,
        subject = %note.subject,
        "Notification sent"
    );

    Ok(())
}

/// Notify every confirmed attendee about an event-level change
/// (publish/update/cancel), off the request path.
pub fn dispatch_event_broadcast(pool: PgPool, event: Event, kind: NotificationKind) {
    tokio::spawn(async move {
        let attendees = sqlx::query_as::<_, Registration>(
            "SELECT * FROM registrations WHERE event_id = $1 AND status = $2",
        )
        .bind(event.id)
        .bind(RegistrationStatus::Confirmed)
        .fetch_all(&pool)
        .await;

        let attendees = match attendees {
            Ok(rows) => rows,
            Err(e) => {
                tracing::warn!(event = %event.slug, error = %e, "Failed to load attendees for broadcast");
                return;
            }
        };

        for registration in attendees {
            let note = event_message(kind, &event, registration.user_id);
            if let Err(e) = deliver(&pool, &note).await {
                tracing::warn!(
                    recipient = %registration.user_id,
                    error = %e,
                    "Failed to deliver event notification"
                );
            }
        }
    });
}

/// Bulk message to every confirmed attendee of an event. Awaited by the
/// caller so the sent/failed counts can be reported back, but individual
/// failures are only counted and logged.
pub async fn send_bulk_message(
    pool: &PgPool,
    event: &Event,
    subject: &str,
    body: &str,
) -> Result<BulkReport, AppError> {
    let attendees = sqlx::query_as::<_, Registration>(
        "SELECT * FROM registrations WHERE event_id = $1 AND status = $2",
    )
    .bind(event.id)
    .bind(RegistrationStatus::Confirmed)
    .fetch_all(pool)
    .await?;

    let mut report = BulkReport { sent: 0, failed: 0 };

    for registration in &attendees {
        let note = OutboundNotification {
            kind: NotificationKind::BulkMessage,
            recipient_id: registration.user_id,
            event_id: Some(event.id),
            subject: format!("{} - {}", subject, event.title),
            body: body.to_string(),
        };

        match deliver(pool, &note).await {
            Ok(()) => report.sent += 1,
            Err(e) => {
                tracing::warn!(
                    recipient = %registration.user_id,
                    error = %e,
                    "Failed to send bulk notification"
                );
                report.failed += 1;
            }
        }
    }

    Ok(report)
}

pub fn registration_message(
    kind: NotificationKind,
    registration: &Registration,
    event: &Event,
) -> OutboundNotification {
    let (subject, body) = match kind {
        NotificationKind::RegistrationCancelled => (
            format!("Registration Cancelled - {}", event.title),
            format!(
                "Your registration for {} has been cancelled. {} seat(s) have been released.",
                event.title, registration.number_of_tickets
            ),
        ),
        NotificationKind::CheckinConfirmation => (
            format!("Checked In - {}", event.title),
            format!("Welcome to {}! Ticket {} has been checked in.", event.title, registration.ticket_number),
        ),
        _ => (
            format!("Registration Confirmed - {}", event.title),
            format!(
                "You are registered for {}. Your ticket number is {}.",
                event.title, registration.ticket_number
            ),
        ),
    };

    OutboundNotification {
        kind,
        recipient_id: registration.user_id,
        event_id: Some(event.id),
        subject,
        body,
    }
}

pub fn event_message(kind: NotificationKind, event: &Event, recipient_id: Uuid) -> OutboundNotification {
    let (subject, body) = match kind {
        NotificationKind::EventCancelled => (
            format!("Event Cancelled - {}", event.title),
            format!("{} scheduled for {} has been cancelled.", event.title, event.start_time),
        ),
        NotificationKind::EventUpdated => (
            format!("Event Updated - {}", event.title),
            "Event details have been updated.".to_string(),
        ),
        _ => (
            format!("Event Published - {}", event.title),
            format!("{} is now open for registration.", event.title),
        ),
    };

    OutboundNotification {
        kind,
        recipient_id,
        event_id: Some(event.id),
        subject,
        body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rust_decimal::Decimal;

    fn event() -> Event {
        let now = Utc::now();
        Event {
            id: Uuid::new_v4(),
            organizer_id: Uuid::new_v4(),
            title: "DevFest".to_string(),
            slug: "devfest".to_string(),
            description: None,
            venue: "Expo Centre".to_string(),
            city: "Nairobi".to_string(),
            start_time: now + Duration::days(3),
            end_time: now + Duration::days(3) + Duration::hours(8),
            status: crate::models::event::EventStatus::Published,
            total_seats: 50,
            available_seats: 50,
            ticket_price: Decimal::ZERO,
            created_at: now,
            updated_at: now,
        }
    }

    fn registration() -> Registration {
        let now = Utc::now();
        Registration {
            id: Uuid::new_v4(),
            event_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            status: RegistrationStatus::Confirmed,
            number_of_tickets: 1,
            ticket_number: "TKT-ABCDEF012345".to_string(),
            notes: None,
            created_at: now,
            updated_at: now,
            confirmed_at: Some(now),
        }
    }

    #[test]
    fn test_confirmation_message_carries_ticket_number() {
        let note = registration_message(
            NotificationKind::RegistrationConfirmed,
            &registration(),
            &event(),
        );
        assert!(note.subject.contains("DevFest"));
        assert!(note.body.contains("TKT-ABCDEF012345"));
    }

    #[test]
    fn test_cancellation_message_reports_released_seats() {
        let note = registration_message(
            NotificationKind::RegistrationCancelled,
            &registration(),
            &event(),
        );
        assert!(note.body.contains("1 seat(s)"));
        assert_eq!(note.kind, NotificationKind::RegistrationCancelled);
    }
}
