use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::utils::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "event_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Draft,
    Published,
    Cancelled,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: Uuid,
    pub organizer_id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub venue: String,
    pub city: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: EventStatus,
    pub total_seats: i32,
    pub available_seats: i32,
    pub ticket_price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Seat ledger: take `n` seats out of availability.
    ///
    /// Fails without touching the counter when fewer than `n` seats remain.
    /// Callers must hold the event row locked (`SELECT ... FOR UPDATE`) and
    /// persist the new counter in the same transaction as the registration
    /// it accompanies.
    pub fn reserve_seats(&mut self, n: i32) -> Result<(), AppError> {
        if n < 1 {
            return Err(AppError::ValidationError(
                "Number of tickets must be at least 1".to_string(),
            ));
        }
        if n > self.available_seats {
            return Err(AppError::CapacityExceeded(self.available_seats));
        }
        self.available_seats -= n;
        Ok(())
    }

    /// Seat ledger: return `n` seats to availability, capped at total_seats.
    pub fn release_seats(&mut self, n: i32) {
        self.available_seats = (self.available_seats + n).min(self.total_seats);
    }

    pub fn is_full(&self) -> bool {
        self.available_seats <= 0
    }

    pub fn booked_seats(&self) -> i32 {
        self.total_seats - self.available_seats
    }

    pub fn has_started(&self, now: DateTime<Utc>) -> bool {
        self.start_time <= now
    }

    /// Registration gate: published and not yet started.
    pub fn ensure_open_for_registration(&self, now: DateTime<Utc>) -> Result<(), AppError> {
        if self.status != EventStatus::Published {
            return Err(AppError::EventClosed(
                "Event is not open for registration".to_string(),
            ));
        }
        if self.has_started(now) {
            return Err(AppError::EventClosed(
                "Registration is closed. This event has already started".to_string(),
            ));
        }
        Ok(())
    }

    /// Change the event's capacity, keeping already-booked seats intact.
    /// Shrinking below the booked count is rejected.
    pub fn resize_seating(&mut self, new_total: i32) -> Result<(), AppError> {
        if new_total < 1 {
            return Err(AppError::ValidationError(
                "An event needs at least one seat".to_string(),
            ));
        }
        let booked = self.booked_seats();
        if new_total < booked {
            return Err(AppError::ValidationError(format!(
                "Cannot reduce total seats below the {} already booked",
                booked
            )));
        }
        self.total_seats = new_total;
        self.available_seats = new_total - booked;
        Ok(())
    }

    /// Detail edits are only allowed while the event is still live.
    pub fn ensure_editable(&self) -> Result<(), AppError> {
        match self.status {
            EventStatus::Draft | EventStatus::Published => Ok(()),
            _ => Err(AppError::InvalidTransition(format!(
                "Cannot edit an event in status '{}'",
                self.status.as_str()
            ))),
        }
    }

    pub fn ensure_organized_by(&self, user_id: Uuid) -> Result<(), AppError> {
        if self.organizer_id != user_id {
            return Err(AppError::Forbidden(
                "Only the event organizer may perform this action".to_string(),
            ));
        }
        Ok(())
    }

    pub fn publish(&mut self) -> Result<(), AppError> {
        match self.status {
            EventStatus::Draft => {
                self.status = EventStatus::Published;
                Ok(())
            }
            _ => Err(AppError::InvalidTransition(format!(
                "Cannot publish an event in status '{}'",
                self.status.as_str()
            ))),
        }
    }

    pub fn cancel(&mut self) -> Result<(), AppError> {
        match self.status {
            EventStatus::Draft | EventStatus::Published => {
                self.status = EventStatus::Cancelled;
                Ok(())
            }
            _ => Err(AppError::InvalidTransition(format!(
                "Cannot cancel an event in status '{}'",
                self.status.as_str()
            ))),
        }
    }
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Draft => "draft",
            EventStatus::Published => "published",
            EventStatus::Cancelled => "cancelled",
            EventStatus::Completed => "completed",
        }
    }
}

/// URL-safe slug from an event title. Uniqueness is handled by the caller
/// appending a counter when the base slug is taken.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut last_dash = true;
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    if slug.is_empty() {
        slug.push_str("event");
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn event(total: i32, available: i32) -> Event {
        let now = Utc::now();
        Event {
            id: Uuid::new_v4(),
            organizer_id: Uuid::new_v4(),
            title: "Rust Meetup".to_string(),
            slug: "rust-meetup".to_string(),
            description: None,
            venue: "Town Hall".to_string(),
            city: "Lagos".to_string(),
            start_time: now + Duration::days(7),
            end_time: now + Duration::days(7) + Duration::hours(3),
            status: EventStatus::Published,
            total_seats: total,
            available_seats: available,
            ticket_price: Decimal::ZERO,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_reserve_and_release_keep_ledger_in_bounds() {
        let mut e = event(10, 10);

        e.reserve_seats(3).unwrap();
        assert_eq!(e.available_seats, 7);

        // More than remaining fails and leaves the counter untouched
        let err = e.reserve_seats(8).unwrap_err();
        assert!(matches!(err, AppError::CapacityExceeded(7)));
        assert_eq!(e.available_seats, 7);

        e.release_seats(3);
        assert_eq!(e.available_seats, 10);

        // Release never overflows total_seats
        e.release_seats(5);
        assert_eq!(e.available_seats, 10);
    }

    #[test]
    fn test_reserve_when_sold_out_fails() {
        let mut e = event(5, 0);
        assert!(e.is_full());
        let err = e.reserve_seats(1).unwrap_err();
        assert!(matches!(err, AppError::CapacityExceeded(0)));
        assert_eq!(e.available_seats, 0);
    }

    #[test]
    fn test_reserve_rejects_non_positive_counts() {
        let mut e = event(10, 10);
        assert!(matches!(
            e.reserve_seats(0),
            Err(AppError::ValidationError(_))
        ));
        assert_eq!(e.available_seats, 10);
    }

    #[test]
    fn test_booked_seats() {
        let mut e = event(10, 10);
        e.reserve_seats(4).unwrap();
        assert_eq!(e.booked_seats(), 4);
    }

    #[test]
    fn test_registration_gate_requires_published_and_upcoming() {
        let now = Utc::now();

        let mut e = event(10, 10);
        assert!(e.ensure_open_for_registration(now).is_ok());

        e.status = EventStatus::Draft;
        assert!(matches!(
            e.ensure_open_for_registration(now),
            Err(AppError::EventClosed(_))
        ));

        let mut started = event(10, 10);
        started.start_time = now - Duration::hours(1);
        assert!(matches!(
            started.ensure_open_for_registration(now),
            Err(AppError::EventClosed(_))
        ));
    }

    #[test]
    fn test_publish_transitions() {
        let mut e = event(10, 10);
        e.status = EventStatus::Draft;
        e.publish().unwrap();
        assert_eq!(e.status, EventStatus::Published);

        assert!(matches!(e.publish(), Err(AppError::InvalidTransition(_))));
    }

    #[test]
    fn test_cancel_transitions() {
        let mut e = event(10, 10);
        e.cancel().unwrap();
        assert_eq!(e.status, EventStatus::Cancelled);

        assert!(matches!(e.cancel(), Err(AppError::InvalidTransition(_))));
    }

    #[test]
    fn test_resize_seating_preserves_booked_seats() {
        let mut e = event(10, 10);
        e.reserve_seats(4).unwrap();

        e.resize_seating(20).unwrap();
        assert_eq!(e.total_seats, 20);
        assert_eq!(e.available_seats, 16);
        assert_eq!(e.booked_seats(), 4);

        // Shrink down to exactly the booked count leaves nothing available
        e.resize_seating(4).unwrap();
        assert_eq!(e.available_seats, 0);
        assert!(e.is_full());
    }

    #[test]
    fn test_resize_seating_rejects_shrinking_below_booked() {
        let mut e = event(10, 10);
        e.reserve_seats(6).unwrap();

        let err = e.resize_seating(5).unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
        assert_eq!(e.total_seats, 10);
        assert_eq!(e.available_seats, 4);

        assert!(matches!(
            e.resize_seating(0),
            Err(AppError::ValidationError(_))
        ));
    }

    #[test]
    fn test_editable_only_while_live() {
        let mut e = event(10, 10);
        assert!(e.ensure_editable().is_ok());

        e.status = EventStatus::Draft;
        assert!(e.ensure_editable().is_ok());

        e.status = EventStatus::Cancelled;
        assert!(matches!(
            e.ensure_editable(),
            Err(AppError::InvalidTransition(_))
        ));

        e.status = EventStatus::Completed;
        assert!(matches!(
            e.ensure_editable(),
            Err(AppError::InvalidTransition(_))
        ));
    }

    #[test]
    fn test_organizer_check() {
        let e = event(10, 10);
        assert!(e.ensure_organized_by(e.organizer_id).is_ok());
        assert!(matches!(
            e.ensure_organized_by(Uuid::new_v4()),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Rust Meetup 2025"), "rust-meetup-2025");
        assert_eq!(slugify("  Hello,   World!  "), "hello-world");
        assert_eq!(slugify("!!!"), "event");
    }
}
