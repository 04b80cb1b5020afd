use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::event::Event;
use crate::utils::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "registration_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStatus {
    Pending,
    Confirmed,
    Cancelled,
    Attended,
}

/// An attendee's reservation against an event's seat inventory.
///
/// The ticket number is minted once at creation and never changes; a
/// cancelled registration that is revived keeps its original number.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Registration {
    pub id: Uuid,
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub status: RegistrationStatus,
    pub number_of_tickets: i32,
    pub ticket_number: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub confirmed_at: Option<DateTime<Utc>>,
}

impl Registration {
    pub fn is_active(&self) -> bool {
        self.status != RegistrationStatus::Cancelled
    }

    /// Cancellation gate: not already cancelled, not attended, and the
    /// event must not have started.
    pub fn ensure_cancellable(&self, event: &Event, now: DateTime<Utc>) -> Result<(), AppError> {
        match self.status {
            RegistrationStatus::Cancelled => Err(AppError::InvalidTransition(
                "This registration is already cancelled".to_string(),
            )),
            RegistrationStatus::Attended => Err(AppError::InvalidTransition(
                "Cannot cancel a registration that has already attended".to_string(),
            )),
            RegistrationStatus::Pending | RegistrationStatus::Confirmed => {
                if event.has_started(now) {
                    Err(AppError::InvalidTransition(
                        "Cannot cancel registration. The event has already started".to_string(),
                    ))
                } else {
                    Ok(())
                }
            }
        }
    }

    /// Check-in gate: only a confirmed (or still pending) registration can
    /// be marked attended. `AlreadyCheckedIn` for duplicates is enforced by
    /// the check-in row's uniqueness, not here.
    pub fn ensure_attendable(&self) -> Result<(), AppError> {
        match self.status {
            RegistrationStatus::Cancelled => Err(AppError::InvalidTransition(
                "Cannot check in a cancelled registration".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::event::EventStatus;
    use chrono::Duration;
    use rust_decimal::Decimal;

    fn upcoming_event() -> Event {
        let now = Utc::now();
        Event {
            id: Uuid::new_v4(),
            organizer_id: Uuid::new_v4(),
            title: "Conf".to_string(),
            slug: "conf".to_string(),
            description: None,
            venue: "Hall A".to_string(),
            city: "Abuja".to_string(),
            start_time: now + Duration::days(1),
            end_time: now + Duration::days(1) + Duration::hours(2),
            status: EventStatus::Published,
            total_seats: 100,
            available_seats: 100,
            ticket_price: Decimal::ZERO,
            created_at: now,
            updated_at: now,
        }
    }

    fn registration(status: RegistrationStatus) -> Registration {
        let now = Utc::now();
        Registration {
            id: Uuid::new_v4(),
            event_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            status,
            number_of_tickets: 2,
            ticket_number: "TKT-0123456789AB".to_string(),
            notes: None,
            created_at: now,
            updated_at: now,
            confirmed_at: Some(now),
        }
    }

    #[test]
    fn test_confirmed_registration_is_cancellable_before_start() {
        let event = upcoming_event();
        let reg = registration(RegistrationStatus::Confirmed);
        assert!(reg.ensure_cancellable(&event, Utc::now()).is_ok());
    }

    #[test]
    fn test_cancel_after_event_start_is_rejected() {
        let mut event = upcoming_event();
        event.start_time = Utc::now() - Duration::hours(1);
        let reg = registration(RegistrationStatus::Confirmed);
        assert!(matches!(
            reg.ensure_cancellable(&event, Utc::now()),
            Err(AppError::InvalidTransition(_))
        ));
    }

    #[test]
    fn test_cancel_twice_is_rejected() {
        let event = upcoming_event();
        let reg = registration(RegistrationStatus::Cancelled);
        assert!(matches!(
            reg.ensure_cancellable(&event, Utc::now()),
            Err(AppError::InvalidTransition(_))
        ));
    }

    #[test]
    fn test_cancel_after_attendance_is_rejected() {
        let event = upcoming_event();
        let reg = registration(RegistrationStatus::Attended);
        assert!(matches!(
            reg.ensure_cancellable(&event, Utc::now()),
            Err(AppError::InvalidTransition(_))
        ));
    }

    #[test]
    fn test_cancelled_registration_cannot_attend() {
        let reg = registration(RegistrationStatus::Cancelled);
        assert!(matches!(
            reg.ensure_attendable(),
            Err(AppError::InvalidTransition(_))
        ));

        let ok = registration(RegistrationStatus::Confirmed);
        assert!(ok.ensure_attendable().is_ok());
    }
}
