use chrono::Utc;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::models::checkin::CheckIn;
use crate::models::notification::NotificationKind;
use crate::models::registration::{Registration, RegistrationStatus};
use crate::services::notifications;
use crate::services::registration::lock_event_by_id;
use crate::tickets;
use crate::utils::error::AppError;

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct CheckInStats {
    pub total_registrations: i64,
    pub checked_in: i64,
    pub pending_checkin: i64,
}

/// Check an attendee in from a scanned code (ticket number or full scan
/// payload). Organizer-only.
///
/// The unique constraint on checkins.registration_id is the concurrency
/// guard: of two simultaneous attempts exactly one insert succeeds, the
/// other maps to `AlreadyCheckedIn`.
pub async fn check_in(
    pool: &PgPool,
    operator: &AuthUser,
    event_slug: &str,
    raw_code: &str,
    notes: Option<String>,
) -> Result<(CheckIn, Registration), AppError> {
    let now = Utc::now();
    let mut tx = pool.begin().await?;

    let event = sqlx::query_as::<_, crate::models::event::Event>(
        "SELECT * FROM events WHERE slug = $1",
    )
    .bind(event_slug)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Event '{}' was not found", event_slug)))?;

    event.ensure_organized_by(operator.id)?;

    let ticket_number = tickets::extract_ticket_number(raw_code);

    let registration = sqlx::query_as::<_, Registration>(
        "SELECT * FROM registrations WHERE ticket_number = $1 AND event_id = $2 FOR UPDATE",
    )
    .bind(&ticket_number)
    .bind(event.id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or(AppError::TicketNotFound)?;

    registration.ensure_attendable()?;

    let checkin = sqlx::query_as::<_, CheckIn>(
        "INSERT INTO checkins (id, registration_id, checked_in_by, checked_in_at, notes)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(registration.id)
    .bind(operator.id)
    .bind(now)
    .bind(notes)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(ref db) if db.is_unique_violation() => AppError::AlreadyCheckedIn,
        other => AppError::DatabaseError(other),
    })?;

    let registration = sqlx::query_as::<_, Registration>(
        "UPDATE registrations SET status = $1, updated_at = $2 WHERE id = $3 RETURNING *",
    )
    .bind(RegistrationStatus::Attended)
    .bind(now)
    .bind(registration.id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!(
        event = %event.slug,
        ticket = %registration.ticket_number,
        operator = %operator.id,
        "Attendee checked in"
    );

    notifications::dispatch(
        pool.clone(),
        notifications::registration_message(
            NotificationKind::CheckinConfirmation,
            &registration,
            &event,
        ),
    );

    Ok((checkin, registration))
}

/// Undo a check-in: delete the record and revert the registration to
/// `confirmed`. Organizer-only. A later re-check-in creates a fresh record.
pub async fn undo_check_in(
    pool: &PgPool,
    operator: &AuthUser,
    checkin_id: Uuid,
) -> Result<Registration, AppError> {
    let mut tx = pool.begin().await?;

    let checkin = sqlx::query_as::<_, CheckIn>("SELECT * FROM checkins WHERE id = $1 FOR UPDATE")
        .bind(checkin_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Check-in not found".to_string()))?;

    let registration = sqlx::query_as::<_, Registration>(
        "SELECT * FROM registrations WHERE id = $1 FOR UPDATE",
    )
    .bind(checkin.registration_id)
    .fetch_one(&mut *tx)
    .await?;

    let event = lock_event_by_id(&mut tx, registration.event_id).await?;
    event.ensure_organized_by(operator.id)?;

    sqlx::query("DELETE FROM checkins WHERE id = $1")
        .bind(checkin.id)
        .execute(&mut *tx)
        .await?;

    let registration = sqlx::query_as::<_, Registration>(
        "UPDATE registrations SET status = $1, updated_at = $2 WHERE id = $3 RETURNING *",
    )
    .bind(RegistrationStatus::Confirmed)
    .bind(Utc::now())
    .bind(registration.id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!(
        event = %event.slug,
        ticket = %registration.ticket_number,
        operator = %operator.id,
        "Check-in undone"
    );

    Ok(registration)
}

/// Door-dashboard counters for an event.
pub async fn stats(pool: &PgPool, event_id: Uuid) -> Result<CheckInStats, AppError> {
    let stats = sqlx::query_as::<_, CheckInStats>(
        "SELECT
             count(r.id) AS total_registrations,
             count(c.id) AS checked_in,
             count(r.id) - count(c.id) AS pending_checkin
         FROM registrations r
         LEFT JOIN checkins c ON c.registration_id = r.id
         WHERE r.event_id = $1 AND r.status <> 'cancelled'",
    )
    .bind(event_id)
    .fetch_one(pool)
    .await?;

    Ok(stats)
}
