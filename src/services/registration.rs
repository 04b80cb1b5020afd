use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::models::event::Event;
use crate::models::notification::NotificationKind;
use crate::models::registration::{Registration, RegistrationStatus};
use crate::services::notifications;
use crate::tickets;
use crate::utils::error::AppError;

/// Register the principal for an event.
///
/// Seat reservation and the registration write happen in one transaction,
/// with the event row locked so concurrent requests cannot oversell. A
/// previously cancelled registration for the same (event, user) pair is
/// revived in place and keeps its original ticket number.
pub async fn register(
    pool: &PgPool,
    user: &AuthUser,
    event_slug: &str,
    number_of_tickets: i32,
    notes: Option<String>,
) -> Result<Registration, AppError> {
    let now = Utc::now();
    let mut tx = pool.begin().await?;

    let mut event = lock_event_by_slug(&mut tx, event_slug).await?;
    event.ensure_open_for_registration(now)?;

    let existing = sqlx::query_as::<_, Registration>(
        "SELECT * FROM registrations WHERE event_id = $1 AND user_id = $2",
    )
    .bind(event.id)
    .bind(user.id)
    .fetch_optional(&mut *tx)
    .await?;

    if let Some(ref reg) = existing {
        if reg.is_active() {
            return Err(AppError::DuplicateRegistration);
        }
    }

    event.reserve_seats(number_of_tickets)?;
    persist_seat_count(&mut tx, &event).await?;

    let registration = match existing {
        Some(cancelled) => {
            sqlx::query_as::<_, Registration>(
                "UPDATE registrations
                 SET status = $1, number_of_tickets = $2, notes = $3,
                     confirmed_at = $4, updated_at = $4
                 WHERE id = $5
                 RETURNING *",
            )
            .bind(RegistrationStatus::Confirmed)
            .bind(number_of_tickets)
            .bind(notes)
            .bind(now)
            .bind(cancelled.id)
            .fetch_one(&mut *tx)
            .await?
        }
        None => {
            let ticket_number = tickets::generate_ticket_number();
            sqlx::query_as::<_, Registration>(
                "INSERT INTO registrations
                     (id, event_id, user_id, status, number_of_tickets,
                      ticket_number, notes, created_at, updated_at, confirmed_at)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8, $8)
                 RETURNING *",
            )
            .bind(Uuid::new_v4())
            .bind(event.id)
            .bind(user.id)
            .bind(RegistrationStatus::Confirmed)
            .bind(number_of_tickets)
            .bind(&ticket_number)
            .bind(notes)
            .bind(now)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                    AppError::DuplicateRegistration
                }
                other => AppError::DatabaseError(other),
            })?
        }
    };

    tx.commit().await?;

    tracing::info!(
        event = %event.slug,
        user = %user.id,
        ticket = %registration.ticket_number,
        seats = number_of_tickets,
        "Registration confirmed"
    );

    notifications::dispatch(
        pool.clone(),
        notifications::registration_message(NotificationKind::RegistrationConfirmed, &registration, &event),
    );

    Ok(registration)
}

/// Cancel a registration owned by the principal, releasing its seats back
/// to the event's ledger in the same transaction.
pub async fn cancel(
    pool: &PgPool,
    user: &AuthUser,
    registration_id: Uuid,
) -> Result<Registration, AppError> {
    let now = Utc::now();
    let mut tx = pool.begin().await?;

    let registration = sqlx::query_as::<_, Registration>(
        "SELECT * FROM registrations WHERE id = $1 AND user_id = $2 FOR UPDATE",
    )
    .bind(registration_id)
    .bind(user.id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| AppError::NotFound("Registration not found".to_string()))?;

    let mut event = lock_event_by_id(&mut tx, registration.event_id).await?;
    registration.ensure_cancellable(&event, now)?;

    event.release_seats(registration.number_of_tickets);
    persist_seat_count(&mut tx, &event).await?;

    let registration = sqlx::query_as::<_, Registration>(
        "UPDATE registrations SET status = $1, updated_at = $2 WHERE id = $3 RETURNING *",
    )
    .bind(RegistrationStatus::Cancelled)
    .bind(now)
    .bind(registration.id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!(
        event = %event.slug,
        user = %user.id,
        ticket = %registration.ticket_number,
        seats_released = registration.number_of_tickets,
        "Registration cancelled"
    );

    notifications::dispatch(
        pool.clone(),
        notifications::registration_message(NotificationKind::RegistrationCancelled, &registration, &event),
    );

    Ok(registration)
}

pub(crate) async fn lock_event_by_slug(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    slug: &str,
) -> Result<Event, AppError> {
    sqlx::query_as::<_, Event>("SELECT * FROM events WHERE slug = $1 FOR UPDATE")
        .bind(slug)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Event '{}' was not found", slug)))
}

pub(crate) async fn lock_event_by_id(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    id: Uuid,
) -> Result<Event, AppError> {
    sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Event not found".to_string()))
}

async fn persist_seat_count(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    event: &Event,
) -> Result<(), AppError> {
    sqlx::query("UPDATE events SET available_seats = $1, updated_at = $2 WHERE id = $3")
        .bind(event.available_seats)
        .bind(Utc::now())
        .bind(event.id)
        .execute(&mut **tx)
        .await?;
    Ok(())
}
