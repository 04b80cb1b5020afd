use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::handlers::fetch_event_for_organizer;
use crate::models::registration::Registration;
use crate::services::checkin;
use crate::state::AppState;
use crate::tickets;
use crate::utils::error::AppError;
use crate::utils::response::{created, success};

#[derive(Deserialize)]
pub struct CheckInRequest {
    pub code: String,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct ScanQuery {
    pub code: String,
}

#[derive(Deserialize)]
pub struct CheckInListQuery {
    pub search: Option<String>,
}

#[derive(Serialize)]
pub struct CheckInPayload {
    pub checkin: crate::models::CheckIn,
    pub registration: Registration,
}

pub async fn perform_checkin(
    State(state): State<AppState>,
    user: AuthUser,
    Path(slug): Path<String>,
    Json(req): Json<CheckInRequest>,
) -> Result<Response, AppError> {
    let (checkin, registration) =
        checkin::check_in(&state.pool, &user, &slug, &req.code, req.notes).await?;

    let message = format!(
        "Successfully checked in ticket {} ({} ticket(s))",
        registration.ticket_number, registration.number_of_tickets
    );
    Ok(created(
        CheckInPayload {
            checkin,
            registration,
        },
        message,
    )
    .into_response())
}

pub async fn undo_checkin(
    State(state): State<AppState>,
    user: AuthUser,
    Path(checkin_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let registration = checkin::undo_check_in(&state.pool, &user, checkin_id).await?;

    let message = format!(
        "Check-in for ticket {} has been undone",
        registration.ticket_number
    );
    Ok(success(registration, message).into_response())
}

/// Scan-time lookup without a state change: resolve a raw code (ticket
/// number or scan payload) to the registration it names. Organizer-only.
pub async fn scan_lookup(
    State(state): State<AppState>,
    user: AuthUser,
    Path(slug): Path<String>,
    Query(query): Query<ScanQuery>,
) -> Result<Response, AppError> {
    let event = fetch_event_for_organizer(&state, &user, &slug).await?;

    let ticket_number = tickets::extract_ticket_number(&query.code);

    let registration = sqlx::query_as::<_, Registration>(
        "SELECT * FROM registrations WHERE ticket_number = $1 AND event_id = $2",
    )
    .bind(&ticket_number)
    .bind(event.id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or(AppError::TicketNotFound)?;

    Ok(success(registration, "Ticket resolved").into_response())
}

pub async fn checkin_stats(
    State(state): State<AppState>,
    user: AuthUser,
    Path(slug): Path<String>,
) -> Result<Response, AppError> {
    let event = fetch_event_for_organizer(&state, &user, &slug).await?;
    let stats = checkin::stats(&state.pool, event.id).await?;

    Ok(success(stats, "Check-in statistics retrieved").into_response())
}

#[derive(Debug, Serialize, FromRow)]
pub struct CheckInRow {
    pub id: Uuid,
    pub checked_in_at: DateTime<Utc>,
    pub checked_in_by_name: String,
    pub ticket_number: String,
    pub attendee_name: String,
    pub attendee_email: String,
    pub notes: Option<String>,
}

pub async fn list_checkins(
    State(state): State<AppState>,
    user: AuthUser,
    Path(slug): Path<String>,
    Query(query): Query<CheckInListQuery>,
) -> Result<Response, AppError> {
    let event = fetch_event_for_organizer(&state, &user, &slug).await?;

    let checkins = sqlx::query_as::<_, CheckInRow>(
        "SELECT c.id, c.checked_in_at, op.name AS checked_in_by_name,
                r.ticket_number, u.name AS attendee_name,
                u.email AS attendee_email, c.notes
         FROM checkins c
         JOIN registrations r ON r.id = c.registration_id
         JOIN users u ON u.id = r.user_id
         JOIN users op ON op.id = c.checked_in_by
         WHERE r.event_id = $1
           AND ($2::text IS NULL
                OR u.name ILIKE '%' || $2 || '%'
                OR u.email ILIKE '%' || $2 || '%'
                OR r.ticket_number ILIKE '%' || $2 || '%')
         ORDER BY c.checked_in_at DESC",
    )
    .bind(event.id)
    .bind(query.search)
    .fetch_all(&state.pool)
    .await?;

    Ok(success(checkins, "Check-ins retrieved").into_response())
}

