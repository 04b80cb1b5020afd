use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::models::registration::RegistrationStatus;
use crate::services::registration;
use crate::state::AppState;
use crate::tickets;
use crate::utils::error::AppError;
use crate::utils::response::{created, success};

fn default_tickets() -> i32 {
    1
}

#[derive(Deserialize)]
pub struct RegisterRequest {
    #[serde(default = "default_tickets")]
    pub number_of_tickets: i32,
    pub notes: Option<String>,
}

pub async fn create_registration(
    State(state): State<AppState>,
    user: AuthUser,
    Path(slug): Path<String>,
    Json(req): Json<RegisterRequest>,
) -> Result<Response, AppError> {
    let reg =
        registration::register(&state.pool, &user, &slug, req.number_of_tickets, req.notes).await?;

    let message = format!(
        "Successfully registered. Your ticket number is {}",
        reg.ticket_number
    );
    Ok(created(reg, message).into_response())
}

pub async fn cancel_registration(
    State(state): State<AppState>,
    user: AuthUser,
    Path(registration_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let reg = registration::cancel(&state.pool, &user, registration_id).await?;

    let message = format!(
        "Registration cancelled. {} seat(s) have been released",
        reg.number_of_tickets
    );
    Ok(success(reg, message).into_response())
}

/// A registration joined with the event it reserves seats against.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RegistrationWithEvent {
    pub id: Uuid,
    pub status: RegistrationStatus,
    pub number_of_tickets: i32,
    pub ticket_number: String,
    pub created_at: DateTime<Utc>,
    pub event_title: String,
    pub event_slug: String,
    pub event_start: DateTime<Utc>,
    pub event_end: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct MyRegistrations {
    pub upcoming: Vec<RegistrationWithEvent>,
    pub past: Vec<RegistrationWithEvent>,
    pub cancelled: Vec<RegistrationWithEvent>,
    pub total_upcoming: usize,
    pub total_attended: usize,
}

pub async fn my_registrations(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Response, AppError> {
    let rows = sqlx::query_as::<_, RegistrationWithEvent>(
        "SELECT r.id, r.status, r.number_of_tickets, r.ticket_number, r.created_at,
                e.title AS event_title, e.slug AS event_slug,
                e.start_time AS event_start, e.end_time AS event_end
         FROM registrations r
         JOIN events e ON e.id = r.event_id
         WHERE r.user_id = $1
         ORDER BY e.start_time",
    )
    .bind(user.id)
    .fetch_all(&state.pool)
    .await?;

    let payload = partition_registrations(rows, Utc::now());

    Ok(success(payload, "Registrations retrieved").into_response())
}

/// Split a user's registrations the way the dashboard shows them:
/// cancelled to the side, the rest by whether the event is still ahead.
fn partition_registrations(
    rows: Vec<RegistrationWithEvent>,
    now: DateTime<Utc>,
) -> MyRegistrations {
    let mut upcoming = Vec::new();
    let mut past = Vec::new();
    let mut cancelled = Vec::new();
    let mut total_attended = 0;

    for row in rows {
        if row.status == RegistrationStatus::Attended {
            total_attended += 1;
        }
        match row.status {
            RegistrationStatus::Cancelled => cancelled.push(row),
            _ if row.event_start >= now => upcoming.push(row),
            _ => past.push(row),
        }
    }

    let total_upcoming = upcoming.len();
    MyRegistrations {
        upcoming,
        past,
        cancelled,
        total_upcoming,
        total_attended,
    }
}

#[derive(Debug, Serialize)]
pub struct TicketArtifact {
    pub ticket_number: String,
    pub scan_payload: String,
    pub status: RegistrationStatus,
    pub number_of_tickets: i32,
    pub attendee_name: String,
    pub attendee_email: String,
    pub event_title: String,
    pub venue: String,
    pub city: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub ticket_price: Decimal,
    pub issued_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct TicketRow {
    event_id: Uuid,
    user_id: Uuid,
    status: RegistrationStatus,
    number_of_tickets: i32,
    ticket_number: String,
    created_at: DateTime<Utc>,
    attendee_name: String,
    attendee_email: String,
    event_title: String,
    venue: String,
    city: String,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    ticket_price: Decimal,
}

/// The downloadable ticket: a pure projection of the registration's
/// immutable fields plus the event snapshot. Rendering to PDF/QR happens
/// downstream of this payload.
pub async fn download_ticket(
    State(state): State<AppState>,
    user: AuthUser,
    Path(registration_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let row = sqlx::query_as::<_, TicketRow>(
        "SELECT r.event_id, r.user_id, r.status, r.number_of_tickets,
                r.ticket_number, r.created_at,
                u.name AS attendee_name, u.email AS attendee_email,
                e.title AS event_title, e.venue, e.city,
                e.start_time, e.end_time, e.ticket_price
         FROM registrations r
         JOIN events e ON e.id = r.event_id
         JOIN users u ON u.id = r.user_id
         WHERE r.id = $1 AND r.user_id = $2",
    )
    .bind(registration_id)
    .bind(user.id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Registration not found".to_string()))?;

    if row.status == RegistrationStatus::Cancelled {
        return Err(AppError::InvalidTransition(
            "Cannot download ticket for a cancelled registration".to_string(),
        ));
    }

    let artifact = build_ticket_artifact(row);

    Ok(success(artifact, "Ticket retrieved").into_response())
}

fn build_ticket_artifact(row: TicketRow) -> TicketArtifact {
    let scan_payload =
        tickets::encode_scan_payload(&row.ticket_number, row.event_id, row.user_id);

    TicketArtifact {
        ticket_number: row.ticket_number,
        scan_payload,
        status: row.status,
        number_of_tickets: row.number_of_tickets,
        attendee_name: row.attendee_name,
        attendee_email: row.attendee_email,
        event_title: row.event_title,
        venue: row.venue,
        city: row.city,
        start_time: row.start_time,
        end_time: row.end_time,
        ticket_price: row.ticket_price,
        issued_at: row.created_at,
    }
}
