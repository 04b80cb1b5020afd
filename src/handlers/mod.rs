use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::auth::AuthUser;
use crate::models::event::Event;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::success;

pub mod auth;
pub mod checkins;
pub mod events;
pub mod notifications;
pub mod registrations;

/// Load an event by slug and require the caller to be its organizer.
pub(crate) async fn fetch_event_for_organizer(
    state: &AppState,
    user: &AuthUser,
    slug: &str,
) -> Result<Event, AppError> {
    let event = sqlx::query_as::<_, Event>("SELECT * FROM events WHERE slug = $1")
        .bind(slug)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Event '{}' was not found", slug)))?;

    event.ensure_organized_by(user.id)?;
    Ok(event)
}

#[derive(Serialize)]
struct HealthPayload {
    status: &'static str,
    service: &'static str,
}

pub async fn health_check() -> Response {
    let payload = HealthPayload {
        status: "ok",
        service: "pavilion-api",
    };

    success(payload, "Health check successful").into_response()
}
