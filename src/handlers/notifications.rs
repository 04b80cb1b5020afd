use axum::extract::State;
use axum::response::{IntoResponse, Response};

use crate::auth::AuthUser;
use crate::models::Notification;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::success;

/// The principal's notification history, most recent first.
pub async fn my_notifications(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Response, AppError> {
    let notifications = sqlx::query_as::<_, Notification>(
        "SELECT * FROM notifications WHERE recipient_id = $1 ORDER BY sent_at DESC LIMIT 100",
    )
    .bind(user.id)
    .fetch_all(&state.pool)
    .await?;

    Ok(success(notifications, "Notifications retrieved").into_response())
}
