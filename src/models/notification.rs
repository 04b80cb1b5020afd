use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "notification_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    EventPublished,
    EventUpdated,
    EventCancelled,
    RegistrationConfirmed,
    RegistrationCancelled,
    CheckinConfirmation,
    BulkMessage,
}

/// Delivery history row written by the dispatcher, best-effort.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    pub id: Uuid,
    pub kind: NotificationKind,
    pub recipient_id: Uuid,
    pub event_id: Option<Uuid>,
    pub subject: String,
    pub body: String,
    pub sent_at: DateTime<Utc>,
}
