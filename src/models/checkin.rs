use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Attendance record, one-to-one with a registration.
///
/// Deleting the row is the undo path; the owning registration goes back to
/// `confirmed` in the same transaction.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CheckIn {
    pub id: Uuid,
    pub registration_id: Uuid,
    pub checked_in_by: Uuid,
    pub checked_in_at: DateTime<Utc>,
    pub notes: Option<String>,
}
