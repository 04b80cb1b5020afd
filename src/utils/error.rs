use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

use crate::utils::response::error as error_response;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Authentication error: {0}")]
    AuthError(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Only {0} seat(s) remaining")]
    CapacityExceeded(i32),

    #[error("You have already registered for this event")]
    DuplicateRegistration,

    #[error("Event closed: {0}")]
    EventClosed(String),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("This ticket has already been checked in")]
    AlreadyCheckedIn,

    #[error("Invalid ticket number or ticket not found for this event")]
    TicketNotFound,

    #[error("Database error")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Internal server error")]
    InternalServerError(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::AuthError(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::CapacityExceeded(_) => StatusCode::CONFLICT,
            AppError::DuplicateRegistration => StatusCode::CONFLICT,
            AppError::EventClosed(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::InvalidTransition(_) => StatusCode::CONFLICT,
            AppError::AlreadyCheckedIn => StatusCode::CONFLICT,
            AppError::TicketNotFound => StatusCode::NOT_FOUND,
            AppError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::AuthError(_) => "AUTH_ERROR",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::CapacityExceeded(_) => "CAPACITY_EXCEEDED",
            AppError::DuplicateRegistration => "DUPLICATE_REGISTRATION",
            AppError::EventClosed(_) => "EVENT_CLOSED",
            AppError::InvalidTransition(_) => "INVALID_TRANSITION",
            AppError::AlreadyCheckedIn => "ALREADY_CHECKED_IN",
            AppError::TicketNotFound => "TICKET_NOT_FOUND",
            AppError::DatabaseError(_) => "DATABASE_ERROR",
            AppError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    fn log(&self) {
        match self {
            AppError::DatabaseError(e) => {
                error!(error = ?e, "Database error");
            }
            AppError::InternalServerError(msg) => {
                error!(error = ?self, message = %msg, "Application error");
            }
            other => {
                // Domain failures are expected request outcomes
                tracing::debug!(error = ?other, "Request rejected");
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();

        // Log internal details
        self.log();

        // Only expose high-level message to the client
        let public_message = match &self {
            AppError::DatabaseError(_) => "A database error occurred".to_string(),
            other => other.to_string(),
        };

        // Do not expose internal details in the API response
        let details = None;

        error_response(code, public_message, details, status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_errors_map_to_client_status_codes() {
        assert_eq!(
            AppError::CapacityExceeded(3).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::DuplicateRegistration.status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::EventClosed("started".into()).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AppError::InvalidTransition("no".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::AlreadyCheckedIn.status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::TicketNotFound.status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(AppError::CapacityExceeded(0).code(), "CAPACITY_EXCEEDED");
        assert_eq!(
            AppError::DuplicateRegistration.code(),
            "DUPLICATE_REGISTRATION"
        );
        assert_eq!(AppError::AlreadyCheckedIn.code(), "ALREADY_CHECKED_IN");
        assert_eq!(AppError::TicketNotFound.code(), "TICKET_NOT_FOUND");
    }

    #[test]
    fn test_capacity_exceeded_message_names_remaining_seats() {
        assert_eq!(
            AppError::CapacityExceeded(7).to_string(),
            "Only 7 seat(s) remaining"
        );
    }
}
