/// Error types for action-service
///
/// Every action returns `ActionResult<T>`. The four variants are the full
/// failure taxonomy of the action layer; the HTTP boundary renders them through
/// `ResponseError`.
use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

use crate::validation::FieldErrors;

pub const UNAUTHENTICATED_MESSAGE: &str = "You must be signed in to use this feature.";

#[derive(Error, Debug)]
pub enum ActionError {
    /// No session, or a session without a user id
    #[error("{}", UNAUTHENTICATED_MESSAGE)]
    Unauthenticated,

    /// Malformed input, rendered inline next to the offending fields
    #[error("{message}")]
    Validation { errors: FieldErrors, message: String },

    /// Target is absent or is not owned by the caller
    #[error("{0}")]
    NotFound(String),

    /// A write or lookup failed; the cause is logged, never returned
    #[error("{message}")]
    Persistence { message: String },
}

impl ActionError {
    pub fn validation(errors: FieldErrors, message: impl Into<String>) -> Self {
        ActionError::Validation {
            errors,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ActionError::NotFound(message.into())
    }

    /// Log the underlying cause and keep only the user-facing message
    pub fn persistence(message: impl Into<String>, cause: impl std::fmt::Display) -> Self {
        let message = message.into();
        tracing::error!(error = %cause, "{}", message);
        ActionError::Persistence { message }
    }

    /// Stable label used for metrics
    pub fn kind(&self) -> &'static str {
        match self {
            ActionError::Unauthenticated => "unauthenticated",
            ActionError::Validation { .. } => "invalid",
            ActionError::NotFound(_) => "not_found",
            ActionError::Persistence { .. } => "persistence_failure",
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<&'a FieldErrors>,
    message: String,
}

impl ResponseError for ActionError {
    fn status_code(&self) -> StatusCode {
        match self {
            ActionError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ActionError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ActionError::NotFound(_) => StatusCode::NOT_FOUND,
            ActionError::Persistence { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let errors = match self {
            ActionError::Validation { errors, .. } => Some(errors),
            _ => None,
        };

        HttpResponse::build(self.status_code()).json(ErrorBody {
            errors,
            message: self.to_string(),
        })
    }
}

/// Result type alias for action operations
pub type ActionResult<T> = Result<T, ActionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_taxonomy() {
        assert_eq!(
            ActionError::Unauthenticated.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ActionError::validation(FieldErrors::new(), "Missing fields.").status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ActionError::not_found("Post not found.").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ActionError::persistence("Database Error: Failed to like post.", "boom").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn persistence_hides_cause() {
        let err = ActionError::persistence(
            "Database Error: Failed to delete post.",
            "connection reset by peer",
        );
        assert_eq!(err.to_string(), "Database Error: Failed to delete post.");
        assert_eq!(err.kind(), "persistence_failure");
    }

    #[test]
    fn unauthenticated_message() {
        assert_eq!(
            ActionError::Unauthenticated.to_string(),
            UNAUTHENTICATED_MESSAGE
        );
    }
}
