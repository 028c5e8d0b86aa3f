//! Error handling for the backend API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use hifz_core::{StoreError, TrackerError};
use serde::Serialize;
use thiserror::Error;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            ApiError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "unauthorized"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
            ApiError::Unavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "unavailable"),
            ApiError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "database_error"),
            ApiError::Migration(_) => (StatusCode::INTERNAL_SERVER_ERROR, "migration_error"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };

        if status.is_server_error() {
            tracing::error!("{}", self);
        }

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message: self.to_string(),
        });

        (status, body).into_response()
    }
}

impl From<TrackerError> for ApiError {
    fn from(error: TrackerError) -> Self {
        let message = error.to_string();
        match error {
            TrackerError::Store(StoreError::Conflict { .. }) => ApiError::Conflict(message),
            TrackerError::Store(StoreError::Unavailable(_)) => ApiError::Unavailable(message),
            TrackerError::Corrupt(_) => ApiError::Internal(message),
            TrackerError::UnitOutOfRange { .. } | TrackerError::EmptyAssessment => {
                ApiError::BadRequest(message)
            }
            TrackerError::UnknownUnit(_) | TrackerError::UnknownSection(_) => {
                ApiError::NotFound(message)
            }
            TrackerError::NothingToMemorize
            | TrackerError::SectionLocked(_)
            | TrackerError::SectionIncomplete { .. } => ApiError::Conflict(message),
        }
    }
}

/// Result type alias for API operations
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(error: TrackerError) -> StatusCode {
        ApiError::from(error).into_response().status()
    }

    #[test]
    fn test_unauthorized_status() {
        let error = ApiError::Unauthorized("missing X-User-Id header".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_conflict_status() {
        let error = ApiError::Conflict("stale write".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_migration_error_status() {
        let error = ApiError::Migration("migration failed".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_store_errors() {
        let conflict = StoreError::Conflict {
            expected: Some(1),
            actual: Some(2),
        };
        assert_eq!(status_of(conflict.into()), StatusCode::CONFLICT);
        assert_eq!(
            status_of(StoreError::Unavailable("pool closed".to_string()).into()),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_validation_errors() {
        let out_of_range = TrackerError::UnitOutOfRange {
            unit: 605,
            max_unit: 604,
        };
        assert_eq!(status_of(out_of_range), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(TrackerError::EmptyAssessment), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_unknown_resources() {
        assert_eq!(status_of(TrackerError::UnknownUnit(12)), StatusCode::NOT_FOUND);
        assert_eq!(status_of(TrackerError::UnknownSection(9)), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_gating_errors() {
        assert_eq!(status_of(TrackerError::SectionLocked(3)), StatusCode::CONFLICT);
        assert_eq!(status_of(TrackerError::NothingToMemorize), StatusCode::CONFLICT);
        let incomplete = TrackerError::SectionIncomplete {
            section: 1,
            percent: 40,
            required: 80,
        };
        assert_eq!(status_of(incomplete), StatusCode::CONFLICT);
    }

    #[test]
    fn test_error_display_not_found() {
        let error = ApiError::from(TrackerError::UnknownUnit(42));
        assert_eq!(error.to_string(), "Not found: unit 42 has not been memorized");
    }

    #[test]
    fn test_error_display_bad_request() {
        let error = ApiError::BadRequest("missing field".to_string());
        assert_eq!(error.to_string(), "Bad request: missing field");
    }
}
