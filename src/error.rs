use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::journals::window::WindowViolation;

/// Error taxonomy for the whole API surface. Every handler returns
/// `Result<_, ApiError>`; the `IntoResponse` impl is the single place where
/// errors turn into status codes and JSON bodies.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Authentication(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Date outside the edit window: {}", .0.reason())]
    EditWindow(WindowViolation),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    /// Login failures are deliberately indistinguishable: unknown identifier
    /// and wrong password produce this exact error.
    pub fn invalid_credentials() -> Self {
        Self::Authentication("Invalid credentials".into())
    }

    pub fn invalid_token() -> Self {
        Self::Authentication("Invalid or expired token".into())
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        // Unique-violations are the loser of an identity race (duplicate
        // register, concurrent upsert); the caller may retry.
        if let sqlx::Error::Database(db) = &e {
            if db.code().as_deref() == Some("23505") {
                return ApiError::Conflict("Resource already exists".into());
            }
        }
        ApiError::Internal(e.into())
    }
}

impl From<WindowViolation> for ApiError {
    fn from(v: WindowViolation) -> Self {
        ApiError::EditWindow(v)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, json!({ "error": msg })),
            ApiError::Authentication(msg) => (StatusCode::UNAUTHORIZED, json!({ "error": msg })),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            ApiError::EditWindow(v) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": self.to_string(), "reason": v.reason() }),
            ),
            ApiError::Internal(e) => {
                // Log the detail, never expose it to the caller.
                error!(error = %e, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal server error" }),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_400() {
        let res = ApiError::Validation("Missing fields".into()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn conflict_maps_to_409() {
        let res = ApiError::Conflict("Email or username already exists".into()).into_response();
        assert_eq!(res.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn not_found_maps_to_404() {
        let res = ApiError::NotFound("User not found".into()).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn invalid_credentials_is_uniform_401() {
        let unknown_user = ApiError::invalid_credentials();
        let wrong_password = ApiError::invalid_credentials();
        assert_eq!(unknown_user.to_string(), wrong_password.to_string());
        assert_eq!(
            unknown_user.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn edit_window_maps_to_400_with_reason() {
        let err: ApiError = WindowViolation::FutureDate.into();
        assert!(err.to_string().contains("future-date"));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);

        let err: ApiError = WindowViolation::TooOld.into();
        assert!(err.to_string().contains("too-old"));
    }

    #[test]
    fn internal_hides_detail() {
        let err = ApiError::Internal(anyhow::anyhow!("connection reset by peer"));
        let res = err.into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
