//! # API Error Handling
//!
//! The single error type every handler returns. Each variant carries the
//! client-facing message; database errors are normalized onto HTTP
//! statuses by constraint class before they reach the wire.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// A single failed validation, reported under `errors` in the 400 body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// API errors with their HTTP mapping.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("validation failed")]
    Validation(Vec<FieldError>),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }

    /// Status and message for this error, normalizing database failures:
    /// unique violations → 409, foreign-key violations → 400, missing rows
    /// → 404, anything else → 500.
    pub fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message.clone()),
            ApiError::Unauthorized(message) => (StatusCode::UNAUTHORIZED, message.clone()),
            ApiError::Forbidden(message) => (StatusCode::FORBIDDEN, message.clone()),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message.clone()),
            ApiError::Conflict(message) => (StatusCode::CONFLICT, message.clone()),
            ApiError::Database(source) => Self::database_status(source),
            ApiError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Une erreur inattendue est survenue.".to_string(),
            ),
        }
    }

    fn database_status(source: &sqlx::Error) -> (StatusCode, String) {
        if let sqlx::Error::RowNotFound = source {
            return (StatusCode::NOT_FOUND, "Ressource introuvable.".to_string());
        }
        if let Some(db_error) = source.as_database_error() {
            match db_error.code().as_deref() {
                // unique_violation
                Some("23505") => {
                    let constraint = db_error.constraint().unwrap_or("valeur unique");
                    return (
                        StatusCode::CONFLICT,
                        format!("La ressource existe déjà avec la valeur unique fournie: {constraint}"),
                    );
                }
                // foreign_key_violation
                Some("23503") => {
                    let constraint = db_error
                        .constraint()
                        .unwrap_or("Une relation requise est manquante ou invalide.");
                    return (
                        StatusCode::BAD_REQUEST,
                        format!("Violation de contrainte de clé étrangère: {constraint}"),
                    );
                }
                _ => {}
            }
        }
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Erreur de base de données.".to_string(),
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        if status.is_server_error() {
            error!(error = %self, "request failed");
        }

        let body = match self {
            ApiError::Validation(errors) => json!({ "errors": errors }),
            _ => json!({ "message": message }),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ApiError::bad_request("x"), StatusCode::BAD_REQUEST),
            (ApiError::unauthorized("x"), StatusCode::UNAUTHORIZED),
            (ApiError::forbidden("x"), StatusCode::FORBIDDEN),
            (ApiError::not_found("x"), StatusCode::NOT_FOUND),
            (ApiError::conflict("x"), StatusCode::CONFLICT),
        ];
        for (err, expected) in cases {
            assert_eq!(err.status_and_message().0, expected);
        }
    }

    #[test]
    fn test_missing_row_maps_to_404() {
        let err = ApiError::Database(sqlx::Error::RowNotFound);
        let (status, message) = err.status_and_message();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(message, "Ressource introuvable.");
    }

    #[test]
    fn test_unexpected_database_error_maps_to_500() {
        let err = ApiError::Database(sqlx::Error::PoolClosed);
        let (status, _) = err.status_and_message();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_validation_status() {
        let err = ApiError::Validation(vec![FieldError {
            field: "email".to_string(),
            message: "L'email est requis.".to_string(),
        }]);
        assert_eq!(err.status_and_message().0, StatusCode::BAD_REQUEST);
    }
}
