pub mod auth;
pub mod bills;
pub mod complaints;
pub mod contracts;
pub mod notifications;
pub mod payments;
pub mod rooms;
pub mod users;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::drivers::payment::PaymentError;

#[derive(Debug)]
pub enum ApiError {
    NotFound,
    BadRequest(String),
    Unauthorized,
    /// Carries the explanation shown in place of the blocked action, e.g.
    /// the co-tenant payment message.
    Forbidden(String),
    /// A uniqueness clash, e.g. registering an email that already exists.
    Conflict(String),
    ValidationError(String),
    Database(sqlx::Error),
    Payment(PaymentError),
    InternalError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Resource not found".to_string()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::ValidationError(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::Database(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", err),
            ),
            ApiError::Payment(err) => (StatusCode::BAD_GATEWAY, err.to_string()),
            ApiError::InternalError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound,
            other => ApiError::Database(other),
        }
    }
}

impl From<PaymentError> for ApiError {
    fn from(err: PaymentError) -> Self {
        match err {
            PaymentError::InvalidSignature
            | PaymentError::MissingParameter(_)
            | PaymentError::BadOrderRef(_) => ApiError::BadRequest(err.to_string()),
            other => ApiError::Payment(other),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_variants_map_to_their_status_codes() {
        let cases = [
            (ApiError::NotFound, StatusCode::NOT_FOUND),
            (
                ApiError::Conflict("taken".to_string()),
                StatusCode::CONFLICT,
            ),
            (
                ApiError::ValidationError("bad".to_string()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                ApiError::Forbidden("no".to_string()),
                StatusCode::FORBIDDEN,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
