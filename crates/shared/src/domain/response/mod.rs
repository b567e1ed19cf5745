use crate::{
    domain::response::pagination::Pagination,
    utils::{AppError, describe_validation_errors},
};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use core::fmt;
use serde::{Deserialize, Serialize};
use std::fmt::Formatter;
use tracing::error;
use utoipa::ToSchema;

pub mod asset;
pub mod budget;
pub mod member;
pub mod notification;
pub mod pagination;
pub mod payment;
pub mod report;
pub mod settings;
pub mod setup;
pub mod spending;
pub mod user;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub status: String,
    pub message: String,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        ApiResponse {
            status: "success".to_string(),
            message: message.into(),
            data,
        }
    }
}

impl<T: std::fmt::Debug> fmt::Display for ApiResponse<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ApiResponse {{ status: {}, message: {}, data: {:?} }}",
            self.status, self.message, self.data
        )
    }
}

/// Envelope for endpoints that only report an outcome.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub status: String,
    pub message: String,
}

impl MessageResponse {
    pub fn success(message: impl Into<String>) -> Self {
        MessageResponse {
            status: "success".to_string(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct ApiResponsePagination<T> {
    pub status: String,
    pub message: String,
    pub data: T,
    pub pagination: Pagination,
}

impl<T> ApiResponsePagination<T> {
    pub fn success(message: impl Into<String>, data: T, pagination: Pagination) -> Self {
        ApiResponsePagination {
            status: "success".to_string(),
            message: message.into(),
            data,
            pagination,
        }
    }
}

impl<T: Serialize> fmt::Display for ApiResponsePagination<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => write!(f, "{json}"),
            Err(e) => write!(f, "Error serializing ApiResponse to JSON: {e}"),
        }
    }
}

/// Uniform error envelope. `code` selects the HTTP status and is not
/// part of the body.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
    #[serde(skip)]
    pub code: u16,
}

impl ErrorResponse {
    pub fn new(code: StatusCode, message: impl Into<String>) -> Self {
        let status = if code.is_server_error() { "error" } else { "fail" };

        ErrorResponse {
            status: status.to_string(),
            message: message.into(),
            code: code.as_u16(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl From<AppError> for ErrorResponse {
    fn from(error: AppError) -> Self {
        let code = error.status_code();

        let message = match error {
            AppError::SqlxError(_) => "Database error occurred".to_string(),
            AppError::HashingError(_) => "Error during password hashing".to_string(),
            AppError::NotFound(ref msg) => msg.clone(),
            AppError::Conflict(ref msg) => msg.clone(),
            AppError::TokenExpiredError => "Token has expired".to_string(),
            AppError::TokenValidationError => "Token validation failed".to_string(),
            AppError::TokenGenerationError(_) => "Token generation failed".to_string(),
            AppError::BcryptError(ref msg) => format!("Bcrypt error: {msg}"),
            AppError::InvalidCredentials => "Invalid credentials".to_string(),
            AppError::EmailAlreadyExists => "Email already exists".to_string(),
            AppError::ValidationError(ref errors) => describe_validation_errors(errors),
            AppError::BadRequest(ref msg)
            | AppError::Unauthorized(ref msg)
            | AppError::Forbidden(ref msg)
            | AppError::PaymentRequired(ref msg) => msg.clone(),
            AppError::ServiceUnavailable(ref msg) => format!("Service unavailable: {msg}"),
            AppError::UpstreamError(_) => "Upstream service error".to_string(),
            AppError::InternalError(ref msg) => {
                error!("Internal error: {msg}");
                "Internal server error".to_string()
            }
            AppError::Custom(ref msg) => msg.clone(),
        };

        ErrorResponse::new(code, message)
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self)).into_response()
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Status: {}, Message: {}", self.status, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_use_fail_status() {
        let response = ErrorResponse::from(AppError::Conflict("Budget already exists".into()));

        assert_eq!(response.status, "fail");
        assert_eq!(response.status_code(), StatusCode::CONFLICT);
        assert_eq!(response.message, "Budget already exists");
    }

    #[test]
    fn server_errors_hide_details() {
        let response = ErrorResponse::from(AppError::UpstreamError("midtrans said 500".into()));

        assert_eq!(response.status, "error");
        assert_eq!(response.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(response.message, "Upstream service error");

        let response = ErrorResponse::from(AppError::InternalError("pool timed out".into()));
        assert_eq!(response.status, "error");
        assert_eq!(response.message, "Internal server error");
    }

    #[test]
    fn code_is_not_serialized() {
        let body = serde_json::to_value(ErrorResponse::new(StatusCode::NOT_FOUND, "missing")).unwrap();

        assert_eq!(body, serde_json::json!({"status": "fail", "message": "missing"}));
    }
}
