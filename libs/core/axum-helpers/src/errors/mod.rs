pub mod codes;
pub mod handlers;
pub mod responses;

pub use codes::ErrorCode;

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Body of every error response.
///
/// - `error`: human-readable message (`Invalid request`, `Internal server error`, ...)
/// - `code`: stable machine identifier
/// - `details`: raw cause, present for server errors and JSON rejections
///
/// ```json
/// {
///   "error": "Internal server error",
///   "code": "STORE_OPERATION_FAILED",
///   "details": "Kind: Command failed: ..."
/// }
/// ```
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub code: ErrorCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode) -> Self {
        Self {
            error: code.default_message().to_string(),
            code,
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(serde_json::Value::String(details.into()));
        self
    }
}

/// Application error type rendered as an [`ErrorResponse`].
///
/// Domain crates convert their own errors into this at the handler boundary.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid ObjectId: {0}")]
    InvalidObjectId(String),

    #[error("Document store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Document store operation failed: {0}")]
    StoreOperationFailed(String),

    #[error("Payment provider failed: {0}")]
    PaymentProviderFailed(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::JsonExtractorRejection(_)
            | AppError::BadRequest(_)
            | AppError::InvalidAmount(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidObjectId(_)
            | AppError::StoreUnavailable(_)
            | AppError::StoreOperationFailed(_)
            | AppError::PaymentProviderFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> ErrorCode {
        match self {
            AppError::JsonExtractorRejection(_) => ErrorCode::InvalidJson,
            AppError::BadRequest(_) => ErrorCode::InvalidRequest,
            AppError::InvalidAmount(_) => ErrorCode::InvalidAmount,
            AppError::InvalidObjectId(_) => ErrorCode::InvalidObjectId,
            AppError::StoreUnavailable(_) => ErrorCode::StoreUnavailable,
            AppError::StoreOperationFailed(_) => ErrorCode::StoreOperationFailed,
            AppError::PaymentProviderFailed(_) => ErrorCode::PaymentProviderFailed,
        }
    }

    fn cause(&self) -> String {
        match self {
            AppError::JsonExtractorRejection(e) => e.body_text(),
            AppError::BadRequest(msg)
            | AppError::InvalidAmount(msg)
            | AppError::InvalidObjectId(msg)
            | AppError::StoreUnavailable(msg)
            | AppError::StoreOperationFailed(msg)
            | AppError::PaymentProviderFailed(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.error_code();
        let cause = self.cause();

        let body = if status.is_server_error() {
            tracing::error!(error_code = code.code(), "{}: {}", code, cause);
            ErrorResponse::new(code).with_details(cause)
        } else {
            tracing::info!(error_code = code.code(), "{}: {}", code, cause);
            match self {
                // Rejection text says what was wrong with the body
                AppError::JsonExtractorRejection(_) => ErrorResponse::new(code).with_details(cause),
                _ => ErrorResponse::new(code),
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_store_failure_renders_details() {
        let response = AppError::StoreOperationFailed("command find failed".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["error"], "Internal server error");
        assert_eq!(body["code"], "STORE_OPERATION_FAILED");
        assert_eq!(body["details"], "command find failed");
    }

    #[tokio::test]
    async fn test_store_unavailable_is_500() {
        let response = AppError::StoreUnavailable("no servers".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["code"], "STORE_UNAVAILABLE");
    }

    #[tokio::test]
    async fn test_bad_request_omits_details() {
        let response = AppError::BadRequest("email is required".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"], "Invalid request");
        assert_eq!(body["code"], "INVALID_REQUEST");
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn test_invalid_amount_message() {
        let response = AppError::InvalidAmount("0".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "Invalid rent amount");
    }

    #[tokio::test]
    async fn test_invalid_object_id_is_server_error() {
        let response = AppError::InvalidObjectId("abc".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["code"], "INVALID_OBJECT_ID");
    }
}
