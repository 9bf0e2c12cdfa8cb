//! Type-safe error codes for API responses.
//!
//! Each code carries:
//! - the SCREAMING_SNAKE_CASE identifier sent to clients in `code`
//! - an integer used in structured logs
//! - the human message sent in `error`
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! let code = ErrorCode::InvalidAmount;
//! assert_eq!(code.as_str(), "INVALID_AMOUNT");
//! assert_eq!(code.code(), 1003);
//! assert_eq!(code.default_message(), "Invalid rent amount");
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Client errors (1000s)
    /// Missing or unusable request body or parameter
    InvalidRequest,

    /// Body could not be parsed as JSON
    InvalidJson,

    /// Payment amount missing, non-numeric or below one minor unit
    InvalidAmount,

    /// Path segment is not a 24-character hex ObjectId
    InvalidObjectId,

    /// No route matched
    NotFound,

    // Document store errors (2000s)
    /// Server selection or connection failure
    StoreUnavailable,

    /// Any other driver failure
    StoreOperationFailed,

    // Upstream provider errors (3000s)
    /// Payment provider rejected or failed the request
    PaymentProviderFailed,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidRequest => "INVALID_REQUEST",
            Self::InvalidJson => "INVALID_JSON",
            Self::InvalidAmount => "INVALID_AMOUNT",
            Self::InvalidObjectId => "INVALID_OBJECT_ID",
            Self::NotFound => "NOT_FOUND",
            Self::StoreUnavailable => "STORE_UNAVAILABLE",
            Self::StoreOperationFailed => "STORE_OPERATION_FAILED",
            Self::PaymentProviderFailed => "PAYMENT_PROVIDER_FAILED",
        }
    }

    /// Integer code for logs and metrics.
    ///
    /// - 1000-1999: request and generic server errors
    /// - 2000-2999: document store errors
    /// - 3000-3999: upstream provider errors
    pub fn code(&self) -> i32 {
        match self {
            Self::InvalidRequest => 1001,
            Self::InvalidJson => 1002,
            Self::InvalidAmount => 1003,
            Self::InvalidObjectId => 1004,
            Self::NotFound => 1005,
            Self::StoreUnavailable => 2001,
            Self::StoreOperationFailed => 2002,
            Self::PaymentProviderFailed => 3001,
        }
    }

    /// Message placed in the `error` field of the envelope.
    ///
    /// Every 5xx shares one message so clients can key on it.
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::InvalidRequest | Self::InvalidJson => "Invalid request",
            Self::InvalidAmount => "Invalid rent amount",
            Self::NotFound => "The requested resource was not found",
            Self::InvalidObjectId
            | Self::StoreUnavailable
            | Self::StoreOperationFailed
            | Self::PaymentProviderFailed => "Internal server error",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_matches_as_str() {
        for code in [
            ErrorCode::InvalidRequest,
            ErrorCode::InvalidAmount,
            ErrorCode::InvalidObjectId,
            ErrorCode::StoreOperationFailed,
            ErrorCode::PaymentProviderFailed,
        ] {
            let json = serde_json::to_value(code).unwrap();
            assert_eq!(json, serde_json::json!(code.as_str()));
        }
    }

    #[test]
    fn test_server_errors_share_message() {
        assert_eq!(
            ErrorCode::StoreUnavailable.default_message(),
            ErrorCode::PaymentProviderFailed.default_message()
        );
        assert_eq!(ErrorCode::InvalidJson.default_message(), "Invalid request");
    }

    #[test]
    fn test_codes_are_unique() {
        let all = [
            ErrorCode::InvalidRequest,
            ErrorCode::InvalidJson,
            ErrorCode::InvalidAmount,
            ErrorCode::InvalidObjectId,
            ErrorCode::NotFound,
            ErrorCode::StoreUnavailable,
            ErrorCode::StoreOperationFailed,
            ErrorCode::PaymentProviderFailed,
        ];
        let names: std::collections::HashSet<_> = all.iter().map(ErrorCode::as_str).collect();
        let numbers: std::collections::HashSet<_> = all.iter().map(ErrorCode::code).collect();
        assert_eq!(names.len(), all.len());
        assert_eq!(numbers.len(), all.len());
    }

    #[test]
    fn test_code_ranges() {
        assert!((1000..2000).contains(&ErrorCode::InvalidRequest.code()));
        assert!((2000..3000).contains(&ErrorCode::StoreUnavailable.code()));
        assert!((3000..4000).contains(&ErrorCode::PaymentProviderFailed.code()));
    }
}
