use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use mongodb::error::ErrorKind;
use payments::PaymentError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RentalError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Invalid rent amount: {0}")]
    InvalidAmount(String),

    /// Server selection, I/O or pool failures
    #[error("Document store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Document store operation failed: {0}")]
    StoreOperationFailed(String),

    #[error("Payment provider failed: {0}")]
    PaymentProviderFailed(String),
}

pub type RentalResult<T> = Result<T, RentalError>;

/// Convert RentalError to AppError for standardized error responses
impl From<RentalError> for AppError {
    fn from(err: RentalError) -> Self {
        match err {
            RentalError::BadRequest(msg) => AppError::BadRequest(msg),
            RentalError::InvalidAmount(msg) => AppError::InvalidAmount(msg),
            RentalError::StoreUnavailable(msg) => AppError::StoreUnavailable(msg),
            RentalError::StoreOperationFailed(msg) => AppError::StoreOperationFailed(msg),
            RentalError::PaymentProviderFailed(msg) => AppError::PaymentProviderFailed(msg),
        }
    }
}

impl IntoResponse for RentalError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for RentalError {
    fn from(err: mongodb::error::Error) -> Self {
        match *err.kind {
            ErrorKind::ServerSelection { .. }
            | ErrorKind::Io(_)
            | ErrorKind::ConnectionPoolCleared { .. } => {
                RentalError::StoreUnavailable(err.to_string())
            }
            _ => RentalError::StoreOperationFailed(err.to_string()),
        }
    }
}

impl From<mongodb::bson::ser::Error> for RentalError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        RentalError::BadRequest(format!("document cannot be stored: {err}"))
    }
}

impl From<PaymentError> for RentalError {
    fn from(err: PaymentError) -> Self {
        match err {
            PaymentError::InvalidAmount(msg) => RentalError::InvalidAmount(msg),
            PaymentError::ConfigError(msg) | PaymentError::ProviderError(msg) => {
                RentalError::PaymentProviderFailed(msg)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_status_codes() {
        let cases = [
            (RentalError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
            (RentalError::InvalidAmount("x".into()), StatusCode::BAD_REQUEST),
            (RentalError::StoreUnavailable("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (RentalError::StoreOperationFailed("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (RentalError::PaymentProviderFailed("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn test_payment_errors_map_to_rental_errors() {
        let err: RentalError = PaymentError::InvalidAmount("0".into()).into();
        assert!(matches!(err, RentalError::InvalidAmount(_)));

        let err: RentalError = PaymentError::ProviderError("card_declined".into()).into();
        assert!(matches!(err, RentalError::PaymentProviderFailed(m) if m == "card_declined"));
    }
}
