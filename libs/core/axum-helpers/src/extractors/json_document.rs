//! Schemaless JSON body extractor.

use crate::errors::AppError;
use axum::{
    body::Bytes,
    extract::{FromRequest, Json, OptionalFromRequest, Request},
    http::{HeaderMap, header},
};
use serde_json::{Map, Value};

/// A JSON object request body of arbitrary shape.
///
/// Rejects a missing, empty or `null` body, and any body that is not a JSON
/// object, with `400 Invalid request`. `{}` is accepted.
///
/// As `Option<JsonDocument>` a request without a JSON `Content-Type` or with
/// an empty body extracts as `None`.
///
/// ```ignore
/// use axum_helpers::extractors::JsonDocument;
///
/// async fn add_coupon(JsonDocument(coupon): JsonDocument) -> String {
///     format!("{} fields", coupon.len())
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct JsonDocument(pub Map<String, Value>);

impl<S> FromRequest<S> for JsonDocument
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state).await?;
        into_document(value)
    }
}

impl<S> OptionalFromRequest<S> for JsonDocument
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Option<Self>, Self::Rejection> {
        if !has_json_content_type(req.headers()) {
            return Ok(None);
        }

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        if bytes.is_empty() {
            return Ok(None);
        }

        let Json(value) = Json::<Value>::from_bytes(&bytes)?;
        into_document(value).map(Some)
    }
}

fn into_document(value: Value) -> Result<JsonDocument, AppError> {
    match value {
        Value::Object(map) => Ok(JsonDocument(map)),
        Value::Null => Err(AppError::BadRequest("request body is required".to_string())),
        other => Err(AppError::BadRequest(format!(
            "request body must be a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

fn has_json_content_type(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(str::trim)
        .is_some_and(|mime| mime == "application/json" || mime.ends_with("+json"))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request(body: &'static str) -> Request {
        Request::builder()
            .method("POST")
            .uri("/coupons")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    async fn required(req: Request, state: &()) -> Result<JsonDocument, AppError> {
        <JsonDocument as FromRequest<()>>::from_request(req, state).await
    }

    #[tokio::test]
    async fn test_accepts_object() {
        let JsonDocument(doc) = required(request(r#"{"code":"SPRING"}"#), &())
            .await
            .unwrap();
        assert_eq!(doc["code"], "SPRING");
    }

    #[tokio::test]
    async fn test_accepts_empty_object() {
        let JsonDocument(doc) = required(request("{}"), &()).await.unwrap();
        assert!(doc.is_empty());
    }

    #[tokio::test]
    async fn test_rejects_null_and_arrays() {
        for body in ["null", "[1,2]", "42"] {
            let err = required(request(body), &()).await.unwrap_err();
            assert!(matches!(err, AppError::BadRequest(_)), "{body}");
        }
    }

    #[tokio::test]
    async fn test_rejects_empty_body() {
        let err = required(request(""), &()).await.unwrap_err();
        assert!(matches!(err, AppError::JsonExtractorRejection(_)));
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_optional_missing_body_is_none() {
        let bare = Request::builder()
            .method("POST")
            .uri("/create-payment-intent")
            .body(Body::empty())
            .unwrap();
        let doc = <JsonDocument as OptionalFromRequest<()>>::from_request(bare, &())
            .await
            .unwrap();
        assert!(doc.is_none());

        let doc = <JsonDocument as OptionalFromRequest<()>>::from_request(request(""), &())
            .await
            .unwrap();
        assert!(doc.is_none());
    }

    #[tokio::test]
    async fn test_optional_still_rejects_malformed_json() {
        let err = <JsonDocument as OptionalFromRequest<()>>::from_request(request("{rent"), &())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::JsonExtractorRejection(_)));
    }
}
