//! ObjectId path parameter extractor.

use crate::errors::AppError;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use mongodb::bson::oid::ObjectId;

/// A single path parameter parsed as a MongoDB ObjectId.
///
/// A malformed id is an [`AppError::InvalidObjectId`], which renders as a 500
/// like the driver's own conversion failure would.
///
/// ```ignore
/// async fn get_apartment(ObjectIdPath(id): ObjectIdPath) -> String {
///     id.to_hex()
/// }
///
/// let app = Router::new().route("/apartments/{id}", get(get_apartment));
/// ```
pub struct ObjectIdPath(pub ObjectId);

impl<S> FromRequestParts<S> for ObjectIdPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        ObjectId::parse_str(&id)
            .map(ObjectIdPath)
            .map_err(|e| AppError::InvalidObjectId(format!("{id}: {e}")))
    }
}
