use mongodb::bson::{Bson, Document};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};
use utoipa::{IntoParams, ToSchema};

use crate::error::{RentalError, RentalResult};

/// MongoDB collections backing the API.
///
/// Names match the existing `rentease` database, misspellings included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr, EnumIter)]
pub enum Collection {
    #[strum(serialize = "apartment")]
    Apartment,
    #[strum(serialize = "users")]
    Users,
    #[strum(serialize = "payment")]
    Payment,
    #[strum(serialize = "anounce")]
    Announcement,
    #[strum(serialize = "coupons")]
    Coupon,
}

impl Collection {
    pub fn name(&self) -> &'static str {
        (*self).into()
    }
}

/// Result of an insert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InsertAck {
    pub acknowledged: bool,
    #[schema(value_type = String, example = "665f1c2e9b1e8a3d4c2b1a09")]
    pub inserted_id: Value,
}

/// Result of an update, with or without upsert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAck {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_count: u64,
    #[schema(value_type = Option<String>)]
    pub upserted_id: Option<Value>,
}

/// Result of a delete
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAck {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CountResponse {
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreatePaymentIntent {
    /// Rent in dollars; a number or numeric string
    #[schema(value_type = f64, example = 1250)]
    pub rent: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PaymentIntentResponse {
    pub client_secret: String,
}

/// Raw `page`/`size` query parameters, parsed leniently by [`Pagination`]
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Zero-based page (default 0)
    pub page: Option<String>,
    /// Page size (default 10)
    pub size: Option<String>,
}

pub const DEFAULT_PAGE: u64 = 0;
pub const DEFAULT_PAGE_SIZE: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u64,
    pub size: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pagination {
    pub fn new(page: u64, size: u64) -> Self {
        Self { page, size }
    }

    /// Zero, negative and unparsable values fall back to the defaults.
    pub fn from_query(query: &PageQuery) -> Self {
        Self {
            page: lenient_positive(query.page.as_deref()).unwrap_or(DEFAULT_PAGE),
            size: lenient_positive(query.size.as_deref()).unwrap_or(DEFAULT_PAGE_SIZE),
        }
    }

    /// Offset of the page, capped at `i64::MAX` since the server takes a signed skip.
    pub fn skip(&self) -> u64 {
        self.page.saturating_mul(self.size).min(i64::MAX as u64)
    }

    pub fn limit(&self) -> i64 {
        i64::try_from(self.size).unwrap_or(i64::MAX)
    }
}

/// Leading integer of `raw` (`" 5abc"` is 5), if it is positive.
fn lenient_positive(raw: Option<&str>) -> Option<u64> {
    let trimmed = raw?.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let value: u64 = rest[..end].parse().ok()?;

    (!negative && value > 0).then_some(value)
}

/// Body of `PUT /user`: free-form fields keyed by `email`.
#[derive(Debug, Clone, PartialEq)]
pub struct UserPayload {
    email: String,
    fields: Map<String, Value>,
}

/// Status that lets an existing user's record be overwritten.
pub const REQUESTED_STATUS: &str = "Requested";

impl UserPayload {
    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn status(&self) -> Option<&str> {
        self.fields.get("status").and_then(Value::as_str)
    }

    pub fn is_requested(&self) -> bool {
        self.status() == Some(REQUESTED_STATUS)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.fields
    }
}

impl TryFrom<Map<String, Value>> for UserPayload {
    type Error = RentalError;

    fn try_from(fields: Map<String, Value>) -> RentalResult<Self> {
        match fields.get("email") {
            Some(Value::String(email)) if !email.is_empty() => Ok(Self {
                email: email.clone(),
                fields,
            }),
            _ => Err(RentalError::BadRequest(
                "user must have a non-empty email".to_string(),
            )),
        }
    }
}

/// What `PUT /user` did.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum UpsertOutcome {
    /// Known user, status not `Requested`: the stored record, untouched
    Existing(Value),
    /// Known user with status `Requested`: fields merged
    Updated(UpdateAck),
    /// New user inserted
    Created(UpdateAck),
}

/// Render a stored document as API JSON.
///
/// ObjectIds become 24-hex strings and dates RFC 3339 strings; other BSON
/// types use relaxed extended JSON.
pub fn document_to_json(document: Document) -> Value {
    Value::Object(
        document
            .into_iter()
            .map(|(key, value)| (key, bson_to_json(value)))
            .collect(),
    )
}

const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

pub fn bson_to_json(value: Bson) -> Value {
    match value {
        Bson::ObjectId(id) => Value::String(id.to_hex()),
        Bson::DateTime(dt) => match dt.try_to_rfc3339_string() {
            Ok(s) => Value::String(s),
            Err(_) => Bson::DateTime(dt).into_relaxed_extjson(),
        },
        // Whole doubles print without a fraction, as JavaScript writers stored them
        Bson::Double(n) if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER => {
            Value::from(n as i64)
        }
        Bson::Document(doc) => document_to_json(doc),
        Bson::Array(items) => Value::Array(items.into_iter().map(bson_to_json).collect()),
        other => other.into_relaxed_extjson(),
    }
}

/// Convert a JSON object into a BSON document for storage.
pub fn json_to_document(fields: &Map<String, Value>) -> RentalResult<Document> {
    Ok(mongodb::bson::to_document(fields)?)
}
