use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post, put},
};
use axum_helpers::{
    JsonDocument, ObjectIdPath,
    errors::responses::{BadRequestResponse, InternalServerErrorResponse, InvalidAmountResponse},
};
use serde_json::Value;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::RentalResult;
use crate::models::{
    CountResponse, CreatePaymentIntent, DeleteAck, InsertAck, MessageResponse, PageQuery,
    Pagination, PaymentIntentResponse, UpdateAck, UpsertOutcome, UserPayload,
};
use crate::repository::DocumentRepository;
use crate::service::RentalService;

pub const LIVENESS_MESSAGE: &str = "RentEase API is running";

/// OpenAPI documentation for the RentEase API
#[derive(OpenApi)]
#[openapi(
    paths(
        liveness,
        list_coupons,
        add_coupon,
        add_announcement,
        list_announcements,
        update_user,
        delete_user,
        get_user,
        upsert_user,
        list_users,
        record_payment,
        payment_history,
        create_payment_intent,
        list_apartments,
        get_apartment,
        count_apartments,
    ),
    components(
        schemas(
            InsertAck,
            UpdateAck,
            DeleteAck,
            CountResponse,
            MessageResponse,
            CreatePaymentIntent,
            PaymentIntentResponse
        ),
        responses(BadRequestResponse, InvalidAmountResponse, InternalServerErrorResponse)
    ),
    tags(
        (name = "Apartments", description = "Apartment listings"),
        (name = "Users", description = "User accounts keyed by email"),
        (name = "Payments", description = "Payment intents and history"),
        (name = "Announcements", description = "Announcements"),
        (name = "Coupons", description = "Coupons")
    )
)]
pub struct ApiDoc;

/// Create the RentEase router with all HTTP endpoints
pub fn router<R: DocumentRepository + 'static>(service: RentalService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(liveness))
        .route("/coupons", get(list_coupons::<R>).post(add_coupon::<R>))
        .route("/anouncement", post(add_announcement::<R>))
        .route("/announcements", get(list_announcements::<R>))
        .route("/user", put(upsert_user::<R>))
        .route(
            "/user/{email}",
            get(get_user::<R>)
                .put(update_user::<R>)
                .delete(delete_user::<R>),
        )
        .route("/users", get(list_users::<R>))
        .route("/payment-history", post(record_payment::<R>))
        .route("/payment-history/{email}", get(payment_history::<R>))
        .route("/create-payment-intent", post(create_payment_intent::<R>))
        .route("/apartments", get(list_apartments::<R>))
        .route("/apartments/{id}", get(get_apartment::<R>))
        .route("/apartment-count", get(count_apartments::<R>))
        .with_state(shared_service)
}

/// Liveness banner
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service is running", body = String, content_type = "text/plain")
    )
)]
async fn liveness() -> &'static str {
    LIVENESS_MESSAGE
}

/// List all coupons
#[utoipa::path(
    get,
    path = "/coupons",
    tag = "Coupons",
    responses(
        (status = 200, description = "All coupons", body = Vec<Object>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_coupons<R: DocumentRepository>(
    State(service): State<Arc<RentalService<R>>>,
) -> RentalResult<Json<Vec<Value>>> {
    Ok(Json(service.list_coupons().await?))
}

/// Add a coupon
#[utoipa::path(
    post,
    path = "/coupons",
    tag = "Coupons",
    request_body = Object,
    responses(
        (status = 200, description = "Coupon stored", body = InsertAck),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn add_coupon<R: DocumentRepository>(
    State(service): State<Arc<RentalService<R>>>,
    JsonDocument(coupon): JsonDocument,
) -> RentalResult<Json<InsertAck>> {
    Ok(Json(service.add_coupon(coupon).await?))
}

/// Add an announcement
#[utoipa::path(
    post,
    path = "/anouncement",
    tag = "Announcements",
    request_body = Object,
    responses(
        (status = 200, description = "Announcement stored", body = InsertAck),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn add_announcement<R: DocumentRepository>(
    State(service): State<Arc<RentalService<R>>>,
    JsonDocument(announcement): JsonDocument,
) -> RentalResult<Json<InsertAck>> {
    Ok(Json(service.add_announcement(announcement).await?))
}

/// List all announcements
#[utoipa::path(
    get,
    path = "/announcements",
    tag = "Announcements",
    responses(
        (status = 200, description = "All announcements", body = Vec<Object>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_announcements<R: DocumentRepository>(
    State(service): State<Arc<RentalService<R>>>,
) -> RentalResult<Json<Vec<Value>>> {
    Ok(Json(service.list_announcements().await?))
}

/// Patch a user's fields
#[utoipa::path(
    put,
    path = "/user/{email}",
    tag = "Users",
    params(("email" = String, Path, description = "User email")),
    request_body = Object,
    responses(
        (status = 200, description = "Update applied (a missing user is not an error)", body = MessageResponse),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_user<R: DocumentRepository>(
    State(service): State<Arc<RentalService<R>>>,
    Path(email): Path<String>,
    JsonDocument(changes): JsonDocument,
) -> RentalResult<Json<MessageResponse>> {
    service.update_user(&email, changes).await?;
    Ok(Json(MessageResponse {
        message: "User updated successfully".to_string(),
    }))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/user/{email}",
    tag = "Users",
    params(("email" = String, Path, description = "User email")),
    responses(
        (status = 200, description = "Delete result; deletedCount is 0 for an unknown user", body = DeleteAck),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_user<R: DocumentRepository>(
    State(service): State<Arc<RentalService<R>>>,
    Path(email): Path<String>,
) -> RentalResult<Json<DeleteAck>> {
    Ok(Json(service.delete_user(&email).await?))
}

/// Get a user by email
#[utoipa::path(
    get,
    path = "/user/{email}",
    tag = "Users",
    params(("email" = String, Path, description = "User email")),
    responses(
        (status = 200, description = "The user, or null", body = Object),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_user<R: DocumentRepository>(
    State(service): State<Arc<RentalService<R>>>,
    Path(email): Path<String>,
) -> RentalResult<Json<Option<Value>>> {
    Ok(Json(service.get_user(&email).await?))
}

/// Create a user, or return the stored one
///
/// New users get a welcome email. An existing user is only overwritten when
/// the body's `status` is `Requested`.
#[utoipa::path(
    put,
    path = "/user",
    tag = "Users",
    request_body = Object,
    responses(
        (status = 200, description = "Update result for new or Requested users, otherwise the stored user", body = UpdateAck),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn upsert_user<R: DocumentRepository>(
    State(service): State<Arc<RentalService<R>>>,
    JsonDocument(user): JsonDocument,
) -> RentalResult<Json<UpsertOutcome>> {
    let user = UserPayload::try_from(user)?;
    Ok(Json(service.upsert_user(user).await?))
}

/// List all users
#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    responses(
        (status = 200, description = "All users", body = Vec<Object>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_users<R: DocumentRepository>(
    State(service): State<Arc<RentalService<R>>>,
) -> RentalResult<Json<Vec<Value>>> {
    Ok(Json(service.list_users().await?))
}

/// Record a confirmed payment
#[utoipa::path(
    post,
    path = "/payment-history",
    tag = "Payments",
    request_body = Object,
    responses(
        (status = 200, description = "Payment stored", body = InsertAck),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn record_payment<R: DocumentRepository>(
    State(service): State<Arc<RentalService<R>>>,
    JsonDocument(payment): JsonDocument,
) -> RentalResult<Json<InsertAck>> {
    Ok(Json(service.record_payment(payment).await?))
}

/// Payments made by a user
#[utoipa::path(
    get,
    path = "/payment-history/{email}",
    tag = "Payments",
    params(("email" = String, Path, description = "Payer email")),
    responses(
        (status = 200, description = "Payments for the email", body = Vec<Object>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn payment_history<R: DocumentRepository>(
    State(service): State<Arc<RentalService<R>>>,
    Path(email): Path<String>,
) -> RentalResult<Json<Vec<Value>>> {
    Ok(Json(service.payment_history(&email).await?))
}

/// Create a card payment intent for the rent
#[utoipa::path(
    post,
    path = "/create-payment-intent",
    tag = "Payments",
    request_body = CreatePaymentIntent,
    responses(
        (status = 200, description = "Intent created", body = PaymentIntentResponse),
        (status = 400, response = InvalidAmountResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_payment_intent<R: DocumentRepository>(
    State(service): State<Arc<RentalService<R>>>,
    body: Option<JsonDocument>,
) -> RentalResult<Json<PaymentIntentResponse>> {
    // A missing body reads as `{}`, so it fails on the rent amount
    let body = body.map(|JsonDocument(body)| body).unwrap_or_default();
    let rent = body.get("rent").unwrap_or(&Value::Null);
    let client_secret = service.create_payment_intent(rent).await?;
    Ok(Json(PaymentIntentResponse { client_secret }))
}

/// One page of apartments
#[utoipa::path(
    get,
    path = "/apartments",
    tag = "Apartments",
    params(PageQuery),
    responses(
        (status = 200, description = "Apartments at offset page * size", body = Vec<Object>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_apartments<R: DocumentRepository>(
    State(service): State<Arc<RentalService<R>>>,
    Query(query): Query<PageQuery>,
) -> RentalResult<Json<Vec<Value>>> {
    let pagination = Pagination::from_query(&query);
    Ok(Json(service.list_apartments(pagination).await?))
}

/// Get an apartment by id
#[utoipa::path(
    get,
    path = "/apartments/{id}",
    tag = "Apartments",
    params(("id" = String, Path, description = "24-hex ObjectId")),
    responses(
        (status = 200, description = "The apartment, or null", body = Object),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_apartment<R: DocumentRepository>(
    State(service): State<Arc<RentalService<R>>>,
    ObjectIdPath(id): ObjectIdPath,
) -> RentalResult<Json<Option<Value>>> {
    Ok(Json(service.get_apartment(id).await?))
}

/// Estimated number of apartments
#[utoipa::path(
    get,
    path = "/apartment-count",
    tag = "Apartments",
    responses(
        (status = 200, description = "Apartment count", body = CountResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn count_apartments<R: DocumentRepository>(
    State(service): State<Arc<RentalService<R>>>,
) -> RentalResult<Json<CountResponse>> {
    let count = service.count_apartments().await?;
    Ok(Json(CountResponse { count }))
}
