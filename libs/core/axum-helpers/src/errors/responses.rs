//! Reusable OpenAPI response types for consistent API documentation.

use super::ErrorResponse;
#[allow(unused_imports)]
use serde_json::json;
use utoipa::ToResponse;

#[derive(ToResponse)]
#[response(
    description = "Internal Server Error",
    content_type = "application/json",
    example = json!({
        "error": "Internal server error",
        "code": "STORE_OPERATION_FAILED",
        "details": "Kind: Server selection timeout: No available servers"
    })
)]
pub struct InternalServerErrorResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Bad Request - missing or unusable body",
    content_type = "application/json",
    example = json!({
        "error": "Invalid request",
        "code": "INVALID_REQUEST"
    })
)]
pub struct BadRequestResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Bad Request - rent amount missing or below one cent",
    content_type = "application/json",
    example = json!({
        "error": "Invalid rent amount",
        "code": "INVALID_AMOUNT"
    })
)]
pub struct InvalidAmountResponse(pub ErrorResponse);
