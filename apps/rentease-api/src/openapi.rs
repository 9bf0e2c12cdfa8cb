//! OpenAPI documentation configuration

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "RentEase API",
        description = "Apartment listings, users, payments, announcements and coupons",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:4000", description = "Local development server")
    )
)]
struct ServiceInfo;

/// Combined OpenAPI documentation for RentEase API
pub struct ApiDoc;

impl OpenApi for ApiDoc {
    fn openapi() -> utoipa::openapi::OpenApi {
        ServiceInfo::openapi().merge_from(domain_rentals::ApiDoc::openapi())
    }
}
