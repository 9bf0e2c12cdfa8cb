//! API routes module

pub mod health;

use axum::Router;
use domain_rentals::{DocumentRepository, RentalService, handlers};

use crate::state::AppState;

/// Create all API routes
pub fn routes<R: DocumentRepository + 'static>(
    service: RentalService<R>,
    state: AppState,
) -> Router {
    handlers::router(service).merge(health::router(state))
}
