//! Rentals Domain
//!
//! Apartments, users, payments, announcements and coupons for RentEase,
//! stored as schemaless MongoDB documents.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← User upsert, payments, welcome email
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Document access (trait + MongoDB implementation)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Collections, write acks, pagination
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_rentals::{handlers, MongoDocumentRepository, RentalService};
//! use email::{MockSmtpProvider, Notifier};
//! use payments::{MockPaymentProvider, PaymentService};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = mongodb::Client::with_uri_str("mongodb://localhost:27017").await?;
//! let repository = MongoDocumentRepository::new(client.database("rentease"));
//!
//! let service = RentalService::new(
//!     repository,
//!     PaymentService::new(Arc::new(MockPaymentProvider::new())),
//!     Notifier::new(Arc::new(MockSmtpProvider::new())),
//! );
//!
//! let router = handlers::router(service);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

pub use error::{RentalError, RentalResult};
pub use handlers::ApiDoc;
pub use models::{
    Collection, DeleteAck, InsertAck, Pagination, UpdateAck, UpsertOutcome, UserPayload,
};
pub use mongodb::MongoDocumentRepository;
pub use repository::DocumentRepository;
pub use service::RentalService;
