//! RentEase API - REST server for apartment rentals

use axum_helpers::server::{create_production_app, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_rentals::{MongoDocumentRepository, RentalService};
use email::Notifier;
use payments::{PaymentService, StripeProvider};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let dotenv_loaded = core_config::load_dotenv();
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);
    if dotenv_loaded {
        info!("Loaded environment from .env");
    }

    info!("Connecting to MongoDB at {}", config.mongodb.redacted_url());

    let mongo_client =
        database::mongodb::connect_from_config_with_retry(&config.mongodb, None).await?;

    let db = mongo_client.database(config.mongodb.database());

    info!(
        "Successfully connected to MongoDB database: {}",
        config.mongodb.database()
    );

    let payments = PaymentService::new(Arc::new(StripeProvider::new(config.stripe.clone())));
    let notifier = Notifier::smtp(config.smtp.clone())?;
    let service = RentalService::new(MongoDocumentRepository::new(db), payments, notifier);

    let state = AppState {
        mongo_client: mongo_client.clone(),
    };

    let api_routes = api::routes(service, state).merge(health_router(config.app));
    let app = axum_helpers::create_router::<openapi::ApiDoc>(api_routes).await?;

    info!("Starting RentEase API on port {}", config.server.port);

    create_production_app(
        app,
        &config.server,
        Duration::from_secs(30),
        async move {
            info!("Shutting down: closing MongoDB connections");
            database::mongodb::disconnect(mongo_client).await;
            info!("MongoDB connection closed");
        },
    )
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("RentEase API shutdown complete");
    Ok(())
}
