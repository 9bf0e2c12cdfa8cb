//! Application state management

use mongodb::Client;

/// State for the operational routes
#[derive(Clone)]
pub struct AppState {
    pub mongo_client: Client,
}
