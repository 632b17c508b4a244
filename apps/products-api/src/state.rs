//! Application state management

use domain_products::MongoProductRepository;
use mongodb::{Client, Database};

use crate::config::Config;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub mongo_client: Client,
    pub db: Database,
}

impl AppState {
    pub fn new(config: Config, mongo_client: Client) -> Self {
        let db = mongo_client.database(config.mongodb.database());
        Self {
            config,
            mongo_client,
            db,
        }
    }

    /// Repository over the configured products collection.
    pub fn product_repository(&self) -> MongoProductRepository {
        MongoProductRepository::with_collection(&self.db, &self.config.collection)
    }
}
