use std::sync::Arc;

use crate::{
    config::Config,
    error::{AppError, AppResult},
    infrastructure::{
        database::{Database, DocumentStore},
        mongo_store::MongoStore,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    database: Option<Database>,
}

impl AppState {
    /// Connect to MongoDB when both database variables are set; otherwise
    /// the server runs without a store and data endpoints report it unavailable.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let database = match (&config.database.url, &config.database.name) {
            (Some(url), Some(name)) => {
                let store = MongoStore::connect(url, name).await?;
                let database = Database::new(Arc::new(store));
                tracing::info!("Using {} document store", database.backend());
                Some(database)
            }
            _ => {
                tracing::warn!("DATABASE_URL or DATABASE_NAME not set, starting without a database");
                None
            }
        };

        Ok(Self { config, database })
    }

    pub fn with_store(config: Config, store: Arc<dyn DocumentStore>) -> Self {
        Self {
            config,
            database: Some(Database::new(store)),
        }
    }

    pub fn without_store(config: Config) -> Self {
        Self {
            config,
            database: None,
        }
    }

    pub fn database(&self) -> Option<&Database> {
        self.database.as_ref()
    }

    pub fn require_database(&self) -> AppResult<&Database> {
        self.database
            .as_ref()
            .ok_or_else(|| AppError::ServiceUnavailable("Database not initialized".to_string()))
    }
}
