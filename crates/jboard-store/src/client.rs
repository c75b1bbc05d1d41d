//! MongoDB connection handling and index bootstrap.

use std::time::Duration;

use bson::doc;
use mongodb::options::{ClientOptions, IndexOptions};
use mongodb::{Client, Database, IndexModel};
use jboard_models::User;

use crate::applications::ApplicationRepository;
use crate::error::StoreResult;
use crate::jobs::JobRepository;
use crate::users::UserRepository;

const DEFAULT_DATABASE: &str = "jobboard";
const DEFAULT_APP_NAME: &str = "jboard-api";
const SERVER_SELECTION_TIMEOUT: Duration = Duration::from_secs(10);

/// Store configuration, loaded from environment variables.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// MongoDB connection string.
    pub uri: String,
    /// Database name.
    pub database: String,
}

impl StoreConfig {
    /// Load configuration from `MONGO_URI` (required) and `MONGO_DB`
    /// (defaults to `jobboard`).
    pub fn from_env() -> Result<Self, std::env::VarError> {
        Ok(Self {
            uri: std::env::var("MONGO_URI")?,
            database: std::env::var("MONGO_DB").unwrap_or_else(|_| DEFAULT_DATABASE.to_string()),
        })
    }
}

/// Handle to the job board database. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Store {
    database: Database,
}

impl Store {
    /// Connect to MongoDB and select the configured database.
    pub async fn connect(config: &StoreConfig) -> StoreResult<Self> {
        let mut options = ClientOptions::parse(&config.uri).await?;
        options.app_name = Some(DEFAULT_APP_NAME.to_string());
        options.server_selection_timeout = Some(SERVER_SELECTION_TIMEOUT);

        let client = Client::with_options(options)?;
        let database = client.database(&config.database);

        tracing::info!(database = %config.database, "connected to MongoDB");
        Ok(Self { database })
    }

    pub fn users(&self) -> UserRepository {
        UserRepository::new(&self.database)
    }

    pub fn jobs(&self) -> JobRepository {
        JobRepository::new(&self.database)
    }

    pub fn applications(&self) -> ApplicationRepository {
        ApplicationRepository::new(&self.database)
    }

    /// Create the unique indexes on user name and email. Idempotent;
    /// called once at startup.
    pub async fn ensure_indexes(&self) -> StoreResult<()> {
        let users = self.database.collection::<User>("users");
        let unique = IndexOptions::builder().unique(true).build();

        users
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "email": 1 })
                    .options(unique.clone())
                    .build(),
            )
            .await?;
        users
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "name": 1 })
                    .options(unique)
                    .build(),
            )
            .await?;

        tracing::debug!("user indexes ensured");
        Ok(())
    }

    /// Round-trip to the server, used by the readiness probe.
    pub async fn ping(&self) -> StoreResult<()> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}
