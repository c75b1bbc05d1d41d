//! Application state.

use std::sync::Arc;

use jboard_storage::{ObjectStoreClient, ResumeStore};
use jboard_store::{Store, StoreConfig};

use crate::auth::TokenKeys;
use crate::config::ApiConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub store: Store,
    pub resumes: ResumeStore,
    pub tokens: Arc<TokenKeys>,
}

impl AppState {
    /// Create new application state: connect the store, bootstrap indexes
    /// and build the resume store and token keys from the environment.
    pub async fn new(config: ApiConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let store_config = StoreConfig::from_env()?;
        let store = Store::connect(&store_config).await?;
        store.ensure_indexes().await?;

        let resumes = ResumeStore::new(ObjectStoreClient::from_env()?);
        let tokens = Arc::new(TokenKeys::from_env(config.token_ttl)?);

        Ok(Self {
            config,
            store,
            resumes,
            tokens,
        })
    }
}
