//! Application state.

use std::sync::Arc;

use scenelog_store::SceneStore;

use crate::config::AppConfig;
use crate::services::QueryService;

/// Shared application state for the HTTP side.
///
/// The persistence client is the only resource shared between the ingest
/// and query paths; it is a stateless handle and needs no in-process
/// locking.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub store: Arc<SceneStore>,
    pub query: QueryService<SceneStore>,
}

impl AppState {
    /// Create new application state.
    pub async fn new(config: AppConfig) -> anyhow::Result<Self> {
        let store = Arc::new(SceneStore::open(&config.db_path, &config.collection).await?);
        let query = QueryService::new(Arc::clone(&store));

        Ok(Self {
            config,
            store,
            query,
        })
    }
}
