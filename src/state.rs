use std::sync::Arc;

use axum::extract::FromRef;

use crate::config::Config;
use crate::store::{CatalogStore, ResultLedger, memory::MemoryStore};

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogStore>,
    pub ledger: Arc<dyn ResultLedger>,
    pub config: Config,
}

impl AppState {
    /// State backed by a single store implementing both traits.
    pub fn with_store<S>(store: Arc<S>, config: Config) -> Self
    where
        S: CatalogStore + ResultLedger + 'static,
    {
        Self {
            catalog: store.clone(),
            ledger: store,
            config,
        }
    }

    pub fn in_memory(config: Config) -> Self {
        Self::with_store(Arc::new(MemoryStore::new()), config)
    }
}

impl FromRef<AppState> for Arc<dyn CatalogStore> {
    fn from_ref(state: &AppState) -> Self {
        state.catalog.clone()
    }
}

impl FromRef<AppState> for Arc<dyn ResultLedger> {
    fn from_ref(state: &AppState) -> Self {
        state.ledger.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
