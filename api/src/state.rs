use std::sync::Arc;

use common::config::Settings;
use common::db::DbPool;

/// Application state shared across all handlers
#[derive(Clone, Debug)]
pub struct AppState {
    pub db_pool: DbPool,
    pub config: Arc<Settings>,
}

impl AppState {
    /// Create a new AppState instance
    pub fn new(db_pool: DbPool, config: Settings) -> Self {
        Self {
            db_pool,
            config: Arc::new(config),
        }
    }
}
