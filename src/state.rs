//! Shared application state handed to every operation

use crate::admin::AdminGuard;
use crate::catalog::CatalogStore;
use crate::config::Config;
use crate::error::AppError;
use crate::search::Matcher;
use std::sync::Arc;

/// Owned for the process lifetime; cheap to clone into handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<CatalogStore>,
    pub config: Arc<Config>,
    pub guard: AdminGuard,
    pub matcher: Matcher,
}

impl AppState {
    /// Open the catalog store described by `config`
    pub fn open(config: Config) -> Result<Self, AppError> {
        let store = CatalogStore::open(&config.data_file, &config.categories)?;
        Ok(Self::with_store(config, store))
    }

    pub fn with_store(config: Config, store: CatalogStore) -> Self {
        Self {
            guard: AdminGuard::new(config.admin_code.clone()),
            matcher: Matcher::new(config.similarity_threshold, config.min_query_len),
            store: Arc::new(store),
            config: Arc::new(config),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use tempfile::TempDir;

    pub const TEST_ADMIN_CODE: &str = "open-sesame";

    /// State over a fresh seeded catalog in a temp dir; keep the dir alive
    pub fn test_state() -> (AppState, TempDir) {
        let dir = TempDir::new().unwrap();
        let config = Config {
            data_file: dir.path().join("catalog.json"),
            admin_code: Some(TEST_ADMIN_CODE.to_string()),
            order_phone: Some("15550100".to_string()),
            ..Config::default()
        };
        (AppState::open(config).unwrap(), dir)
    }
}
