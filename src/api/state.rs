//! Application state - Dependency injection container.

use std::sync::Arc;

use crate::config::Config;
use crate::domain::Argon2Hasher;
use crate::errors::AppResult;
use crate::infra::{Database, UserStore};
use crate::services::{UserManager, UserService};

/// Application state containing the service and infrastructure handles.
#[derive(Clone)]
pub struct AppState {
    /// User lifecycle service
    pub user_service: Arc<dyn UserService>,
    /// Database connection
    pub database: Arc<Database>,
}

impl AppState {
    /// Create application state from database connection and config.
    ///
    /// Wires the SeaORM-backed repository and the Argon2 hasher into the
    /// user service.
    pub fn from_config(database: Arc<Database>, config: &Config) -> AppResult<Self> {
        let repo = Arc::new(UserStore::new(database.connection().clone()));
        let hasher = Arc::new(Argon2Hasher::from_config(config)?);
        let user_service = Arc::new(UserManager::new(repo, hasher));

        Ok(Self {
            user_service,
            database,
        })
    }

    /// Create application state with a manually injected service.
    pub fn new(user_service: Arc<dyn UserService>, database: Arc<Database>) -> Self {
        Self {
            user_service,
            database,
        }
    }
}
