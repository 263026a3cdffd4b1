//! Service Container - Centralized service access.
//!
//! Builds every service once at startup from the shared database
//! connection and configuration.

use std::sync::Arc;

use super::{UserManager, UserService};
use crate::config::Config;
use crate::infra::{LocalFileStore, Persistence};

/// Service container trait for dependency injection.
pub trait ServiceContainer: Send + Sync {
    /// Get user service
    fn users(&self) -> Arc<dyn UserService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    user_service: Arc<dyn UserService>,
}

impl Services {
    /// Create service container from database connection and config
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: &Config) -> Self {
        let uow = Arc::new(Persistence::new(db));
        let files = Arc::new(LocalFileStore::new(config.upload_dir.clone()));
        let user_service = Arc::new(UserManager::new(uow, files));

        Self { user_service }
    }
}

impl ServiceContainer for Services {
    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }
}
