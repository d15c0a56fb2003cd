//! Application state shared by every handler.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::Database;
use crate::services::{ServiceContainer, Services};

#[derive(Clone)]
pub struct AppState {
    pub services: Arc<dyn ServiceContainer>,
    /// Kept for the health check
    pub database: Arc<Database>,
}

impl AppState {
    /// Wire the production services over `database`.
    pub fn from_config(database: Arc<Database>, config: &Config) -> Self {
        let services = Services::from_connection(database.get_connection(), config);
        Self::new(Arc::new(services), database)
    }

    /// State over an arbitrary container, e.g. a mocked one.
    pub fn new(services: Arc<dyn ServiceContainer>, database: Arc<Database>) -> Self {
        Self { services, database }
    }
}
