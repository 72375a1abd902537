//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use crate::infra::{Database, Repositories};
use crate::services::{UserQueries, UserQueryService};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Read-only user queries
    pub user_queries: Arc<dyn UserQueryService>,
    /// Per-entity repositories (not routed)
    pub repositories: Repositories,
    /// Database connection
    pub database: Arc<Database>,
}

impl AppState {
    /// Wire SeaORM-backed services over the database connection pool.
    pub fn from_database(database: Arc<Database>) -> Self {
        let connection = database.get_connection();

        Self {
            user_queries: Arc::new(UserQueries::new(connection.clone())),
            repositories: Repositories::from_connection(connection),
            database,
        }
    }

    /// Create new application state with manually injected services.
    pub fn new(
        user_queries: Arc<dyn UserQueryService>,
        repositories: Repositories,
        database: Arc<Database>,
    ) -> Self {
        Self {
            user_queries,
            repositories,
            database,
        }
    }
}
