//! Database connection and initialization.

use std::time::Duration;

use sea_orm::{
    ConnectOptions, ConnectionTrait, Database as SeaDatabase, DatabaseConnection, DbErr, Statement,
};

use crate::config::{Config, DB_ACQUIRE_TIMEOUT_SECS};

pub mod migrations;

pub use migrations::{
    database_exists, ensure_database_exists, MigrationError, MigrationOutcome, MigrationRunner, MigrationScript,
    ScriptSource,
};

/// Database wrapper for connection management
#[derive(Clone)]
pub struct Database {
    connection: DatabaseConnection,
}

impl Database {
    /// Build the connection pool. Migrations are run separately.
    ///
    /// Connections are opened on first use, so an unreachable database
    /// fails individual queries instead of startup.
    pub async fn connect(config: &Config) -> Result<Self, DbErr> {
        let mut options = ConnectOptions::new(config.database_url.clone());
        options
            .connect_lazy(true)
            .acquire_timeout(Duration::from_secs(DB_ACQUIRE_TIMEOUT_SECS));

        let connection = SeaDatabase::connect(options).await?;
        tracing::info!(backend = ?connection.get_database_backend(), "Database pool ready");
        Ok(Self { connection })
    }

    /// Wrap an already open connection.
    pub fn from_connection(connection: DatabaseConnection) -> Self {
        Self { connection }
    }

    /// Get a reference to the database connection.
    pub fn connection(&self) -> &DatabaseConnection {
        &self.connection
    }

    /// Get a clone of the database connection.
    pub fn get_connection(&self) -> DatabaseConnection {
        self.connection.clone()
    }

    /// Apply pending embedded migrations over this connection.
    pub async fn run_migrations(&self) -> MigrationOutcome {
        let backend = self.connection.get_database_backend();
        MigrationRunner::new(ScriptSource::embedded(backend))
            .apply(&self.connection)
            .await
    }

    /// Embedded scripts not yet applied to this database.
    pub async fn pending_migrations(&self) -> Result<Vec<String>, MigrationError> {
        let backend = self.connection.get_database_backend();
        MigrationRunner::new(ScriptSource::embedded(backend))
            .pending_on(&self.connection)
            .await
    }

    /// Check database connectivity by executing a simple query.
    pub async fn ping(&self) -> Result<(), DbErr> {
        self.connection
            .execute(Statement::from_string(
                self.connection.get_database_backend(),
                "SELECT 1".to_string(),
            ))
            .await?;
        Ok(())
    }
}
