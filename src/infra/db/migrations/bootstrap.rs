//! Database bootstrap: make sure the target database exists before any
//! script runs against it.

use std::path::Path;

use sea_orm::{ConnectionTrait, Database as SeaDatabase, DatabaseConnection, DbBackend, Statement};
use url::Url;

use super::MigrationError;
use crate::config::POSTGRES_MAINTENANCE_DB;

/// Where a connection string points, as far as database creation cares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionTarget {
    /// SQLite file or in-memory database
    Sqlite { url: String, in_memory: bool },
    /// Database living on a MySQL or PostgreSQL server
    Server {
        backend: DbBackend,
        /// Connection to the server itself, used to create `database`
        admin_url: String,
        database: String,
    },
}

impl ConnectionTarget {
    pub fn parse(database_url: &str) -> Result<Self, MigrationError> {
        if database_url.starts_with("sqlite:") {
            let in_memory =
                database_url.contains(":memory:") || database_url.contains("mode=memory");
            return Ok(Self::Sqlite {
                url: database_url.to_string(),
                in_memory,
            });
        }

        let mut url = Url::parse(database_url)
            .map_err(|e| MigrationError::InvalidTarget(format!("malformed URL: {}", e)))?;

        let backend = match url.scheme() {
            "mysql" | "mariadb" => DbBackend::MySql,
            "postgres" | "postgresql" => DbBackend::Postgres,
            other => {
                return Err(MigrationError::InvalidTarget(format!(
                    "unsupported scheme '{}'",
                    other
                )))
            }
        };

        let database = url.path().trim_start_matches('/').to_string();
        validate_database_name(&database)?;

        match backend {
            DbBackend::Postgres => url.set_path(&format!("/{}", POSTGRES_MAINTENANCE_DB)),
            _ => url.set_path(""),
        }

        Ok(Self::Server {
            backend,
            admin_url: url.to_string(),
            database,
        })
    }

    pub fn backend(&self) -> DbBackend {
        match self {
            Self::Sqlite { .. } => DbBackend::Sqlite,
            Self::Server { backend, .. } => *backend,
        }
    }
}

/// Database names end up inside DDL, so only plain identifiers are accepted.
fn validate_database_name(name: &str) -> Result<(), MigrationError> {
    if name.is_empty() {
        return Err(MigrationError::InvalidTarget(
            "connection string names no database".to_string(),
        ));
    }

    let valid = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '$'));
    if !valid {
        return Err(MigrationError::InvalidTarget(format!(
            "unsupported database name '{}'",
            name
        )));
    }

    Ok(())
}

/// Create the target database if it does not exist yet.
///
/// Idempotent. Fails on connectivity errors or an unusable target.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), MigrationError> {
    match ConnectionTarget::parse(database_url)? {
        ConnectionTarget::Sqlite { in_memory: true, .. } => Ok(()),
        ConnectionTarget::Sqlite { url, .. } => {
            // Opening in rwc mode creates the file
            let url = if url.contains("mode=") {
                url
            } else if url.contains('?') {
                format!("{}&mode=rwc", url)
            } else {
                format!("{}?mode=rwc", url)
            };
            let db = SeaDatabase::connect(&url)
                .await
                .map_err(MigrationError::Connection)?;
            db.close().await.map_err(MigrationError::Connection)?;
            Ok(())
        }
        ConnectionTarget::Server {
            backend,
            admin_url,
            database,
        } => {
            let admin = SeaDatabase::connect(&admin_url)
                .await
                .map_err(MigrationError::Connection)?;

            let exists = server_has_database(&admin, backend, &database).await?;

            if exists {
                tracing::debug!(database = %database, "Database already exists");
            } else {
                let create = match backend {
                    DbBackend::Postgres => format!("CREATE DATABASE \"{}\"", database),
                    _ => format!("CREATE DATABASE IF NOT EXISTS `{}`", database),
                };
                admin
                    .execute_unprepared(&create)
                    .await
                    .map_err(MigrationError::Connection)?;
                tracing::info!(database = %database, "Created database");
            }

            admin.close().await.map_err(MigrationError::Connection)?;
            Ok(())
        }
    }
}

/// Whether the target database already exists. Never creates anything.
pub async fn database_exists(database_url: &str) -> Result<bool, MigrationError> {
    match ConnectionTarget::parse(database_url)? {
        ConnectionTarget::Sqlite { in_memory: true, .. } => Ok(true),
        ConnectionTarget::Sqlite { url, .. } => Ok(Path::new(sqlite_file(&url)).exists()),
        ConnectionTarget::Server {
            backend,
            admin_url,
            database,
        } => {
            let admin = SeaDatabase::connect(&admin_url)
                .await
                .map_err(MigrationError::Connection)?;
            let exists = server_has_database(&admin, backend, &database).await;
            admin.close().await.map_err(MigrationError::Connection)?;
            exists
        }
    }
}

async fn server_has_database(
    admin: &DatabaseConnection,
    backend: DbBackend,
    database: &str,
) -> Result<bool, MigrationError> {
    let lookup = match backend {
        DbBackend::Postgres => Statement::from_sql_and_values(
            backend,
            "SELECT 1 FROM pg_database WHERE datname = $1",
            [database.into()],
        ),
        _ => Statement::from_sql_and_values(
            backend,
            "SELECT SCHEMA_NAME FROM INFORMATION_SCHEMA.SCHEMATA WHERE SCHEMA_NAME = ?",
            [database.into()],
        ),
    };

    Ok(admin
        .query_one(lookup)
        .await
        .map_err(MigrationError::Connection)?
        .is_some())
}

/// File path of a SQLite URL (`sqlite://data/sso.db?mode=rwc` -> `data/sso.db`)
fn sqlite_file(url: &str) -> &str {
    let rest = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
        .unwrap_or(url);
    rest.split('?').next().unwrap_or(rest)
}
