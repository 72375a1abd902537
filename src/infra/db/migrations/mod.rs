//! Versioned SQL migrations.
//!
//! Scripts are embedded per backend under `migrations/<backend>/` and named
//! `NNN_description.sql`. Each script is applied at most once; applied
//! scripts are recorded in the `schema_versions` table together with the
//! time they ran.

mod bootstrap;
mod schema_version;
mod script;

use std::collections::HashSet;

use chrono::Utc;
use sea_orm::{
    ConnectionTrait, Database as SeaDatabase, DatabaseConnection, DbBackend, DbErr, EntityName,
    EntityTrait, QueryOrder, Schema, Set, Statement, TransactionTrait,
};
use thiserror::Error;

pub use bootstrap::{database_exists, ensure_database_exists, ConnectionTarget};
pub use script::{MigrationScript, ScriptSource};

/// Why a migration run could not complete
#[derive(Error, Debug)]
pub enum MigrationError {
    #[error("Invalid connection target: {0}")]
    InvalidTarget(String),

    #[error("Database unreachable: {0}")]
    Connection(#[source] DbErr),

    #[error("Duplicate migration script name: {0}")]
    DuplicateScript(String),

    #[error("Migration log unavailable: {0}")]
    Log(#[source] DbErr),

    #[error("Migration script {script} failed: {source}")]
    Script {
        script: String,
        #[source]
        source: DbErr,
    },
}

/// Result of a migration run
#[derive(Debug)]
pub struct MigrationOutcome {
    pub successful: bool,
    pub error: Option<MigrationError>,
    /// Scripts applied during this run, in application order
    pub applied_scripts: Vec<String>,
}

impl MigrationOutcome {
    fn success(applied_scripts: Vec<String>) -> Self {
        Self {
            successful: true,
            error: None,
            applied_scripts,
        }
    }

    fn failure(error: MigrationError, applied_scripts: Vec<String>) -> Self {
        Self {
            successful: false,
            error: Some(error),
            applied_scripts,
        }
    }
}

/// Applies pending scripts from a [`ScriptSource`].
///
/// A failing script stops the run; scripts applied before it stay
/// committed. Errors are reported through [`MigrationOutcome`], never
/// raised, so callers decide whether a failed run is fatal.
#[derive(Debug, Clone)]
pub struct MigrationRunner {
    source: ScriptSource,
}

impl MigrationRunner {
    pub fn new(source: ScriptSource) -> Self {
        Self { source }
    }

    /// Runner over the scripts bundled for the backend `database_url` uses
    pub fn embedded_for(database_url: &str) -> Result<Self, MigrationError> {
        let backend = ConnectionTarget::parse(database_url)?.backend();
        Ok(Self::new(ScriptSource::embedded(backend)))
    }

    /// Ensure the database exists, then apply every pending script.
    pub async fn migrate(&self, database_url: &str) -> MigrationOutcome {
        tracing::info!("Starting database migration...");

        if let Err(e) = ensure_database_exists(database_url).await {
            tracing::error!(error = %e, "Could not ensure database exists");
            return MigrationOutcome::failure(e, Vec::new());
        }

        let db = match SeaDatabase::connect(database_url).await {
            Ok(db) => db,
            Err(e) => {
                let e = MigrationError::Connection(e);
                tracing::error!(error = %e, "Database migration failed");
                return MigrationOutcome::failure(e, Vec::new());
            }
        };

        let outcome = self.apply(&db).await;
        if let Err(e) = db.close().await {
            tracing::warn!(error = %e, "Failed to close migration connection");
        }
        outcome
    }

    /// Apply every pending script over an open connection.
    pub async fn apply(&self, db: &DatabaseConnection) -> MigrationOutcome {
        let mut applied = Vec::new();

        match self.apply_pending(db, &mut applied).await {
            Ok(()) => {
                if applied.is_empty() {
                    tracing::info!("Database schema is up to date");
                } else {
                    tracing::info!(
                        count = applied.len(),
                        "Database migration completed successfully"
                    );
                }
                MigrationOutcome::success(applied)
            }
            Err(e) => {
                tracing::error!(error = %e, applied = ?applied, "Database migration failed");
                MigrationOutcome::failure(e, applied)
            }
        }
    }

    /// Names of the scripts a migration would apply, without running them.
    ///
    /// Read-only: a missing database means every script is pending.
    pub async fn scripts_pending(&self, database_url: &str) -> Result<Vec<String>, MigrationError> {
        if !database_exists(database_url).await? {
            return Ok(self
                .source
                .ordered()?
                .into_iter()
                .map(|s| s.name().to_string())
                .collect());
        }

        let db = SeaDatabase::connect(database_url)
            .await
            .map_err(MigrationError::Connection)?;
        let pending = self.pending_on(&db).await;
        db.close().await.map_err(MigrationError::Connection)?;
        pending
    }

    /// Pending script names over an open connection. Writes nothing.
    pub async fn pending_on(&self, db: &DatabaseConnection) -> Result<Vec<String>, MigrationError> {
        let scripts = self.source.ordered()?;
        let done = applied_script_names(db).await?;

        Ok(scripts
            .into_iter()
            .filter(|s| !done.contains(s.name()))
            .map(|s| s.name().to_string())
            .collect())
    }

    async fn apply_pending(
        &self,
        db: &DatabaseConnection,
        applied: &mut Vec<String>,
    ) -> Result<(), MigrationError> {
        let scripts = self.source.ordered()?;
        ensure_log_table(db).await?;
        let done = applied_script_names(db).await?;

        for script in scripts.into_iter().filter(|s| !done.contains(s.name())) {
            tracing::info!(script = script.name(), "Applying migration script");

            run_script(db, script)
                .await
                .map_err(|source| MigrationError::Script {
                    script: script.name().to_string(),
                    source,
                })?;

            applied.push(script.name().to_string());
        }

        Ok(())
    }
}

/// Execute one script and record it, atomically where the backend allows.
async fn run_script(db: &DatabaseConnection, script: &MigrationScript) -> Result<(), DbErr> {
    let txn = db.begin().await?;

    txn.execute_unprepared(script.sql()).await?;

    schema_version::Entity::insert(schema_version::ActiveModel {
        script_name: Set(script.name().to_string()),
        applied_at: Set(Utc::now()),
    })
    .exec_without_returning(&txn)
    .await?;

    txn.commit().await
}

async fn ensure_log_table(db: &DatabaseConnection) -> Result<(), MigrationError> {
    let backend = db.get_database_backend();
    let mut create = Schema::new(backend).create_table_from_entity(schema_version::Entity);
    create.if_not_exists();

    db.execute(backend.build(&create))
        .await
        .map_err(MigrationError::Log)?;
    Ok(())
}

async fn log_table_exists(db: &DatabaseConnection) -> Result<bool, MigrationError> {
    let backend = db.get_database_backend();
    let table = schema_version::Entity.table_name();
    let sql = match backend {
        DbBackend::Sqlite => "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?",
        DbBackend::MySql => {
            "SELECT 1 FROM information_schema.tables \
             WHERE table_schema = DATABASE() AND table_name = ?"
        }
        DbBackend::Postgres => {
            "SELECT 1 FROM information_schema.tables \
             WHERE table_schema = current_schema() AND table_name = $1"
        }
    };

    Ok(db
        .query_one(Statement::from_sql_and_values(backend, sql, [table.into()]))
        .await
        .map_err(MigrationError::Log)?
        .is_some())
}

async fn applied_script_names(db: &DatabaseConnection) -> Result<HashSet<String>, MigrationError> {
    if !log_table_exists(db).await? {
        return Ok(HashSet::new());
    }
    Ok(log_entries(db).await?.into_iter().collect())
}

async fn log_entries(db: &DatabaseConnection) -> Result<Vec<String>, MigrationError> {
    let rows = schema_version::Entity::find()
        .order_by_asc(schema_version::Column::AppliedAt)
        .order_by_asc(schema_version::Column::ScriptName)
        .all(db)
        .await
        .map_err(MigrationError::Log)?;

    Ok(rows.into_iter().map(|r| r.script_name).collect())
}

/// Migration log contents, in the order scripts were applied.
///
/// Empty when no migration has run yet.
pub async fn applied_scripts(db: &DatabaseConnection) -> Result<Vec<String>, MigrationError> {
    if !log_table_exists(db).await? {
        return Ok(Vec::new());
    }
    log_entries(db).await
}
