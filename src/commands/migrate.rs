//! Migrate command - Database migration management.

use crate::cli::args::{MigrateAction, MigrateArgs};
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::MigrationRunner;

/// Execute the migrate command
pub async fn execute(args: MigrateArgs, config: Config) -> AppResult<()> {
    let runner = MigrationRunner::embedded_for(&config.database_url)
        .map_err(|e| AppError::internal(e.to_string()))?;

    match args.action {
        MigrateAction::Up => {
            let outcome = runner.migrate(&config.database_url).await;
            for name in &outcome.applied_scripts {
                println!("applied: {}", name);
            }
            if let Some(e) = outcome.error {
                return Err(AppError::internal(e.to_string()));
            }
        }
        MigrateAction::Status => {
            let pending = runner
                .scripts_pending(&config.database_url)
                .await
                .map_err(|e| AppError::internal(e.to_string()))?;

            if pending.is_empty() {
                println!("Database schema is up to date");
            }
            for name in pending {
                println!("pending: {}", name);
            }
        }
    }

    Ok(())
}
