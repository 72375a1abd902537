//! Serve command - Starts the HTTP server.

use std::sync::Arc;

use crate::api::{create_router, AppState};
use crate::cli::args::ServeArgs;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::{Database, MigrationRunner};

/// Execute the serve command
pub async fn execute(args: ServeArgs, mut config: Config) -> AppResult<()> {
    tracing::info!("Starting server...");

    if config.run_migrations_on_startup {
        run_startup_migrations(&config).await?;
    }

    let db = Arc::new(Database::connect(&config).await?);

    let app_state = AppState::from_database(db);
    let app = create_router(app_state);

    if let Some(host) = args.host {
        config.server_host = host;
    }
    if let Some(port) = args.port {
        config.server_port = port;
    }

    let addr = config.server_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind to {}: {}", addr, e)))?;

    tracing::info!("Server running on http://{}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    Ok(())
}

/// A failed run is logged and serving continues, unless strict mode is on.
async fn run_startup_migrations(config: &Config) -> AppResult<()> {
    let outcome = match MigrationRunner::embedded_for(&config.database_url) {
        Ok(runner) => runner.migrate(&config.database_url).await,
        Err(e) => {
            tracing::error!(error = %e, "Cannot run startup migrations");
            return strict_failure(config, e.to_string());
        }
    };

    match outcome.error {
        None => Ok(()),
        Some(e) => {
            tracing::error!(
                error = %e,
                applied = ?outcome.applied_scripts,
                "Startup migration failed"
            );
            strict_failure(config, e.to_string())
        }
    }
}

fn strict_failure(config: &Config, message: String) -> AppResult<()> {
    if config.migrations_strict {
        Err(AppError::internal(format!("Migration failed: {}", message)))
    } else {
        tracing::warn!("Continuing startup without a migrated schema");
        Ok(())
    }
}
