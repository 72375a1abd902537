//! CLI argument definitions.

use clap::{Parser, Subcommand};

/// SSO Directory - read-only user and role directory service
#[derive(Parser, Debug)]
#[command(name = "sso-directory")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server
    Serve(ServeArgs),

    /// Run database migrations
    Migrate(MigrateArgs),
}

/// Arguments for the serve command
#[derive(Parser, Debug, Default)]
pub struct ServeArgs {
    /// Host to bind to (defaults to SERVER_HOST)
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    /// Port to listen on (defaults to SERVER_PORT)
    #[arg(short, long)]
    pub port: Option<u16>,
}

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    #[command(subcommand)]
    pub action: MigrateAction,
}

/// Migration actions
#[derive(Subcommand, Debug)]
pub enum MigrateAction {
    /// Create the database if needed and apply pending scripts
    Up,
    /// List scripts that have not been applied yet
    Status,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_serve_overrides() {
        let cli = Cli::parse_from(["sso-directory", "serve", "--port", "8080"]);
        match cli.command {
            Commands::Serve(args) => {
                assert_eq!(args.port, Some(8080));
                assert!(args.host.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn parses_migrate_status_with_global_verbose() {
        let cli = Cli::parse_from(["sso-directory", "migrate", "status", "-v"]);
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Commands::Migrate(MigrateArgs {
                action: MigrateAction::Status
            })
        ));
    }
}
