//! CLI module - Command-line interface for the application.
//!
//! Provides commands for:
//! - `serve` - Start the HTTP server
//! - `migrate` - Apply or inspect database migrations

pub mod args;

pub use args::{Cli, Commands};
