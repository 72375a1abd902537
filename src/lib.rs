//! SSO Directory - read-only user and role directory
//!
//! Serves user lookups (by username, by email, active users) with roles
//! attached, over a relational database whose schema is brought up to date
//! by an embedded SQL migration runner.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Users, roles and their assignments
//! - **services**: Read-only user queries
//! - **infra**: Database, migrations and repositories
//! - **api**: HTTP handlers and routes
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Apply pending migrations
//! cargo run -- migrate up
//!
//! # List pending migrations
//! cargo run -- migrate status
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Role, User, UserDto, UserRole};
pub use errors::{AppError, AppResult};
pub use infra::{Database, MigrationOutcome, MigrationRunner};
