//! Infrastructure layer - External systems integration
//!
//! Database connection, schema migrations and per-entity repositories.

pub mod db;
pub mod repositories;

pub use db::{
    ensure_database_exists, Database, MigrationError, MigrationOutcome, MigrationRunner,
    MigrationScript, ScriptSource,
};
pub use repositories::{
    Repositories, RoleRepository, RoleStore, UserRepository, UserRoleRepository, UserRoleStore,
    UserStore,
};
