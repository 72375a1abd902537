//! Repository layer - Data access abstraction
//!
//! One narrow repository per entity kind. Repositories return entities
//! without eager-loaded associations, except for user-role links which
//! always carry their role.

pub(crate) mod entities;
mod role_repository;
mod user_repository;
mod user_role_repository;

use std::sync::Arc;

use sea_orm::{DatabaseConnection, DbErr, SqlErr};

use crate::errors::AppError;

pub use role_repository::{RoleRepository, RoleStore};
pub use user_repository::{UserRepository, UserStore};
pub use user_role_repository::{UserRoleRepository, UserRoleStore};

pub(crate) use user_role_repository::attach_roles;

#[cfg(any(test, feature = "test-utils"))]
pub use role_repository::MockRoleRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_role_repository::MockUserRoleRepository;

/// Registered repositories, one per entity kind
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub roles: Arc<dyn RoleRepository>,
    pub user_roles: Arc<dyn UserRoleRepository>,
}

impl Repositories {
    /// Build SeaORM-backed repositories sharing one connection pool
    pub fn from_connection(db: DatabaseConnection) -> Self {
        Self {
            users: Arc::new(UserStore::new(db.clone())),
            roles: Arc::new(RoleStore::new(db.clone())),
            user_roles: Arc::new(UserRoleStore::new(db)),
        }
    }
}

/// Map write failures, surfacing unique-key violations as conflicts
fn write_error(err: DbErr, what: &str) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::conflict(what),
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => AppError::NotFound,
        _ => AppError::Database(err),
    }
}
