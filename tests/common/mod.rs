//! Shared fixtures for integration tests.
//!
//! Every fixture opens its own `sqlite::memory:` database, so tests never
//! share state.

#![allow(dead_code)]

use std::sync::Arc;

use sea_orm::{Database as SeaDatabase, DatabaseConnection};

use sso_directory::domain::{NewRole, NewUser, User};
use sso_directory::infra::{Database, Repositories};

/// Fresh in-memory database with no schema
pub async fn empty_connection() -> DatabaseConnection {
    SeaDatabase::connect("sqlite::memory:")
        .await
        .expect("open in-memory sqlite")
}

/// Fresh in-memory database migrated with the embedded scripts
pub async fn migrated_database() -> Arc<Database> {
    let db = Database::from_connection(empty_connection().await);
    let outcome = db.run_migrations().await;
    assert!(outcome.successful, "migration failed: {:?}", outcome.error);
    Arc::new(db)
}

pub fn repositories(db: &Database) -> Repositories {
    Repositories::from_connection(db.get_connection())
}

/// Insert a user and grant it the named roles, creating missing roles.
pub async fn seed_user(repos: &Repositories, username: &str, active: bool, roles: &[&str]) -> User {
    let mut new_user = NewUser::new(
        username,
        format!("{}@example.com", username),
        "$argon2id$placeholder",
    );
    if !active {
        new_user = new_user.inactive();
    }

    let user = repos.users.create(new_user).await.expect("create user");

    for name in roles {
        let role = match repos.roles.find_by_name(name).await.expect("find role") {
            Some(role) => role,
            None => repos
                .roles
                .create(NewRole::new(*name))
                .await
                .expect("create role"),
        };
        repos
            .user_roles
            .assign(user.id, role.id)
            .await
            .expect("assign role");
    }

    user
}

/// Three active users (alice, bob, carol) and two inactive (dave, erin)
pub async fn seed_directory(repos: &Repositories) {
    seed_user(repos, "alice", true, &["admin", "user"]).await;
    seed_user(repos, "bob", true, &["user"]).await;
    seed_user(repos, "carol", true, &[]).await;
    seed_user(repos, "dave", false, &["user"]).await;
    seed_user(repos, "erin", false, &["admin"]).await;
}
