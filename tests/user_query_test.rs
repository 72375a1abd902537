//! Integration tests for user queries and repositories against SQLite.

mod common;

use sso_directory::domain::{NewRole, NewUser, UserChanges};
use sso_directory::errors::AppError;
use sso_directory::services::{UserQueries, UserQueryService};

async fn fixture() -> (UserQueries, sso_directory::infra::Repositories) {
    let db = common::migrated_database().await;
    let repos = common::repositories(&db);
    (UserQueries::new(db.get_connection()), repos)
}

#[tokio::test]
async fn active_users_exclude_inactive_ones() {
    let (queries, repos) = fixture().await;
    common::seed_directory(&repos).await;

    let users = queries.get_active_users().await.unwrap();

    let names: Vec<_> = users.iter().map(|u| u.username.as_str()).collect();
    assert_eq!(names, vec!["alice", "bob", "carol"]);
    assert!(users.iter().all(|u| u.is_active));
}

#[tokio::test]
async fn active_users_are_ordered_by_id() {
    let (queries, repos) = fixture().await;
    common::seed_user(&repos, "zed", true, &[]).await;
    common::seed_user(&repos, "amy", true, &[]).await;

    let users = queries.get_active_users().await.unwrap();

    assert!(users.windows(2).all(|w| w[0].id < w[1].id));
    assert_eq!(users[0].username, "zed");
}

#[tokio::test]
async fn active_users_on_empty_directory_is_empty() {
    let (queries, _) = fixture().await;
    assert!(queries.get_active_users().await.unwrap().is_empty());
}

#[tokio::test]
async fn lookup_by_username_loads_roles() {
    let (queries, repos) = fixture().await;
    common::seed_directory(&repos).await;

    let alice = queries.get_by_username("alice").await.unwrap().unwrap();

    assert_eq!(alice.username, "alice");
    assert_eq!(alice.role_names(), vec!["admin", "user"]);
    assert!(alice.user_roles.iter().all(|link| link.user_id == alice.id));
    assert!(alice.user_roles.iter().all(|link| link.role.id == link.role_id));
}

#[tokio::test]
async fn lookup_by_email_loads_roles() {
    let (queries, repos) = fixture().await;
    common::seed_directory(&repos).await;

    let bob = queries
        .get_by_email("bob@example.com")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(bob.email, "bob@example.com");
    assert_eq!(bob.role_names(), vec!["user"]);
}

#[tokio::test]
async fn lookups_find_inactive_users_too() {
    let (queries, repos) = fixture().await;
    common::seed_directory(&repos).await;

    let dave = queries.get_by_username("dave").await.unwrap().unwrap();

    assert!(!dave.is_active);
    assert!(dave.has_role("user"));
}

#[tokio::test]
async fn unknown_user_is_absent_not_an_error() {
    let (queries, repos) = fixture().await;
    common::seed_directory(&repos).await;

    assert!(queries.get_by_username("mallory").await.unwrap().is_none());
    assert!(queries
        .get_by_email("mallory@example.com")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn user_without_roles_has_empty_associations() {
    let (queries, repos) = fixture().await;
    common::seed_directory(&repos).await;

    let carol = queries.get_by_username("carol").await.unwrap().unwrap();
    assert!(carol.user_roles.is_empty());
}

#[tokio::test]
async fn roles_track_revocations() {
    let (queries, repos) = fixture().await;
    common::seed_directory(&repos).await;
    let alice = queries.get_by_username("alice").await.unwrap().unwrap();
    let admin = repos.roles.find_by_name("admin").await.unwrap().unwrap();

    repos.user_roles.revoke(alice.id, admin.id).await.unwrap();

    let alice = queries.get_by_username("alice").await.unwrap().unwrap();
    assert_eq!(alice.role_names(), vec!["user"]);
    assert_eq!(
        repos.user_roles.list_for_user(alice.id).await.unwrap().len(),
        1
    );
}

#[tokio::test]
async fn deactivated_user_leaves_active_list() {
    let (queries, repos) = fixture().await;
    common::seed_directory(&repos).await;
    let bob = queries.get_by_username("bob").await.unwrap().unwrap();

    repos
        .users
        .update(
            bob.id,
            UserChanges {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let names: Vec<_> = queries
        .get_active_users()
        .await
        .unwrap()
        .into_iter()
        .map(|u| u.username)
        .collect();
    assert_eq!(names, vec!["alice", "carol"]);
}

#[tokio::test]
async fn duplicate_username_is_a_conflict() {
    let (_, repos) = fixture().await;
    common::seed_user(&repos, "alice", true, &[]).await;

    let result = repos
        .users
        .create(NewUser::new("alice", "other@example.com", "hash"))
        .await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn duplicate_assignment_is_a_conflict() {
    let (_, repos) = fixture().await;
    let user = common::seed_user(&repos, "alice", true, &["admin"]).await;
    let admin = repos.roles.find_by_name("admin").await.unwrap().unwrap();

    let result = repos.user_roles.assign(user.id, admin.id).await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn assigning_unknown_role_is_not_found() {
    let (_, repos) = fixture().await;
    let user = common::seed_user(&repos, "alice", true, &[]).await;

    let result = repos.user_roles.assign(user.id, 999).await;

    assert!(matches!(result, Err(AppError::NotFound)));
}

#[tokio::test]
async fn deleting_missing_rows_is_not_found() {
    let (_, repos) = fixture().await;

    assert!(matches!(repos.users.delete(42).await, Err(AppError::NotFound)));
    assert!(matches!(repos.roles.delete(42).await, Err(AppError::NotFound)));
    assert!(matches!(
        repos.user_roles.revoke(1, 2).await,
        Err(AppError::NotFound)
    ));
}

#[tokio::test]
async fn deleting_a_user_removes_its_assignments() {
    let (queries, repos) = fixture().await;
    let user = common::seed_user(&repos, "alice", true, &["admin"]).await;

    repos.users.delete(user.id).await.unwrap();

    assert!(queries.get_by_username("alice").await.unwrap().is_none());
    assert!(repos.user_roles.list_for_user(user.id).await.unwrap().is_empty());
    assert_eq!(repos.roles.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn role_description_round_trips() {
    let (_, repos) = fixture().await;

    let created = repos
        .roles
        .create(NewRole::new("auditor").with_description("Read-only access to audit logs"))
        .await
        .unwrap();
    let found = repos.roles.find_by_id(created.id).await.unwrap().unwrap();

    assert_eq!(found.name, "auditor");
    assert_eq!(
        found.description.as_deref(),
        Some("Read-only access to audit logs")
    );
}
