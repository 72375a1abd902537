//! User query service - read-only user lookups with roles eager-loaded.

use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, LoaderTrait, QueryFilter, QueryOrder, Select,
};

use crate::domain::User;
use crate::errors::AppResult;
use crate::infra::repositories::attach_roles;
use crate::infra::repositories::entities::{
    user::{self, Entity as UserEntity},
    user_role::{self, Entity as UserRoleEntity},
};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Read-only user queries.
///
/// Every returned user has its role associations fully loaded.
/// Absence is `Ok(None)`, never an error.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserQueryService: Send + Sync {
    /// Exact username match
    async fn get_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// Exact email match
    async fn get_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// All active users by ascending ID
    async fn get_active_users(&self) -> AppResult<Vec<User>>;
}

/// SeaORM-backed implementation of [`UserQueryService`]
pub struct UserQueries {
    db: DatabaseConnection,
}

impl UserQueries {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn first(&self, query: Select<UserEntity>) -> AppResult<Option<User>> {
        let Some(model) = query.order_by_asc(user::Column::Id).one(&self.db).await? else {
            return Ok(None);
        };

        Ok(self.with_roles(vec![model]).await?.pop())
    }

    /// Attach role associations to a batch of users with two extra queries.
    async fn with_roles(&self, users: Vec<user::Model>) -> AppResult<Vec<User>> {
        if users.is_empty() {
            return Ok(Vec::new());
        }

        let links = users
            .load_many(
                UserRoleEntity::find().order_by_asc(user_role::Column::Id),
                &self.db,
            )
            .await?;

        let counts: Vec<usize> = links.iter().map(Vec::len).collect();
        let mut grants = attach_roles(&self.db, links.into_iter().flatten().collect())
            .await?
            .into_iter();

        Ok(users
            .into_iter()
            .zip(counts)
            .map(|(model, count)| {
                let mut user = User::from(model);
                user.user_roles = grants.by_ref().take(count).collect();
                user
            })
            .collect())
    }
}

#[async_trait]
impl UserQueryService for UserQueries {
    async fn get_by_username(&self, username: &str) -> AppResult<Option<User>> {
        self.first(UserEntity::find().filter(user::Column::Username.eq(username)))
            .await
    }

    async fn get_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.first(UserEntity::find().filter(user::Column::Email.eq(email)))
            .await
    }

    async fn get_active_users(&self) -> AppResult<Vec<User>> {
        let models = UserEntity::find()
            .filter(user::Column::IsActive.eq(true))
            .order_by_asc(user::Column::Id)
            .all(&self.db)
            .await?;

        tracing::debug!(count = models.len(), "Loaded active users");
        self.with_roles(models).await
    }
}
