//! User repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, NotSet, QueryOrder, Set,
};
use validator::Validate;

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use super::write_error;
use crate::domain::{NewUser, User, UserChanges};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
///
/// Returned users have no role associations loaded.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: i32) -> AppResult<Option<User>>;

    /// List all users, active or not, by ascending ID
    async fn list(&self) -> AppResult<Vec<User>>;

    /// Create a new user
    async fn create(&self, user: NewUser) -> AppResult<User>;

    /// Update user fields
    async fn update(&self, id: i32, changes: UserChanges) -> AppResult<User>;

    /// Delete user by ID along with its role links
    async fn delete(&self, id: i32) -> AppResult<()>;
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(User::from))
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        let models = UserEntity::find()
            .order_by_asc(user::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(User::from).collect())
    }

    async fn create(&self, user: NewUser) -> AppResult<User> {
        user.validate()?;

        let now = Utc::now();
        let active_model = ActiveModel {
            id: NotSet,
            username: Set(user.username),
            email: Set(user.email),
            password_hash: Set(user.password_hash),
            is_active: Set(user.is_active),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| write_error(e, "User"))?;
        tracing::debug!(user_id = model.id, "User created");
        Ok(User::from(model))
    }

    async fn update(&self, id: i32, changes: UserChanges) -> AppResult<User> {
        changes.validate()?;

        let user = UserEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = user.into();

        if let Some(username) = changes.username {
            active.username = Set(username);
        }
        if let Some(email) = changes.email {
            active.email = Set(email);
        }
        if let Some(password_hash) = changes.password_hash {
            active.password_hash = Set(password_hash);
        }
        if let Some(is_active) = changes.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(Utc::now());

        let model = active
            .update(&self.db)
            .await
            .map_err(|e| write_error(e, "User"))?;
        Ok(User::from(model))
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let result = UserEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }
}
