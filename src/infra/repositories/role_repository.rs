//! Role repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, QueryFilter,
    QueryOrder, Set,
};
use validator::Validate;

use super::entities::role::{self, ActiveModel, Entity as RoleEntity};
use super::write_error;
use crate::domain::{NewRole, Role};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait RoleRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Role>>;

    /// Exact name match
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Role>>;

    async fn list(&self) -> AppResult<Vec<Role>>;

    async fn create(&self, role: NewRole) -> AppResult<Role>;

    /// Delete role by ID; its user links go with it
    async fn delete(&self, id: i32) -> AppResult<()>;
}

pub struct RoleStore {
    db: DatabaseConnection,
}

impl RoleStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RoleRepository for RoleStore {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Role>> {
        Ok(RoleEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(Role::from))
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        Ok(RoleEntity::find()
            .filter(role::Column::Name.eq(name))
            .one(&self.db)
            .await?
            .map(Role::from))
    }

    async fn list(&self) -> AppResult<Vec<Role>> {
        let models = RoleEntity::find()
            .order_by_asc(role::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Role::from).collect())
    }

    async fn create(&self, role: NewRole) -> AppResult<Role> {
        role.validate()?;

        let now = Utc::now();
        let model = ActiveModel {
            id: NotSet,
            name: Set(role.name),
            description: Set(role.description),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(|e| write_error(e, "Role"))?;

        Ok(Role::from(model))
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let result = RoleEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }
}
