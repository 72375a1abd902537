//! User/role assignment repository.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, LoaderTrait,
    NotSet, QueryFilter, QueryOrder, Set,
};

use super::entities::{
    role::Entity as RoleEntity,
    user::Entity as UserEntity,
    user_role::{self, ActiveModel, Entity as UserRoleEntity},
};
use super::write_error;
use crate::domain::{Role, UserRole};
use crate::errors::{AppError, AppResult, OptionExt};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRoleRepository: Send + Sync {
    /// Grant a role to a user
    async fn assign(&self, user_id: i32, role_id: i32) -> AppResult<UserRole>;

    /// Remove a grant; `NotFound` if the user does not hold the role
    async fn revoke(&self, user_id: i32, role_id: i32) -> AppResult<()>;

    /// Grants held by a user, by ascending link ID
    async fn list_for_user(&self, user_id: i32) -> AppResult<Vec<UserRole>>;
}

pub struct UserRoleStore {
    db: DatabaseConnection,
}

impl UserRoleStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRoleRepository for UserRoleStore {
    async fn assign(&self, user_id: i32, role_id: i32) -> AppResult<UserRole> {
        UserEntity::find_by_id(user_id)
            .one(&self.db)
            .await?
            .ok_or_not_found()?;
        let role = RoleEntity::find_by_id(role_id)
            .one(&self.db)
            .await?
            .ok_or_not_found()?;

        let now = Utc::now();
        let link = ActiveModel {
            id: NotSet,
            user_id: Set(user_id),
            role_id: Set(role_id),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(|e| write_error(e, "Role assignment"))?;

        tracing::debug!(user_id, role_id, "Role assigned");
        Ok(link.into_domain(Role::from(role)))
    }

    async fn revoke(&self, user_id: i32, role_id: i32) -> AppResult<()> {
        let result = UserRoleEntity::delete_many()
            .filter(user_role::Column::UserId.eq(user_id))
            .filter(user_role::Column::RoleId.eq(role_id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    async fn list_for_user(&self, user_id: i32) -> AppResult<Vec<UserRole>> {
        let links = UserRoleEntity::find()
            .filter(user_role::Column::UserId.eq(user_id))
            .order_by_asc(user_role::Column::Id)
            .all(&self.db)
            .await?;

        attach_roles(&self.db, links).await
    }
}

/// Load the role of every link in one query, preserving link order.
pub(crate) async fn attach_roles<C>(db: &C, links: Vec<user_role::Model>) -> AppResult<Vec<UserRole>>
where
    C: ConnectionTrait,
{
    if links.is_empty() {
        return Ok(Vec::new());
    }

    let roles = links.load_one(RoleEntity, db).await?;

    links
        .into_iter()
        .zip(roles)
        .map(|(link, role)| match role {
            Some(role) => Ok(link.into_domain(Role::from(role))),
            None => Err(AppError::internal(format!(
                "user_role {} references missing role {}",
                link.id, link.role_id
            ))),
        })
        .collect()
}
