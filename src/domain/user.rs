//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::entity::impl_base_entity;
use super::Role;

/// Directory user with its role associations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Empty unless loaded by a query that eager-loads associations
    #[serde(default)]
    pub user_roles: Vec<UserRole>,
}

impl User {
    /// Names of all roles granted to this user, in association order
    pub fn role_names(&self) -> Vec<String> {
        self.user_roles
            .iter()
            .map(|ur| ur.role.name.clone())
            .collect()
    }

    /// Check whether the user holds a role with the given name
    pub fn has_role(&self, name: &str) -> bool {
        self.user_roles.iter().any(|ur| ur.role.name == name)
    }
}

/// Association between a user and a role.
///
/// The owning user is referenced by id only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRole {
    pub id: i32,
    pub user_id: i32,
    pub role_id: i32,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl_base_entity!(User, UserRole);

/// User creation data
#[derive(Debug, Clone, Validate)]
pub struct NewUser {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    /// Opaque, already-hashed credential
    pub password_hash: String,
    pub is_active: bool,
}

impl NewUser {
    /// Active user with the given identity
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            is_active: true,
        }
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }
}

/// Partial user update; `None` leaves a field untouched
#[derive(Debug, Clone, Default, Validate)]
pub struct UserChanges {
    #[validate(length(min = 1, message = "Username cannot be empty"))]
    pub username: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub is_active: Option<bool>,
}

/// User projection returned by the HTTP API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    /// User identifier
    #[schema(example = 1)]
    pub id: i32,
    /// Unique login name
    #[schema(example = "alice")]
    pub username: String,
    /// Unique email address
    #[schema(example = "alice@example.com")]
    pub email: String,
    /// Whether the account is active
    pub is_active: bool,
    /// Names of the roles granted to the user
    #[schema(example = json!(["admin", "user"]))]
    pub roles: Vec<String>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        let roles = user.role_names();
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            is_active: user.is_active,
            roles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BaseEntity;

    fn role(id: i32, name: &str) -> Role {
        let now = Utc::now();
        Role {
            id,
            name: name.to_string(),
            description: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn user_with_roles(roles: &[Role]) -> User {
        let now = Utc::now();
        User {
            id: 7,
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: "hash".to_string(),
            is_active: true,
            created_at: now,
            updated_at: now,
            user_roles: roles
                .iter()
                .enumerate()
                .map(|(i, r)| UserRole {
                    id: i as i32 + 1,
                    user_id: 7,
                    role_id: r.id,
                    role: r.clone(),
                    created_at: now,
                    updated_at: now,
                })
                .collect(),
        }
    }

    #[test]
    fn dto_flattens_role_names() {
        let user = user_with_roles(&[role(1, "admin"), role(2, "auditor")]);
        let dto = UserDto::from(user);

        assert_eq!(dto.id, 7);
        assert_eq!(dto.username, "alice");
        assert_eq!(dto.roles, vec!["admin".to_string(), "auditor".to_string()]);
    }

    #[test]
    fn dto_serializes_camel_case_without_password() {
        let dto = UserDto::from(user_with_roles(&[role(1, "admin")]));
        let json = serde_json::to_value(&dto).unwrap();

        assert_eq!(json["isActive"], true);
        assert_eq!(json["roles"][0], "admin");
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("password_hash").is_none());
    }

    #[test]
    fn user_serialization_skips_password_hash() {
        let json = serde_json::to_value(user_with_roles(&[])).unwrap();
        assert!(json.get("password_hash").is_none());
    }

    #[test]
    fn has_role_checks_loaded_associations() {
        let user = user_with_roles(&[role(3, "user")]);
        assert!(user.has_role("user"));
        assert!(!user.has_role("admin"));
        assert_eq!(user.id(), 7);
        assert_eq!(user.user_roles[0].id(), 1);
    }

    #[test]
    fn new_user_validation_rejects_empty_username_and_bad_email() {
        assert!(NewUser::new("bob", "bob@example.com", "h").validate().is_ok());
        assert!(NewUser::new("", "bob@example.com", "h").validate().is_err());
        assert!(NewUser::new("bob", "not-an-email", "h").validate().is_err());
    }
}
