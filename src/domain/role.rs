//! Role domain entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::entity::impl_base_entity;

/// Named role that can be granted to users
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl_base_entity!(Role);

/// Role creation data
#[derive(Debug, Clone, Validate)]
pub struct NewRole {
    #[validate(length(min = 1, message = "Role name is required"))]
    pub name: String,
    pub description: Option<String>,
}

impl NewRole {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
