//! Identity and timestamp contract shared by every directory entity.

use chrono::{DateTime, Utc};

/// Common surface of persisted entities.
pub trait BaseEntity {
    /// Surrogate key assigned by the database
    fn id(&self) -> i32;

    fn created_at(&self) -> DateTime<Utc>;

    fn updated_at(&self) -> DateTime<Utc>;
}

/// Implements [`BaseEntity`] for structs exposing `id`, `created_at`
/// and `updated_at` fields.
macro_rules! impl_base_entity {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::domain::BaseEntity for $ty {
                fn id(&self) -> i32 {
                    self.id
                }

                fn created_at(&self) -> chrono::DateTime<chrono::Utc> {
                    self.created_at
                }

                fn updated_at(&self) -> chrono::DateTime<chrono::Utc> {
                    self.updated_at
                }
            }
        )+
    };
}

pub(crate) use impl_base_entity;
