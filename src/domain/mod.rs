//! Domain layer - Directory entities independent of persistence.
//!
//! Users own their role associations; associations refer back to the
//! user by id only and carry the linked role by value once loaded.

pub mod entity;
pub mod role;
pub mod user;

pub use entity::BaseEntity;
pub use role::{NewRole, Role};
pub use user::{NewUser, User, UserChanges, UserDto, UserRole};
