//! Application services layer - read use cases over the directory.

mod user_query_service;

pub use user_query_service::{UserQueries, UserQueryService};

#[cfg(any(test, feature = "test-utils"))]
pub use user_query_service::MockUserQueryService;
