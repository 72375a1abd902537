//! API layer - HTTP handlers and routes
//!
//! Translates HTTP requests into query-service calls and results into
//! JSON or problem-details responses.

pub mod handlers;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use routes::create_router;
pub use state::AppState;
