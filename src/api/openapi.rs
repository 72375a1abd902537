//! OpenAPI documentation configuration.
//!
//! Served through Swagger UI at `/swagger-ui`.

use utoipa::OpenApi;

use crate::api::handlers::{health_handler, user_handler};
use crate::domain::UserDto;
use crate::errors::ProblemDetails;

/// OpenAPI documentation for the SSO directory
#[derive(OpenApi)]
#[openapi(
    info(
        title = "SSO Directory",
        version = "0.1.0",
        description = "Read-only user and role directory for single sign-on",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        user_handler::get_active_users,
        user_handler::get_user_by_username,
        user_handler::get_user_by_email,
        health_handler::health_check,
    ),
    components(
        schemas(
            UserDto,
            ProblemDetails,
            health_handler::HealthResponse,
            health_handler::ServiceStatus,
            health_handler::ServiceHealth,
        )
    ),
    tags(
        (name = "Users", description = "User directory lookups"),
        (name = "Health", description = "Service health")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_user_routes() {
        let doc = ApiDoc::openapi();
        let paths: Vec<_> = doc.paths.paths.keys().cloned().collect();

        assert!(paths.contains(&"/users".to_string()));
        assert!(paths.contains(&"/users/{username}".to_string()));
        assert!(paths.contains(&"/users/email/{email}".to_string()));
    }
}
